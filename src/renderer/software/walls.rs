//! Per-column wall casting.
//!
//! Each screen column runs one DDA walk against the wall layer, converts
//! the hit into a perpendicular (fisheye-corrected) distance, and fills the
//! column's wall span with shaded texels. The perpendicular distance is the
//! column's entry in the frame's wall-distance buffer.

use glam::vec2;

use super::ColumnCtx;
use super::shade::shade_color;
use crate::world::{blocks_ray, cast};

/// What the floor/ceiling pass needs to know about this column's wall.
pub(crate) struct WallSpan {
    pub perp_dist: f32,
    pub draw_start: i32,
}

/// Cast the ray for column `x` and paint its wall span into `column`
/// (one column-major slice, `ctx.height` pixels).
pub(crate) fn cast_column(ctx: &ColumnCtx, x: usize, column: &mut [u32]) -> WallSpan {
    let angle = ctx.camera.ray_angle(x, ctx.width);
    let (sin, cos) = angle.sin_cos();
    let ray_dir = vec2(cos, sin);

    // decorative-floor cells (code 3) are transparent to the ray
    let hit = cast(ctx.grid, ctx.camera.pos, ray_dir, blocks_ray);
    let perp_dist = hit.perp_dist.max(1e-4);

    let height = ctx.height as i32;
    let line_height = (ctx.height as f32 / perp_dist) as i32;
    let draw_start = (-line_height / 2 + ctx.half_h).max(0);
    let draw_end = (line_height / 2 + ctx.half_h).min(height - 1);

    /* texture u: fractional hit position along the crossed wall ---------- */
    let tex = ctx
        .textures
        .texture_or_missing(ctx.materials.for_code(ctx.grid.get(hit.step.cell)));
    let ts = tex.size as i32;

    let wall_x = match hit.step.axis {
        crate::world::Axis::X => ctx.camera.pos.y + perp_dist * ray_dir.y,
        crate::world::Axis::Y => ctx.camera.pos.x + perp_dist * ray_dir.x,
    };
    let wall_x = wall_x - wall_x.floor();

    let mut tex_u = (wall_x * ts as f32) as i32 & (ts - 1);
    // mirror so the texture reads left-to-right on every wall face
    let mirrored = match hit.step.axis {
        crate::world::Axis::X => ray_dir.x > 0.0,
        crate::world::Axis::Y => ray_dir.y < 0.0,
    };
    if mirrored {
        tex_u = ts - 1 - tex_u;
    }

    /* linear v stepping down the span ------------------------------------ */
    let step = ts as f32 / line_height as f32;
    let mut tex_pos = (draw_start - ctx.half_h + line_height / 2) as f32 * step;

    let shade = ctx.shading.shade(perp_dist);

    for y in draw_start..draw_end {
        let tex_v = (tex_pos as i32) & (ts - 1);
        tex_pos += step;
        let texel = tex.texel(tex_u as usize, tex_v as usize);
        column[y as usize] = shade_color(texel, shade);
    }

    WallSpan {
        perp_dist,
        draw_start,
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
