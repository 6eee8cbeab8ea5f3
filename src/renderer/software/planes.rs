//! Inverse-perspective floor and ceiling projection.
//!
//! For every row the wall span left open, the row's screen height is mapped
//! back onto the floor plane (`dist = h / (2*row - h)`), the world point is
//! sampled for its texture, and the row's brightness comes straight from
//! the shade LUT - no per-pixel exponentiation.

use glam::vec2;

use super::ColumnCtx;
use super::shade::shade_color;
use crate::world::cell_of;

/// Fill the ceiling rows `[0, draw_start)` and their mirrored floor rows of
/// one column.
pub(crate) fn project_column(ctx: &ColumnCtx, x: usize, draw_start: i32, column: &mut [u32]) {
    let angle = ctx.camera.ray_angle(x, ctx.width);
    let (sin, cos) = angle.sin_cos();
    let ray_dir = vec2(cos, sin);

    let h = ctx.height as i32;
    let ceiling_tex = ctx.textures.texture_or_missing(ctx.materials.ceiling);

    for y in 0..draw_start.max(0) {
        let floor_y = h - y - 1; // mirrored row below the wall span
        let denom = 2 * floor_y - h;
        if denom <= 0 {
            continue; // horizon row projects to infinity
        }
        let dist = ctx.height as f32 / denom as f32;

        let world = ctx.camera.pos + dist * ray_dir;

        /* floor: texture picked by the cell the point lands on ----------- */
        let floor_tex = ctx
            .textures
            .texture_or_missing(ctx.materials.for_code(ctx.grid.get(cell_of(world))));
        let fs = floor_tex.size as i32;
        let (fu, fv) = wrap_tex(world.x, world.y, fs);
        let floor_shade = ctx.lut.row(floor_y as usize);
        column[floor_y as usize] = shade_color(floor_tex.texel(fu, fv), floor_shade);

        /* ceiling: same world point, distinct fixed texture --------------- */
        let cs = ceiling_tex.size as i32;
        let (cu, cv) = wrap_tex(world.x, world.y, cs);
        let ceiling_shade = ctx.lut.row(y as usize);
        column[y as usize] = shade_color(ceiling_tex.texel(cu, cv), ceiling_shade);
    }
}

/// World coordinate -> texel coordinate, wrapped modulo the texture size
/// with negative results folded back in.
#[inline]
fn wrap_tex(wx: f32, wy: f32, size: i32) -> (usize, usize) {
    let mut u = (wx * size as f32) as i32 % size;
    let mut v = (wy * size as f32) as i32 % size;
    if u < 0 {
        u += size;
    }
    if v < 0 {
        v += size;
    }
    (u as usize, v as usize)
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
