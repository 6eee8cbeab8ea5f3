//! Depth-aware billboard compositing.
//!
//! Billboards are projected from world space, sorted far-to-near, and
//! tested column-by-column against the wall-distance buffer the wall pass
//! produced earlier in the frame. Three outcomes per billboard:
//!
//! * every covered column in front of the walls - draw at full extent;
//! * every column behind - skip entirely;
//! * mixed - render into an off-screen buffer sized to the on-screen
//!   footprint, blank the occluded columns to transparent, then blit.
//!
//! The buffer dance gives correct per-column wall occlusion without a
//! depth-buffered rasterizer. Texel 0 is the transparency key.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use super::ColumnCtx;
use crate::renderer::Billboard;
use crate::world::TextureId;

/// Texels per world unit: a 64-texel sprite spans one tile.
const SPRITE_BASE_SIZE: f32 = 64.0;

/// Billboards closer than this project degenerately and are skipped.
const NEAR_LIMIT: f32 = 1e-2;

/// A billboard after projection to screen space.
struct VisSprite {
    x0: i32, // unclamped inclusive horizontal extent
    x1: i32,
    y0: i32, // unclamped inclusive vertical span
    y1: i32,
    dist: f32,
    tex: TextureId,
    u_step: f32,
    v_step: f32,
}

/// Composite `billboards` over the finished wall/floor image.
///
/// Runs strictly after the column fan-out has joined: `depth` must hold
/// this frame's wall distances for every column.
pub(crate) fn composite(
    ctx: &ColumnCtx,
    billboards: &[Billboard],
    pixels: &mut [u32],
    depth: &[f32],
) {
    let mut vis: Vec<VisSprite> = billboards
        .iter()
        .filter_map(|b| project(ctx, b))
        .collect();

    // farthest first, so nearer billboards overdraw farther ones
    vis.sort_by(|a, b| b.dist.total_cmp(&a.dist));

    for spr in &vis {
        draw(ctx, spr, pixels, depth);
    }
}

fn project(ctx: &ColumnCtx, b: &Billboard) -> Option<VisSprite> {
    let rel = b.pos - ctx.camera.pos;
    let dist = rel.length();
    if dist < NEAR_LIMIT {
        return None;
    }

    let bearing = rel.y.atan2(rel.x);
    let mut rel_angle = bearing - ctx.camera.yaw;
    while rel_angle > PI {
        rel_angle -= TAU;
    }
    while rel_angle <= -PI {
        rel_angle += TAU;
    }
    // the angle-proportional mapping is meaningless past a quarter turn
    if rel_angle.abs() >= FRAC_PI_2 {
        return None;
    }

    let half_w = ctx.width as f32 * 0.5;
    let screen_x = half_w + rel_angle / ctx.camera.fov_half() * half_w;

    let tex = ctx.textures.texture_or_missing(b.tex);
    let scale = ctx.height as f32 / (2.0 * dist * SPRITE_BASE_SIZE);
    let w_px = tex.size as f32 * scale;
    let h_px = tex.size as f32 * scale;

    let x0 = (screen_x - w_px * 0.5).floor() as i32;
    let x1 = (screen_x + w_px * 0.5).ceil() as i32;
    if x1 < 0 || x0 >= ctx.width as i32 {
        return None; // completely off-screen
    }

    let half_h = ctx.half_h as f32;
    let y0 = (half_h - h_px * 0.5).floor() as i32;
    let y1 = (half_h + h_px * 0.5).ceil() as i32;

    Some(VisSprite {
        x0,
        x1,
        y0,
        y1,
        dist,
        tex: b.tex,
        u_step: tex.size as f32 / (x1 - x0 + 1) as f32,
        v_step: tex.size as f32 / (y1 - y0 + 1) as f32,
    })
}

fn draw(ctx: &ColumnCtx, spr: &VisSprite, pixels: &mut [u32], depth: &[f32]) {
    let w = ctx.width as i32;
    let h = ctx.height as i32;

    let x_start = spr.x0.max(0);
    let x_end = spr.x1.min(w - 1);
    let y_start = spr.y0.max(0);
    let y_end = spr.y1.min(h - 1);
    if y_start > y_end {
        return;
    }

    // per covered column: in front of the wall there?
    let visible: Vec<bool> = (x_start..=x_end)
        .map(|x| spr.dist < depth[x as usize])
        .collect();
    let n_visible = visible.iter().filter(|&&v| v).count();

    if n_visible == 0 {
        return; // fully occluded
    }

    let tex = ctx.textures.texture_or_missing(spr.tex);
    let ts = tex.size;

    let sample = |x: i32, y: i32| -> u32 {
        let u = (((x - spr.x0) as f32 * spr.u_step) as usize).min(ts - 1);
        let v = (((y - spr.y0) as f32 * spr.v_step) as usize).min(ts - 1);
        tex.texel(u, v)
    };

    if n_visible == visible.len() {
        /* fully visible: draw directly at full extent ------------------- */
        for x in x_start..=x_end {
            for y in y_start..=y_end {
                let texel = sample(x, y);
                if texel != 0 {
                    pixels[x as usize * ctx.height + y as usize] = texel;
                }
            }
        }
        return;
    }

    /* mixed: footprint buffer, blank occluded columns, blit ------------- */
    let fw = (x_end - x_start + 1) as usize;
    let fh = (y_end - y_start + 1) as usize;
    let mut footprint = vec![0u32; fw * fh]; // column-major, 0 = transparent

    for (i, x) in (x_start..=x_end).enumerate() {
        for (j, y) in (y_start..=y_end).enumerate() {
            let texel = sample(x, y);
            if texel != 0 {
                footprint[i * fh + j] = texel;
            }
        }
    }

    for (i, vis) in visible.iter().enumerate() {
        if !vis {
            footprint[i * fh..(i + 1) * fh].fill(0);
        }
    }

    for i in 0..fw {
        for j in 0..fh {
            let texel = footprint[i * fh + j];
            if texel != 0 {
                let x = x_start as usize + i;
                let y = y_start as usize + j;
                pixels[x * ctx.height + y] = texel;
            }
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::MaterialSet;
    use crate::renderer::software::shade::{ShadeLut, Shading};
    use crate::world::{Camera, GridMap, Texture, TextureBank};
    use glam::Vec2;

    const GREEN: u32 = 0xFF_00FF00;

    struct Fixture {
        grid: GridMap,
        bank: TextureBank,
        mats: MaterialSet,
        lut: ShadeLut,
        tex: TextureId,
    }

    fn fixture() -> Fixture {
        let mut bank = TextureBank::default_with_checker();
        let tex = bank
            .insert("BLOB", Texture::from_pixels(vec![GREEN; 64]).unwrap())
            .unwrap();
        Fixture {
            grid: GridMap::open(16, 16),
            bank,
            mats: MaterialSet::all_missing(),
            lut: ShadeLut::build(Shading::default(), 16),
            tex,
        }
    }

    fn ctx(f: &Fixture) -> ColumnCtx<'_> {
        ColumnCtx {
            grid: &f.grid,
            textures: &f.bank,
            materials: &f.mats,
            camera: Camera::new(Vec2::ZERO, 0.0, std::f32::consts::FRAC_PI_2),
            lut: &f.lut,
            shading: Shading::default(),
            width: 16,
            height: 16,
            half_h: 8,
        }
    }

    // billboard straight ahead at distance 0.5: covers columns 7..=9
    fn billboard(f: &Fixture) -> Billboard {
        Billboard {
            pos: Vec2::new(0.5, 0.0),
            tex: f.tex,
        }
    }

    fn drawn_columns(pixels: &[u32], height: usize) -> Vec<usize> {
        (0..pixels.len() / height)
            .filter(|x| (0..height).any(|y| pixels[x * height + y] == GREEN))
            .collect()
    }

    #[test]
    fn walls_farther_everywhere_draws_full_extent() {
        let f = fixture();
        let c = ctx(&f);
        let mut pixels = vec![0u32; 16 * 16];
        let depth = vec![10.0f32; 16];
        composite(&c, &[billboard(&f)], &mut pixels, &depth);
        assert_eq!(drawn_columns(&pixels, 16), vec![7, 8, 9]);
    }

    #[test]
    fn walls_nearer_everywhere_draws_nothing() {
        let f = fixture();
        let c = ctx(&f);
        let mut pixels = vec![0u32; 16 * 16];
        let depth = vec![0.2f32; 16];
        composite(&c, &[billboard(&f)], &mut pixels, &depth);
        assert!(pixels.iter().all(|&p| p == 0));
    }

    #[test]
    fn mixed_visibility_masks_only_occluded_columns() {
        let f = fixture();
        let c = ctx(&f);
        let mut pixels = vec![0u32; 16 * 16];
        let mut depth = vec![10.0f32; 16];
        depth[8] = 0.2; // wall in front of the middle column only
        composite(&c, &[billboard(&f)], &mut pixels, &depth);
        assert_eq!(drawn_columns(&pixels, 16), vec![7, 9]);
    }

    #[test]
    fn nearer_billboard_overdraws_farther() {
        let mut f = fixture();
        let red = f
            .bank
            .insert("RED", Texture::from_pixels(vec![0xFF_FF0000; 64]).unwrap())
            .unwrap();
        let c = ctx(&f);
        let mut pixels = vec![0u32; 16 * 16];
        let depth = vec![10.0f32; 16];
        let far = Billboard {
            pos: Vec2::new(1.0, 0.0),
            tex: red,
        };
        // listed far-first must not matter: compositor sorts by distance
        composite(&c, &[billboard(&f), far], &mut pixels, &depth);
        assert_eq!(pixels[8 * 16 + 8], GREEN);
    }

    #[test]
    fn behind_camera_is_culled() {
        let f = fixture();
        let c = ctx(&f);
        let mut pixels = vec![0u32; 16 * 16];
        let depth = vec![10.0f32; 16];
        let behind = Billboard {
            pos: Vec2::new(-0.5, 0.0),
            tex: f.tex,
        };
        composite(&c, &[behind], &mut pixels, &depth);
        assert!(pixels.iter().all(|&p| p == 0));
    }
}
