// ──────────────────────────────────────────────────────────────────────────
// assets/loader.rs
//
//  *   wall-layer raster  ──╮
//  *   path-layer raster    │   --->  world::GridMap
//  *   texture rasters      ╯         + populated TextureBank
//
// Maps are authored as fixed-palette images: each RGB triple is a tile
// code. Unknown colors fall back to a brightness threshold (darker than
// 50% grey = wall), so sketches still load.
// ──────────────────────────────────────────────────────────────────────────

use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

use super::raster::{Raster, RasterError};
use crate::world::{GridError, GridMap, Texture, TextureBank, TextureError, TextureId, tile};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error(transparent)]
    Raster(#[from] RasterError),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Texture(#[from] TextureError),

    #[error("layer rasters disagree on size: {0}x{1} vs {2}x{3}")]
    LayerMismatch(usize, usize, usize, usize),
}

/*====================================================================*/
/*                       Palette -> tile codes                        */
/*====================================================================*/

/// Wall/collision layer palette.
fn wall_code(rgb: (u8, u8, u8)) -> u8 {
    match rgb {
        (255, 255, 255) => tile::OPEN,
        (0, 0, 0) => tile::SOLID,
        (255, 0, 0) => 2,           // red brick
        (185, 122, 87) => tile::DECOR_FLOOR,
        (74, 49, 35) => 4,          // wood wall
        (63, 72, 204) => 5,         // bluestone
        _ => threshold(rgb),
    }
}

/// Path layer palette: open / avoidance / spawn markers.
fn path_code(rgb: (u8, u8, u8)) -> u8 {
    match rgb {
        (255, 255, 255) => tile::OPEN,
        (200, 191, 231) => tile::AVOID,
        (0, 0, 0) => tile::SPAWN_GUARD,
        (255, 169, 122) => tile::SPAWN_BARREL,
        _ => threshold(rgb),
    }
}

/// Unmapped colors: darker than 50% grey counts as closed.
#[inline]
fn threshold((r, g, b): (u8, u8, u8)) -> u8 {
    let brightness = (r as f32 + g as f32 + b as f32) / (3.0 * 255.0);
    if brightness < 0.5 { tile::SOLID } else { tile::OPEN }
}

/*====================================================================*/
/*                          Public API                                */
/*====================================================================*/

/// Decode the two co-located layer rasters into a grid map.
pub fn decode_grid(walls: &Raster, path: &Raster) -> Result<GridMap, LoadError> {
    if (walls.width, walls.height) != (path.width, path.height) {
        return Err(LoadError::LayerMismatch(
            walls.width,
            walls.height,
            path.width,
            path.height,
        ));
    }

    let layer = |img: &Raster, map: fn((u8, u8, u8)) -> u8| -> Vec<u8> {
        (0..img.height)
            .flat_map(|y| (0..img.width).map(move |x| (x, y)))
            .map(|(x, y)| map(img.rgb(x, y)))
            .collect()
    };

    let grid = GridMap::from_layers(
        walls.width as i32,
        walls.height as i32,
        layer(walls, wall_code),
        layer(path, path_code),
    )?;
    debug!(
        width = walls.width,
        height = walls.height,
        "decoded grid layers"
    );
    Ok(grid)
}

/// Load both layer rasters from disk and decode them.
pub fn load_grid<P: AsRef<Path>>(wall_path: P, path_path: P) -> Result<GridMap, LoadError> {
    let walls = Raster::from_file(&wall_path)?;
    let path = Raster::from_file(&path_path)?;
    let grid = decode_grid(&walls, &path)?;
    info!(
        map = %wall_path.as_ref().display(),
        width = grid.width(),
        height = grid.height(),
        "map loaded"
    );
    Ok(grid)
}

/// Decode a square texture raster and insert it into the bank.
pub fn load_texture<P: AsRef<Path>>(
    bank: &mut TextureBank,
    name: &str,
    path: P,
) -> Result<TextureId, LoadError> {
    let img = Raster::from_file(&path)?;
    let tex = Texture::from_pixels(img.pixels)?;
    let id = bank.insert(name, tex)?;
    debug!(name, size = img.width, "texture loaded");
    Ok(id)
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;

    fn raster_of(colors: &[(u8, u8, u8)], width: usize) -> Raster {
        Raster {
            width,
            height: colors.len() / width,
            pixels: colors
                .iter()
                .map(|&(r, g, b)| 0xFF00_0000 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
                .collect(),
        }
    }

    #[test]
    fn palette_maps_to_tile_codes() {
        let walls = raster_of(
            &[
                (255, 255, 255),
                (0, 0, 0),
                (255, 0, 0),
                (185, 122, 87),
                (74, 49, 35),
                (63, 72, 204),
            ],
            3,
        );
        let path = raster_of(
            &[
                (255, 255, 255),
                (200, 191, 231),
                (0, 0, 0),
                (255, 169, 122),
                (255, 255, 255),
                (255, 255, 255),
            ],
            3,
        );
        let grid = decode_grid(&walls, &path).unwrap();

        assert_eq!(grid.get(IVec2::new(0, 0)), tile::OPEN);
        assert_eq!(grid.get(IVec2::new(1, 0)), tile::SOLID);
        assert_eq!(grid.get(IVec2::new(2, 0)), 2);
        assert_eq!(grid.get(IVec2::new(0, 1)), tile::DECOR_FLOOR);
        assert_eq!(grid.get(IVec2::new(1, 1)), 4);
        assert_eq!(grid.get(IVec2::new(2, 1)), 5);

        assert_eq!(grid.get_path(IVec2::new(1, 0)), tile::AVOID);
        assert_eq!(grid.get_path(IVec2::new(2, 0)), tile::SPAWN_GUARD);
        assert_eq!(grid.get_path(IVec2::new(0, 1)), tile::SPAWN_BARREL);
    }

    #[test]
    fn unknown_colors_fall_back_to_threshold() {
        assert_eq!(threshold((30, 30, 30)), tile::SOLID);
        assert_eq!(threshold((200, 200, 180)), tile::OPEN);
    }

    #[test]
    fn mismatched_layers_rejected() {
        let walls = raster_of(&[(255, 255, 255); 4], 2);
        let path = raster_of(&[(255, 255, 255); 6], 3);
        assert!(matches!(
            decode_grid(&walls, &path),
            Err(LoadError::LayerMismatch(..))
        ));
    }
}
