//! The tile grid every query in the crate runs against.
//!
//! Two co-located layers share one set of dimensions:
//!
//! * the **wall layer** drives rendering and collision - code 0 is open,
//!   1/2/4/5 are solid wall materials, 3 is decorative floor (passable
//!   despite being nonzero);
//! * the **path layer** drives A* only - code 0 is open for pathing, 6 is an
//!   avoidance zone, 4/5 mark entity spawns.
//!
//! Out-of-bounds reads resolve to [`tile::SOLID`] on both layers, which is
//! what guarantees every grid walk terminates near the map edges.

use glam::{IVec2, Vec2};
use thiserror::Error;

/// Wall-layer and path-layer cell codes.
pub mod tile {
    /// Open space on either layer.
    pub const OPEN: u8 = 0;
    /// Default solid wall; also the code returned for out-of-bounds reads.
    pub const SOLID: u8 = 1;
    /// Decorative floor: nonzero but passable to rays and (some) movers.
    pub const DECOR_FLOOR: u8 = 3;
    /// Path layer: guard spawn marker.
    pub const SPAWN_GUARD: u8 = 4;
    /// Path layer: barrel spawn marker.
    pub const SPAWN_BARREL: u8 = 5;
    /// Path layer: closed to pathing even though movement may allow it.
    pub const AVOID: u8 = 6;
}

/// One canonical blocking rule for every ray-based query (wall casting,
/// line-of-sight): solid codes block, [`tile::DECOR_FLOOR`] does not.
#[inline]
pub fn blocks_ray(code: u8) -> bool {
    code > 0 && code != tile::DECOR_FLOOR
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GridError {
    #[error("layer length {got} does not match {width}x{height}")]
    LayerSize { width: i32, height: i32, got: usize },
}

/// The two-layer tile map. Layers are row-major `u8` grids.
#[derive(Debug)]
pub struct GridMap {
    width: i32,
    height: i32,
    walls: Vec<u8>,
    path: Vec<u8>,
}

impl GridMap {
    /// Build a map from two pre-decoded layers of identical dimensions.
    pub fn from_layers(
        width: i32,
        height: i32,
        walls: Vec<u8>,
        path: Vec<u8>,
    ) -> Result<Self, GridError> {
        let expect = (width * height) as usize;
        for layer in [&walls, &path] {
            if layer.len() != expect {
                return Err(GridError::LayerSize {
                    width,
                    height,
                    got: layer.len(),
                });
            }
        }
        Ok(Self {
            width,
            height,
            walls,
            path,
        })
    }

    /// An all-open map with both layers zeroed. Handy for tests and the
    /// built-in demo level.
    pub fn open(width: i32, height: i32) -> Self {
        let cells = (width * height) as usize;
        Self {
            width,
            height,
            walls: vec![tile::OPEN; cells],
            path: vec![tile::OPEN; cells],
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn in_bounds(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.x < self.width && cell.y >= 0 && cell.y < self.height
    }

    /// Wall-layer code at `cell`; out-of-bounds reads as solid.
    #[inline]
    pub fn get(&self, cell: IVec2) -> u8 {
        if self.in_bounds(cell) {
            self.walls[(cell.y * self.width + cell.x) as usize]
        } else {
            tile::SOLID
        }
    }

    /// Path-layer code at `cell`; out-of-bounds reads as solid.
    #[inline]
    pub fn get_path(&self, cell: IVec2) -> u8 {
        if self.in_bounds(cell) {
            self.path[(cell.y * self.width + cell.x) as usize]
        } else {
            tile::SOLID
        }
    }

    pub fn set(&mut self, cell: IVec2, code: u8) {
        if self.in_bounds(cell) {
            self.walls[(cell.y * self.width + cell.x) as usize] = code;
        }
    }

    pub fn set_path(&mut self, cell: IVec2, code: u8) {
        if self.in_bounds(cell) {
            self.path[(cell.y * self.width + cell.x) as usize] = code;
        }
    }

    /// Iterate the path layer (used to spawn entities from markers).
    pub fn path_cells(&self) -> impl Iterator<Item = (IVec2, u8)> + '_ {
        let w = self.width;
        self.path
            .iter()
            .enumerate()
            .map(move |(i, &code)| (IVec2::new(i as i32 % w, i as i32 / w), code))
    }

    /// Surround the wall layer with a solid border of `code`.
    pub fn with_border(mut self, code: u8) -> Self {
        for x in 0..self.width {
            self.set(IVec2::new(x, 0), code);
            self.set(IVec2::new(x, self.height - 1), code);
        }
        for y in 0..self.height {
            self.set(IVec2::new(0, y), code);
            self.set(IVec2::new(self.width - 1, y), code);
        }
        self
    }
}

/// Grid cell containing a continuous world position.
#[inline]
pub fn cell_of(pos: Vec2) -> IVec2 {
    IVec2::new(pos.x.floor() as i32, pos.y.floor() as i32)
}

/// Center of a grid cell in world coordinates.
#[inline]
pub fn cell_center(cell: IVec2) -> Vec2 {
    Vec2::new(cell.x as f32 + 0.5, cell.y as f32 + 0.5)
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
