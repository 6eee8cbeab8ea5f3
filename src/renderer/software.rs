//! ---------------------------------------------------------------------------
//! Software (CPU) column renderer
//!
//! One frame is built in two phases with a hard boundary between them:
//!
//! 1. **Column fan-out** (rayon): one task per screen column runs the wall
//!    cast and then that column's floor/ceiling projection. Each task owns a
//!    disjoint column-major pixel slice and its own wall-distance entry, so
//!    the phase needs no locking.
//! 2. **Sprite pass** (single-threaded): runs after the fan-out joins, which
//!    is what makes the wall-distance buffer safe to read - it is complete,
//!    never partially stale.
//!
//! All per-frame inputs are gathered into an immutable [`ColumnCtx`] built
//! once and shared by reference; the renderer keeps no mutable state a
//! column task could observe.
//! ---------------------------------------------------------------------------

use rayon::prelude::*;

pub mod shade;

mod planes;
mod sprites;
mod walls;

use crate::renderer::{Billboard, Frame, MaterialSet, RenderOptions};
use crate::world::{Camera, GridMap, TextureBank};
use shade::{ShadeLut, Shading};

/// Everything a frame reads: grid, textures, materials, billboards.
/// Borrowed for the duration of one `render` call.
pub struct Scene<'a> {
    pub grid: &'a GridMap,
    pub textures: &'a TextureBank,
    pub materials: &'a MaterialSet,
    pub billboards: &'a [Billboard],
}

/// Immutable per-frame context handed to every column task.
pub(crate) struct ColumnCtx<'a> {
    pub grid: &'a GridMap,
    pub textures: &'a TextureBank,
    pub materials: &'a MaterialSet,
    pub camera: Camera,
    pub lut: &'a ShadeLut,
    pub shading: Shading,
    pub width: usize,
    pub height: usize,
    pub half_h: i32,
}

pub struct SoftwareRenderer {
    width: usize,
    height: usize,
    shading: Shading,
    lut: ShadeLut,
}

impl SoftwareRenderer {
    pub fn new(opts: &RenderOptions) -> Self {
        Self {
            width: opts.width,
            height: opts.height,
            shading: opts.shading,
            lut: ShadeLut::build(opts.shading, opts.height),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn shading(&self) -> Shading {
        self.shading
    }

    /// Retune the shading curve; the LUT is rebuilt before the next frame
    /// reads it.
    pub fn set_shading(&mut self, shading: Shading) {
        if shading != self.shading {
            self.shading = shading;
            self.lut = ShadeLut::build(shading, self.height);
        }
    }

    pub fn set_resolution(&mut self, width: usize, height: usize) {
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.lut = ShadeLut::build(self.shading, height);
        }
    }

    /// Render one frame: walls and floor/ceiling in parallel per column,
    /// then billboards against the finished wall-distance buffer.
    pub fn render(&self, scene: &Scene, camera: &Camera, frame: &mut Frame) {
        frame.reset(self.width, self.height);

        let ctx = ColumnCtx {
            grid: scene.grid,
            textures: scene.textures,
            materials: scene.materials,
            camera: *camera,
            lut: &self.lut,
            shading: self.shading,
            width: self.width,
            height: self.height,
            half_h: self.height as i32 / 2,
        };

        let (pixels, depth) = frame.split_mut();

        pixels
            .par_chunks_exact_mut(self.height)
            .zip(depth.par_iter_mut())
            .enumerate()
            .for_each(|(x, (column, wall_dist))| {
                let span = walls::cast_column(&ctx, x, column);
                *wall_dist = span.perp_dist;
                planes::project_column(&ctx, x, span.draw_start, column);
            });

        // the par_iter has joined: every wall distance is final
        sprites::composite(&ctx, scene.billboards, pixels, depth);
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
