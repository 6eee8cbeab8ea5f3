//! Shared grid-walking primitive.
//!
//! One DDA implementation serves the wall caster, line-of-sight and the
//! traversal tests: a ray is advanced cell-by-cell along whichever axis has
//! the smaller accumulated side-distance. Everything that must not drift
//! between those consumers (the stepping order, the degenerate-direction
//! guard, the perpendicular-distance correction) lives here.

use glam::{IVec2, Vec2, vec2};

use super::grid::GridMap;

/// Reciprocal clamp for axis-aligned rays: instead of dividing by an exactly
/// zero direction component, the side distance on that axis becomes huge and
/// the axis is simply never stepped.
const INV_ZERO: f32 = 1e30;

/// Axis crossed by a DDA step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// One cell crossing produced by [`DdaWalk`].
#[derive(Clone, Copy, Debug)]
pub struct DdaStep {
    /// Cell the ray just entered.
    pub cell: IVec2,
    /// Axis whose boundary was crossed to enter it.
    pub axis: Axis,
    /// Euclidean distance along the ray at the crossing.
    pub side_dist: f32,
}

/// Infinite cell-crossing iterator; consumers bound it with a stop
/// predicate or a step cap.
pub struct DdaWalk {
    origin: Vec2,
    dir: Vec2,
    cell: IVec2,
    step: IVec2,
    side_dist: Vec2,
    delta: Vec2,
}

impl DdaWalk {
    pub fn new(origin: Vec2, dir: Vec2) -> Self {
        let cell = IVec2::new(origin.x.floor() as i32, origin.y.floor() as i32);

        let inv = |d: f32| if d == 0.0 { INV_ZERO } else { (1.0 / d).abs() };
        let delta = vec2(inv(dir.x), inv(dir.y));

        let step = IVec2::new(
            if dir.x < 0.0 { -1 } else { 1 },
            if dir.y < 0.0 { -1 } else { 1 },
        );

        let side = |pos: f32, cell: i32, dir: f32, delta: f32| {
            if dir < 0.0 {
                (pos - cell as f32) * delta
            } else {
                (cell as f32 + 1.0 - pos) * delta
            }
        };
        let side_dist = vec2(
            side(origin.x, cell.x, dir.x, delta.x),
            side(origin.y, cell.y, dir.y, delta.y),
        );

        Self {
            origin,
            dir,
            cell,
            step,
            side_dist,
            delta,
        }
    }

    /// Perpendicular wall distance for `step`, via the side-corrected
    /// formula `(mapCoord - camCoord + (1-step)/2) / rayDirComponent`.
    ///
    /// Recomputed from the crossing cell rather than read off the walk's
    /// accumulator, so it carries no accumulation error and stays
    /// bit-stable across repeated casts.
    #[inline]
    pub fn perp_distance(&self, step: &DdaStep) -> f32 {
        match step.axis {
            Axis::X => {
                (step.cell.x as f32 - self.origin.x + (1 - self.step.x) as f32 * 0.5) / self.dir.x
            }
            Axis::Y => {
                (step.cell.y as f32 - self.origin.y + (1 - self.step.y) as f32 * 0.5) / self.dir.y
            }
        }
    }

    #[inline]
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    #[inline]
    pub fn dir(&self) -> Vec2 {
        self.dir
    }

    /// Cross into the next cell along whichever axis boundary is nearer.
    pub fn advance(&mut self) -> DdaStep {
        let axis = if self.side_dist.x < self.side_dist.y {
            Axis::X
        } else {
            Axis::Y
        };
        let side_dist = match axis {
            Axis::X => {
                let d = self.side_dist.x;
                self.side_dist.x += self.delta.x;
                self.cell.x += self.step.x;
                d
            }
            Axis::Y => {
                let d = self.side_dist.y;
                self.side_dist.y += self.delta.y;
                self.cell.y += self.step.y;
                d
            }
        };
        DdaStep {
            cell: self.cell,
            axis,
            side_dist,
        }
    }
}

// convenience adapter so consumers can use iterator combinators
impl Iterator for DdaWalk {
    type Item = DdaStep;

    fn next(&mut self) -> Option<DdaStep> {
        Some(self.advance())
    }
}

/// Result of a bounded cast: the stopping crossing plus the walk state
/// needed to turn it into a perpendicular distance.
pub struct DdaHit {
    pub step: DdaStep,
    pub perp_dist: f32,
    /// Crossings consumed before stopping (termination property checks).
    pub steps_taken: u32,
}

/// Walk from `origin` along `dir` until `stop` matches the wall-layer code
/// of the entered cell.
///
/// Out-of-bounds cells read as solid, so any predicate that stops on solid
/// terminates at the map edge; a hard cap of `2*(width+height)` bounds even
/// predicates that never match.
pub fn cast<F>(grid: &GridMap, origin: Vec2, dir: Vec2, stop: F) -> DdaHit
where
    F: Fn(u8) -> bool,
{
    let cap = 2 * (grid.width() + grid.height()) as u32;
    let mut walk = DdaWalk::new(origin, dir);
    let mut taken = 0;
    loop {
        let step = walk.advance();
        taken += 1;
        if stop(grid.get(step.cell)) || taken >= cap {
            let perp_dist = walk.perp_distance(&step);
            return DdaHit {
                step,
                perp_dist,
                steps_taken: taken,
            };
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
