use glam::Vec2;

use crate::world::{Camera, EntityClass, TextureId};

/// World-space position.
#[derive(Debug, Clone, Copy)]
pub struct Position(pub Vec2);

/// Heading in radians (0 = +X, counter-clockwise).
#[derive(Debug, Clone, Copy)]
pub struct Facing(pub f32);

/// Collision class: which tile codes this entity may stand on.
#[derive(Debug, Clone, Copy)]
pub struct Class(pub EntityClass);

/// Closed set of renderable entity kinds, dispatched by exhaustive match -
/// never by type inspection.
///
/// Animated entities carry their frame list; *which* frame is current is
/// decided by the caller's clock when billboards are collected, so the sim
/// keeps no animation timers of its own.
#[derive(Debug, Clone)]
pub enum SpriteKind {
    Static { tex: TextureId },
    Animated { frames: Vec<TextureId> },
}

/// Chase state for entities that hunt the player.
#[derive(Debug, Default)]
pub struct Chaser {
    pub path: Vec<Vec2>,
    pub next: usize,
}

impl Chaser {
    #[inline]
    pub fn following(&self) -> bool {
        self.next < self.path.len()
    }

    pub fn stop(&mut self) {
        self.path.clear();
        self.next = 0;
    }
}

/// Pure movement intent for one tick, in the mover's local frame.
/// Produced by input translation (or AI); the sim never polls devices.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveIntent {
    pub forward: f32, // -1 .. +1
    pub strafe: f32,  // -1 .. +1  (left / right)
    pub turn: f32,    // -1 .. +1  (right / left)
}

/// Player pose and momentum, owned by the caller and borrowed by the sim.
#[derive(Debug, Clone, Copy)]
pub struct PlayerBody {
    pub pos: Vec2,
    pub yaw: f32,
    pub velocity: Vec2,
}

impl PlayerBody {
    pub fn new(pos: Vec2, yaw: f32) -> Self {
        Self {
            pos,
            yaw,
            velocity: Vec2::ZERO,
        }
    }

    /// Camera pose for rendering this body with the given FoV.
    #[inline]
    pub fn camera(&self, fov: f32) -> Camera {
        Camera::new(self.pos, self.yaw, fov)
    }
}
