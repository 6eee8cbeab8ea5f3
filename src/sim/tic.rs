use glam::Vec2;
use hecs::World;
use tracing::info;

use super::components::{Chaser, Class, Facing, Position, SpriteKind};
use super::systems;
use crate::renderer::Billboard;
use crate::world::{EntityClass, GridMap, TextureId, cell_center, tile};

/// Animated billboard frame rate, frames per second of caller clock.
const ANIM_FPS: f32 = 4.0;

/// Textures to attach to entities spawned from path-layer markers.
#[derive(Clone, Debug)]
pub struct SpawnSprites {
    pub guard_frames: Vec<TextureId>,
    pub barrel: TextureId,
}

/// Owns the ECS world and drives all game-logic systems.
///
/// Everything a tick runs - chase AI, pathfinding, sight and collision
/// queries - is synchronous and finishes inside the call; nothing here
/// spans frames or needs cancellation.
pub struct TicRunner {
    world: World,
}

impl Default for TicRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl TicRunner {
    pub fn new() -> Self {
        Self {
            world: World::new(),
        }
    }

    #[inline]
    pub fn world(&self) -> &World {
        &self.world
    }

    #[inline]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Populate the world from the grid's path-layer spawn markers.
    pub fn spawn_from_grid(&mut self, grid: &GridMap, sprites: &SpawnSprites) {
        let mut guards = 0usize;
        let mut barrels = 0usize;
        for (cell, code) in grid.path_cells() {
            match code {
                tile::SPAWN_GUARD => {
                    self.world.spawn((
                        Position(cell_center(cell)),
                        Facing(0.0),
                        Class(EntityClass::Enemy),
                        Chaser::default(),
                        SpriteKind::Animated {
                            frames: sprites.guard_frames.clone(),
                        },
                    ));
                    guards += 1;
                }
                tile::SPAWN_BARREL => {
                    self.world.spawn((
                        Position(cell_center(cell)),
                        SpriteKind::Static {
                            tex: sprites.barrel,
                        },
                    ));
                    barrels += 1;
                }
                _ => {}
            }
        }
        info!(guards, barrels, "entities spawned from path layer");
    }

    /// Advance one simulation tick.
    pub fn tick(&mut self, grid: &GridMap, player_pos: Vec2, dt: f32) {
        systems::chase_system(&mut self.world, grid, player_pos, dt);
    }

    /// Collect every entity's billboard for this frame. `clock` is the
    /// caller's animation clock in seconds; frame selection happens here so
    /// the sim carries no animation timers.
    pub fn billboards(&self, clock: f32) -> Vec<Billboard> {
        let mut out = Vec::new();
        for (_, (pos, kind)) in self.world.query::<(&Position, &SpriteKind)>().iter() {
            let tex = match kind {
                SpriteKind::Static { tex } => *tex,
                SpriteKind::Animated { frames } => {
                    if frames.is_empty() {
                        continue;
                    }
                    frames[(clock * ANIM_FPS) as usize % frames.len()]
                }
            };
            out.push(Billboard { pos: pos.0, tex });
        }
        out
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
