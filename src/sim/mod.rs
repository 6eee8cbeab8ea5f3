mod components;
mod systems;
mod tic;

pub use components::{Chaser, Class, Facing, MoveIntent, PlayerBody, Position, SpriteKind};
pub use systems::{CHASE_PATH_MAX, chase_system, integrate_player};
pub use tic::{SpawnSprites, TicRunner};
