mod camera;
mod collide;
mod dda;
mod grid;
mod path;
mod texture;

pub use camera::Camera;
pub use collide::{EntityClass, TileSet, line_of_sight, resolve_movement};
pub use dda::{Axis, DdaHit, DdaStep, DdaWalk, cast};
pub use grid::{GridError, GridMap, blocks_ray, cell_center, cell_of, tile};
pub use path::find as find_path;
pub use texture::{NO_TEXTURE, Texture, TextureBank, TextureError, TextureId};
