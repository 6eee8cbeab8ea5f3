//! wolfcast_rs - a Wolfenstein-style raycasting engine.
//!
//! The crate is split the same way the frame is built:
//!
//! * [`world`] - the tile grid and everything that queries it: camera,
//!   textures, the shared DDA walk, A* pathfinding, collision and
//!   line-of-sight.
//! * [`renderer`] - the software column renderer: walls, floor/ceiling,
//!   distance shading and depth-aware billboard compositing.
//! * [`assets`] - decoding of palette-raster maps and BMP textures.
//! * [`sim`] - the hecs-based entity simulation driving the queries.
//!
//! Window and input plumbing live in `bin/view.rs`, not here.

pub mod assets;
pub mod renderer;
pub mod sim;
pub mod world;
