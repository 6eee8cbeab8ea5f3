mod loader;
mod raster;

pub use loader::{LoadError, decode_grid, load_grid, load_texture};
pub use raster::{Raster, RasterError};
