pub mod array2d;
pub use array2d::Array2D;
mod coarse_grid;
pub use coarse_grid::{CoarseCell, CoarseGrid, Tile};
