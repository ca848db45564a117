//! Terrain grids, maps and the map registry.

pub mod atlas;
pub mod grid;
pub mod map;
pub mod rules;

pub use atlas::*;
pub use grid::*;
pub use map::*;
pub use rules::*;
