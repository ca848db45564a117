//! Game systems module.
//!
//! This module groups movement, rendering and display surfaces.

pub mod movement;
pub mod render;
pub mod surface;

pub use movement::*;
pub use render::*;
pub use surface::*;
