//! Game core: maps, entities, the event bus and the movement system.

pub mod error;
pub mod events;
pub mod persistence;
pub mod state;
pub mod tests;
pub mod tracker;
pub mod types;

pub mod entities;
pub mod grid;
pub mod systems;

pub use error::*;
pub use events::*;
pub use persistence::*;
pub use state::*;
pub use tracker::*;
pub use types::*;
