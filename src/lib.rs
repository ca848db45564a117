//! Toolkit for turn-based games on tile grids.
//!
//! Entities move over [`game::grid::TileMap`]s through the
//! [`game::systems::Navigator`], each map decides what happens on its tiles,
//! and inventories, stats and the navigator stay in sync over a shared
//! [`game::events::EventBus`].

pub mod config;
pub mod game;
