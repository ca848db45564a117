//! Game entities and the items they carry.
//!
//! Entity kinds are composed from the capability traits in [`presence`]
//! rather than from a type hierarchy.

pub mod battler;
pub mod inventory;
pub mod items;
pub mod npc;
pub mod player;
pub mod presence;
pub mod stats;
pub mod vendor;

pub use battler::*;
pub use inventory::*;
pub use items::*;
pub use npc::*;
pub use player::*;
pub use presence::*;
pub use stats::*;
pub use vendor::*;
