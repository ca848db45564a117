//! Inventory configuration constants.

/// Default number of copies added or removed by a single inventory call.
pub const ITEMS_TO_MODIFY: usize = 1;

/// Default hit count for an attack.
pub const TIMES_ATTACKING: u32 = 1;

/// Default ammunition spent by a ranged attack.
pub const BASE_AMMO_COST: u32 = 1;
