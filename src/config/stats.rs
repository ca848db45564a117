//! Stat configuration constants.
//!
//! Carry capacity is derived from strength as
//! `base_capacity + strength * capacity_modifier`.
use serde::{Deserialize, Serialize};

/// Carry capacity granted regardless of strength.
pub const BASE_CARRY_CAPACITY: u32 = 100;

/// Extra carry capacity per point of strength.
pub const CARRY_CAPACITY_MODIFIER: u32 = 2;

/// Tunable carry capacity formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapacityConfig {
    pub base_capacity: u32,
    pub capacity_modifier: u32,
}

impl CapacityConfig {
    pub fn carry_capacity(&self, strength: u32) -> u32 {
        self.base_capacity
            .saturating_add(strength.saturating_mul(self.capacity_modifier))
    }
}

impl Default for CapacityConfig {
    fn default() -> Self {
        Self {
            base_capacity: BASE_CARRY_CAPACITY,
            capacity_modifier: CARRY_CAPACITY_MODIFIER,
        }
    }
}
