//! Traders: an inventory and a purse.

use crate::game::entities::inventory::Inventory;
use crate::game::entities::presence::{CanTrade, HasInventory, Positioned, Presence};
use crate::game::types::Location;

#[derive(Debug)]
pub struct Vendor {
    presence: Presence,
    inventory: Inventory,
    coin: u32,
}

impl Vendor {
    pub fn new(name: impl Into<String>, location: Location, inventory: Inventory, coin: u32) -> Self {
        Self::from_parts(Presence::new(name, location), inventory, coin)
    }

    pub(crate) fn from_parts(presence: Presence, inventory: Inventory, coin: u32) -> Self {
        Self {
            presence,
            inventory,
            coin,
        }
    }
}

impl Positioned for Vendor {
    fn presence(&self) -> &Presence {
        &self.presence
    }
}

impl HasInventory for Vendor {
    fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }
}

impl CanTrade for Vendor {
    fn coin(&self) -> u32 {
        self.coin
    }

    fn coin_mut(&mut self) -> &mut u32 {
        &mut self.coin
    }
}
