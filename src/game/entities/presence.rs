//! Positioned actors and the capability traits entity kinds are built from.
//!
//! Locations live in a shared cell so position-query subscribers can read
//! them without holding the entity. Only the navigator relocates.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::{Rc, Weak};

use log::info;

use crate::game::entities::inventory::Inventory;
use crate::game::entities::stats::Stats;
use crate::game::error::InventoryError;
use crate::game::types::{EntityId, ItemId, Location};

#[derive(Debug)]
pub struct Presence {
    id: EntityId,
    name: String,
    location: Rc<RefCell<Location>>,
}

impl Presence {
    pub fn new(name: impl Into<String>, location: Location) -> Self {
        Self::with_id(EntityId::new(), name, location)
    }

    pub fn with_id(id: EntityId, name: impl Into<String>, location: Location) -> Self {
        Self {
            id,
            name: name.into(),
            location: Rc::new(RefCell::new(location)),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn location(&self) -> Location {
        self.location.borrow().clone()
    }

    pub(crate) fn relocate(&self, location: Location) {
        *self.location.borrow_mut() = location;
    }

    pub(crate) fn location_handle(&self) -> Weak<RefCell<Location>> {
        Rc::downgrade(&self.location)
    }
}

pub trait Positioned {
    fn presence(&self) -> &Presence;

    fn id(&self) -> EntityId {
        self.presence().id()
    }

    fn name(&self) -> &str {
        self.presence().name()
    }

    fn location(&self) -> Location {
        self.presence().location()
    }

    fn is_player(&self) -> bool {
        false
    }

    /// Whether the entity's stats currently report encumbrance.
    fn is_overloaded(&self) -> bool {
        false
    }
}

pub trait HasInventory {
    fn inventory(&self) -> &Inventory;
    fn inventory_mut(&mut self) -> &mut Inventory;
}

pub trait HasStats {
    fn stats(&self) -> Ref<'_, Stats>;
    fn stats_mut(&self) -> RefMut<'_, Stats>;
}

pub trait CanTrade: Positioned + HasInventory {
    fn coin(&self) -> u32;
    fn coin_mut(&mut self) -> &mut u32;

    /// Sell `count` copies of a carried item to `buyer`. Coin moves from the
    /// buyer to the seller; nothing changes hands if the buyer cannot pay.
    fn sell_to(&mut self, id: ItemId, buyer: &mut dyn CanTrade, count: usize) -> Result<u32, InventoryError> {
        let item = self
            .inventory()
            .find(id)
            .cloned()
            .ok_or_else(|| InventoryError::NotCarried(id.0.to_string()))?;
        let available = self.inventory().count(id);
        if available < count {
            return Err(InventoryError::Insufficient {
                name: item.name.clone(),
                requested: count,
                available,
            });
        }

        let price = item
            .value
            .saturating_mul(u32::try_from(count).unwrap_or(u32::MAX));
        if buyer.coin() < price {
            return Err(InventoryError::InsufficientFunds {
                buyer: buyer.name().to_string(),
                needed: price,
                available: buyer.coin(),
            });
        }

        self.inventory_mut().remove_item(id, count)?;
        buyer.inventory_mut().add_item(Rc::clone(&item), count);
        *buyer.coin_mut() -= price;
        let coin = self.coin_mut();
        *coin = coin.saturating_add(price);

        info!(
            "[Trade] {} sold {} x '{}' to {} for {}",
            self.name(),
            count,
            item.name,
            buyer.name(),
            price
        );
        Ok(price)
    }
}
