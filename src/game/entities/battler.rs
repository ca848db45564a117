//! Stat-bearing traders.
//!
//! A battler attached to an event bus publishes its inventory changes and
//! keeps its own stats subscribed to them, so encumbrance tracks what it
//! carries without the inventory knowing about stats.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use crate::config::stats::CapacityConfig;
use crate::game::entities::inventory::Inventory;
use crate::game::entities::items::{Item, ItemCategory};
use crate::game::entities::presence::{CanTrade, HasInventory, HasStats, Positioned, Presence};
use crate::game::entities::stats::{subscribe_stats, Attributes, PendingLoads, SharedStats, Stats};
use crate::game::events::{EventBus, Subscription};
use crate::game::types::Location;

#[derive(Debug)]
pub struct Battler {
    presence: Presence,
    inventory: Inventory,
    coin: u32,
    stats: SharedStats,
    pending_loads: PendingLoads,
    stats_subscription: Option<Subscription>,
}

impl Battler {
    pub fn new(name: impl Into<String>, location: Location, attributes: Attributes, config: CapacityConfig) -> Self {
        Self::from_parts(
            Presence::new(name, location),
            Inventory::default(),
            0,
            Stats::new(attributes, config),
        )
    }

    pub(crate) fn from_parts(presence: Presence, inventory: Inventory, coin: u32, stats: Stats) -> Self {
        Self {
            presence,
            inventory,
            coin,
            stats: Rc::new(RefCell::new(stats)),
            pending_loads: PendingLoads::new(),
            stats_subscription: None,
        }
    }

    pub fn with_inventory(mut self, inventory: Inventory) -> Self {
        self.inventory = inventory;
        self
    }

    pub fn with_coin(mut self, coin: u32) -> Self {
        self.coin = coin;
        self
    }

    /// Publish inventory changes on `bus` and feed them into this battler's
    /// stats. The current item set is announced once immediately.
    pub fn with_event_bus(mut self, bus: &Rc<EventBus>) -> Self {
        let owner = self.presence.id();
        self.inventory = std::mem::take(&mut self.inventory).publishing(Rc::clone(bus), owner);
        self.stats_subscription = Some(subscribe_stats(&self.stats, &self.pending_loads, bus, owner));
        self.inventory.announce();
        self
    }

    pub fn is_attached(&self) -> bool {
        self.stats_subscription.is_some()
    }

    /// Shared handle to the stats. Loads announced while a borrow from this
    /// handle is held are applied on the next access through the battler.
    pub fn shared_stats(&self) -> SharedStats {
        Rc::clone(&self.stats)
    }

    pub fn equipped_weapon(&self) -> Option<&Rc<Item>> {
        self.inventory.equipped_in(ItemCategory::Weapon)
    }
}

impl Positioned for Battler {
    fn presence(&self) -> &Presence {
        &self.presence
    }

    fn is_overloaded(&self) -> bool {
        self.pending_loads.settle(&self.stats);
        let stats = self.stats.borrow();
        stats.encumbered() || self.pending_loads.exceeds(stats.carry_capacity())
    }
}

impl HasInventory for Battler {
    fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }
}

impl HasStats for Battler {
    fn stats(&self) -> Ref<'_, Stats> {
        self.pending_loads.settle(&self.stats);
        self.stats.borrow()
    }

    fn stats_mut(&self) -> RefMut<'_, Stats> {
        self.pending_loads.settle(&self.stats);
        self.stats.borrow_mut()
    }
}

impl CanTrade for Battler {
    fn coin(&self) -> u32 {
        self.coin
    }

    fn coin_mut(&mut self) -> &mut u32 {
        &mut self.coin
    }
}
