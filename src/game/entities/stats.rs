//! Battler stats and the derived carry-capacity state.
//!
//! Carry capacity and the encumbered flag are never set directly. They are
//! recomputed when strength changes and when the owner's inventory announces
//! a new item set. Dropping weight alone never clears the flag; only a
//! strength change re-evaluates it in both directions.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::stats::CapacityConfig;
use crate::game::entities::items::Item;
use crate::game::error::EventError;
use crate::game::events::{Event, EventBus, Subscription, Topic};
use crate::game::types::EntityId;

/// Base numeric attributes, as handed over by game setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Attributes {
    pub health: u32,
    pub strength: u32,
    pub armor: u32,
    pub agility: u32,
    pub power: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    health: u32,
    strength: u32,
    armor: u32,
    agility: u32,
    power: u32,
    carry_capacity: u32,
    carried_weight: u32,
    encumbered: bool,
    config: CapacityConfig,
}

pub type SharedStats = Rc<RefCell<Stats>>;

impl Stats {
    pub fn new(attributes: Attributes, config: CapacityConfig) -> Self {
        Self {
            health: attributes.health,
            strength: attributes.strength,
            armor: attributes.armor,
            agility: attributes.agility,
            power: attributes.power,
            carry_capacity: config.carry_capacity(attributes.strength),
            carried_weight: 0,
            encumbered: false,
            config,
        }
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn set_health(&mut self, value: u32) {
        self.health = value;
    }

    pub fn strength(&self) -> u32 {
        self.strength
    }

    /// Sets strength and re-derives carry capacity and encumbrance.
    pub fn set_strength(&mut self, value: u32) {
        self.strength = value;
        self.recalc_carry_capacity();
        self.encumbered = self.carried_weight > self.carry_capacity;
    }

    pub fn armor(&self) -> u32 {
        self.armor
    }

    pub fn set_armor(&mut self, value: u32) {
        self.armor = value;
    }

    pub fn agility(&self) -> u32 {
        self.agility
    }

    pub fn set_agility(&mut self, value: u32) {
        self.agility = value;
    }

    pub fn power(&self) -> u32 {
        self.power
    }

    pub fn set_power(&mut self, value: u32) {
        self.power = value;
    }

    pub fn carry_capacity(&self) -> u32 {
        self.carry_capacity
    }

    /// Total weight last announced by the owner's inventory.
    pub fn carried_weight(&self) -> u32 {
        self.carried_weight
    }

    pub fn encumbered(&self) -> bool {
        self.encumbered
    }

    pub fn attributes(&self) -> Attributes {
        Attributes {
            health: self.health,
            strength: self.strength,
            armor: self.armor,
            agility: self.agility,
            power: self.power,
        }
    }

    fn recalc_carry_capacity(&mut self) {
        self.carry_capacity = self.config.carry_capacity(self.strength);
    }

    /// Item-set-changed callback. Sets the encumbered flag when the announced
    /// weight exceeds capacity; never clears it.
    pub fn on_item_set_changed(&mut self, items: &[Rc<Item>]) {
        self.apply_load(total_weight(items));
    }

    fn apply_load(&mut self, total: u32) {
        self.carried_weight = total;
        self.recalc_carry_capacity();

        if total > self.carry_capacity {
            self.encumbered = true;
        }
        debug!(
            "[Stats] Carrying {}/{} (encumbered={})",
            total, self.carry_capacity, self.encumbered
        );
    }
}

fn total_weight(items: &[Rc<Item>]) -> u32 {
    items
        .iter()
        .fold(0u32, |acc, item| acc.saturating_add(item.weight))
}

/// Load totals announced while the stats were borrowed elsewhere, kept in
/// arrival order until the stats can be updated.
#[derive(Debug, Clone, Default)]
pub struct PendingLoads(Rc<RefCell<Vec<u32>>>);

impl PendingLoads {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    fn defer(&self, total: u32) {
        self.0.borrow_mut().push(total);
    }

    fn drain_into(&self, stats: &mut Stats) {
        for total in self.0.borrow_mut().drain(..) {
            stats.apply_load(total);
        }
    }

    /// Apply deferred totals. Returns false while `stats` is still borrowed.
    pub fn settle(&self, stats: &SharedStats) -> bool {
        if self.is_empty() {
            return true;
        }
        match stats.try_borrow_mut() {
            Ok(mut stats) => {
                self.drain_into(&mut stats);
                true
            }
            Err(_) => false,
        }
    }

    /// Whether any deferred total is over `capacity`.
    pub fn exceeds(&self, capacity: u32) -> bool {
        self.0.borrow().iter().any(|total| *total > capacity)
    }
}

/// Feed `owner`'s item-set announcements into `stats` for as long as the
/// returned guard lives. Announcements that find `stats` borrowed are queued
/// on `pending`.
pub fn subscribe_stats(
    stats: &SharedStats,
    pending: &PendingLoads,
    bus: &Rc<EventBus>,
    owner: EntityId,
) -> Subscription {
    let target: Weak<RefCell<Stats>> = Rc::downgrade(stats);
    let pending = pending.clone();
    bus.subscribe_scoped(Topic::ItemSetChanged, move |event| {
        let Event::ItemSetChanged { sender, items } = event else {
            return Ok(());
        };
        if *sender != owner {
            return Ok(());
        }
        let stats = target.upgrade().ok_or(EventError::SubscriberGone)?;
        let total = total_weight(items);
        match stats.try_borrow_mut() {
            Ok(mut stats) => {
                pending.drain_into(&mut stats);
                stats.apply_load(total);
            }
            Err(_) => {
                debug!("[Stats] Stats busy, deferring load of {}", total);
                pending.defer(total);
            }
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attributes(strength: u32) -> Attributes {
        Attributes { health: 50, strength, armor: 10, agility: 30, power: 100 }
    }

    fn rock(weight: u32) -> Rc<Item> {
        Rc::new(Item::basic("Rock", "Heavy.", weight, 0))
    }

    #[test]
    fn test_capacity_follows_strength() {
        let mut stats = Stats::new(attributes(10), CapacityConfig::default());
        assert_eq!(stats.carry_capacity(), 120);
        stats.set_strength(50);
        assert_eq!(stats.carry_capacity(), 200);
    }

    #[test]
    fn test_set_strength_is_idempotent() {
        let mut once = Stats::new(attributes(10), CapacityConfig::default());
        once.set_strength(42);
        let mut twice = once.clone();
        twice.set_strength(42);
        assert_eq!(once.carry_capacity(), twice.carry_capacity());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_encumbrance_threshold() {
        let mut stats = Stats::new(attributes(0), CapacityConfig::default());
        stats.on_item_set_changed(&[rock(60), rock(40)]);
        assert!(!stats.encumbered(), "exactly at capacity is not encumbered");

        stats.on_item_set_changed(&[rock(60), rock(41)]);
        assert!(stats.encumbered());
    }

    // The flag is sticky: lighter loads do not clear it, strength changes do.
    #[test]
    fn test_encumbrance_is_sticky_until_strength_changes() {
        let mut stats = Stats::new(attributes(0), CapacityConfig::default());
        stats.on_item_set_changed(&[rock(150)]);
        assert!(stats.encumbered());

        stats.on_item_set_changed(&[rock(1)]);
        assert!(stats.encumbered());

        stats.set_strength(0);
        assert!(!stats.encumbered());
    }

    #[test]
    fn test_strength_drop_can_encumber() {
        let mut stats = Stats::new(attributes(50), CapacityConfig::default());
        stats.on_item_set_changed(&[rock(150)]);
        assert!(!stats.encumbered());
        stats.set_strength(10);
        assert!(stats.encumbered());
    }

    #[test]
    fn test_configured_formula() {
        let config = CapacityConfig { base_capacity: 10, capacity_modifier: 1 };
        let mut stats = Stats::new(attributes(5), config);
        assert_eq!(stats.carry_capacity(), 15);
        stats.on_item_set_changed(&[rock(16)]);
        assert!(stats.encumbered());
    }

    #[test]
    fn test_subscription_filters_by_owner() {
        let bus = EventBus::new();
        let owner = EntityId::new();
        let stats: SharedStats = Rc::new(RefCell::new(Stats::new(attributes(0), CapacityConfig::default())));
        let _guard = subscribe_stats(&stats, &PendingLoads::new(), &bus, owner);
        let load = [rock(500)];

        bus.publish(&Event::ItemSetChanged { sender: EntityId::new(), items: &load });
        assert!(!stats.borrow().encumbered());

        bus.publish(&Event::ItemSetChanged { sender: owner, items: &load });
        assert!(stats.borrow().encumbered());
    }

    #[test]
    fn test_dropped_stats_report_failure() {
        let bus = EventBus::new();
        let owner = EntityId::new();
        let stats: SharedStats = Rc::new(RefCell::new(Stats::new(attributes(0), CapacityConfig::default())));
        let guard = subscribe_stats(&stats, &PendingLoads::new(), &bus, owner);
        drop(stats);

        let report = bus.publish(&Event::ItemSetChanged { sender: owner, items: &[] });
        assert_eq!(report.failed, 1);
        drop(guard);
        assert_eq!(bus.subscriber_count(Topic::ItemSetChanged), 0);
    }

    // A heavy load followed by a light one still leaves the flag set.
    #[test]
    fn test_deferred_loads_apply_in_order() {
        let bus = EventBus::new();
        let owner = EntityId::new();
        let stats: SharedStats = Rc::new(RefCell::new(Stats::new(attributes(0), CapacityConfig::default())));
        let pending = PendingLoads::new();
        let _guard = subscribe_stats(&stats, &pending, &bus, owner);

        let held = stats.borrow();
        let heavy = [rock(500)];
        let light = [rock(1)];
        let report = bus.publish(&Event::ItemSetChanged { sender: owner, items: &heavy });
        bus.publish(&Event::ItemSetChanged { sender: owner, items: &light });
        assert_eq!(report.failed, 0);
        assert!(pending.exceeds(held.carry_capacity()));
        assert!(!pending.settle(&stats));
        drop(held);

        assert!(pending.settle(&stats));
        assert!(pending.is_empty());
        assert_eq!(stats.borrow().carried_weight(), 1);
        assert!(stats.borrow().encumbered());
    }
}
