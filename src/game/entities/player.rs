//! The player: a battler that answers position queries.

use std::cell::{Ref, RefMut};
use std::rc::Rc;

use log::debug;

use crate::game::entities::battler::Battler;
use crate::game::entities::inventory::Inventory;
use crate::game::entities::presence::{CanTrade, HasInventory, HasStats, Positioned, Presence};
use crate::game::entities::stats::Stats;
use crate::game::error::EventError;
use crate::game::events::{Event, EventBus, Subscription, Topic};

#[derive(Debug)]
pub struct Player {
    battler: Battler,
    _position_subscription: Subscription,
}

impl Player {
    /// Attach `battler` to `bus` and start answering position queries with
    /// its location.
    pub fn new(battler: Battler, bus: &Rc<EventBus>) -> Self {
        let battler = if battler.is_attached() {
            battler
        } else {
            battler.with_event_bus(bus)
        };
        let handle = battler.presence().location_handle();
        let position_subscription = bus.subscribe_scoped(Topic::PositionQuery, move |event| {
            let Event::PositionQuery { reply } = event else {
                return Ok(());
            };
            let location = handle.upgrade().ok_or(EventError::SubscriberGone)?;
            let location = location.try_borrow().map_err(|_| EventError::Busy)?;
            reply.fill(location.clone());
            Ok(())
        });
        debug!("[Player] '{}' answers position queries", battler.name());

        Self {
            battler,
            _position_subscription: position_subscription,
        }
    }

    pub fn battler(&self) -> &Battler {
        &self.battler
    }

    pub fn battler_mut(&mut self) -> &mut Battler {
        &mut self.battler
    }
}

impl Positioned for Player {
    fn presence(&self) -> &Presence {
        self.battler.presence()
    }

    fn is_player(&self) -> bool {
        true
    }

    fn is_overloaded(&self) -> bool {
        self.battler.is_overloaded()
    }
}

impl HasInventory for Player {
    fn inventory(&self) -> &Inventory {
        self.battler.inventory()
    }

    fn inventory_mut(&mut self) -> &mut Inventory {
        self.battler.inventory_mut()
    }
}

impl HasStats for Player {
    fn stats(&self) -> Ref<'_, Stats> {
        self.battler.stats()
    }

    fn stats_mut(&self) -> RefMut<'_, Stats> {
        self.battler.stats_mut()
    }
}

impl CanTrade for Player {
    fn coin(&self) -> u32 {
        self.battler.coin()
    }

    fn coin_mut(&mut self) -> &mut u32 {
        self.battler.coin_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::stats::CapacityConfig;
    use crate::game::entities::items::Item;
    use crate::game::entities::stats::Attributes;
    use crate::game::events::PositionSlot;
    use crate::game::types::{Coordinate, Location};

    fn jimbo(bus: &Rc<EventBus>) -> Player {
        let attributes = Attributes { health: 50, strength: 10, armor: 10, agility: 30, power: 100 };
        let battler = Battler::new(
            "Jimbo",
            Location::new("tortelini", Coordinate::new(1, 2)),
            attributes,
            CapacityConfig::default(),
        );
        Player::new(battler, bus)
    }

    #[test]
    fn test_player_answers_position_query() {
        let bus = EventBus::new();
        let player = jimbo(&bus);
        let slot = PositionSlot::new();

        let report = bus.publish(&Event::PositionQuery { reply: &slot });

        assert_eq!(report.delivered, 1);
        assert_eq!(slot.get(), Some(player.location()));
        assert!(player.is_player());
    }

    #[test]
    fn test_dropped_player_stops_answering() {
        let bus = EventBus::new();
        drop(jimbo(&bus));
        let slot = PositionSlot::new();
        let report = bus.publish(&Event::PositionQuery { reply: &slot });
        assert_eq!(report.delivered, 0);
        assert_eq!(slot.get(), None);
        assert_eq!(bus.subscriber_count(Topic::ItemSetChanged), 0);
    }

    #[test]
    fn test_player_strength_clears_encumbrance() {
        let bus = EventBus::new();
        let mut player = jimbo(&bus);
        player.inventory_mut().add(Rc::new(Item::basic("Safe", "Locked.", 130, 0)));
        assert!(player.is_overloaded());

        player.stats_mut().set_strength(20);
        assert!(!player.is_overloaded());
    }
}
