//! Item collections.
//!
//! An inventory is an ordered multiset of shared item references plus an
//! equipped subset holding at most one item per [`ItemCategory`]. A
//! publishing inventory announces its item set on the bus after every
//! change so subscribed stats can re-derive encumbrance.

use std::rc::Rc;

use log::{debug, info};

use crate::config::inventory::ITEMS_TO_MODIFY;
use crate::game::entities::items::{Item, ItemCategory};
use crate::game::error::InventoryError;
use crate::game::events::{Event, EventBus};
use crate::game::types::{EntityId, ItemId};

#[derive(Debug)]
struct Publisher {
    bus: Rc<EventBus>,
    owner: EntityId,
}

#[derive(Debug, Default)]
pub struct Inventory {
    items: Vec<Rc<Item>>,
    equipped: Vec<Rc<Item>>,
    publisher: Option<Publisher>,
}

impl Inventory {
    pub fn new(items: Vec<Rc<Item>>) -> Self {
        Self {
            items,
            equipped: Vec::new(),
            publisher: None,
        }
    }

    /// Announce every change as `owner`'s item set.
    pub fn publishing(mut self, bus: Rc<EventBus>, owner: EntityId) -> Self {
        self.publisher = Some(Publisher { bus, owner });
        self
    }

    pub fn is_publishing(&self) -> bool {
        self.publisher.is_some()
    }

    pub fn items(&self) -> &[Rc<Item>] {
        &self.items
    }

    pub fn equipped(&self) -> &[Rc<Item>] {
        &self.equipped
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn count(&self, id: ItemId) -> usize {
        self.items.iter().filter(|item| item.id == id).count()
    }

    pub fn find(&self, id: ItemId) -> Option<&Rc<Item>> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn total_weight(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |acc, item| acc.saturating_add(item.weight))
    }

    pub fn add(&mut self, item: Rc<Item>) {
        self.add_item(item, ITEMS_TO_MODIFY);
    }

    pub fn add_item(&mut self, item: Rc<Item>, amount: usize) {
        for _ in 0..amount {
            self.items.push(Rc::clone(&item));
        }
        debug!("[Inventory] Added {} x '{}'", amount, item.name);
        self.announce();
    }

    pub fn remove(&mut self, id: ItemId) -> Result<Rc<Item>, InventoryError> {
        let item = self
            .find(id)
            .cloned()
            .ok_or_else(|| InventoryError::NotCarried(id.0.to_string()))?;
        self.remove_item(id, ITEMS_TO_MODIFY)?;
        Ok(item)
    }

    /// Remove `amount` copies. Nothing is removed unless all of them are here.
    /// An equipped item whose last copy leaves is unequipped as well.
    pub fn remove_item(&mut self, id: ItemId, amount: usize) -> Result<(), InventoryError> {
        let available = self.count(id);
        if available < amount {
            let name = self
                .find(id)
                .map(|item| item.name.clone())
                .unwrap_or_else(|| id.0.to_string());
            return Err(InventoryError::Insufficient { name, requested: amount, available });
        }

        let mut remaining = amount;
        self.items.retain(|item| {
            if remaining > 0 && item.id == id {
                remaining -= 1;
                false
            } else {
                true
            }
        });
        if self.count(id) == 0 {
            self.equipped.retain(|item| item.id != id);
        }
        self.announce();
        Ok(())
    }

    /// Equip a carried equippable item, replacing any equipped item of the
    /// same category. Returns the replaced item.
    pub fn equip(&mut self, id: ItemId) -> Result<Option<Rc<Item>>, InventoryError> {
        let item = self
            .find(id)
            .cloned()
            .ok_or_else(|| InventoryError::NotCarried(id.0.to_string()))?;
        if !item.is_equippable() {
            return Err(InventoryError::NotEquippable(item.name.clone()));
        }
        let category = item.category();
        let replaced = self
            .equipped
            .iter()
            .position(|equipped| equipped.category() == category)
            .map(|index| self.equipped.remove(index));

        info!("[Inventory] Equipped '{}'", item.name);
        self.equipped.push(item);
        Ok(replaced)
    }

    pub fn unequip(&mut self, id: ItemId) -> Option<Rc<Item>> {
        let index = self.equipped.iter().position(|item| item.id == id)?;
        Some(self.equipped.remove(index))
    }

    pub fn equipped_in(&self, category: ItemCategory) -> Option<&Rc<Item>> {
        self.equipped.iter().find(|item| item.category() == category)
    }

    /// Publish the current item set, if this inventory publishes at all.
    pub fn announce(&self) {
        if let Some(publisher) = &self.publisher {
            publisher.bus.publish(&Event::ItemSetChanged {
                sender: publisher.owner,
                items: &self.items,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::events::Topic;
    use std::cell::Cell;

    fn sword(name: &str) -> Rc<Item> {
        Rc::new(Item::weapon(name, "Sharp.", 5, 10, 4, Vec::new()))
    }

    #[test]
    fn test_add_and_remove_copies() {
        let potion = Rc::new(Item::healing("Potion", "Heals.", 1, 5, 20));
        let mut inventory = Inventory::default();
        inventory.add_item(Rc::clone(&potion), 3);
        assert_eq!(inventory.count(potion.id), 3);

        inventory.remove_item(potion.id, 2).unwrap();
        assert_eq!(inventory.count(potion.id), 1);
    }

    #[test]
    fn test_remove_more_than_carried_changes_nothing() {
        let potion = Rc::new(Item::healing("Potion", "Heals.", 1, 5, 20));
        let mut inventory = Inventory::new(vec![Rc::clone(&potion)]);

        let err = inventory.remove_item(potion.id, 2).unwrap_err();
        assert_eq!(
            err,
            InventoryError::Insufficient { name: "Potion".into(), requested: 2, available: 1 }
        );
        assert_eq!(inventory.count(potion.id), 1);
    }

    #[test]
    fn test_equip_is_exclusive_per_category() {
        let first = sword("Rusty Sword");
        let second = sword("Fine Sword");
        let plate = Rc::new(Item::armor("Plate", "Shiny.", 20, 50, 8));
        let mut inventory = Inventory::new(vec![Rc::clone(&first), Rc::clone(&second), Rc::clone(&plate)]);

        assert!(inventory.equip(first.id).unwrap().is_none());
        inventory.equip(plate.id).unwrap();
        let replaced = inventory.equip(second.id).unwrap();

        assert_eq!(replaced.map(|item| item.id), Some(first.id));
        let weapons: Vec<_> = inventory
            .equipped()
            .iter()
            .filter(|item| item.category() == ItemCategory::Weapon)
            .collect();
        assert_eq!(weapons.len(), 1);
        assert_eq!(weapons[0].id, second.id);
        assert_eq!(inventory.equipped().len(), 2);
    }

    #[test]
    fn test_equip_requires_carrying() {
        let mut inventory = Inventory::default();
        let loose = sword("Loose Sword");
        assert!(matches!(inventory.equip(loose.id), Err(InventoryError::NotCarried(_))));
        assert!(inventory.equipped().is_empty());
    }

    #[test]
    fn test_equip_rejects_plain_items() {
        let potion = Rc::new(Item::healing("Potion", "Heals.", 1, 5, 20));
        let stone = Rc::new(Item::basic("Stone", "Round.", 2, 1));
        let mut inventory = Inventory::new(vec![Rc::clone(&potion), Rc::clone(&stone)]);

        for item in [&potion, &stone] {
            assert_eq!(
                inventory.equip(item.id),
                Err(InventoryError::NotEquippable(item.name.clone()))
            );
        }
        assert!(inventory.equipped().is_empty());
    }

    #[test]
    fn test_removing_last_copy_unequips() {
        let blade = sword("Blade");
        let mut inventory = Inventory::new(vec![Rc::clone(&blade)]);
        inventory.equip(blade.id).unwrap();
        inventory.remove(blade.id).unwrap();
        assert!(inventory.equipped().is_empty());
    }

    #[test]
    fn test_publishing_inventory_announces_changes() {
        let bus = EventBus::new();
        let owner = EntityId::new();
        let seen = Rc::new(Cell::new(0u32));
        {
            let seen = Rc::clone(&seen);
            bus.subscribe(Topic::ItemSetChanged, move |event| {
                if let Event::ItemSetChanged { sender, items } = event {
                    assert_eq!(*sender, owner);
                    seen.set(items.iter().map(|item| item.weight).sum());
                }
                Ok(())
            });
        }

        let mut inventory = Inventory::default().publishing(Rc::clone(&bus), owner);
        let blade = sword("Blade");
        inventory.add_item(Rc::clone(&blade), 2);
        assert_eq!(seen.get(), 10);

        inventory.remove(blade.id).unwrap();
        assert_eq!(seen.get(), 5);
    }
}
