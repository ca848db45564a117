//! Items and weapon attacks.

use serde::{Deserialize, Serialize};

use crate::config::inventory::{BASE_AMMO_COST, TIMES_ATTACKING};
use crate::game::tracker::Category;
use crate::game::types::ItemId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangedProfile {
    pub accuracy: u32,
    pub ammo_cost: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attack {
    pub damage: u32,
    pub description: String,
    pub hit_count: u32,
    #[serde(default)]
    pub ranged: Option<RangedProfile>,
}

impl Attack {
    pub fn melee(damage: u32, description: impl Into<String>) -> Self {
        Self {
            damage,
            description: description.into(),
            hit_count: TIMES_ATTACKING,
            ranged: None,
        }
    }

    pub fn ranged(damage: u32, description: impl Into<String>, hit_count: u32, accuracy: u32) -> Self {
        Self {
            damage,
            description: description.into(),
            hit_count,
            ranged: Some(RangedProfile {
                accuracy,
                ammo_cost: BASE_AMMO_COST,
            }),
        }
    }

    pub fn with_ammo_cost(mut self, ammo_cost: u32) -> Self {
        if let Some(profile) = self.ranged.as_mut() {
            profile.ammo_cost = ammo_cost;
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Basic,
    /// Equippable with no built-in effect; callers supply their own.
    Equippable,
    Weapon { damage: u32, attacks: Vec<Attack> },
    Armor { rating: u32 },
    Healing { amount: u32 },
}

/// Concrete item subtype. Equipping is exclusive per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemCategory {
    Basic,
    Equippable,
    Weapon,
    Armor,
    Healing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub weight: u32,
    pub value: u32,
    pub kind: ItemKind,
}

impl Item {
    fn build(name: impl Into<String>, description: impl Into<String>, weight: u32, value: u32, kind: ItemKind) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            description: description.into(),
            weight,
            value,
            kind,
        }
    }

    /// Weightless, valueless flavour item (keys, notes).
    pub fn unweighted(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::build(name, description, 0, 0, ItemKind::Basic)
    }

    pub fn basic(name: impl Into<String>, description: impl Into<String>, weight: u32, value: u32) -> Self {
        Self::build(name, description, weight, value, ItemKind::Basic)
    }

    pub fn equippable(name: impl Into<String>, description: impl Into<String>, weight: u32, value: u32) -> Self {
        Self::build(name, description, weight, value, ItemKind::Equippable)
    }

    pub fn weapon(
        name: impl Into<String>,
        description: impl Into<String>,
        weight: u32,
        value: u32,
        damage: u32,
        attacks: Vec<Attack>,
    ) -> Self {
        Self::build(name, description, weight, value, ItemKind::Weapon { damage, attacks })
    }

    pub fn armor(name: impl Into<String>, description: impl Into<String>, weight: u32, value: u32, rating: u32) -> Self {
        Self::build(name, description, weight, value, ItemKind::Armor { rating })
    }

    pub fn healing(name: impl Into<String>, description: impl Into<String>, weight: u32, value: u32, amount: u32) -> Self {
        Self::build(name, description, weight, value, ItemKind::Healing { amount })
    }

    pub fn category(&self) -> ItemCategory {
        match self.kind {
            ItemKind::Basic => ItemCategory::Basic,
            ItemKind::Equippable => ItemCategory::Equippable,
            ItemKind::Weapon { .. } => ItemCategory::Weapon,
            ItemKind::Armor { .. } => ItemCategory::Armor,
            ItemKind::Healing { .. } => ItemCategory::Healing,
        }
    }

    pub fn is_equippable(&self) -> bool {
        matches!(
            self.kind,
            ItemKind::Equippable | ItemKind::Weapon { .. } | ItemKind::Armor { .. }
        )
    }

    pub fn attacks(&self) -> &[Attack] {
        match &self.kind {
            ItemKind::Weapon { attacks, .. } => attacks,
            _ => &[],
        }
    }

    /// Tracker categories, most specific first.
    pub fn categories(&self) -> &'static [Category] {
        match self.kind {
            ItemKind::Basic if self.weight == 0 && self.value == 0 => &[Category::Item],
            ItemKind::Basic => &[Category::WeightedItem, Category::Item],
            ItemKind::Equippable => &[Category::Equippable, Category::WeightedItem, Category::Item],
            ItemKind::Weapon { .. } => &[
                Category::Weapon,
                Category::Equippable,
                Category::WeightedItem,
                Category::Item,
            ],
            ItemKind::Armor { .. } => &[
                Category::Armor,
                Category::Equippable,
                Category::WeightedItem,
                Category::Item,
            ],
            ItemKind::Healing { .. } => &[Category::HealItem, Category::WeightedItem, Category::Item],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weapon_exposes_attacks() {
        let smash = Attack::melee(100, "You use your entire body to smash the opponent.");
        let doodle = Item::weapon("Wackadoodle", "A mysterious doodle of some kind. Wacky.", 5, 100, 5, vec![smash.clone()]);
        assert_eq!(doodle.category(), ItemCategory::Weapon);
        assert!(doodle.is_equippable());
        assert_eq!(doodle.attacks(), &[smash]);
        assert_eq!(smash_hits(&doodle), 1);
    }

    fn smash_hits(item: &Item) -> u32 {
        item.attacks().iter().map(|a| a.hit_count).sum()
    }

    #[test]
    fn test_ranged_attack_profile() {
        let volley = Attack::ranged(12, "A volley of arrows.", 3, 70).with_ammo_cost(3);
        assert_eq!(volley.ranged, Some(RangedProfile { accuracy: 70, ammo_cost: 3 }));
        let jab = Attack::melee(2, "A jab.").with_ammo_cost(9);
        assert_eq!(jab.ranged, None);
    }

    #[test]
    fn test_unweighted_items_weigh_nothing() {
        let note = Item::unweighted("Note", "A crumpled note.");
        assert_eq!(note.weight, 0);
        assert!(!note.is_equippable());
        assert_eq!(note.categories(), &[Category::Item]);
    }
}
