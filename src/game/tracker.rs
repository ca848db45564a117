//! Explicit object registry.
//!
//! Every constructible kind declares its category chain (most specific
//! first) and is recorded under each category when it is created through the
//! session. Lookups are by category tag only.

use std::collections::BTreeMap;
use std::fmt::Write;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::game::types::{EntityId, ItemId, MapId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Entity,
    Npc,
    Vendor,
    Battler,
    Player,
    Item,
    WeightedItem,
    Equippable,
    Weapon,
    Armor,
    HealItem,
    Map,
}

pub const NPC_CATEGORIES: &[Category] = &[Category::Npc, Category::Entity];
pub const VENDOR_CATEGORIES: &[Category] = &[Category::Vendor, Category::Entity];
pub const BATTLER_CATEGORIES: &[Category] = &[Category::Battler, Category::Vendor, Category::Entity];
pub const PLAYER_CATEGORIES: &[Category] = &[
    Category::Player,
    Category::Battler,
    Category::Vendor,
    Category::Entity,
];

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackedKey {
    Entity(EntityId),
    Item(ItemId),
    Map(MapId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedEntry {
    pub name: String,
    pub key: TrackedKey,
}

#[derive(Debug, Default)]
pub struct Tracker {
    by_category: BTreeMap<Category, Vec<TrackedEntry>>,
}

impl Tracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record under every category in the chain. Re-tracking a key is a no-op.
    pub fn track(&mut self, name: impl Into<String>, key: TrackedKey, categories: &[Category]) {
        let entry = TrackedEntry { name: name.into(), key };
        for category in categories {
            let bucket = self.by_category.entry(*category).or_default();
            if !bucket.iter().any(|tracked| tracked.key == entry.key) {
                bucket.push(entry.clone());
            }
        }
        debug!("[Tracker] Tracked '{}' as {:?}", entry.name, categories);
    }

    pub fn forget(&mut self, key: &TrackedKey) {
        for bucket in self.by_category.values_mut() {
            bucket.retain(|tracked| &tracked.key != key);
        }
        self.by_category.retain(|_, bucket| !bucket.is_empty());
    }

    pub fn search(&self, category: Category) -> &[TrackedEntry] {
        self.by_category
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains_name(&self, category: Category, name: &str) -> bool {
        self.search(category).iter().any(|entry| entry.name == name)
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.by_category.keys().copied()
    }

    /// Empties every category bucket.
    pub fn clear(&mut self) {
        self.by_category.clear();
    }

    /// Human-readable dump, optionally limited to one category.
    pub fn writeout(&self, only: Option<Category>) -> String {
        let mut out = String::new();
        for (category, entries) in &self.by_category {
            if only.is_some_and(|wanted| wanted != *category) {
                continue;
            }
            let names: Vec<&str> = entries.iter().map(|entry| entry.name.as_str()).collect();
            let _ = writeln!(out, "{:?}", category);
            let _ = writeln!(out, "{:?}", names);
            out.push('\n');
        }
        out
    }
}
