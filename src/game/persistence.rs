//! Save and load.
//!
//! A [`Snapshot`] is an ordered list of names and an equally long list of
//! records. Stores only move snapshots to and from a carrier; the record
//! layout lives here. Loading a snapshot whose two lists differ in length is
//! a [`PersistenceError::CorruptSnapshot`].

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::game::entities::battler::Battler;
use crate::game::entities::inventory::Inventory;
use crate::game::entities::items::Item;
use crate::game::entities::npc::Npc;
use crate::game::entities::player::Player;
use crate::game::entities::presence::{CanTrade, HasInventory, HasStats, Positioned, Presence};
use crate::game::entities::stats::Stats;
use crate::game::entities::vendor::Vendor;
use crate::game::error::PersistenceError;
use crate::game::types::{EntityId, ItemId, Location};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpcRecord {
    pub id: EntityId,
    pub name: String,
    pub location: Location,
    pub dialogue: BTreeMap<String, Vec<String>>,
}

/// Carried items, one entry per copy, plus the ids of equipped ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub items: Vec<Item>,
    pub equipped: Vec<ItemId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorRecord {
    pub id: EntityId,
    pub name: String,
    pub location: Location,
    pub inventory: InventoryRecord,
    pub coin: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattlerRecord {
    pub id: EntityId,
    pub name: String,
    pub location: Location,
    pub inventory: InventoryRecord,
    pub coin: u32,
    pub stats: Stats,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Record {
    Item(Item),
    Npc(NpcRecord),
    Vendor(VendorRecord),
    Battler(BattlerRecord),
    Player(BattlerRecord),
}

pub trait Persist {
    fn to_record(&self) -> Record;
}

impl Persist for Item {
    fn to_record(&self) -> Record {
        Record::Item(self.clone())
    }
}

impl Persist for Npc {
    fn to_record(&self) -> Record {
        Record::Npc(NpcRecord {
            id: self.id(),
            name: self.name().to_string(),
            location: self.location(),
            dialogue: self.dialogue_entries().clone(),
        })
    }
}

impl Persist for Vendor {
    fn to_record(&self) -> Record {
        Record::Vendor(VendorRecord {
            id: self.id(),
            name: self.name().to_string(),
            location: self.location(),
            inventory: InventoryRecord::capture(self.inventory()),
            coin: self.coin(),
        })
    }
}

impl Persist for Battler {
    fn to_record(&self) -> Record {
        Record::Battler(BattlerRecord::capture(self))
    }
}

impl Persist for Player {
    fn to_record(&self) -> Record {
        Record::Player(BattlerRecord::capture(self.battler()))
    }
}

impl InventoryRecord {
    pub fn capture(inventory: &Inventory) -> Self {
        Self {
            items: inventory.items().iter().map(|item| Item::clone(item)).collect(),
            equipped: inventory.equipped().iter().map(|item| item.id).collect(),
        }
    }

    /// Rebuild the inventory. Copies of one item share a single allocation
    /// again; equipped ids that are no longer carried are dropped.
    pub fn restore(self) -> Inventory {
        let mut shared: HashMap<ItemId, Rc<Item>> = HashMap::new();
        let items = self
            .items
            .into_iter()
            .map(|item| {
                Rc::clone(
                    shared
                        .entry(item.id)
                        .or_insert_with(|| Rc::new(item)),
                )
            })
            .collect();

        let mut inventory = Inventory::new(items);
        for id in self.equipped {
            if let Err(err) = inventory.equip(id) {
                warn!("[Persistence] Skipping equipped item: {}", err);
            }
        }
        inventory
    }
}

impl NpcRecord {
    pub fn restore(self) -> Npc {
        let mut npc = Npc::from_presence(Presence::with_id(self.id, self.name, self.location));
        for (name, lines) in self.dialogue {
            npc.add_dialogue(name, lines);
        }
        npc
    }
}

impl VendorRecord {
    pub fn restore(self) -> Vendor {
        Vendor::from_parts(
            Presence::with_id(self.id, self.name, self.location),
            self.inventory.restore(),
            self.coin,
        )
    }
}

impl BattlerRecord {
    pub fn capture(battler: &Battler) -> Self {
        Self {
            id: battler.id(),
            name: battler.name().to_string(),
            location: battler.location(),
            inventory: InventoryRecord::capture(battler.inventory()),
            coin: battler.coin(),
            stats: battler.stats().clone(),
        }
    }

    /// The battler comes back detached from any event bus.
    pub fn restore(self) -> Battler {
        Battler::from_parts(
            Presence::with_id(self.id, self.name, self.location),
            self.inventory.restore(),
            self.coin,
            self.stats,
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    keys: Vec<String>,
    values: Vec<Record>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, record: Record) {
        self.keys.push(name.into());
        self.values.push(record);
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn get(&self, name: &str) -> Option<&Record> {
        let index = self.keys.iter().position(|key| key == name)?;
        self.values.get(index)
    }

    pub fn validate(&self) -> Result<(), PersistenceError> {
        if self.keys.len() != self.values.len() {
            return Err(PersistenceError::CorruptSnapshot {
                keys: self.keys.len(),
                values: self.values.len(),
            });
        }
        Ok(())
    }

    /// Pair names with records in their saved order.
    pub fn into_entries(self) -> Result<Vec<(String, Record)>, PersistenceError> {
        self.validate()?;
        Ok(self.keys.into_iter().zip(self.values).collect())
    }
}

pub trait SnapshotStore {
    fn save(&self, snapshot: &Snapshot) -> Result<(), PersistenceError>;
    fn load(&self) -> Result<Snapshot, PersistenceError>;
}

/// Keeps a snapshot as one JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonSnapshotStore {
    path: PathBuf,
}

impl JsonSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for JsonSnapshotStore {
    fn save(&self, snapshot: &Snapshot) -> Result<(), PersistenceError> {
        snapshot.validate()?;
        let raw = serde_json::to_string_pretty(snapshot)?;
        fs::write(&self.path, raw)?;
        info!("[Persistence] Saved {} entries to {}", snapshot.len(), self.path.display());
        Ok(())
    }

    fn load(&self) -> Result<Snapshot, PersistenceError> {
        let raw = fs::read_to_string(&self.path)?;
        let snapshot: Snapshot = serde_json::from_str(&raw)?;
        snapshot.validate()?;
        info!("[Persistence] Loaded {} entries from {}", snapshot.len(), self.path.display());
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::stats::CapacityConfig;
    use crate::game::entities::stats::Attributes;
    use crate::game::types::Coordinate;
    use tempfile::tempdir;

    fn camp(row: usize, col: usize) -> Location {
        Location::new("camp", Coordinate::new(row, col))
    }

    fn armed_battler() -> (Battler, Rc<Item>) {
        let spear = Rc::new(Item::weapon("Spear", "Pointy.", 6, 12, 4, Vec::new()));
        let attributes = Attributes { health: 30, strength: 8, armor: 1, agility: 4, power: 2 };
        let mut battler = Battler::new("Gorm", camp(0, 1), attributes, CapacityConfig::default())
            .with_inventory(Inventory::new(vec![Rc::clone(&spear), Rc::clone(&spear)]))
            .with_coin(7);
        battler.inventory_mut().equip(spear.id).unwrap();
        (battler, spear)
    }

    #[test]
    fn test_battler_record_restores_state() {
        let (battler, spear) = armed_battler();
        let Record::Battler(record) = battler.to_record() else {
            panic!("expected a battler record");
        };

        let restored = record.restore();

        assert_eq!(restored.id(), battler.id());
        assert_eq!(restored.location(), camp(0, 1));
        assert_eq!(restored.coin(), 7);
        assert_eq!(restored.inventory().count(spear.id), 2);
        assert_eq!(restored.equipped_weapon().map(|item| item.id), Some(spear.id));
        assert_eq!(*restored.stats(), *battler.stats());
        assert!(Rc::ptr_eq(&restored.inventory().items()[0], &restored.inventory().items()[1]));
    }

    #[test]
    fn test_json_store_round_trip_keeps_order() {
        let dir = tempdir().unwrap();
        let store = JsonSnapshotStore::new(dir.path().join("save.json"));

        let mut bob = Npc::new("Bob", camp(1, 1));
        bob.add_dialogue("greet", vec!["Hi.".into()]);
        let (gorm, _) = armed_battler();
        let note = Item::unweighted("Note", "Meet at noon.");

        let mut snapshot = Snapshot::new();
        snapshot.push("note", note.to_record());
        snapshot.push("Bob", bob.to_record());
        snapshot.push("Gorm", gorm.to_record());
        store.save(&snapshot).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, snapshot);
        assert_eq!(loaded.keys(), &["note".to_string(), "Bob".to_string(), "Gorm".to_string()]);

        let Some(Record::Npc(record)) = loaded.get("Bob").cloned() else {
            panic!("expected an npc record");
        };
        let bob_again = record.restore();
        assert_eq!(bob_again.dialogue("greet"), Some(&["Hi.".to_string()][..]));
    }

    #[test]
    fn test_arity_mismatch_is_corrupt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        let item = Item::basic("Stick", "Just a stick.", 1, 0);
        let raw = serde_json::json!({
            "keys": ["stick", "orphan"],
            "values": [item.to_record()],
        });
        fs::write(&path, raw.to_string()).unwrap();

        let err = JsonSnapshotStore::new(path.clone()).load().unwrap_err();
        assert!(matches!(err, PersistenceError::CorruptSnapshot { keys: 2, values: 1 }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let err = JsonSnapshotStore::new(dir.path().join("absent.json")).load().unwrap_err();
        assert!(matches!(err, PersistenceError::Io(_)));
    }
}
