//! Session state.
//!
//! A session owns the event bus, the object tracker and the navigator for
//! one game. Entities are spawned through it so their start location is
//! checked against the map and their categories are tracked.

use std::rc::Rc;

use log::info;

use crate::config::session::SessionConfig;
use crate::game::entities::battler::Battler;
use crate::game::entities::inventory::Inventory;
use crate::game::entities::items::Item;
use crate::game::entities::npc::Npc;
use crate::game::entities::player::Player;
use crate::game::entities::presence::Positioned;
use crate::game::entities::stats::Attributes;
use crate::game::entities::vendor::Vendor;
use crate::game::error::{MapError, MoveError, PersistenceError, SpawnError};
use crate::game::events::EventBus;
use crate::game::grid::atlas::{Atlas, AtlasLoadError, MapDefinition};
use crate::game::grid::map::TileMap;
use crate::game::persistence::{Persist, Record, Snapshot};
use crate::game::systems::movement::Navigator;
use crate::game::systems::render::TileRenderer;
use crate::game::systems::surface::Surface;
use crate::game::tracker::{
    BATTLER_CATEGORIES, Category, NPC_CATEGORIES, PLAYER_CATEGORIES, TrackedKey, Tracker, VENDOR_CATEGORIES,
};
use crate::game::types::{Coordinate, Direction, Location, MapId};

/// One entry of a restored snapshot.
#[derive(Debug)]
pub enum Restored {
    Item(Rc<Item>),
    Npc(Npc),
    Vendor(Vendor),
    Battler(Battler),
    Player(Player),
}

#[derive(Debug)]
pub struct Session {
    bus: Rc<EventBus>,
    tracker: Tracker,
    navigator: Navigator,
    config: SessionConfig,
}

impl Session {
    /// Session drawing to the terminal.
    pub fn new(config: SessionConfig) -> Self {
        let bus = EventBus::new();
        let navigator = Navigator::new(Atlas::new(), Rc::clone(&bus), config.navigation);
        Self::from_parts(config, bus, navigator)
    }

    pub fn with_display<S, R>(config: SessionConfig, surface: S, renderer: R) -> Self
    where
        S: Surface + 'static,
        R: TileRenderer + 'static,
    {
        let bus = EventBus::new();
        let navigator = Navigator::new(Atlas::new(), Rc::clone(&bus), config.navigation)
            .with_surface(surface)
            .with_renderer(renderer);
        Self::from_parts(config, bus, navigator)
    }

    fn from_parts(config: SessionConfig, bus: Rc<EventBus>, navigator: Navigator) -> Self {
        Self {
            bus,
            tracker: Tracker::new(),
            navigator,
            config,
        }
    }

    pub fn bus(&self) -> &Rc<EventBus> {
        &self.bus
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut Navigator {
        &mut self.navigator
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }

    pub fn load_map(&mut self, map: TileMap) -> Result<MapId, MapError> {
        let id = map.id().clone();
        self.navigator.atlas_mut().insert(map)?;
        self.track_map(&id);
        Ok(id)
    }

    pub fn load_definition(&mut self, definition: MapDefinition) -> Result<MapId, MapError> {
        let id = definition.id.clone();
        self.navigator.atlas_mut().load(definition)?;
        self.track_map(&id);
        Ok(id)
    }

    pub fn load_map_json(&mut self, raw: &str) -> Result<MapId, AtlasLoadError> {
        let id = self.navigator.atlas_mut().load_json(raw)?;
        self.track_map(&id);
        Ok(id)
    }

    fn track_map(&mut self, id: &MapId) {
        self.tracker
            .track(id.as_str(), TrackedKey::Map(id.clone()), &[Category::Map]);
    }

    /// Track an item and hand back a shareable reference to it.
    pub fn register_item(&mut self, item: Item) -> Rc<Item> {
        self.tracker
            .track(item.name.clone(), TrackedKey::Item(item.id), item.categories());
        Rc::new(item)
    }

    pub fn spawn_npc(&mut self, name: impl Into<String>, location: Location) -> Result<Npc, SpawnError> {
        let name = name.into();
        self.check_spawn(&name, &location, false)?;
        let npc = Npc::new(name, location);
        self.track_entity(&npc, NPC_CATEGORIES);
        Ok(npc)
    }

    pub fn spawn_vendor(
        &mut self,
        name: impl Into<String>,
        location: Location,
        inventory: Inventory,
        coin: u32,
    ) -> Result<Vendor, SpawnError> {
        let name = name.into();
        self.check_spawn(&name, &location, false)?;
        let vendor = Vendor::new(name, location, inventory, coin);
        self.track_entity(&vendor, VENDOR_CATEGORIES);
        Ok(vendor)
    }

    /// A battler whose stats follow its inventory on this session's bus.
    pub fn spawn_battler(
        &mut self,
        name: impl Into<String>,
        location: Location,
        attributes: Attributes,
        inventory: Inventory,
        coin: u32,
    ) -> Result<Battler, SpawnError> {
        let name = name.into();
        self.check_spawn(&name, &location, false)?;
        let battler = Battler::new(name, location, attributes, self.config.capacity)
            .with_inventory(inventory)
            .with_coin(coin)
            .with_event_bus(&self.bus);
        self.track_entity(&battler, BATTLER_CATEGORIES);
        Ok(battler)
    }

    /// Only one player may exist per session; it answers every position query.
    pub fn spawn_player(
        &mut self,
        name: impl Into<String>,
        location: Location,
        attributes: Attributes,
        inventory: Inventory,
        coin: u32,
    ) -> Result<Player, SpawnError> {
        let name = name.into();
        self.check_spawn(&name, &location, true)?;
        let battler = Battler::new(name, location, attributes, self.config.capacity)
            .with_inventory(inventory)
            .with_coin(coin);
        let player = Player::new(battler, &self.bus);
        self.track_entity(&player, PLAYER_CATEGORIES);
        info!("[Session] Player '{}' spawned at {}", player.name(), player.location());
        Ok(player)
    }

    /// Stop tracking an entity so its name can be used again.
    pub fn despawn(&mut self, entity: &dyn Positioned) {
        self.tracker.forget(&TrackedKey::Entity(entity.id()));
        info!("[Session] '{}' despawned", entity.name());
    }

    fn check_spawn(&self, name: &str, location: &Location, is_player: bool) -> Result<(), SpawnError> {
        self.check_name(name, is_player)?;
        self.navigator.atlas().check(&location.map, location.coordinate)?;
        Ok(())
    }

    fn check_name(&self, name: &str, is_player: bool) -> Result<(), SpawnError> {
        if is_player {
            if let Some(player) = self.tracker.search(Category::Player).first() {
                return Err(SpawnError::PlayerExists(player.name.clone()));
            }
        }
        if self.tracker.contains_name(Category::Entity, name) {
            return Err(SpawnError::DuplicateName(name.to_string()));
        }
        Ok(())
    }

    fn track_entity(&mut self, entity: &dyn Positioned, categories: &[Category]) {
        self.tracker
            .track(entity.name(), TrackedKey::Entity(entity.id()), categories);
    }

    pub fn move_entity(&mut self, mover: &dyn Positioned, direction: Direction) -> Result<Location, MoveError> {
        self.navigator.move_entity(mover, direction)
    }

    pub fn teleport(&mut self, mover: &dyn Positioned, map_id: &MapId, coordinate: Coordinate) -> Result<Location, MoveError> {
        self.navigator.teleport(mover, map_id, coordinate)
    }

    pub fn render_map(&mut self, map_id: &MapId) -> Result<(), MapError> {
        self.navigator.render_map(map_id)
    }

    /// Record the given objects under their names, in order.
    pub fn snapshot(&self, entries: &[(&str, &dyn Persist)]) -> Snapshot {
        let mut snapshot = Snapshot::new();
        for (name, object) in entries {
            snapshot.push(*name, object.to_record());
        }
        snapshot
    }

    /// Rebuild every saved object. Battlers and players are attached to this
    /// session's bus again and everything is re-tracked. Entity names must
    /// still be free in this session.
    pub fn restore(&mut self, snapshot: Snapshot) -> Result<Vec<(String, Restored)>, PersistenceError> {
        let entries = snapshot.into_entries()?;
        let mut restored = Vec::with_capacity(entries.len());
        for (name, record) in entries {
            let object = match record {
                Record::Item(item) => Restored::Item(self.register_item(item)),
                Record::Npc(record) => {
                    self.check_name(&record.name, false)?;
                    let npc = record.restore();
                    self.track_entity(&npc, NPC_CATEGORIES);
                    Restored::Npc(npc)
                }
                Record::Vendor(record) => {
                    self.check_name(&record.name, false)?;
                    let vendor = record.restore();
                    self.track_entity(&vendor, VENDOR_CATEGORIES);
                    Restored::Vendor(vendor)
                }
                Record::Battler(record) => {
                    self.check_name(&record.name, false)?;
                    let battler = record.restore().with_event_bus(&self.bus);
                    self.track_entity(&battler, BATTLER_CATEGORIES);
                    Restored::Battler(battler)
                }
                Record::Player(record) => {
                    self.check_name(&record.name, true)?;
                    let player = Player::new(record.restore(), &self.bus);
                    self.track_entity(&player, PLAYER_CATEGORIES);
                    Restored::Player(player)
                }
            };
            restored.push((name, object));
        }
        info!("[Session] Restored {} entries", restored.len());
        Ok(restored)
    }
}
