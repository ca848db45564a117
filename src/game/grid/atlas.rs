//! Map registry.
//!
//! The atlas owns every loaded [`TileMap`] keyed by [`MapId`]. Maps come
//! either fully built (custom [`Passability`] implementations) or from a
//! serializable [`MapDefinition`], whose rule kind is resolved at load time.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::game::error::MapError;
use crate::game::grid::grid::TileGrid;
use crate::game::grid::map::{Passability, TileMap};
use crate::game::grid::rules::{DEFAULT_BLOCKED, OpenGround, ScriptedEntry, ScriptedRules, TerrainRules};
use crate::game::types::{Coordinate, MapId, Tile};

fn default_blocked() -> Vec<Tile> {
    DEFAULT_BLOCKED.to_vec()
}

/// Which passability rule a definition asks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleSpec {
    Open,
    Terrain {
        #[serde(default = "default_blocked")]
        blocked: Vec<Tile>,
    },
    Scripted {
        entries: Vec<ScriptedEntry>,
        #[serde(default = "default_blocked")]
        blocked: Vec<Tile>,
    },
    /// Resolved through [`Atlas::register_kind`].
    Custom { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapDefinition {
    pub id: MapId,
    pub layout: TileGrid,
    pub rules: RuleSpec,
}

pub type RuleFactory = fn(&MapDefinition) -> Box<dyn Passability>;

#[derive(Default)]
pub struct Atlas {
    maps: BTreeMap<MapId, TileMap>,
    kinds: HashMap<String, RuleFactory>,
}

impl fmt::Debug for Atlas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Atlas")
            .field("maps", &self.maps)
            .field("kinds", &self.kinds.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Atlas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a custom rule kind available to [`RuleSpec::Custom`] definitions.
    pub fn register_kind(&mut self, name: impl Into<String>, factory: RuleFactory) {
        let name = name.into();
        debug!("[Atlas] Registered map kind '{}'", name);
        self.kinds.insert(name, factory);
    }

    pub fn insert(&mut self, map: TileMap) -> Result<(), MapError> {
        if self.maps.contains_key(map.id()) {
            return Err(MapError::DuplicateMap(map.id().clone()));
        }
        info!(
            "[Atlas] Loaded map '{}' ({}x{})",
            map.id(),
            map.layout().rows(),
            map.layout().cols()
        );
        self.maps.insert(map.id().clone(), map);
        Ok(())
    }

    pub fn load(&mut self, definition: MapDefinition) -> Result<(), MapError> {
        let rules = self.build_rules(&definition)?;
        self.insert(TileMap::new(definition.id, definition.layout, rules))
    }

    pub fn load_json(&mut self, raw: &str) -> Result<MapId, AtlasLoadError> {
        let definition: MapDefinition = serde_json::from_str(raw)?;
        let id = definition.id.clone();
        self.load(definition)?;
        Ok(id)
    }

    fn build_rules(&self, definition: &MapDefinition) -> Result<Box<dyn Passability>, MapError> {
        Ok(match &definition.rules {
            RuleSpec::Open => Box::new(OpenGround),
            RuleSpec::Terrain { blocked } => Box::new(TerrainRules::new(blocked.iter().copied())),
            RuleSpec::Scripted { entries, blocked } => Box::new(ScriptedRules::new(
                entries.iter().cloned(),
                TerrainRules::new(blocked.iter().copied()),
            )),
            RuleSpec::Custom { name } => {
                let factory = self
                    .kinds
                    .get(name)
                    .ok_or_else(|| MapError::UnknownKind(name.clone()))?;
                factory(definition)
            }
        })
    }

    pub fn get(&self, id: &MapId) -> Result<&TileMap, MapError> {
        self.maps.get(id).ok_or_else(|| MapError::UnknownMap(id.clone()))
    }

    pub fn get_mut(&mut self, id: &MapId) -> Result<&mut TileMap, MapError> {
        self.maps.get_mut(id).ok_or_else(|| MapError::UnknownMap(id.clone()))
    }

    pub fn contains(&self, id: &MapId) -> bool {
        self.maps.contains_key(id)
    }

    /// Ensure `coordinate` exists on map `id`.
    pub fn check(&self, id: &MapId, coordinate: Coordinate) -> Result<Tile, MapError> {
        self.get(id)?.layout().get(coordinate)
    }

    pub fn ids(&self) -> impl Iterator<Item = &MapId> {
        self.maps.keys()
    }
}

/// Failure loading a JSON map definition.
#[derive(Debug, thiserror::Error)]
pub enum AtlasLoadError {
    #[error("invalid map definition: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Map(#[from] MapError),
}
