//! Built-in passability rules.
//!
//! Maps with bespoke behaviour implement [`Passability`] themselves (or pass
//! a closure); these cover the common kinds selectable from map definitions.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::game::grid::map::{Entry, Passability};
use crate::game::systems::surface::Surface;
use crate::game::types::{Coordinate, Tile};

/// Every in-grid cell may be entered.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenGround;

impl Passability for OpenGround {
    fn evaluate_entry(&mut self, _entry: Entry<'_>, _out: &mut dyn Surface) -> bool {
        true
    }
}

pub const DEFAULT_BLOCKED: [Tile; 5] = [Tile::Wall, Tile::Mountain, Tile::Water, Tile::Lava, Tile::Pit];

/// Refuses entry to a fixed set of terrain kinds.
#[derive(Debug, Clone)]
pub struct TerrainRules {
    blocked: HashSet<Tile>,
}

impl TerrainRules {
    pub fn new(blocked: impl IntoIterator<Item = Tile>) -> Self {
        Self {
            blocked: blocked.into_iter().collect(),
        }
    }

    pub fn allows(&self, entry: &Entry<'_>) -> bool {
        match entry.layout.get(entry.coordinate) {
            Ok(tile) => !self.blocked.contains(&tile),
            Err(_) => false,
        }
    }
}

impl Default for TerrainRules {
    fn default() -> Self {
        Self::new(DEFAULT_BLOCKED)
    }
}

impl Passability for TerrainRules {
    fn evaluate_entry(&mut self, entry: Entry<'_>, _out: &mut dyn Surface) -> bool {
        self.allows(&entry)
    }
}

/// A scripted reaction to entering one cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptedEntry {
    pub row: usize,
    pub col: usize,
    /// Narrated to the player only.
    #[serde(default)]
    pub message: Option<String>,
    pub passable: bool,
    /// Narrate just the first time the player enters.
    #[serde(default)]
    pub once: bool,
}

/// Per-cell narration and passability, terrain rules everywhere else.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRules {
    entries: HashMap<Coordinate, ScriptedEntry>,
    narrated: HashSet<Coordinate>,
    fallback: TerrainRules,
}

impl ScriptedRules {
    pub fn new(entries: impl IntoIterator<Item = ScriptedEntry>, fallback: TerrainRules) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|entry| (Coordinate::new(entry.row, entry.col), entry))
                .collect(),
            narrated: HashSet::new(),
            fallback,
        }
    }
}

impl Passability for ScriptedRules {
    fn evaluate_entry(&mut self, entry: Entry<'_>, out: &mut dyn Surface) -> bool {
        let Some(script) = self.entries.get(&entry.coordinate) else {
            return self.fallback.allows(&entry);
        };

        if entry.is_player {
            if let Some(message) = &script.message {
                let seen = !self.narrated.insert(entry.coordinate);
                if !(script.once && seen) {
                    out.print_line(message);
                }
            }
        }
        script.passable
    }
}
