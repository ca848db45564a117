//! Error types for the navigation core and its collaborators.
//!
//! Movement rejections are local and recoverable: whenever a `MoveError` is
//! returned the mover's location is untouched.

use thiserror::Error;

use crate::game::types::{Coordinate, Direction, MapId};

/// Failures raised by maps, grids and the map registry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MapError {
    /// Raw grid probe past the existing dimensions.
    #[error("({row}, {col}) is outside the {rows}x{cols} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("map layout must contain at least one tile")]
    EmptyLayout,

    #[error("map layout row {row} has {found} tiles, expected {expected}")]
    RaggedLayout {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("map '{0}' does not exist")]
    UnknownMap(MapId),

    #[error("map '{0}' is already loaded")]
    DuplicateMap(MapId),

    #[error("no map kind named '{0}' is registered")]
    UnknownKind(String),
}

/// Outcome of a rejected movement attempt.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// Negative or out-of-grid candidate. Carries the unchanged coordinate.
    #[error("cannot go that way from {current}")]
    InvalidDirection { current: Coordinate },

    /// The map's passability contract refused entry.
    #[error("entry refused, staying at {current}")]
    Blocked { current: Coordinate },

    #[error("carrying too much to move from {current}")]
    Overloaded { current: Coordinate },

    #[error("teleport target '{0}' does not exist")]
    TargetNotFound(MapId),

    #[error("{direction:?} has no movement rule, staying at {current}")]
    UnsupportedDirection {
        direction: Direction,
        current: Coordinate,
    },
}

impl MoveError {
    /// The mover's coordinate, echoed back for callers that want a definite
    /// position value.
    pub fn current(&self) -> Option<Coordinate> {
        match self {
            MoveError::InvalidDirection { current }
            | MoveError::Blocked { current }
            | MoveError::Overloaded { current }
            | MoveError::UnsupportedDirection { current, .. } => Some(*current),
            MoveError::TargetNotFound(_) => None,
        }
    }
}

/// Reasons a session refuses to create an entity.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpawnError {
    #[error("an entity named '{0}' already exists")]
    DuplicateName(String),

    #[error("'{0}' is already the player")]
    PlayerExists(String),

    #[error(transparent)]
    Map(#[from] MapError),
}

/// Failures reported by a single event handler. Never stops dispatch.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventError {
    #[error("subscriber no longer exists")]
    SubscriberGone,

    #[error("subscriber state is already borrowed")]
    Busy,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InventoryError {
    #[error("'{0}' is not in this inventory")]
    NotCarried(String),

    #[error("'{0}' cannot be equipped")]
    NotEquippable(String),

    #[error("there is/are no more {name} to use, sell, or buy ({available} of {requested})")]
    Insufficient {
        name: String,
        requested: usize,
        available: usize,
    },

    #[error("{buyer} ran out of money ({available} of {needed})")]
    InsufficientFunds {
        buyer: String,
        needed: u32,
        available: u32,
    },
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("corrupt snapshot: {keys} keys but {values} values")]
    CorruptSnapshot { keys: usize, values: usize },

    #[error("snapshot io failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot restore snapshot: {0}")]
    Spawn(#[from] SpawnError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config io failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
