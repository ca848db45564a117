//! Loadable session configuration.
//!
//! Groups every tunable the core consumes. Missing JSON fields fall back to
//! the constants in the sibling modules.

use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::config::navigation::NavigationConfig;
use crate::config::stats::CapacityConfig;
use crate::game::error::ConfigError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub capacity: CapacityConfig,
    pub navigation: NavigationConfig,
}

impl SessionConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        let config = Self::from_json_str(&raw)?;
        info!("[Config] Loaded session config from {}", path.display());
        Ok(config)
    }
}
