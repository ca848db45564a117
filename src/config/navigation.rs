//! Navigation configuration constants.
//!
//! This module defines the session switches consulted by the navigator and
//! the user-facing messages it may surface.
use serde::{Deserialize, Serialize};

/// Reload (re-render) the map after every successful move by default.
pub const AUTO_LOAD_MAP: bool = true;

/// Surface invalid-direction and overloaded messages by default.
pub const PRINT_ERRORS: bool = true;

pub const MSG_NO_EXIST: &str = "That place doesn't exist.";
pub const MSG_ENCUMBERED: &str = "You're carrying too much.";
pub const MSG_INVALID_DIRECTION: &str = "You cannot go that way.";

/// Session switches for the navigator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Full map reload after a successful move; a plain screen clear otherwise.
    pub auto_load_map: bool,
    /// Surface rejection messages on the display surface.
    pub print_errors: bool,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            auto_load_map: AUTO_LOAD_MAP,
            print_errors: PRINT_ERRORS,
        }
    }
}
