//! Non-player characters with named dialogue.

use std::collections::BTreeMap;

use crate::game::entities::presence::{Positioned, Presence};
use crate::game::systems::surface::Surface;
use crate::game::types::Location;

#[derive(Debug)]
pub struct Npc {
    presence: Presence,
    dialogue: BTreeMap<String, Vec<String>>,
}

impl Npc {
    pub fn new(name: impl Into<String>, location: Location) -> Self {
        Self::from_presence(Presence::new(name, location))
    }

    pub(crate) fn from_presence(presence: Presence) -> Self {
        Self {
            presence,
            dialogue: BTreeMap::new(),
        }
    }

    /// Store (or replace) a named block of lines.
    pub fn add_dialogue(&mut self, name: impl Into<String>, lines: Vec<String>) {
        self.dialogue.insert(name.into(), lines);
    }

    pub fn dialogue(&self, name: &str) -> Option<&[String]> {
        self.dialogue.get(name).map(Vec::as_slice)
    }

    pub fn dialogue_entries(&self) -> &BTreeMap<String, Vec<String>> {
        &self.dialogue
    }

    /// Print a dialogue block line by line. False when no such block exists.
    pub fn speak(&self, name: &str, out: &mut dyn Surface) -> bool {
        let Some(lines) = self.dialogue(name) else {
            return false;
        };
        for line in lines {
            out.print_line(line);
        }
        true
    }
}

impl Positioned for Npc {
    fn presence(&self) -> &Presence {
        &self.presence
    }
}
