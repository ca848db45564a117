//! Movement system.
//!
//! The [`Navigator`] is the only place an entity's location changes. A move
//! runs these steps in order, and stops at the first rejection:
//!
//! 1. encumbrance gate (before any coordinate math)
//! 2. unit delta for the direction
//! 3. negative-coordinate check
//! 4. grid existence probe (`OutOfBounds` becomes `InvalidDirection`)
//! 5. the map's passability contract
//! 6. commit the new location
//! 7. post-move refresh (position query, then re-render or clear)
//!
//! Every rejection leaves the mover where it was.

use std::rc::Rc;

use log::{debug, info};
use rand::Rng;

use crate::config::navigation::{MSG_ENCUMBERED, MSG_INVALID_DIRECTION, MSG_NO_EXIST, NavigationConfig};
use crate::game::entities::presence::Positioned;
use crate::game::error::{MapError, MoveError};
use crate::game::events::{Event, EventBus, PositionSlot};
use crate::game::grid::atlas::Atlas;
use crate::game::systems::render::{GlyphRenderer, TileRenderer, render_layout};
use crate::game::systems::surface::{Surface, TerminalSurface};
use crate::game::types::{Coordinate, Direction, Location, MapId};

pub struct Navigator {
    atlas: Atlas,
    bus: Rc<EventBus>,
    config: NavigationConfig,
    player_location: PositionSlot,
    current_map: Option<MapId>,
    surface: Box<dyn Surface>,
    renderer: Box<dyn TileRenderer>,
}

impl std::fmt::Debug for Navigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("atlas", &self.atlas)
            .field("config", &self.config)
            .field("player_location", &self.player_location)
            .field("current_map", &self.current_map)
            .finish_non_exhaustive()
    }
}

impl Navigator {
    /// Draws to the terminal with colored glyphs until told otherwise.
    pub fn new(atlas: Atlas, bus: Rc<EventBus>, config: NavigationConfig) -> Self {
        Self {
            atlas,
            bus,
            config,
            player_location: PositionSlot::new(),
            current_map: None,
            surface: Box::new(TerminalSurface),
            renderer: Box::new(GlyphRenderer),
        }
    }

    pub fn with_surface<S: Surface + 'static>(mut self, surface: S) -> Self {
        self.surface = Box::new(surface);
        self
    }

    pub fn with_renderer<R: TileRenderer + 'static>(mut self, renderer: R) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    pub fn atlas(&self) -> &Atlas {
        &self.atlas
    }

    pub fn atlas_mut(&mut self) -> &mut Atlas {
        &mut self.atlas
    }

    pub fn config(&self) -> NavigationConfig {
        self.config
    }

    pub fn auto_load_map(&self) -> bool {
        self.config.auto_load_map
    }

    /// Turn full map reloads after a move on or off for part of the game.
    pub fn set_auto_load_map(&mut self, value: bool) {
        self.config.auto_load_map = value;
    }

    pub fn set_print_errors(&mut self, value: bool) {
        self.config.print_errors = value;
    }

    /// The map drawn last.
    pub fn current_map(&self) -> Option<&MapId> {
        self.current_map.as_ref()
    }

    /// Player location as of the last position query.
    pub fn player_location(&self) -> Option<Location> {
        self.player_location.get()
    }

    /// Move `mover` one tile in `direction`, returning its new location.
    pub fn move_entity(&mut self, mover: &dyn Positioned, direction: Direction) -> Result<Location, MoveError> {
        let current = mover.location();
        self.check_encumbrance(mover, current.coordinate)?;

        let Some((d_row, d_col)) = direction.delta() else {
            debug!("[Navigator] {:?} is not a movable direction for '{}'", direction, mover.name());
            return Err(MoveError::UnsupportedDirection {
                direction,
                current: current.coordinate,
            });
        };

        let Some(candidate) = current.coordinate.offset(d_row, d_col) else {
            return Err(self.reject_invalid(mover, current.coordinate, "negative coordinate"));
        };

        let map = self
            .atlas
            .get_mut(&current.map)
            .map_err(|_| MoveError::TargetNotFound(current.map.clone()))?;
        match map.layout().get(candidate) {
            Ok(_) => {}
            Err(MapError::OutOfBounds { .. }) => {
                return Err(self.reject_invalid(mover, current.coordinate, "outside the grid"));
            }
            Err(err) => {
                debug!("[Navigator] Unexpected probe failure: {}", err);
                return Err(self.reject_invalid(mover, current.coordinate, "probe failed"));
            }
        }

        if !map.evaluate_entry(candidate, mover.is_player(), self.surface.as_mut()) {
            debug!("[Navigator] '{}' blocked at {} on '{}'", mover.name(), candidate, current.map);
            return Err(MoveError::Blocked {
                current: current.coordinate,
            });
        }

        Ok(self.commit(mover, Location::new(current.map, candidate)))
    }

    /// Place `mover` directly at `coordinate` on `map_id`. Skips the delta
    /// and bound arithmetic but keeps the encumbrance gate and the target
    /// map's passability contract.
    pub fn teleport(&mut self, mover: &dyn Positioned, map_id: &MapId, coordinate: Coordinate) -> Result<Location, MoveError> {
        let current = mover.location();
        self.check_encumbrance(mover, current.coordinate)?;

        let Ok(map) = self.atlas.get_mut(map_id) else {
            if self.config.print_errors {
                self.surface.print_line(MSG_NO_EXIST);
            }
            debug!("[Navigator] Teleport target '{}' does not exist", map_id);
            return Err(MoveError::TargetNotFound(map_id.clone()));
        };
        if !map.layout().contains(coordinate) {
            return Err(self.reject_invalid(mover, current.coordinate, "teleport target outside the grid"));
        }

        if !map.evaluate_entry(coordinate, mover.is_player(), self.surface.as_mut()) {
            debug!("[Navigator] '{}' refused entry to {} on '{}'", mover.name(), coordinate, map_id);
            return Err(MoveError::Blocked {
                current: current.coordinate,
            });
        }

        Ok(self.commit(mover, Location::new(map_id.clone(), coordinate)))
    }

    /// Take one step in a random cardinal direction.
    pub fn wander<R: Rng + ?Sized>(&mut self, mover: &dyn Positioned, rng: &mut R) -> Result<Location, MoveError> {
        let direction = Direction::random_cardinal(rng);
        self.move_entity(mover, direction)
    }

    /// Ask the player for its location and draw `map_id` around it.
    pub fn render_map(&mut self, map_id: &MapId) -> Result<(), MapError> {
        self.query_player();
        self.draw(map_id)
    }

    /// Publish one position query and cache whatever the player answers.
    pub fn query_player(&self) -> Option<Location> {
        self.player_location.clear();
        self.bus.publish(&Event::PositionQuery {
            reply: &self.player_location,
        });
        self.player_location.get()
    }

    fn check_encumbrance(&mut self, mover: &dyn Positioned, current: Coordinate) -> Result<(), MoveError> {
        if !mover.is_overloaded() {
            return Ok(());
        }
        if self.config.print_errors {
            self.surface.print_line(MSG_ENCUMBERED);
        }
        debug!("[Navigator] '{}' is overloaded", mover.name());
        Err(MoveError::Overloaded { current })
    }

    fn reject_invalid(&mut self, mover: &dyn Positioned, current: Coordinate, reason: &str) -> MoveError {
        if self.config.print_errors {
            self.surface.print_line(MSG_INVALID_DIRECTION);
        }
        debug!("[Navigator] '{}' cannot leave {}: {}", mover.name(), current, reason);
        MoveError::InvalidDirection { current }
    }

    fn commit(&mut self, mover: &dyn Positioned, location: Location) -> Location {
        debug!("[Navigator] '{}' moved to {}", mover.name(), location);
        mover.presence().relocate(location.clone());
        self.refresh(mover);
        location
    }

    fn refresh(&mut self, mover: &dyn Positioned) {
        if !self.config.auto_load_map {
            self.surface.clear();
            return;
        }
        let Some(player) = self.query_player() else {
            return;
        };
        if mover.is_player() {
            if let Err(err) = self.draw(&player.map) {
                debug!("[Navigator] Could not redraw after move: {}", err);
            }
        }
    }

    fn draw(&mut self, map_id: &MapId) -> Result<(), MapError> {
        let map = self.atlas.get(map_id)?;
        let player = self
            .player_location
            .get()
            .filter(|location| &location.map == map_id)
            .map(|location| location.coordinate);

        self.surface.clear();
        render_layout(map.layout(), player, self.renderer.as_ref(), self.surface.as_mut());
        info!("[Navigator] Rendered '{}'", map_id);
        self.current_map = Some(map_id.clone());
        Ok(())
    }
}
