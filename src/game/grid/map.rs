//! Tile maps and the passability contract.

use std::fmt;

use crate::game::error::MapError;
use crate::game::grid::grid::TileGrid;
use crate::game::systems::surface::Surface;
use crate::game::types::{Coordinate, MapId, Tile};

/// One attempted tile entry, as seen by a passability rule.
#[derive(Debug, Clone, Copy)]
pub struct Entry<'a> {
    pub layout: &'a TileGrid,
    pub coordinate: Coordinate,
    pub is_player: bool,
}

impl Entry<'_> {
    /// Terrain check at the entered cell. Out-of-grid cells never match.
    pub fn tile_is(&self, tile: Tile) -> bool {
        self.layout.tile_equals(self.coordinate, tile).unwrap_or(false)
    }
}

/// Per-map decision on whether a cell may be entered.
///
/// Implementations may narrate to `out` and may mutate their own state, and
/// must return true iff the entity may enter `entry.coordinate`.
pub trait Passability {
    fn evaluate_entry(&mut self, entry: Entry<'_>, out: &mut dyn Surface) -> bool;
}

impl<F> Passability for F
where
    F: FnMut(Entry<'_>, &mut dyn Surface) -> bool,
{
    fn evaluate_entry(&mut self, entry: Entry<'_>, out: &mut dyn Surface) -> bool {
        self(entry, out)
    }
}

pub struct TileMap {
    id: MapId,
    layout: TileGrid,
    rules: Box<dyn Passability>,
}

impl fmt::Debug for TileMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TileMap")
            .field("id", &self.id)
            .field("rows", &self.layout.rows())
            .field("cols", &self.layout.cols())
            .finish_non_exhaustive()
    }
}

impl TileMap {
    /// The layout is fixed here and can never be replaced.
    pub fn new(id: impl Into<MapId>, layout: TileGrid, rules: Box<dyn Passability>) -> Self {
        Self {
            id: id.into(),
            layout,
            rules,
        }
    }

    pub fn with_rules<P: Passability + 'static>(id: impl Into<MapId>, layout: TileGrid, rules: P) -> Self {
        Self::new(id, layout, Box::new(rules))
    }

    pub fn id(&self) -> &MapId {
        &self.id
    }

    pub fn layout(&self) -> &TileGrid {
        &self.layout
    }

    pub fn tile_equals(&self, coordinate: Coordinate, tile: Tile) -> Result<bool, MapError> {
        self.layout.tile_equals(coordinate, tile)
    }

    pub fn evaluate_entry(&mut self, coordinate: Coordinate, is_player: bool, out: &mut dyn Surface) -> bool {
        let entry = Entry {
            layout: &self.layout,
            coordinate,
            is_player,
        };
        self.rules.evaluate_entry(entry, out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::systems::surface::BufferSurface;

    #[test]
    fn test_closure_rules_see_terrain() {
        let layout = TileGrid::new(vec![vec![Tile::Grass, Tile::Water]]).unwrap();
        let mut map = TileMap::with_rules("shore", layout, |entry: Entry<'_>, _: &mut dyn Surface| {
            !entry.tile_is(Tile::Water)
        });
        let mut out = BufferSurface::new();

        assert!(map.evaluate_entry(Coordinate::new(0, 0), true, &mut out));
        assert!(!map.evaluate_entry(Coordinate::new(0, 1), true, &mut out));
        assert_eq!(map.tile_equals(Coordinate::new(0, 1), Tile::Water), Ok(true));
    }
}
