use serde::{Deserialize, Serialize};

use crate::game::error::MapError;
use crate::game::types::{Coordinate, Tile};

/// Fixed-shape, row-major terrain grid. Shape never changes after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Tile>>", into = "Vec<Vec<Tile>>")]
pub struct TileGrid {
    rows: usize,
    cols: usize,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Build from rows of tiles. The layout must be non-empty and rectangular.
    pub fn new(layout: Vec<Vec<Tile>>) -> Result<Self, MapError> {
        let cols = layout.first().map(Vec::len).unwrap_or(0);
        if cols == 0 {
            return Err(MapError::EmptyLayout);
        }
        if let Some((row, found)) = layout
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != cols)
        {
            return Err(MapError::RaggedLayout { row, expected: cols, found });
        }

        let rows = layout.len();
        Ok(Self {
            rows,
            cols,
            tiles: layout.into_iter().flatten().collect(),
        })
    }

    pub fn filled(rows: usize, cols: usize, tile: Tile) -> Result<Self, MapError> {
        Self::new(vec![vec![tile; cols]; rows])
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn contains(&self, coordinate: Coordinate) -> bool {
        coordinate.row < self.rows && coordinate.col < self.cols
    }

    /// Raw probe. Never clamps: anything past the grid is `OutOfBounds`.
    pub fn get(&self, coordinate: Coordinate) -> Result<Tile, MapError> {
        if !self.contains(coordinate) {
            return Err(MapError::OutOfBounds {
                row: coordinate.row,
                col: coordinate.col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(self.tiles[coordinate.row * self.cols + coordinate.col])
    }

    pub fn tile_equals(&self, coordinate: Coordinate, tile: Tile) -> Result<bool, MapError> {
        Ok(self.get(coordinate)? == tile)
    }

    pub fn row(&self, row: usize) -> Option<&[Tile]> {
        (row < self.rows).then(|| &self.tiles[row * self.cols..(row + 1) * self.cols])
    }
}

impl TryFrom<Vec<Vec<Tile>>> for TileGrid {
    type Error = MapError;

    fn try_from(layout: Vec<Vec<Tile>>) -> Result<Self, Self::Error> {
        Self::new(layout)
    }
}

impl From<TileGrid> for Vec<Vec<Tile>> {
    fn from(grid: TileGrid) -> Self {
        grid.tiles.chunks(grid.cols).map(<[Tile]>::to_vec).collect()
    }
}
