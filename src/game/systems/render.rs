//! Tile renderers and the full-map render pass.
//!
//! The pass walks rows then columns, asks the renderer for one token per
//! cell, joins a row's tokens with spaces and prints one line per row.

use crate::game::grid::grid::TileGrid;
use crate::game::systems::surface::Surface;
use crate::game::types::{Coordinate, Tile};

pub trait TileRenderer {
    fn render_tile(&self, tile: Tile, is_player_here: bool) -> String;
}

impl<F> TileRenderer for F
where
    F: Fn(Tile, bool) -> String,
{
    fn render_tile(&self, tile: Tile, is_player_here: bool) -> String {
        self(tile, is_player_here)
    }
}

const RESET: &str = "\x1b[0m";
const BACK_MAGENTA: &str = "\x1b[45m";

/// Colored unicode glyphs for terminals.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlyphRenderer;

impl GlyphRenderer {
    fn style(tile: Tile) -> (&'static str, char) {
        match tile {
            Tile::Grass => ("\x1b[32;1m", '\u{26B6}'),
            Tile::Wall => ("\x1b[37;2m", '\u{26DD}'),
            Tile::Mountain => ("\x1b[33m", '\u{1A12}'),
            Tile::Cave => ("\x1b[33m", '\u{1A0A}'),
            Tile::Water => ("\x1b[36m", '\u{2307}'),
            Tile::Building => ("\x1b[37m", '\u{16A5}'),
            Tile::Lava => ("\x1b[31;1m", '\u{26C6}'),
            Tile::Dirt => ("\x1b[33;1m", '\u{26C6}'),
            Tile::Ice => ("\x1b[36;1m", '\u{26C6}'),
            Tile::Pit => ("\x1b[30;2m", '\u{25CF}'),
        }
    }
}

impl TileRenderer for GlyphRenderer {
    fn render_tile(&self, tile: Tile, is_player_here: bool) -> String {
        let (color, glyph) = Self::style(tile);
        let background = if is_player_here { BACK_MAGENTA } else { "" };
        format!("{background}{color}{glyph}{RESET}")
    }
}

/// One ASCII character per tile, `@` where the player stands.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainRenderer;

impl PlainRenderer {
    pub fn glyph(tile: Tile) -> char {
        match tile {
            Tile::Grass => '.',
            Tile::Wall => '#',
            Tile::Mountain => '^',
            Tile::Cave => 'C',
            Tile::Water => '~',
            Tile::Building => 'B',
            Tile::Lava => '%',
            Tile::Dirt => ',',
            Tile::Ice => '_',
            Tile::Pit => 'O',
        }
    }
}

impl TileRenderer for PlainRenderer {
    fn render_tile(&self, tile: Tile, is_player_here: bool) -> String {
        if is_player_here {
            "@".to_string()
        } else {
            Self::glyph(tile).to_string()
        }
    }
}

/// Print every row of `layout`, marking `player` if it stands on this grid.
pub fn render_layout(
    layout: &TileGrid,
    player: Option<Coordinate>,
    renderer: &dyn TileRenderer,
    out: &mut dyn Surface,
) {
    for row in 0..layout.rows() {
        let Some(tiles) = layout.row(row) else {
            continue;
        };
        let tokens: Vec<String> = tiles
            .iter()
            .enumerate()
            .map(|(col, tile)| renderer.render_tile(*tile, player == Some(Coordinate::new(row, col))))
            .collect();
        out.print_line(&tokens.join(" "));
    }
}
