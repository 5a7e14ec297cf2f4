//! Combat map: a rectangular grid of walls and open floor
//!
//! The map is immutable after parsing. Neighbor enumeration is the single
//! source of reading-order adjacency for the whole engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::battle::units::Roster;
use crate::core::types::{Faction, Position};

/// Errors that can occur when parsing a map
#[derive(Debug, Error)]
pub enum MapError {
    /// Input contained no rows
    #[error("Map is empty")]
    Empty,
    /// A row's length differs from the first row's
    #[error("Row {row} has length {found}, expected {expected}")]
    UnevenRows {
        row: usize,
        found: usize,
        expected: usize,
    },
    /// A character other than `#`, `.`, `E`, `G`
    #[error("Unknown tile '{glyph}' at row {row}, col {col}")]
    UnknownTile { glyph: char, row: usize, col: usize },
}

/// A single map cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tile {
    Wall,
    Open,
}

/// A unit marker found while parsing, before any roster exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSpawn {
    pub position: Position,
    pub faction: Faction,
}

/// The full combat map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatMap {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl CombatMap {
    /// Parse a map from its text form
    ///
    /// `#` is wall, `.` open floor, `E`/`G` a unit standing on open
    /// floor. Returns the map plus the unit markers in reading order.
    pub fn parse(text: &str) -> Result<(CombatMap, Vec<UnitSpawn>), MapError> {
        let lines: Vec<&str> = text.lines().filter(|l| !l.is_empty()).collect();
        if lines.is_empty() {
            return Err(MapError::Empty);
        }

        let width = lines[0].chars().count();
        let height = lines.len();
        let mut tiles = Vec::with_capacity(width * height);
        let mut spawns = Vec::new();

        for (row, line) in lines.iter().enumerate() {
            let row_len = line.chars().count();
            if row_len != width {
                return Err(MapError::UnevenRows {
                    row,
                    found: row_len,
                    expected: width,
                });
            }
            for (col, glyph) in line.chars().enumerate() {
                let position = Position::new(row as i32, col as i32);
                let tile = match glyph {
                    '#' => Tile::Wall,
                    '.' => Tile::Open,
                    'E' => {
                        spawns.push(UnitSpawn {
                            position,
                            faction: Faction::Elf,
                        });
                        Tile::Open
                    }
                    'G' => {
                        spawns.push(UnitSpawn {
                            position,
                            faction: Faction::Goblin,
                        });
                        Tile::Open
                    }
                    _ => return Err(MapError::UnknownTile { glyph, row, col }),
                };
                tiles.push(tile);
            }
        }

        Ok((
            CombatMap {
                width,
                height,
                tiles,
            },
            spawns,
        ))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Check if coordinate is within map bounds
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.row >= 0
            && pos.col >= 0
            && (pos.row as usize) < self.height
            && (pos.col as usize) < self.width
    }

    /// Get the tile at a coordinate
    pub fn tile(&self, pos: Position) -> Option<Tile> {
        if self.in_bounds(pos) {
            Some(self.tiles[pos.row as usize * self.width + pos.col as usize])
        } else {
            None
        }
    }

    /// Is this cell open floor? False for walls and out-of-bounds.
    pub fn is_open(&self, pos: Position) -> bool {
        matches!(self.tile(pos), Some(Tile::Open))
    }

    /// Axis-adjacent in-bounds neighbors, always up, left, right, down
    ///
    /// That sequence is reading order among the four candidates; every
    /// tie-break downstream leans on it.
    pub fn neighbors(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        [
            Position::new(pos.row - 1, pos.col),
            Position::new(pos.row, pos.col - 1),
            Position::new(pos.row, pos.col + 1),
            Position::new(pos.row + 1, pos.col),
        ]
        .into_iter()
        .filter(|p| self.in_bounds(*p))
    }

    /// ASCII dump of the board with unit glyphs and a hit-point sidebar
    ///
    /// One line per map row, living units drawn over their cells, then
    /// the units of that row listed as `G(200)` in reading order.
    pub fn render(&self, roster: &Roster) -> String {
        let mut out = String::new();
        for row in 0..self.height as i32 {
            let mut annotations = Vec::new();
            for col in 0..self.width as i32 {
                let pos = Position::new(row, col);
                if let Some(unit) = roster.living_at(pos) {
                    out.push(unit.faction.glyph());
                    annotations.push(format!("{}({})", unit.faction.glyph(), unit.hit_points));
                } else {
                    out.push(match self.tile(pos) {
                        Some(Tile::Wall) => '#',
                        _ => '.',
                    });
                }
            }
            if !annotations.is_empty() {
                out.push_str("   ");
                out.push_str(&annotations.join(", "));
            }
            out.push('\n');
        }
        out
    }
}
