//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Unique identifier for units (index into the roster's insertion order)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub usize);

/// Round counter (simulation time unit)
pub type Round = u32;

/// Which side a unit fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Elf,
    Goblin,
}

impl Faction {
    /// The opposing faction
    pub fn enemy(&self) -> Faction {
        match self {
            Faction::Elf => Faction::Goblin,
            Faction::Goblin => Faction::Elf,
        }
    }

    /// Map glyph for this faction
    pub fn glyph(&self) -> char {
        match self {
            Faction::Elf => 'E',
            Faction::Goblin => 'G',
        }
    }
}

/// Grid cell coordinate
///
/// `Ord` is reading order: ascending row, then ascending column. Every
/// positional tie-break in the simulation is expressed through this
/// ordering, so the field order here is load-bearing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Manhattan distance between two cells
    pub fn manhattan(&self, other: &Self) -> u32 {
        ((self.row - other.row).abs() + (self.col - other.col).abs()) as u32
    }

    /// True if the two cells share an edge
    pub fn is_adjacent(&self, other: &Self) -> bool {
        self.manhattan(other) == 1
    }
}
