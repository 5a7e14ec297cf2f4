//! Battle simulation: map, roster, pathfinding, turn engine, driver
//!
//! Fully deterministic: no randomness, and every positional or target
//! tie-break resolves through reading order (ascending row, then column).

pub mod calibration;
pub mod execution;
pub mod map;
pub mod pathfinding;
pub mod turn;
pub mod units;

// Re-exports for convenient access
pub use calibration::{find_minimum_power, find_minimum_power_parallel, run_trial};
pub use execution::{CombatEvent, CombatState, EventKind, Outcome};
pub use map::{CombatMap, MapError, Tile, UnitSpawn};
pub use pathfinding::distance_field;
pub use turn::{run_round, RoundStatus};
pub use units::{Roster, Unit};
