//! Simulation configuration with documented constants
//!
//! The combat rules fix most numbers; they are collected here so nothing
//! in the engine carries a bare literal.

use serde::{Deserialize, Serialize};

/// Configuration for one simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Hit points every unit starts with
    ///
    /// Both factions spawn at full strength; a unit whose hit points
    /// drop to zero or below is dead.
    pub starting_hit_points: i32,

    /// Attack power for units not being calibrated
    ///
    /// Applied to both factions in a plain combat run, and held fixed
    /// for the uncalibrated faction during a calibration search.
    pub default_attack_power: i32,

    /// First candidate attack power tried by the calibration search
    ///
    /// The search scans upward from here one point at a time. Anything
    /// at or below `default_attack_power` cannot beat a symmetric
    /// matchup faster, so the floor sits one above it.
    pub calibration_floor: i32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            starting_hit_points: 200,
            default_attack_power: 3,
            calibration_floor: 4,
        }
    }
}
