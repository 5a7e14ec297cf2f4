//! Combat units and the roster that owns them
//!
//! The roster is the sole owner of unit state. Dead units keep their
//! storage slot until the driver sweeps them between rounds, so turn
//! iteration never invalidates mid-round.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::battle::map::UnitSpawn;
use crate::core::config::SimConfig;
use crate::core::types::{Faction, Position, UnitId};

/// A single combat unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub faction: Faction,
    pub position: Position,
    pub hit_points: i32,
    pub attack_power: i32,
}

impl Unit {
    pub fn is_alive(&self) -> bool {
        self.hit_points > 0
    }
}

/// Insertion-ordered collection of all units, dead and alive
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    units: Vec<Unit>,
}

impl Roster {
    /// Build a roster from parsed spawns, one faction's attack power overridden
    ///
    /// `calibrated` pairs a faction with the attack power under trial;
    /// everyone else gets the configured default.
    pub fn from_spawns(
        spawns: &[UnitSpawn],
        config: &SimConfig,
        calibrated: Option<(Faction, i32)>,
    ) -> Self {
        let units = spawns
            .iter()
            .enumerate()
            .map(|(idx, spawn)| {
                let attack_power = match calibrated {
                    Some((faction, power)) if faction == spawn.faction => power,
                    _ => config.default_attack_power,
                };
                Unit {
                    id: UnitId(idx),
                    faction: spawn.faction,
                    position: spawn.position,
                    hit_points: config.starting_hit_points,
                    attack_power,
                }
            })
            .collect();
        Self { units }
    }

    /// Look up a unit by id; the id must come from this roster
    ///
    /// Ids are assigned once at spawn time and never reused, so an
    /// observer can correlate a unit's events across the whole run.
    /// Storage stays sorted by id (the sweep only removes), which keeps
    /// the lookup a binary search.
    pub fn unit(&self, id: UnitId) -> &Unit {
        let idx = self
            .units
            .binary_search_by_key(&id, |u| u.id)
            .expect("unit id not in roster");
        &self.units[idx]
    }

    pub fn unit_mut(&mut self, id: UnitId) -> &mut Unit {
        let idx = self
            .units
            .binary_search_by_key(&id, |u| u.id)
            .expect("unit id not in roster");
        &mut self.units[idx]
    }

    /// All living units
    pub fn living(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(|u| u.is_alive())
    }

    /// Living units of one faction
    pub fn living_of(&self, faction: Faction) -> impl Iterator<Item = &Unit> {
        self.living().filter(move |u| u.faction == faction)
    }

    /// The living unit standing on a cell, if any
    pub fn living_at(&self, pos: Position) -> Option<&Unit> {
        self.living().find(|u| u.position == pos)
    }

    /// Cells occupied by living units, optionally excluding one unit
    ///
    /// The exclusion is what turns this into the blocked set for both
    /// pathfinder directions: the mover never blocks itself.
    pub fn occupied_cells(&self, except: Option<UnitId>) -> AHashSet<Position> {
        self.living()
            .filter(|u| Some(u.id) != except)
            .map(|u| u.position)
            .collect()
    }

    /// Living unit ids sorted by reading order of current position
    ///
    /// Snapshotted once at round start; not re-sorted as units move.
    pub fn turn_order(&self) -> Vec<UnitId> {
        let mut order: Vec<(Position, UnitId)> =
            self.living().map(|u| (u.position, u.id)).collect();
        order.sort();
        order.into_iter().map(|(_, id)| id).collect()
    }

    /// Total hit points across living units
    pub fn remaining_hit_points(&self) -> i32 {
        self.living().map(|u| u.hit_points).sum()
    }

    /// Physically drop dead units; only safe between rounds
    ///
    /// Survivors keep their ids, so event-log entries from earlier
    /// rounds still name the same units.
    pub fn sweep_dead(&mut self) {
        self.units.retain(|u| u.is_alive());
    }
}
