//! Combat driver: runs rounds to completion and reports the outcome
//!
//! `CombatState` owns the map, the roster, the round counter and the
//! event log for one simulation run. External observers (a renderer,
//! the verbose CLI) see the state at round boundaries only.

use serde::{Deserialize, Serialize};

use crate::battle::map::{CombatMap, UnitSpawn};
use crate::battle::turn::{run_round, RoundStatus};
use crate::battle::units::Roster;
use crate::core::config::SimConfig;
use crate::core::types::{Faction, Position, Round, UnitId};

/// One entry in the combat log
///
/// Unit ids are stable for the whole run: the between-rounds sweep
/// drops dead units without renumbering survivors, so entries from
/// different rounds that name the same id name the same unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatEvent {
    pub round: Round,
    pub kind: EventKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    UnitMoved {
        unit: UnitId,
        from: Position,
        to: Position,
    },
    UnitAttacked {
        attacker: UnitId,
        target: UnitId,
        damage: i32,
    },
    UnitDied {
        unit: UnitId,
        faction: Faction,
    },
    CombatEnded,
}

/// Final result of one simulation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// Rounds in which every living unit got to act
    pub completed_rounds: Round,
    /// Hit points summed over survivors
    pub remaining_hit_points: i32,
}

impl Outcome {
    pub fn product(&self) -> i64 {
        self.completed_rounds as i64 * self.remaining_hit_points as i64
    }
}

/// Complete state of one combat run
#[derive(Debug, Clone)]
pub struct CombatState {
    pub map: CombatMap,
    pub roster: Roster,
    pub completed_rounds: Round,
    pub events: Vec<CombatEvent>,
    finished: bool,
}

impl CombatState {
    pub fn new(map: CombatMap, spawns: &[UnitSpawn], config: &SimConfig) -> Self {
        Self::build(map, spawns, config, None)
    }

    /// Like `new`, but one faction fights at an overridden attack power
    pub fn with_calibrated(
        map: CombatMap,
        spawns: &[UnitSpawn],
        config: &SimConfig,
        calibrated: (Faction, i32),
    ) -> Self {
        Self::build(map, spawns, config, Some(calibrated))
    }

    fn build(
        map: CombatMap,
        spawns: &[UnitSpawn],
        config: &SimConfig,
        calibrated: Option<(Faction, i32)>,
    ) -> Self {
        Self {
            map,
            roster: Roster::from_spawns(spawns, config, calibrated),
            completed_rounds: 0,
            events: Vec::new(),
            finished: false,
        }
    }

    /// Has a unit already found the field empty of enemies?
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Execute one round; counts it only if every living unit acted
    ///
    /// Dead units are swept from storage afterwards, when no turn
    /// iteration is in flight.
    pub fn run_round(&mut self) -> RoundStatus {
        if self.finished {
            return RoundStatus::CombatEnded;
        }

        let status = run_round(
            &self.map,
            &mut self.roster,
            self.completed_rounds + 1,
            &mut self.events,
        );
        match status {
            RoundStatus::Completed => {
                self.completed_rounds += 1;
                tracing::debug!(round = self.completed_rounds, "round completed");
            }
            RoundStatus::CombatEnded => {
                self.finished = true;
                tracing::info!(
                    completed_rounds = self.completed_rounds,
                    remaining_hit_points = self.roster.remaining_hit_points(),
                    "combat ended"
                );
            }
        }
        self.roster.sweep_dead();
        status
    }

    /// Run rounds until combat ends
    pub fn run_to_end(&mut self) -> Outcome {
        while self.run_round() == RoundStatus::Completed {}
        self.outcome()
    }

    /// Run to the end, handing the state to `observe` at every round
    /// boundary, including after the partial final round
    pub fn run_with_observer(&mut self, mut observe: impl FnMut(&CombatState)) -> Outcome {
        loop {
            let status = self.run_round();
            observe(self);
            if status == RoundStatus::CombatEnded {
                break;
            }
        }
        self.outcome()
    }

    pub fn outcome(&self) -> Outcome {
        Outcome {
            completed_rounds: self.completed_rounds,
            remaining_hit_points: self.roster.remaining_hit_points(),
        }
    }
}
