//! Minimum-attack-power search for one faction
//!
//! Re-runs the whole simulation from a fresh roster per candidate power,
//! scanning upward until a run finishes with zero casualties on the
//! calibrated side. Trials share no state, so a batch of candidates can
//! also be evaluated in parallel.

use rayon::prelude::*;

use crate::battle::execution::{CombatState, EventKind, Outcome};
use crate::battle::map::{CombatMap, UnitSpawn};
use crate::battle::turn::RoundStatus;
use crate::core::config::SimConfig;
use crate::core::types::Faction;

/// Find the lowest attack power at which `calibrated` takes no losses
///
/// Scans `config.calibration_floor, floor+1, ...` and returns the first
/// candidate whose full run kills no calibrated-faction unit, with its
/// outcome. Assumes (and does not verify) that raising attack power
/// never re-introduces a casualty a lower power avoided; that holds for
/// the intended inputs but not for every adversarial map. There is no
/// intrinsic upper bound; a ceiling is the caller's concern.
pub fn find_minimum_power(
    map: &CombatMap,
    spawns: &[UnitSpawn],
    config: &SimConfig,
    calibrated: Faction,
) -> (i32, Outcome) {
    let mut power = config.calibration_floor;
    loop {
        match run_trial(map, spawns, config, calibrated, power) {
            Some(outcome) => {
                tracing::info!(power, "calibration trial succeeded");
                return (power, outcome);
            }
            None => {
                tracing::debug!(power, "calibration trial aborted on casualty");
                power += 1;
            }
        }
    }
}

/// Parallel variant: evaluate `batch` candidates at a time with rayon
///
/// Returns the same answer as `find_minimum_power` wherever the
/// monotonicity assumption holds, since the minimum successful candidate
/// within each window is selected.
pub fn find_minimum_power_parallel(
    map: &CombatMap,
    spawns: &[UnitSpawn],
    config: &SimConfig,
    calibrated: Faction,
    batch: usize,
) -> (i32, Outcome) {
    assert!(batch > 0, "batch must be at least one candidate");
    let mut base = config.calibration_floor;
    loop {
        let results: Vec<Option<Outcome>> = (0..batch)
            .into_par_iter()
            .map(|offset| run_trial(map, spawns, config, calibrated, base + offset as i32))
            .collect();
        for (offset, result) in results.into_iter().enumerate() {
            if let Some(outcome) = result {
                return (base + offset as i32, outcome);
            }
        }
        base += batch as i32;
    }
}

/// Run one trial at a candidate power
///
/// Aborts the instant any calibrated-faction unit dies, returning None;
/// otherwise returns the finished outcome.
pub fn run_trial(
    map: &CombatMap,
    spawns: &[UnitSpawn],
    config: &SimConfig,
    calibrated: Faction,
    power: i32,
) -> Option<Outcome> {
    let mut state = CombatState::with_calibrated(map.clone(), spawns, config, (calibrated, power));
    loop {
        let seen = state.events.len();
        let status = state.run_round();
        let casualty = state.events[seen..].iter().any(|e| {
            matches!(e.kind, EventKind::UnitDied { faction, .. } if faction == calibrated)
        });
        if casualty {
            return None;
        }
        if status == RoundStatus::CombatEnded {
            return Some(state.outcome());
        }
    }
}
