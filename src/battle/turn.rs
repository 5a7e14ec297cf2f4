//! Per-round turn protocol: each living unit moves, then attacks
//!
//! Turn order is frozen at round start. Combat ends the instant a unit
//! starts its turn with no living enemies, and that round does not count
//! as completed.

use crate::battle::execution::{CombatEvent, EventKind};
use crate::battle::map::CombatMap;
use crate::battle::pathfinding::distance_field;
use crate::battle::units::Roster;
use crate::core::types::{Position, Round, UnitId};

/// How a round finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStatus {
    /// Every living unit got to act
    Completed,
    /// A unit found no enemies; the round is not counted
    CombatEnded,
}

/// Execute one full round over the roster
pub fn run_round(
    map: &CombatMap,
    roster: &mut Roster,
    round: Round,
    events: &mut Vec<CombatEvent>,
) -> RoundStatus {
    let order = roster.turn_order();
    if order.is_empty() {
        events.push(CombatEvent {
            round,
            kind: EventKind::CombatEnded,
        });
        return RoundStatus::CombatEnded;
    }

    for id in order {
        // Units killed earlier this round forfeit their turn
        if !roster.unit(id).is_alive() {
            continue;
        }
        let faction = roster.unit(id).faction;
        if roster.living_of(faction.enemy()).next().is_none() {
            events.push(CombatEvent {
                round,
                kind: EventKind::CombatEnded,
            });
            return RoundStatus::CombatEnded;
        }

        move_phase(map, roster, id, round, events);
        attack_phase(roster, id, round, events);
    }

    RoundStatus::Completed
}

/// Move one step toward the nearest reachable in-range square
///
/// Skipped when already adjacent to an enemy. Destination selection and
/// first-step selection each tie-break by reading order; the first step
/// comes from a reverse search rooted at the chosen square so all four
/// candidate steps share one distance field.
fn move_phase(
    map: &CombatMap,
    roster: &mut Roster,
    id: UnitId,
    round: Round,
    events: &mut Vec<CombatEvent>,
) {
    let unit = roster.unit(id);
    let start = unit.position;
    let enemy = unit.faction.enemy();

    if roster
        .living_of(enemy)
        .any(|e| e.position.is_adjacent(&start))
    {
        return;
    }

    // Open, unoccupied squares adjacent to a living enemy
    let occupied = roster.occupied_cells(None);
    let mut in_range: Vec<Position> = Vec::new();
    for target in roster.living_of(enemy) {
        for square in map.neighbors(target.position) {
            if map.is_open(square) && !occupied.contains(&square) {
                in_range.push(square);
            }
        }
    }
    if in_range.is_empty() {
        return;
    }

    let blocked = roster.occupied_cells(Some(id));
    let forward = distance_field(map, start, &blocked);

    // Nearest reachable square, reading order on ties
    let chosen = in_range
        .iter()
        .filter_map(|square| forward.get(square).map(|dist| (*dist, *square)))
        .min();
    let Some((_, goal)) = chosen else {
        return;
    };

    let reverse = distance_field(map, goal, &blocked);
    let mut best: Option<(u32, Position)> = None;
    for step in map.neighbors(start) {
        if let Some(&dist) = reverse.get(&step) {
            // Only a strictly smaller distance replaces the current best,
            // so the first minimal neighbor in reading order is retained
            if best.map_or(true, |(best_dist, _)| dist < best_dist) {
                best = Some((dist, step));
            }
        }
    }

    if let Some((_, step)) = best {
        roster.unit_mut(id).position = step;
        events.push(CombatEvent {
            round,
            kind: EventKind::UnitMoved {
                unit: id,
                from: start,
                to: step,
            },
        });
    }
}

/// Strike the weakest adjacent enemy, reading order on ties
///
/// A target dropping to zero dies immediately: it stops blocking cells
/// and stops being targetable for the rest of the round, though its
/// storage slot survives until the between-rounds sweep.
fn attack_phase(roster: &mut Roster, id: UnitId, round: Round, events: &mut Vec<CombatEvent>) {
    let attacker = roster.unit(id);
    let position = attacker.position;
    let damage = attacker.attack_power;
    let enemy = attacker.faction.enemy();

    let target_id = roster
        .living_of(enemy)
        .filter(|e| e.position.is_adjacent(&position))
        .min_by_key(|e| (e.hit_points, e.position))
        .map(|e| e.id);
    let Some(target_id) = target_id else {
        return;
    };

    let target = roster.unit_mut(target_id);
    target.hit_points -= damage;
    let died = !target.is_alive();
    let target_faction = target.faction;

    events.push(CombatEvent {
        round,
        kind: EventKind::UnitAttacked {
            attacker: id,
            target: target_id,
            damage,
        },
    });
    if died {
        tracing::trace!(?target_faction, round, "unit killed");
        events.push(CombatEvent {
            round,
            kind: EventKind::UnitDied {
                unit: target_id,
                faction: target_faction,
            },
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimConfig;

    fn setup(text: &str) -> (CombatMap, Roster) {
        let (map, spawns) = CombatMap::parse(text).unwrap();
        let roster = Roster::from_spawns(&spawns, &SimConfig::default(), None);
        (map, roster)
    }

    #[test]
    fn test_move_targets_nearest_square_in_reading_order() {
        // The elf's nearest in-range square is right of it; first step is
        // one cell right.
        let (map, mut roster) = setup(
            "\
#######
#E..G.#
#...#.#
#.G.#G#
#######",
        );
        let mut events = Vec::new();
        move_phase(&map, &mut roster, UnitId(0), 1, &mut events);
        assert_eq!(roster.unit(UnitId(0)).position, Position::new(1, 2));
    }

    #[test]
    fn test_adjacent_unit_does_not_move() {
        let (map, mut roster) = setup("####\n#EG#\n####");
        let mut events = Vec::new();
        move_phase(&map, &mut roster, UnitId(0), 1, &mut events);
        assert_eq!(roster.unit(UnitId(0)).position, Position::new(1, 1));
        assert!(events.is_empty());
    }

    #[test]
    fn test_unreachable_enemy_is_a_no_op_turn() {
        let (map, mut roster) = setup("#####\n#E#G#\n#####");
        let mut events = Vec::new();
        let status = run_round(&map, &mut roster, 1, &mut events);
        assert_eq!(status, RoundStatus::Completed);
        assert_eq!(roster.unit(UnitId(0)).position, Position::new(1, 1));
        assert_eq!(roster.unit(UnitId(1)).position, Position::new(1, 3));
        assert!(events.is_empty());
    }

    #[test]
    fn test_attack_picks_lowest_hit_points() {
        let (_, mut roster) = setup("#####\n#GEG#\n#####");
        roster.unit_mut(UnitId(2)).hit_points = 50;
        let mut events = Vec::new();
        attack_phase(&mut roster, UnitId(1), 1, &mut events);
        assert_eq!(roster.unit(UnitId(2)).hit_points, 47);
        assert_eq!(roster.unit(UnitId(0)).hit_points, 200);
    }

    #[test]
    fn test_attack_ties_break_by_reading_order() {
        let (_, mut roster) = setup("#####\n#GEG#\n#####");
        let mut events = Vec::new();
        attack_phase(&mut roster, UnitId(1), 1, &mut events);
        // Equal hit points: the goblin earlier in reading order is hit
        assert_eq!(roster.unit(UnitId(0)).hit_points, 197);
        assert_eq!(roster.unit(UnitId(2)).hit_points, 200);
    }

    #[test]
    fn test_killed_unit_forfeits_its_turn() {
        let (map, mut roster) = setup("####\n#EG#\n####");
        roster.unit_mut(UnitId(1)).hit_points = 3;
        let mut events = Vec::new();
        let status = run_round(&map, &mut roster, 1, &mut events);
        // The elf kills the goblin before its turn; every living unit
        // still acted, so the round completes.
        assert_eq!(status, RoundStatus::Completed);
        assert!(!roster.unit(UnitId(1)).is_alive());
        assert_eq!(roster.unit(UnitId(0)).hit_points, 200);
    }

    #[test]
    fn test_round_ends_when_turn_finds_no_enemies() {
        let (map, mut roster) = setup("####\n#E.#\n####");
        let mut events = Vec::new();
        let status = run_round(&map, &mut roster, 1, &mut events);
        assert_eq!(status, RoundStatus::CombatEnded);
        assert!(matches!(
            events.last().map(|e| &e.kind),
            Some(EventKind::CombatEnded)
        ));
    }

    #[test]
    fn test_dead_unit_stops_blocking_within_round() {
        // Goblin dies mid-round; the second elf can then step into its
        // cell on a later round. Here we only check occupancy updates.
        let (_, mut roster) = setup("#####\n#GEG#\n#####");
        roster.unit_mut(UnitId(0)).hit_points = 2;
        let mut events = Vec::new();
        attack_phase(&mut roster, UnitId(1), 1, &mut events);
        assert!(!roster.unit(UnitId(0)).is_alive());
        assert!(!roster
            .occupied_cells(None)
            .contains(&Position::new(1, 1)));
    }

    #[test]
    fn test_move_then_attack_same_turn() {
        let (map, mut roster) = setup("#####\n#E.G#\n#####");
        let mut events = Vec::new();
        let elf_turn_order = roster.turn_order();
        assert_eq!(elf_turn_order[0], UnitId(0));
        run_round(&map, &mut roster, 1, &mut events);
        // Elf steps adjacent and immediately attacks
        assert_eq!(roster.unit(UnitId(0)).position, Position::new(1, 2));
        assert_eq!(roster.unit(UnitId(1)).hit_points, 197);
        assert!(events.iter().any(|e| matches!(
            e.kind,
            EventKind::UnitAttacked {
                attacker: UnitId(0),
                ..
            }
        )));
    }

    #[test]
    fn test_faction_members_block_each_other() {
        // The only corridor is plugged by a friendly unit; the rear elf
        // cannot reach any in-range square and stays put.
        let (map, mut roster) = setup("#####\n#EEG#\n#####");
        let mut events = Vec::new();
        move_phase(&map, &mut roster, UnitId(0), 1, &mut events);
        assert_eq!(roster.unit(UnitId(0)).position, Position::new(1, 1));
    }
}
