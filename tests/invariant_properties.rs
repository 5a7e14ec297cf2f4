//! Property tests for the simulation invariants
//!
//! Random bordered maps with a mix of walls and units; each property
//! caps the round count so maps whose factions are walled apart still
//! finish.

use ahash::AHashSet;
use cavern_skirmish::battle::{distance_field, CombatMap, CombatState, EventKind, RoundStatus};
use cavern_skirmish::core::config::SimConfig;
use cavern_skirmish::core::types::Position;
use proptest::prelude::*;

const ROUND_CAP: usize = 200;

fn arb_map() -> impl Strategy<Value = String> {
    (5usize..10, 5usize..10).prop_flat_map(|(height, width)| {
        proptest::collection::vec(
            proptest::collection::vec(0u8..100, width - 2),
            height - 2,
        )
        .prop_map(move |rows| {
            let mut lines = vec!["#".repeat(width)];
            for row in rows {
                let mut line = String::from("#");
                for cell in row {
                    line.push(match cell {
                        0..=24 => '#',
                        25..=31 => 'E',
                        32..=38 => 'G',
                        _ => '.',
                    });
                }
                line.push('#');
                lines.push(line);
            }
            lines.push("#".repeat(width));
            lines.join("\n")
        })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// No two living units ever share a cell, and every living unit
    /// stands on open floor, at every round boundary.
    #[test]
    fn prop_no_overlap_and_open_footing(text in arb_map()) {
        let (map, spawns) = CombatMap::parse(&text).unwrap();
        let mut state = CombatState::new(map, &spawns, &SimConfig::default());
        for _ in 0..ROUND_CAP {
            let status = state.run_round();
            let positions: Vec<Position> =
                state.roster.living().map(|u| u.position).collect();
            let unique: AHashSet<Position> = positions.iter().copied().collect();
            prop_assert_eq!(positions.len(), unique.len());
            for pos in &positions {
                prop_assert!(state.map.is_open(*pos));
            }
            if status == RoundStatus::CombatEnded {
                break;
            }
        }
    }

    /// Every recorded move covers exactly one cell.
    #[test]
    fn prop_moves_are_single_steps(text in arb_map()) {
        let (map, spawns) = CombatMap::parse(&text).unwrap();
        let mut state = CombatState::new(map, &spawns, &SimConfig::default());
        for _ in 0..ROUND_CAP {
            if state.run_round() == RoundStatus::CombatEnded {
                break;
            }
        }
        for event in &state.events {
            if let EventKind::UnitMoved { from, to, .. } = event.kind {
                prop_assert_eq!(from.manhattan(&to), 1);
            }
        }
    }

    /// Re-running the same map reproduces the exact event sequence.
    #[test]
    fn prop_replay_is_identical(text in arb_map()) {
        let (map, spawns) = CombatMap::parse(&text).unwrap();
        let config = SimConfig::default();
        let mut first = CombatState::new(map.clone(), &spawns, &config);
        let mut second = CombatState::new(map, &spawns, &config);
        for _ in 0..ROUND_CAP {
            let a = first.run_round();
            let b = second.run_round();
            prop_assert_eq!(a == RoundStatus::CombatEnded, b == RoundStatus::CombatEnded);
            if a == RoundStatus::CombatEnded {
                break;
            }
        }
        prop_assert_eq!(&first.events, &second.events);
        prop_assert_eq!(first.outcome(), second.outcome());
    }

    /// The BFS result is a valid unit-weight distance field: the start
    /// is at zero, every other reached cell sits exactly one step above
    /// its closest reached neighbor, and reachability is closed over
    /// open unblocked neighbors.
    #[test]
    fn prop_distance_field_is_consistent(text in arb_map()) {
        let (map, spawns) = CombatMap::parse(&text).unwrap();
        prop_assume!(!spawns.is_empty());
        let start = spawns[0].position;
        let blocked: AHashSet<Position> =
            spawns[1..].iter().map(|s| s.position).collect();

        let field = distance_field(&map, start, &blocked);
        prop_assert_eq!(field[&start], 0);

        for (&cell, &dist) in &field {
            if dist > 0 {
                let best_neighbor = map
                    .neighbors(cell)
                    .filter_map(|n| field.get(&n).copied())
                    .min();
                prop_assert_eq!(best_neighbor, Some(dist - 1));
            }
            for neighbor in map.neighbors(cell) {
                if map.is_open(neighbor) && !blocked.contains(&neighbor) {
                    prop_assert!(field.contains_key(&neighbor));
                }
            }
        }
    }
}
