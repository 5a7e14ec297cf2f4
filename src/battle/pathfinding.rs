//! BFS distance fields over the combat map
//!
//! Every edge has unit weight, so a plain breadth-first search gives
//! shortest distances on first visit. The engine runs this twice per
//! move decision: forward from the mover, then reverse from the chosen
//! destination to pick the first step.

use std::collections::VecDeque;

use ahash::{AHashMap, AHashSet};

use crate::battle::map::CombatMap;
use crate::core::types::Position;

/// Shortest step counts from `start` to every reachable open cell
///
/// Cells in `blocked` are impassable; `start` itself is never blocked,
/// it is the search origin. Absence from the result means unreachable.
/// Neighbors are expanded in the map's fixed reading order, which only
/// affects enqueue order, never the distances.
pub fn distance_field(
    map: &CombatMap,
    start: Position,
    blocked: &AHashSet<Position>,
) -> AHashMap<Position, u32> {
    let mut distances = AHashMap::new();
    distances.insert(start, 0);

    let mut queue = VecDeque::new();
    queue.push_back(start);

    while let Some(pos) = queue.pop_front() {
        let dist = distances[&pos];
        for next in map.neighbors(pos) {
            if !map.is_open(next) || blocked.contains(&next) {
                continue;
            }
            if !distances.contains_key(&next) {
                distances.insert(next, dist + 1);
                queue.push_back(next);
            }
        }
    }

    distances
}
