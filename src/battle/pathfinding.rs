//! Weighted pathfinding and reachability over the board
//!
//! Entering a zone costs 1 for flyers; ground units pay 1 (Normal),
//! 2 (Forest) or 1.5 (HighGround) and cannot enter Water. Zones held by any
//! other unit are impassable.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use ordered_float::OrderedFloat;

use crate::battle::board::{Board, Zone};
use crate::battle::hex::CubeCoord;
use crate::core::types::UnitId;

/// Node in the open set
#[derive(Debug, Clone)]
struct PathNode {
    coord: CubeCoord,
    g_cost: f64,
    priority: OrderedFloat<f64>,
    /// Push order; earlier pushes win ties
    seq: u64,
}

impl PartialEq for PathNode {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}

impl Eq for PathNode {}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-heap open set that stamps each push with its insertion order
#[derive(Default)]
struct OpenSet {
    heap: BinaryHeap<PathNode>,
    next_seq: u64,
}

impl OpenSet {
    fn push(&mut self, coord: CubeCoord, g_cost: f64, priority: f64) {
        self.heap.push(PathNode {
            coord,
            g_cost,
            priority: OrderedFloat(priority),
            seq: self.next_seq,
        });
        self.next_seq += 1;
    }

    fn pop(&mut self) -> Option<PathNode> {
        self.heap.pop()
    }
}

/// Path and reachability queries against a board snapshot
pub struct PathFinder<'a> {
    board: &'a Board,
}

impl<'a> PathFinder<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self { board }
    }

    /// A* from `start` to `end` for the given unit.
    ///
    /// Returns the coordinates from start to end inclusive, or None if the
    /// unit is unknown or no passable route exists.
    pub fn find_path(&self, start: CubeCoord, end: CubeCoord, unit_id: &UnitId) -> Option<Vec<CubeCoord>> {
        let can_fly = self.board.get_unit(unit_id)?.can_fly();

        if start == end {
            return Some(vec![start]);
        }

        let mut open_set = OpenSet::default();
        let mut came_from: HashMap<CubeCoord, CubeCoord> = HashMap::new();
        let mut g_scores: HashMap<CubeCoord, f64> = HashMap::new();

        g_scores.insert(start, 0.0);
        open_set.push(start, 0.0, start.distance(&end) as f64);

        while let Some(current) = open_set.pop() {
            if current.coord == end {
                return Some(reconstruct_path(&came_from, start, end));
            }

            // Stale entry superseded by a cheaper push
            if g_scores
                .get(&current.coord)
                .is_some_and(|&best| current.g_cost > best)
            {
                continue;
            }

            for neighbor in self.board.get_neighbors(current.coord) {
                if !is_passable(neighbor, unit_id, can_fly) {
                    continue;
                }

                let tentative_g = current.g_cost + neighbor.zone_type.movement_cost(can_fly);
                let neighbor_g = *g_scores.get(&neighbor.position).unwrap_or(&f64::INFINITY);

                if tentative_g < neighbor_g {
                    came_from.insert(neighbor.position, current.coord);
                    g_scores.insert(neighbor.position, tentative_g);
                    let priority = tentative_g + neighbor.position.distance(&end) as f64;
                    open_set.push(neighbor.position, tentative_g, priority);
                }
            }
        }

        None // No path found
    }

    /// Every zone the unit can enter for a total cost of at most `max_distance`,
    /// including the zone it stands on. Unknown units reach nothing.
    pub fn find_reachable_tiles(&self, unit_id: &UnitId, max_distance: f64) -> HashSet<CubeCoord> {
        self.reachable_costs(unit_id, max_distance)
            .into_keys()
            .collect()
    }

    /// Cheapest cost to every reachable zone within `max_distance`
    pub fn reachable_costs(&self, unit_id: &UnitId, max_distance: f64) -> HashMap<CubeCoord, f64> {
        let mut reachable = HashMap::new();
        let Some(unit) = self.board.get_unit(unit_id) else {
            return reachable;
        };
        let can_fly = unit.can_fly();
        let start = unit.position();

        let mut frontier = OpenSet::default();
        let mut cost_so_far: HashMap<CubeCoord, f64> = HashMap::new();
        cost_so_far.insert(start, 0.0);
        frontier.push(start, 0.0, 0.0);

        while let Some(current) = frontier.pop() {
            if reachable.contains_key(&current.coord) {
                continue;
            }
            // Cost-ordered: everything left in the frontier is at least this expensive
            if current.g_cost > max_distance {
                break;
            }
            reachable.insert(current.coord, current.g_cost);

            for neighbor in self.board.get_neighbors(current.coord) {
                if reachable.contains_key(&neighbor.position) {
                    continue;
                }
                if !is_passable(neighbor, unit_id, can_fly) {
                    continue;
                }

                let new_cost = current.g_cost + neighbor.zone_type.movement_cost(can_fly);
                let known = *cost_so_far.get(&neighbor.position).unwrap_or(&f64::INFINITY);
                if new_cost < known {
                    cost_so_far.insert(neighbor.position, new_cost);
                    frontier.push(neighbor.position, new_cost, new_cost);
                }
            }
        }

        reachable
    }

    /// Cost for the unit to walk `path` (the first entry is where it starts
    /// and is free). Returns None for unknown units or off-board steps.
    pub fn path_cost(&self, path: &[CubeCoord], unit_id: &UnitId) -> Option<f64> {
        let can_fly = self.board.get_unit(unit_id)?.can_fly();
        path.iter()
            .skip(1)
            .map(|coord| {
                self.board
                    .get_zone(*coord)
                    .map(|zone| zone.zone_type.movement_cost(can_fly))
            })
            .sum()
    }
}

/// Free of other units, and terrain the unit can cross
fn is_passable(zone: &Zone, unit_id: &UnitId, can_fly: bool) -> bool {
    if zone.occupant().is_some_and(|occupant| occupant != unit_id) {
        return false;
    }
    zone.is_passable_for(can_fly)
}

/// Walk `came_from` back from `end` to `start`
fn reconstruct_path(
    came_from: &HashMap<CubeCoord, CubeCoord>,
    start: CubeCoord,
    end: CubeCoord,
) -> Vec<CubeCoord> {
    let mut path = vec![end];
    let mut current = end;
    while current != start {
        match came_from.get(&current) {
            Some(&prev) => {
                path.push(prev);
                current = prev;
            }
            None => break,
        }
    }
    path.reverse();
    path
}
