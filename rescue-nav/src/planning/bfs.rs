//! Breadth-first shortest path on the arena grid.

use super::ObstacleSet;
use crate::position::Cell;
use std::collections::{HashMap, VecDeque};

/// Cell-by-cell shortest path from `start` to `goal`, both included.
///
/// Cells outside the `size` x `size` grid or in `obstacles` are never
/// entered. Neighbours are expanded in the fixed order of
/// [`Cell::neighbors`], so ties between equal-length paths always resolve the
/// same way. Returns `None` when `goal` is unreachable.
pub fn shortest_path(
    size: i32,
    start: Cell,
    goal: Cell,
    obstacles: &ObstacleSet,
) -> Option<Vec<Cell>> {
    if start == goal {
        return Some(vec![start]);
    }

    let mut came_from: HashMap<Cell, Cell> = HashMap::new();
    let mut queue = VecDeque::from([start]);
    // Start counts as visited without a predecessor
    came_from.insert(start, start);

    while let Some(current) = queue.pop_front() {
        for neighbor in current.neighbors() {
            if !neighbor.in_bounds(size)
                || obstacles.contains(neighbor)
                || came_from.contains_key(&neighbor)
            {
                continue;
            }

            came_from.insert(neighbor, current);
            if neighbor == goal {
                return Some(reconstruct(&came_from, start, goal));
            }
            queue.push_back(neighbor);
        }
    }

    None
}

fn reconstruct(came_from: &HashMap<Cell, Cell>, start: Cell, goal: Cell) -> Vec<Cell> {
    let mut path = vec![goal];
    let mut current = goal;
    while current != start {
        current = came_from[&current];
        path.push(current);
    }
    path.reverse();
    path
}
