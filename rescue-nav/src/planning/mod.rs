//! Grid path planning.
//!
//! This module provides:
//! - Breadth-first shortest path over the 4-connected arena grid
//! - Waypoint reduction that merges straight runs into single legs
//! - The append-only obstacle set shared by planning and navigation

mod bfs;
mod obstacles;
mod waypoints;

pub use bfs::shortest_path;
pub use obstacles::ObstacleSet;
pub use waypoints::reduce_waypoints;

use crate::config::ArenaConfig;
use crate::position::Cell;

/// Planner over a fixed arena
#[derive(Clone, Debug)]
pub struct GridPlanner {
    size: i32,
    candidates: Vec<Cell>,
}

impl GridPlanner {
    /// Create a planner for a `size` x `size` grid
    pub fn new(size: i32, candidates: Vec<Cell>) -> Self {
        Self { size, candidates }
    }

    pub fn from_config(arena: &ArenaConfig) -> Self {
        Self::new(arena.size, arena.candidate_obstacles.clone())
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    /// Plan from `start` to `goal`.
    ///
    /// Returns the waypoints to visit in order (excluding `start`, always
    /// ending with `goal`), `vec![start]` when already there, or `None` when
    /// the goal cannot be reached.
    pub fn plan(&self, start: Cell, goal: Cell, obstacles: &ObstacleSet) -> Option<Vec<Cell>> {
        let raw = shortest_path(self.size, start, goal, obstacles)?;
        if raw.len() == 1 {
            return Some(raw);
        }
        Some(reduce_waypoints(&raw, &self.candidates))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArenaConfig;

    #[test]
    fn test_plan_same_cell() {
        let planner = GridPlanner::from_config(&ArenaConfig::default());
        let obstacles = ObstacleSet::new();
        let c = Cell::new(3, 4);
        assert_eq!(planner.plan(c, c, &obstacles), Some(vec![c]));
    }

    #[test]
    fn test_plan_straight_run_is_one_leg() {
        let planner = GridPlanner::new(5, Vec::new());
        let obstacles = ObstacleSet::new();
        let path = planner.plan(Cell::new(0, 0), Cell::new(4, 0), &obstacles);
        assert_eq!(path, Some(vec![Cell::new(4, 0)]));
    }

    #[test]
    fn test_plan_unreachable() {
        let planner = GridPlanner::new(5, Vec::new());
        let obstacles = ObstacleSet::from_cells([Cell::new(3, 4), Cell::new(4, 3)]);
        assert_eq!(planner.plan(Cell::new(0, 0), Cell::new(4, 4), &obstacles), None);
    }
}
