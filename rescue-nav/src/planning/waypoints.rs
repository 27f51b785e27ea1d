//! Waypoint reduction.
//!
//! Collapses a cell-by-cell path into the cells where the robot has to stop:
//! every corner, every cell whose next step enters a candidate-obstacle cell
//! (so the obstacle sensor gets a look before committing), and the goal.

use crate::position::Cell;

/// Reduce a path that starts at the robot's current cell.
///
/// `path[0]` is the start and is never part of the output. A cell is kept
/// when the step after it enters a cell in `candidates`, or when it is not
/// collinear with its neighbours in `path`. The last cell is always kept.
///
/// "The step after it" is the adjacent cell toward the following path
/// element, so reducing an already reduced path (with its start prepended)
/// returns it unchanged.
pub fn reduce_waypoints(path: &[Cell], candidates: &[Cell]) -> Vec<Cell> {
    let Some(&goal) = path.last() else {
        return Vec::new();
    };
    if path.len() == 1 {
        return vec![goal];
    }

    let mut waypoints = Vec::new();
    for window in path.windows(3) {
        let (prev, cell, next) = (window[0], window[1], window[2]);

        let next_step = cell.side_toward(next).map(|side| cell.step(side));
        let guards_candidate = next_step.is_some_and(|step| candidates.contains(&step));
        let straight =
            (prev.x == cell.x && cell.x == next.x) || (prev.y == cell.y && cell.y == next.y);

        if guards_candidate || !straight {
            waypoints.push(cell);
        }
    }

    waypoints.push(goal);
    waypoints
}
