//! Navigation loop: reconcile the confirmed position with a target pose.
//!
//! ```text
//!            ┌────────────┐  path   ┌───────────────┐
//!  start ──► │  PLANNING  │ ──────► │ EXECUTING_LEG │ ──┐ next waypoint
//!            └────────────┘         └───────────────┘ ◄─┘
//!              │   ▲    │  blocked ahead  │  │
//!              │   └────┼─────────────────┘  │ all legs done
//!              │        │ at target cell     │
//!              ▼        ▼                    ▼
//!        UNREACHABLE   ARRIVED ◄──── (re-check position)
//! ```
//!
//! Every blocked leg adds a new cell to the obstacle set before replanning,
//! so the loop terminates within one replan per free cell.

use crate::config::NavConfig;
use crate::error::{NavError, Result};
use crate::motion::{Motion, Pause};
use crate::planning::{GridPlanner, ObstacleSet};
use crate::position::{Cell, Position, Side};
use tracing::{debug, info, warn};

/// Result of [`Navigator::go_to_position`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrival {
    Arrived,
    Unreachable,
}

impl Arrival {
    pub fn is_arrived(self) -> bool {
        self == Arrival::Arrived
    }
}

/// How a single leg ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Leg {
    Completed,
    Blocked(Cell),
}

/// Owns the motion layer and the obstacle set
pub struct Navigator<M> {
    motion: M,
    planner: GridPlanner,
    obstacles: ObstacleSet,
}

impl<M: Motion> Navigator<M> {
    /// Seed the obstacle set with the statically known cells
    pub fn new(motion: M, config: &NavConfig) -> Self {
        Self {
            motion,
            planner: GridPlanner::from_config(&config.arena),
            obstacles: ObstacleSet::from_cells(config.arena.static_obstacles.iter().copied()),
        }
    }

    pub fn motion(&self) -> &M {
        &self.motion
    }

    pub fn motion_mut(&mut self) -> &mut M {
        &mut self.motion
    }

    pub fn into_motion(self) -> M {
        self.motion
    }

    pub fn obstacles(&self) -> &ObstacleSet {
        &self.obstacles
    }

    pub fn position(&self) -> Position {
        self.motion.position()
    }

    /// Record an obstacle found outside the navigation loop
    pub fn add_obstacle(&mut self, cell: Cell) -> bool {
        let added = self.obstacles.insert(cell);
        if added {
            info!("obstacle recorded at {}", cell);
        }
        added
    }

    /// Drive to `target`, replanning around newly discovered obstacles.
    ///
    /// On arrival the confirmed position is set to `target`.
    pub fn go_to_position(&mut self, target: Position) -> Result<Arrival> {
        if !target.cell.in_bounds(self.planner.size()) {
            return Err(NavError::InvalidCell(target.cell.x, target.cell.y));
        }

        loop {
            let current = self.motion.position();
            if current.cell == target.cell {
                if current.heading != target.heading {
                    self.motion.pause(Pause::Short);
                    self.motion.turn_to_side(target.heading)?;
                }
                self.motion.set_position(target);
                info!("arrived at {}", target);
                return Ok(Arrival::Arrived);
            }

            let Some(path) = self.planner.plan(current.cell, target.cell, &self.obstacles) else {
                warn!("{} unreachable from {}", target.cell, current);
                return Ok(Arrival::Unreachable);
            };
            info!("plan {} -> {}: {:?}", current.cell, target.cell, path);

            for waypoint in path {
                if let Leg::Blocked(cell) = self.execute_leg(waypoint)? {
                    self.add_obstacle(cell);
                    info!("leg to {} blocked at {}, replanning", waypoint, cell);
                    break;
                }
            }
        }
    }

    /// Turn toward `waypoint`, look, and drive there if the way is clear
    fn execute_leg(&mut self, waypoint: Cell) -> Result<Leg> {
        let current = self.motion.position();
        let squares = current.cell.distance(waypoint);

        // Reversing out of the reference corner along the first row needs no turn
        if current.cell == Cell::new(0, 0) && current.heading == Side::Left && waypoint.y == 0 {
            debug!("reversing {} squares out of the corner", squares);
            self.motion.pause(Pause::Short);
            self.motion.drive_squares(-squares, Some(Side::Left))?;
            return Ok(Leg::Completed);
        }

        let side = current
            .cell
            .side_toward(waypoint)
            .ok_or(NavError::InvalidCell(waypoint.x, waypoint.y))?;
        if current.heading != side {
            self.motion.pause(Pause::Short);
            self.motion.turn_to_side(side)?;
        }

        if self.motion.obstacle_far() {
            return Ok(Leg::Blocked(self.motion.position().square_ahead()));
        }

        self.motion.pause(Pause::Short);
        self.motion.drive_squares(squares, Some(side))?;
        Ok(Leg::Completed)
    }
}
