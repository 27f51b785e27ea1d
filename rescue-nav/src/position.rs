//! Position Model: grid cell plus cardinal heading.
//!
//! The arena is a square grid of cells addressed by integer `(x, y)`. `x`
//! grows toward the RIGHT side of the arena and `y` grows toward the BACK.
//! Each [`Side`] is bound to an absolute gyro angle, so turning to a side is
//! turning to a fixed angle modulo 360.
//!
//! A [`Position`] is the last *confirmed* pose: it only changes when a motion
//! leg completes or a calibration pins it. The gyro may drift between
//! confirmations; `heading` does not.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Cardinal direction, bound to a gyro angle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Front,
    Right,
    Back,
    Left,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Front, Side::Right, Side::Back, Side::Left];

    /// Gyro angle of this side in degrees
    pub fn degrees(self) -> f32 {
        match self {
            Side::Front => 0.0,
            Side::Right => 90.0,
            Side::Back => 180.0,
            Side::Left => 270.0,
        }
    }

    /// Cell offset of one step toward this side
    pub fn delta(self) -> (i32, i32) {
        match self {
            Side::Front => (0, -1),
            Side::Right => (1, 0),
            Side::Back => (0, 1),
            Side::Left => (-1, 0),
        }
    }

    /// Signed turn in degrees from gyro reading `angle` to this side,
    /// normalized to (-180, 180]
    pub fn turn_from(self, angle: f32) -> f32 {
        let current = angle.rem_euclid(360.0);
        let mut turn = self.degrees() - current;
        if turn > 180.0 {
            turn -= 360.0;
        } else if turn <= -180.0 {
            turn += 360.0;
        }
        turn
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Side::Front => "FRONT",
            Side::Right => "RIGHT",
            Side::Back => "BACK",
            Side::Left => "LEFT",
        };
        f.write_str(name)
    }
}

/// Grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(i32, i32)", into = "(i32, i32)")]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Inside a `size` x `size` arena
    #[inline]
    pub fn in_bounds(self, size: i32) -> bool {
        (0..size).contains(&self.x) && (0..size).contains(&self.y)
    }

    /// Neighbouring cell toward `side` (may be out of bounds)
    #[inline]
    pub fn step(self, side: Side) -> Cell {
        let (dx, dy) = side.delta();
        Cell::new(self.x + dx, self.y + dy)
    }

    /// 4-connected neighbours in search order: +x, -x, +y, -y
    pub fn neighbors(self) -> [Cell; 4] {
        [
            Cell::new(self.x + 1, self.y),
            Cell::new(self.x - 1, self.y),
            Cell::new(self.x, self.y + 1),
            Cell::new(self.x, self.y - 1),
        ]
    }

    /// Side to face to reach `other` in a straight line, if it lies on the
    /// same row or column
    pub fn side_toward(self, other: Cell) -> Option<Side> {
        if other.y == self.y && other.x > self.x {
            Some(Side::Right)
        } else if other.y == self.y && other.x < self.x {
            Some(Side::Left)
        } else if other.x == self.x && other.y > self.y {
            Some(Side::Back)
        } else if other.x == self.x && other.y < self.y {
            Some(Side::Front)
        } else {
            None
        }
    }

    /// Chebyshev distance; equals the square count for straight legs
    pub fn distance(self, other: Cell) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

impl From<(i32, i32)> for Cell {
    fn from((x, y): (i32, i32)) -> Self {
        Cell::new(x, y)
    }
}

impl From<Cell> for (i32, i32) {
    fn from(cell: Cell) -> Self {
        (cell.x, cell.y)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Confirmed robot pose on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub cell: Cell,
    pub heading: Side,
}

impl Position {
    pub const fn new(x: i32, y: i32, heading: Side) -> Self {
        Self {
            cell: Cell::new(x, y),
            heading,
        }
    }

    /// Reference corner: cell (0, 0) facing LEFT
    pub const fn origin() -> Self {
        Self::new(0, 0, Side::Left)
    }

    /// Move `squares` along the heading axis (negative moves backward).
    ///
    /// No bounds check: callers only advance along planned legs.
    pub fn advance(&mut self, squares: i32) {
        let (dx, dy) = self.heading.delta();
        self.cell.x += dx * squares;
        self.cell.y += dy * squares;
    }

    /// Cell directly in front of the robot
    pub fn square_ahead(&self) -> Cell {
        self.cell.step(self.heading)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::origin()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} facing {}", self.cell, self.heading)
    }
}
