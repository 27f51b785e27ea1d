//! Append-only obstacle set.

use crate::position::Cell;

/// Cells the planner must avoid.
///
/// Seeded with the statically known obstacles and grown whenever a leg finds
/// its way blocked. Nothing is ever removed during a run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObstacleSet {
    cells: Vec<Cell>,
}

impl ObstacleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cells<I: IntoIterator<Item = Cell>>(cells: I) -> Self {
        let mut set = Self::new();
        for cell in cells {
            set.insert(cell);
        }
        set
    }

    /// Add a cell. Returns `false` if it was already known.
    pub fn insert(&mut self, cell: Cell) -> bool {
        if self.cells.contains(&cell) {
            return false;
        }
        self.cells.push(cell);
        true
    }

    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells in discovery order
    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().copied()
    }
}
