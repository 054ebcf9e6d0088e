use serde::{Deserialize, Serialize};

use super::Cell;

/// A normalized rectangular selection (`min` is top-left, `max` bottom-right).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub min: Cell,
    pub max: Cell,
}

impl Selection {
    /// Build a selection from two arbitrary corners.
    pub fn from_corners(a: Cell, b: Cell) -> Self {
        Self {
            min: Cell::new(a.col.min(b.col), a.row.min(b.row)),
            max: Cell::new(a.col.max(b.col), a.row.max(b.row)),
        }
    }

    /// Single-cell selection.
    pub fn single(cell: Cell) -> Self {
        Self {
            min: cell,
            max: cell,
        }
    }

    /// Inclusive rectangle membership test.
    pub fn contains(&self, cell: Cell) -> bool {
        cell.col >= self.min.col
            && cell.col <= self.max.col
            && cell.row >= self.min.row
            && cell.row <= self.max.row
    }

    pub fn width(&self) -> usize {
        self.max.col - self.min.col + 1
    }

    pub fn height(&self) -> usize {
        self.max.row - self.min.row + 1
    }

    pub fn is_single_cell(&self) -> bool {
        self.min == self.max
    }

    /// Half-open row range covered by the selection.
    pub fn rows(&self) -> std::ops::Range<usize> {
        self.min.row..self.max.row + 1
    }

    /// Half-open column range covered by the selection.
    pub fn cols(&self) -> std::ops::Range<usize> {
        self.min.col..self.max.col + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_corners_normalizes() {
        let sel = Selection::from_corners(Cell::new(3, 1), Cell::new(1, 4));
        assert_eq!(sel.min, Cell::new(1, 1));
        assert_eq!(sel.max, Cell::new(3, 4));
        assert_eq!(sel.width(), 3);
        assert_eq!(sel.height(), 4);
    }

    #[test]
    fn test_contains_is_inclusive() {
        let sel = Selection::from_corners(Cell::new(1, 1), Cell::new(2, 3));
        assert!(sel.contains(Cell::new(1, 1)));
        assert!(sel.contains(Cell::new(2, 3)));
        assert!(!sel.contains(Cell::new(0, 1)));
        assert!(!sel.contains(Cell::new(2, 4)));
    }
}
