use serde::{Deserialize, Serialize};

/// A logical cell position.
///
/// Both indices are 0-based and exclude the gutter column and the header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Cell {
    pub col: usize,
    pub row: usize,
}

impl Cell {
    pub const fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }

    /// Clamp both coordinates into `[0, col_count) x [0, row_count)`.
    ///
    /// Returns `None` when the grid has no rows or no columns.
    pub fn clamped(self, col_count: usize, row_count: usize) -> Option<Self> {
        if col_count == 0 || row_count == 0 {
            return None;
        }
        Some(Self {
            col: self.col.min(col_count - 1),
            row: self.row.min(row_count - 1),
        })
    }
}

/// Direction of a single navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Move `cell` one step, clamped to the grid bounds.
    pub fn step(self, cell: Cell, col_count: usize, row_count: usize) -> Cell {
        let moved = match self {
            Direction::Up => Cell::new(cell.col, cell.row.saturating_sub(1)),
            Direction::Down => Cell::new(cell.col, cell.row.saturating_add(1)),
            Direction::Left => Cell::new(cell.col.saturating_sub(1), cell.row),
            Direction::Right => Cell::new(cell.col.saturating_add(1), cell.row),
        };
        moved.clamped(col_count, row_count).unwrap_or(cell)
    }

    /// Jump `cell` to the data boundary in this direction.
    pub fn jump(self, cell: Cell, col_count: usize, row_count: usize) -> Cell {
        let moved = match self {
            Direction::Up => Cell::new(cell.col, 0),
            Direction::Down => Cell::new(cell.col, row_count.saturating_sub(1)),
            Direction::Left => Cell::new(0, cell.row),
            Direction::Right => Cell::new(col_count.saturating_sub(1), cell.row),
        };
        moved.clamped(col_count, row_count).unwrap_or(cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_clamps_at_edges() {
        let origin = Cell::new(0, 0);
        assert_eq!(Direction::Up.step(origin, 3, 3), origin);
        assert_eq!(Direction::Left.step(origin, 3, 3), origin);
        assert_eq!(Direction::Down.step(origin, 3, 3), Cell::new(0, 1));

        let corner = Cell::new(2, 2);
        assert_eq!(Direction::Right.step(corner, 3, 3), corner);
        assert_eq!(Direction::Down.step(corner, 3, 3), corner);
    }

    #[test]
    fn test_jump_to_boundary() {
        let cell = Cell::new(1, 1);
        assert_eq!(Direction::Down.jump(cell, 4, 10), Cell::new(1, 9));
        assert_eq!(Direction::Right.jump(cell, 4, 10), Cell::new(3, 1));
        assert_eq!(Direction::Up.jump(cell, 4, 10), Cell::new(1, 0));
        assert_eq!(Direction::Left.jump(cell, 4, 10), Cell::new(0, 1));
    }

    #[test]
    fn test_clamped_empty_grid() {
        assert_eq!(Cell::new(5, 5).clamped(0, 3), None);
        assert_eq!(Cell::new(5, 5).clamped(2, 3), Some(Cell::new(1, 2)));
    }
}
