//! Keyboard navigation between matrix cells.
//!
//! Cells are ordered by their canvas position, x first. Moving along the
//! y axis steps to the adjacent cell of the same column, moving along the
//! x axis jumps by a whole column. When the axes are inverted, the
//! vertical arrows move along x and the horizontal ones along y.

use crate::matrix::CellModel;
use crossterm::event::KeyCode;

/// Arrow direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
}

impl NavKey {
    /// Direction of an arrow key, `None` for any other key.
    pub fn from_key_code(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Up => Some(Self::Up),
            KeyCode::Down => Some(Self::Down),
            KeyCode::Left => Some(Self::Left),
            KeyCode::Right => Some(Self::Right),
            _ => None,
        }
    }
}

/// Step within the sorted cell order.
enum Step {
    /// Adjacent cell, same column only.
    Adjacent(isize),
    /// Whole column.
    Column(isize),
}

/// Cell reached from `current` by pressing `key`.
///
/// Returns `None` at the matrix edges, for an unknown current index or
/// for an empty cell list. Navigation never wraps.
pub fn next_cell(
    key: NavKey,
    cells: &[CellModel],
    axis_inverted: bool,
    current: usize,
) -> Option<&CellModel> {
    let mut sorted: Vec<&CellModel> = cells.iter().collect();
    sorted.sort_by(|a, b| {
        a.x_canvas
            .total_cmp(&b.x_canvas)
            .then(a.y_canvas.total_cmp(&b.y_canvas))
    });
    let column_count = cells.iter().filter(|c| c.x_canvas == 0.0).count() as isize;
    let pos = sorted.iter().position(|c| c.index == current)?;

    let step = match (key, axis_inverted) {
        (NavKey::Up, false) | (NavKey::Right, true) => Step::Adjacent(1),
        (NavKey::Down, false) | (NavKey::Left, true) => Step::Adjacent(-1),
        (NavKey::Right, false) | (NavKey::Up, true) => Step::Column(column_count),
        (NavKey::Left, false) | (NavKey::Down, true) => Step::Column(-column_count),
    };

    let (offset, same_column) = match step {
        Step::Adjacent(d) => (d, true),
        Step::Column(d) => (d, false),
    };
    if offset == 0 {
        return None;
    }
    let target = pos.checked_add_signed(offset)?;
    let next = *sorted.get(target)?;
    if same_column && next.x_canvas != sorted[pos].x_canvas {
        return None;
    }
    Some(next)
}

/// [`next_cell`] for a raw key code, `None` for non-arrow keys.
pub fn next_cell_for_key(
    code: KeyCode,
    cells: &[CellModel],
    axis_inverted: bool,
    current: usize,
) -> Option<&CellModel> {
    next_cell(NavKey::from_key_code(code)?, cells, axis_inverted, current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_fixtures::small_input;
    use crate::matrix::{AxisLayout, CellStatisticsBuilder, MatrixCells};

    fn laid_out() -> MatrixCells {
        let input = small_input();
        let mut matrix = CellStatisticsBuilder::new(&input).build();
        matrix.update_canvas(AxisLayout::Standard, 100.0, 100.0);
        matrix
    }

    fn go(matrix: &MatrixCells, key: NavKey, inverted: bool, from: usize) -> Option<usize> {
        next_cell(key, &matrix.cells, inverted, from).map(|c| c.index)
    }

    #[test]
    fn test_normal_orientation() {
        let m = laid_out();
        assert_eq!(go(&m, NavKey::Up, false, 0), Some(1));
        assert_eq!(go(&m, NavKey::Down, false, 1), Some(0));
        assert_eq!(go(&m, NavKey::Right, false, 0), Some(3));
        assert_eq!(go(&m, NavKey::Left, false, 4), Some(1));
    }

    #[test]
    fn test_inverted_orientation_swaps_rules() {
        let m = laid_out();
        assert_eq!(go(&m, NavKey::Up, true, 0), Some(3));
        assert_eq!(go(&m, NavKey::Down, true, 3), Some(0));
        assert_eq!(go(&m, NavKey::Right, true, 0), Some(1));
        assert_eq!(go(&m, NavKey::Left, true, 2), Some(1));
    }

    #[test]
    fn test_edges_do_not_wrap() {
        let m = laid_out();
        assert_eq!(go(&m, NavKey::Down, false, 0), None);
        assert_eq!(go(&m, NavKey::Left, false, 0), None);
        // Top of column A is followed by the bottom of column B in sorted order
        assert_eq!(go(&m, NavKey::Up, false, 2), None);
        assert_eq!(go(&m, NavKey::Down, false, 3), None);
        assert_eq!(go(&m, NavKey::Right, false, 5), None);
        assert_eq!(go(&m, NavKey::Right, true, 2), None);
        assert_eq!(go(&m, NavKey::Up, true, 5), None);
    }

    #[test]
    fn test_unknown_inputs() {
        let m = laid_out();
        assert!(next_cell_for_key(KeyCode::Char('x'), &m.cells, false, 0).is_none());
        assert!(next_cell_for_key(KeyCode::Up, &m.cells, false, 0).is_some());
        assert_eq!(go(&m, NavKey::Up, false, 99), None);
        assert!(next_cell(NavKey::Up, &[], false, 0).is_none());
    }
}
