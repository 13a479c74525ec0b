//! Focus index bookkeeping.
//!
//! The focus index is a position in the row-major sequence of all data cells
//! of a table. Rows are identified by position only, so the index is resolved
//! against the current rows every time it is used.

use crate::row::Row;

/// Row and column of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellPosition {
    pub row: usize,
    pub column: usize,
}

/// Number of data cells across all rows.
pub fn cell_count(rows: &[Row]) -> usize {
    rows.iter().map(Row::cell_count).sum()
}

/// Flattened position of the first cell of a row.
///
/// For `row == rows.len()` this is the position a cell appended in a new row
/// would get.
pub fn first_cell_of_row(rows: &[Row], row: usize) -> usize {
    rows.iter().take(row).map(Row::cell_count).sum()
}

/// Flattened position of a cell, if it exists.
pub fn flat_index(rows: &[Row], position: CellPosition) -> Option<usize> {
    let row = rows.get(position.row)?;
    if position.column >= row.cell_count() {
        return None;
    }
    Some(first_cell_of_row(rows, position.row) + position.column)
}

/// Resolve a flattened position against the current rows.
pub fn locate(rows: &[Row], index: usize) -> Option<CellPosition> {
    let mut start = 0;
    for (row_idx, row) in rows.iter().enumerate() {
        let count = row.cell_count();
        if index < start + count {
            return Some(CellPosition {
                row: row_idx,
                column: index - start,
            });
        }
        start += count;
    }
    None
}

/// Tracks the focus index and the cell it last resolved to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FocusTracker {
    index: usize,
    focused: Option<CellPosition>,
}

impl FocusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Cell that received focus on the last restore.
    pub fn focused(&self) -> Option<CellPosition> {
        self.focused
    }

    pub fn set(&mut self, index: usize) {
        self.index = index;
    }

    pub fn reset(&mut self) {
        self.index = 0;
        self.focused = None;
    }

    /// Move focus to the cell at the focus index.
    ///
    /// Only an editable cell with installed handlers can take focus. If the
    /// index is out of range or the cell is not interactive, nothing is
    /// focused.
    pub fn restore(&mut self, rows: &[Row]) -> Option<CellPosition> {
        self.focused = locate(rows, self.index).filter(|p| {
            rows[p.row]
                .cell(p.column)
                .is_some_and(|c| c.is_listening() && c.mode().is_editable())
        });
        self.focused
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellMode;
    use crate::column::Column;
    use crate::record::Record;

    fn rows(count: usize, columns: usize, mode: CellMode) -> Vec<Row> {
        let columns: Vec<Column> = (0..columns)
            .map(|i| Column::new(format!("c{i}"), format!("C{i}")))
            .collect();
        (0..count)
            .map(|_| Row::new(&columns, Record::blank_for(&columns), mode))
            .collect()
    }

    #[test]
    fn test_first_cell_of_appended_row() {
        let rows = rows(2, 3, CellMode::ReadOnly);
        assert_eq!(first_cell_of_row(&rows, 0), 0);
        assert_eq!(first_cell_of_row(&rows, 1), 3);
        assert_eq!(first_cell_of_row(&rows, 2), 6);
        assert_eq!(cell_count(&rows), 6);
    }

    #[test]
    fn test_locate_and_flat_index_agree() {
        let rows = rows(3, 2, CellMode::ReadOnly);
        for index in 0..cell_count(&rows) {
            let pos = locate(&rows, index).unwrap();
            assert_eq!(flat_index(&rows, pos), Some(index));
        }
        assert_eq!(locate(&rows, 6), None);
        assert_eq!(flat_index(&rows, CellPosition { row: 0, column: 2 }), None);
        assert_eq!(flat_index(&rows, CellPosition { row: 3, column: 0 }), None);
    }

    #[test]
    fn test_restore_requires_interactive_cell() {
        let mut rows = rows(2, 2, CellMode::ReadOnly);
        let mut focus = FocusTracker::new();
        focus.set(3);
        assert_eq!(focus.restore(&rows), None);

        for row in &mut rows {
            row.install_handlers();
        }
        assert_eq!(focus.restore(&rows), Some(CellPosition { row: 1, column: 1 }));
    }

    #[test]
    fn test_restore_out_of_range() {
        let mut rows = rows(1, 2, CellMode::ReadOnly);
        rows[0].install_handlers();
        let mut focus = FocusTracker::new();
        focus.set(10);
        assert_eq!(focus.restore(&rows), None);
        assert_eq!(focus.index(), 10);
    }

    #[test]
    fn test_reset() {
        let mut focus = FocusTracker::new();
        focus.set(4);
        focus.reset();
        assert_eq!(focus.index(), 0);
        assert_eq!(focus.focused(), None);
    }
}
