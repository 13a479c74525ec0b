//! Rows: one record and the cells that show it.
//!
//! A row is purely reactive. It changes only through [`RowSignal`]s raised by
//! the table on behalf of its cells.

use crate::cell::{Cell, CellMode, DeleteTrigger};
use crate::column::Column;
use crate::record::Record;

/// Signals a row consumes.
#[derive(Clone, Debug, PartialEq)]
pub enum RowSignal {
    /// Adopt a record as the row's backing state.
    Data(Record),
    /// Merge one edited property into the record, coerced to the type the
    /// property had in the adopted record.
    Patch { property: String, changes: String },
    /// Detach the row from its table.
    Delete,
}

/// One table row.
#[derive(Clone, Debug)]
pub struct Row {
    record: Record,
    adopted: Record,
    cells: Vec<Cell>,
    delete: DeleteTrigger,
    detached: bool,
}

impl Row {
    /// Build the cells for a record without adopting it as backing state.
    pub fn render(columns: &[Column], values: &Record, mode: CellMode) -> Self {
        let cells = columns
            .iter()
            .map(|c| Cell::new(c.property.clone(), c.align, &values.display(&c.property), mode))
            .collect();
        let mut delete = DeleteTrigger::default();
        delete.set_mode(mode);
        Self {
            record: Record::new(),
            adopted: Record::new(),
            cells,
            delete,
            detached: false,
        }
    }

    /// Build the cells for a record and adopt it.
    pub fn new(columns: &[Column], record: Record, mode: CellMode) -> Self {
        let mut row = Self::render(columns, &record, mode);
        row.handle(RowSignal::Data(record));
        row
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, column: usize) -> Option<&Cell> {
        self.cells.get(column)
    }

    pub fn cell_mut(&mut self, column: usize) -> Option<&mut Cell> {
        self.cells.get_mut(column)
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn delete_trigger(&self) -> &DeleteTrigger {
        &self.delete
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }

    /// Apply a signal.
    ///
    /// Returns `false` if the signal had no effect, which is always the case
    /// once the row is detached.
    pub fn handle(&mut self, signal: RowSignal) -> bool {
        if self.detached {
            return false;
        }
        match signal {
            RowSignal::Data(record) => {
                self.adopted = record.clone();
                self.record = record;
            }
            RowSignal::Patch { property, changes } => {
                let original = self.adopted.get(&property);
                self.record.apply_patch(&property, &changes, original);
            }
            RowSignal::Delete => {
                self.detached = true;
            }
        }
        true
    }

    /// Switch every cell and the delete trigger to one mode.
    pub fn set_mode(&mut self, mode: CellMode) {
        for cell in &mut self.cells {
            cell.set_mode(mode);
        }
        self.delete.set_mode(mode);
    }

    /// Make the row editable and accept interaction on all of its cells.
    pub(crate) fn install_handlers(&mut self) {
        for cell in &mut self.cells {
            cell.install_handlers();
        }
        self.delete.install_handlers();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn columns() -> Vec<Column> {
        vec![Column::new("id", "ID"), Column::new("name", "Name")]
    }

    fn record(value: serde_json::Value) -> Record {
        Record::from_value(value).unwrap()
    }

    #[test]
    fn test_new_row_builds_cells_in_column_order() {
        let row = Row::new(&columns(), record(json!({"name": "Ann", "id": 1})), CellMode::ReadOnly);
        assert_eq!(row.cell_count(), 2);
        assert_eq!(row.cell(0).unwrap().value(), "1");
        assert_eq!(row.cell(1).unwrap().value(), "Ann");
        assert_eq!(row.record().display("name"), "Ann");
    }

    #[test]
    fn test_render_does_not_adopt_record() {
        let row = Row::render(&columns(), &record(json!({"id": 1})), CellMode::Editable);
        assert!(row.record().is_empty());
        assert!(row.delete_trigger().is_visible());
    }

    #[test]
    fn test_data_signal_replaces_record() {
        let mut row = Row::new(&columns(), record(json!({"id": 1})), CellMode::ReadOnly);
        assert!(row.handle(RowSignal::Data(record(json!({"id": 2})))));
        assert_eq!(row.record(), &record(json!({"id": 2})));
    }

    #[test]
    fn test_patch_last_write_wins() {
        let mut row = Row::new(&columns(), record(json!({"id": 1, "name": ""})), CellMode::Editable);
        row.handle(RowSignal::Patch {
            property: "name".into(),
            changes: "Ann".into(),
        });
        row.handle(RowSignal::Patch {
            property: "name".into(),
            changes: "Bob".into(),
        });
        assert_eq!(row.record().display("name"), "Bob");
    }

    #[test]
    fn test_patch_coerces_to_adopted_type() {
        let mut row = Row::new(&columns(), record(json!({"id": 5, "name": "x"})), CellMode::Editable);
        row.handle(RowSignal::Patch {
            property: "id".into(),
            changes: "".into(),
        });
        assert_eq!(row.record().get("id"), Some(&json!("")));

        row.handle(RowSignal::Patch {
            property: "id".into(),
            changes: "7".into(),
        });
        assert_eq!(row.record().get("id"), Some(&json!(7)));
    }

    #[test]
    fn test_delete_is_idempotent() {
        let mut row = Row::new(&columns(), record(json!({"id": 1})), CellMode::Editable);
        assert!(row.handle(RowSignal::Delete));
        assert!(row.is_detached());
        assert!(!row.handle(RowSignal::Delete));
        assert!(!row.handle(RowSignal::Patch {
            property: "id".into(),
            changes: "9".into(),
        }));
        assert_eq!(row.record().display("id"), "1");
    }

    #[test]
    fn test_set_mode_covers_trigger() {
        let mut row = Row::new(&columns(), record(json!({"id": 1})), CellMode::ReadOnly);
        row.install_handlers();
        assert!(row.cells().iter().all(|c| c.mode().is_editable()));
        row.set_mode(CellMode::ReadOnly);
        assert!(row.cells().iter().all(|c| !c.mode().is_editable()));
        assert!(!row.delete_trigger().is_visible());
    }
}
