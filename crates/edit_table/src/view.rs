//! Read-only projection of a table for display.

use crate::cell::CellView;
use crate::column::{Align, Column};
use crate::focus::CellPosition;
use crate::table::TableState;

/// What one row shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowView<'a> {
    pub cells: Vec<CellView<'a>>,
    pub delete_visible: bool,
}

/// What a table shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableView<'a> {
    pub state: TableState,
    pub header: &'a [Column],
    pub rows: Vec<RowView<'a>>,
    pub focused: Option<CellPosition>,
}

impl TableView<'_> {
    /// Render as a plain-text grid.
    ///
    /// Editable cells are bracketed, the focused cell is prefixed with `>`,
    /// and a visible delete trigger shows as `[x]` after the row.
    pub fn to_text(&self) -> String {
        let body: Vec<Vec<String>> = self
            .rows
            .iter()
            .enumerate()
            .map(|(r, row)| {
                row.cells
                    .iter()
                    .enumerate()
                    .map(|(c, cell)| {
                        let focused = self.focused == Some(CellPosition { row: r, column: c });
                        match (cell, focused) {
                            (CellView::Text(text), _) => text.to_string(),
                            (CellView::Input(text), false) => format!("[{text}]"),
                            (CellView::Input(text), true) => format!(">[{text}]"),
                        }
                    })
                    .collect()
            })
            .collect();

        let widths: Vec<usize> = self
            .header
            .iter()
            .enumerate()
            .map(|(c, col)| {
                body.iter()
                    .filter_map(|row| row.get(c))
                    .map(|s| s.chars().count())
                    .chain(std::iter::once(col.label.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();
        let header: Vec<String> = self.header.iter().map(|c| c.label.clone()).collect();
        push_line(&mut out, &header, self.header, &widths, "");
        for (row, texts) in self.rows.iter().zip(&body) {
            let suffix = if row.delete_visible { " [x]" } else { "" };
            push_line(&mut out, texts, self.header, &widths, suffix);
        }
        out
    }
}

fn push_line(out: &mut String, texts: &[String], columns: &[Column], widths: &[usize], suffix: &str) {
    let cells: Vec<String> = texts
        .iter()
        .enumerate()
        .map(|(c, text)| {
            let width = widths.get(c).copied().unwrap_or(0);
            match columns.get(c).map(|col| col.align) {
                Some(Align::Right) => format!("{text:>width$}"),
                Some(Align::Center) => format!("{text:^width$}"),
                _ => format!("{text:<width$}"),
            }
        })
        .collect();
    out.push_str(cells.join(" | ").trim_end());
    out.push_str(suffix);
    out.push('\n');
}
