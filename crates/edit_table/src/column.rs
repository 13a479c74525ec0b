//! Column descriptors.

use serde::{Deserialize, Serialize};

/// Horizontal alignment of a column's cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// Describes one column: which record property it shows and how.
///
/// The column list of a table fixes the left-to-right order of the cells in
/// every row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Record property shown in this column.
    pub property: String,
    /// Header text.
    pub label: String,
    /// Number of grid columns the cell spans.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<u32>,
    #[serde(default)]
    pub align: Align,
    #[serde(default)]
    pub index: usize,
}

impl Column {
    /// Create a left-aligned column.
    pub fn new(property: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            label: label.into(),
            span: None,
            align: Align::Left,
            index: 0,
        }
    }

    /// Set the alignment.
    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    /// Set the span.
    pub fn span(mut self, span: u32) -> Self {
        self.span = Some(span);
        self
    }

    /// Set the index.
    pub fn index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }
}
