//! Cells: one value shown either as text or as an input.
//!
//! A cell has no session state of its own. It keeps two presentations, the
//! read-only text and the interactive input, and its `value`/`readonly`
//! attributes each touch only one of them, so switching modes never loses
//! what was typed and setting the value never resets the mode.

use crate::column::Align;
use crate::lifecycle::{AttributeChange, Attributes, Component};

/// Presentation mode of a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CellMode {
    #[default]
    ReadOnly,
    Editable,
}

impl CellMode {
    /// Parse the `readonly` attribute. Only `"true"` means read-only.
    pub fn from_attr(value: &str) -> Self {
        if value == "true" {
            CellMode::ReadOnly
        } else {
            CellMode::Editable
        }
    }

    /// The `readonly` attribute value for this mode.
    pub fn as_attr(self) -> &'static str {
        match self {
            CellMode::ReadOnly => "true",
            CellMode::Editable => "false",
        }
    }

    pub fn is_editable(self) -> bool {
        self == CellMode::Editable
    }
}

/// What a cell currently shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellView<'a> {
    Text(&'a str),
    Input(&'a str),
}

/// One data cell.
#[derive(Clone, Debug)]
pub struct Cell {
    property: String,
    align: Align,
    value: String,
    mode: CellMode,
    text: String,
    input: String,
    listening: bool,
    attributes: Attributes,
}

impl Cell {
    /// Create a cell for a column property.
    pub fn new(property: impl Into<String>, align: Align, value: &str, mode: CellMode) -> Self {
        let mut cell = Self {
            property: property.into(),
            align,
            value: String::new(),
            mode: CellMode::ReadOnly,
            text: String::new(),
            input: String::new(),
            listening: false,
            attributes: Attributes::new(),
        };
        cell.set_attribute("value", value);
        cell.set_attribute("readonly", mode.as_attr());
        cell
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn align(&self) -> Align {
        self.align
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn mode(&self) -> CellMode {
        self.mode
    }

    /// Text of the interactive surface.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Check if the table has installed interaction handlers on this cell.
    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn set_value(&mut self, value: &str) {
        self.set_attribute("value", value);
    }

    pub fn set_mode(&mut self, mode: CellMode) {
        self.set_attribute("readonly", mode.as_attr());
    }

    /// Seed the input surface from the value and accept interaction.
    pub(crate) fn install_handlers(&mut self) {
        self.input = self.value.clone();
        self.listening = true;
        self.set_mode(CellMode::Editable);
    }

    /// Replace the text of the input surface, as typing does.
    pub(crate) fn type_input(&mut self, text: &str) {
        self.input = text.to_string();
    }

    pub fn view(&self) -> CellView<'_> {
        match self.mode {
            CellMode::ReadOnly => CellView::Text(&self.text),
            CellMode::Editable => CellView::Input(&self.input),
        }
    }

    fn render_value(&mut self, value: &str) {
        self.value = value.to_string();
        self.text = value.to_string();
    }

    fn render_mode(&mut self, mode: CellMode) {
        self.mode = mode;
    }
}

impl Component for Cell {
    fn observed_attributes(&self) -> &'static [&'static str] {
        &["value", "readonly"]
    }

    fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    fn attribute_changed(&mut self, change: &AttributeChange) {
        match change.name.as_str() {
            "value" => self.render_value(&change.next),
            "readonly" => self.render_mode(CellMode::from_attr(&change.next)),
            _ => {}
        }
    }
}

/// The per-row control that deletes its row. Shown only while editable.
#[derive(Clone, Debug, Default)]
pub struct DeleteTrigger {
    mode: CellMode,
    listening: bool,
}

impl DeleteTrigger {
    pub fn mode(&self) -> CellMode {
        self.mode
    }

    pub fn is_visible(&self) -> bool {
        self.mode.is_editable()
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn set_mode(&mut self, mode: CellMode) {
        self.mode = mode;
    }

    pub(crate) fn install_handlers(&mut self) {
        self.listening = true;
        self.mode = CellMode::Editable;
    }
}
