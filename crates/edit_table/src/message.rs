//! Channel message protocol.
//!
//! Messages are `{ "type": ..., "detail": ... }` objects. Commands (`add`,
//! `data`, `edit`, `readOnly`, `save`) are posted by the owner of a table;
//! `change` is posted by a table after a commit.

use crate::column::Column;
use crate::error::Result;
use crate::record::Record;
use serde::{Deserialize, Serialize};

/// Payload of a `data` message.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableData {
    #[serde(default)]
    pub column_data: Vec<Column>,
    #[serde(default)]
    pub row_data: Vec<Record>,
}

/// A message on a table channel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail", rename_all = "camelCase")]
pub enum TableMessage {
    /// Append a blank row and enter edit mode.
    Add,
    /// Replace columns and rows.
    Data(TableData),
    /// Enter edit mode.
    Edit,
    /// Cancel the edit session and restore the saved rows.
    ReadOnly,
    /// Validate and commit the edit session.
    Save,
    /// Rows committed by a table.
    Change(Vec<Record>),
    /// Any message type this protocol does not know. Ignored on receipt.
    #[serde(other)]
    Unknown,
}

const KNOWN_TYPES: [&str; 6] = ["add", "data", "edit", "readOnly", "save", "change"];

#[derive(Deserialize)]
struct TypeProbe {
    #[serde(rename = "type")]
    kind: String,
}

impl TableMessage {
    /// Parse a message from JSON.
    ///
    /// A well-formed object whose `type` is not part of the protocol parses
    /// as `Unknown` whatever its detail is.
    ///
    /// # Errors
    ///
    /// Returns `TableError::Json` for malformed JSON or a known type with a
    /// malformed detail.
    pub fn from_json(text: &str) -> Result<Self> {
        match serde_json::from_str::<TableMessage>(text) {
            Ok(message) => Ok(message),
            Err(err) => match serde_json::from_str::<TypeProbe>(text) {
                Ok(probe) if !KNOWN_TYPES.contains(&probe.kind.as_str()) => Ok(TableMessage::Unknown),
                _ => Err(err.into()),
            },
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Wire name of the message type.
    pub fn kind(&self) -> &'static str {
        match self {
            TableMessage::Add => "add",
            TableMessage::Data(_) => "data",
            TableMessage::Edit => "edit",
            TableMessage::ReadOnly => "readOnly",
            TableMessage::Save => "save",
            TableMessage::Change(_) => "change",
            TableMessage::Unknown => "unknown",
        }
    }
}
