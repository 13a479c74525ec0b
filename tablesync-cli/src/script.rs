//! JSON-lines scripts.
//!
//! Each non-blank line that does not start with `#` is one step, e.g.
//!
//! ```text
//! {"step":"post","message":{"type":"add"}}
//! {"step":"input","instance":0,"cell":6,"value":"42"}
//! {"step":"delete","instance":0,"row":2}
//! ```

use anyhow::{Context, Result};
use edit_table::{CellEvent, Key, TableMessage, TriggerEvent};
use serde::Deserialize;
use serde_json::Value;

/// One script step.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ScriptStep {
    /// Post a message from the owner.
    Post { message: Value },
    /// Type into a data cell.
    Input {
        #[serde(default)]
        instance: usize,
        cell: usize,
        value: String,
    },
    /// Click into a data cell.
    Focus {
        #[serde(default)]
        instance: usize,
        cell: usize,
    },
    /// Press Tab on a data cell.
    Tab {
        #[serde(default)]
        instance: usize,
        cell: usize,
    },
    /// Activate a row's delete trigger.
    Delete {
        #[serde(default)]
        instance: usize,
        row: usize,
    },
}

/// What a step does to a table, once resolved.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Post(TableMessage),
    Cell {
        instance: usize,
        cell: usize,
        event: CellEvent,
    },
    Trigger {
        instance: usize,
        row: usize,
        event: TriggerEvent,
    },
}

impl ScriptStep {
    /// Short name used in output headings.
    pub fn name(&self) -> &'static str {
        match self {
            ScriptStep::Post { .. } => "post",
            ScriptStep::Input { .. } => "input",
            ScriptStep::Focus { .. } => "focus",
            ScriptStep::Tab { .. } => "tab",
            ScriptStep::Delete { .. } => "delete",
        }
    }

    /// Resolve the step into an action.
    ///
    /// Unknown message types resolve to `TableMessage::Unknown`.
    pub fn action(&self) -> Result<Action> {
        let action = match self {
            ScriptStep::Post { message } => {
                let text = message.to_string();
                Action::Post(TableMessage::from_json(&text).context("invalid message")?)
            }
            ScriptStep::Input { instance, cell, value } => Action::Cell {
                instance: *instance,
                cell: *cell,
                event: CellEvent::Input(value.clone()),
            },
            ScriptStep::Focus { instance, cell } => Action::Cell {
                instance: *instance,
                cell: *cell,
                event: CellEvent::Focus,
            },
            ScriptStep::Tab { instance, cell } => Action::Cell {
                instance: *instance,
                cell: *cell,
                event: CellEvent::Key(Key::Tab),
            },
            ScriptStep::Delete { instance, row } => Action::Trigger {
                instance: *instance,
                row: *row,
                event: TriggerEvent::Activate,
            },
        };
        Ok(action)
    }
}

/// Parse a whole script.
pub fn parse_script(text: &str) -> Result<Vec<ScriptStep>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(n, line)| {
            serde_json::from_str(line).with_context(|| format!("line {}: invalid step", n + 1))
        })
        .collect()
}
