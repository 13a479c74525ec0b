//! Row records: the data behind one table row.

use crate::column::Column;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Mapping from column property to a scalar value.
///
/// A record serializes as a plain JSON object, which is also its form on the
/// channel. Equality is deep equality of the properties and values.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from a JSON value. Returns `None` unless it is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Record(map)),
            _ => None,
        }
    }

    /// A record with an empty string for every column property.
    pub fn blank_for(columns: &[Column]) -> Self {
        columns
            .iter()
            .map(|c| (c.property.clone(), Value::String(String::new())))
            .collect()
    }

    pub fn get(&self, property: &str) -> Option<&Value> {
        self.0.get(property)
    }

    /// Set a property, returning the previous value.
    pub fn set(&mut self, property: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(property.into(), value.into())
    }

    /// String form of a property as a cell shows it.
    ///
    /// Strings are shown verbatim, missing properties and `null` as an empty
    /// string, everything else as its JSON text.
    pub fn display(&self, property: &str) -> String {
        self.get(property).map(display_value).unwrap_or_default()
    }

    /// Merge one edited cell value into the record. The last patch for a
    /// property wins.
    ///
    /// The text is coerced to the type of `original`, the value the property
    /// had when the record was adopted, so intermediate edits such as an
    /// emptied field do not change the property's type; see [`coerce`].
    pub fn apply_patch(&mut self, property: &str, changes: &str, original: Option<&Value>) {
        let value = coerce(original, changes);
        self.0.insert(property.to_string(), value);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Record(map)
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Record(iter.into_iter().collect())
    }
}

/// String form of a scalar value.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Convert edited cell text back into a record value.
///
/// Numbers stay numbers and booleans stay booleans when the text parses as
/// one; any other text is stored as a string.
pub fn coerce(previous: Option<&Value>, changes: &str) -> Value {
    match previous {
        Some(Value::Number(_)) => parse_number(changes)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(changes.to_string())),
        Some(Value::Bool(_)) => match changes.trim() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::String(changes.to_string()),
        },
        _ => Value::String(changes.to_string()),
    }
}

fn parse_number(text: &str) -> Option<Number> {
    let text = text.trim();
    if let Ok(n) = text.parse::<i64>() {
        return Some(Number::from(n));
    }
    text.parse::<f64>().ok().and_then(Number::from_f64)
}
