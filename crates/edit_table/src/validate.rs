//! Row validation before commit.
//!
//! Validation never fails a save. Rows a validator rejects are left out of
//! the committed set and the accepted rows keep their order.

use crate::error::{Result, TableError};
use crate::record::{display_value, Record};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Decides whether a row may be committed.
pub trait RowValidator: Send + Sync {
    fn accepts(&self, record: &Record) -> bool;
}

/// Validator that accepts every row.
#[derive(Clone, Copy, Debug, Default)]
pub struct AcceptAll;

impl RowValidator for AcceptAll {
    fn accepts(&self, _record: &Record) -> bool {
        true
    }
}

impl<F> RowValidator for F
where
    F: Fn(&Record) -> bool + Send + Sync,
{
    fn accepts(&self, record: &Record) -> bool {
        self(record)
    }
}

/// Keep the rows the validator accepts, in their original order.
pub fn validate_rows(records: &[Record], validator: &dyn RowValidator) -> Vec<Record> {
    records
        .iter()
        .filter(|r| validator.accepts(r))
        .cloned()
        .collect()
}

/// A rule as written in configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum RuleKind {
    /// The value must be present and not blank.
    Required,
    /// The value must be numeric and at least `value`.
    Min { value: f64 },
    /// The value must be numeric and at most `value`.
    Max { value: f64 },
    /// The value's text must match `regex`.
    Pattern { regex: String },
    /// The value's text must be one of `values`.
    OneOf { values: Vec<String> },
}

/// A rule bound to a column property.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub property: String,
    #[serde(flatten)]
    pub rule: RuleKind,
}

#[derive(Clone, Debug)]
enum Check {
    Required,
    Min(f64),
    Max(f64),
    Pattern(Regex),
    OneOf(Vec<String>),
}

#[derive(Clone, Debug)]
struct ColumnRule {
    property: String,
    check: Check,
}

impl ColumnRule {
    fn accepts(&self, record: &Record) -> bool {
        let value = record.get(&self.property);
        match &self.check {
            Check::Required => value.is_some_and(|v| !display_value(v).trim().is_empty()),
            Check::Min(min) => value.and_then(as_number).is_some_and(|n| n >= *min),
            Check::Max(max) => value.and_then(as_number).is_some_and(|n| n <= *max),
            Check::Pattern(regex) => regex.is_match(&value.map(display_value).unwrap_or_default()),
            Check::OneOf(values) => {
                let text = value.map(display_value).unwrap_or_default();
                values.iter().any(|v| *v == text)
            }
        }
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// A set of column rules. A row is accepted when it passes every rule.
#[derive(Clone, Debug, Default)]
pub struct RuleSet {
    rules: Vec<ColumnRule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile rules from configuration.
    ///
    /// # Errors
    ///
    /// Returns `TableError::InvalidPattern` if a pattern does not compile.
    pub fn from_config(configs: &[RuleConfig]) -> Result<Self> {
        let mut set = Self::new();
        for config in configs {
            set.push(config)?;
        }
        Ok(set)
    }

    /// Compile and add one rule.
    pub fn push(&mut self, config: &RuleConfig) -> Result<()> {
        let check = match &config.rule {
            RuleKind::Required => Check::Required,
            RuleKind::Min { value } => Check::Min(*value),
            RuleKind::Max { value } => Check::Max(*value),
            RuleKind::Pattern { regex } => {
                let compiled = Regex::new(regex).map_err(|e| TableError::InvalidPattern {
                    property: config.property.clone(),
                    message: e.to_string(),
                })?;
                Check::Pattern(compiled)
            }
            RuleKind::OneOf { values } => Check::OneOf(values.clone()),
        };
        self.rules.push(ColumnRule {
            property: config.property.clone(),
            check,
        });
        Ok(())
    }

    pub fn required(self, property: impl Into<String>) -> Self {
        self.with(property.into(), Check::Required)
    }

    pub fn min(self, property: impl Into<String>, value: f64) -> Self {
        self.with(property.into(), Check::Min(value))
    }

    pub fn max(self, property: impl Into<String>, value: f64) -> Self {
        self.with(property.into(), Check::Max(value))
    }

    fn with(mut self, property: String, check: Check) -> Self {
        self.rules.push(ColumnRule { property, check });
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl RowValidator for RuleSet {
    fn accepts(&self, record: &Record) -> bool {
        self.rules.iter().all(|rule| rule.accepts(record))
    }
}
