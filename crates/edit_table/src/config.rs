//! Table configuration.

use crate::error::Result;
use crate::record::Record;
use crate::validate::{RuleConfig, RuleSet};
use serde::{Deserialize, Serialize};

/// Configuration for one table instance.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Channel to open on construction.
    pub channel: Option<String>,
    /// Record appended by `add`. Defaults to an empty string per column.
    pub blank_record: Option<Record>,
    /// Column rules applied on `save`.
    pub rules: Vec<RuleConfig>,
    /// Replace rows with a `change` committed by another table while idle.
    pub adopt_peer_changes: bool,
    /// Let `data` end an open edit session instead of leaving it in place.
    pub data_abandons_session: bool,
}

impl TableConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Compile the configured rules.
    pub fn rule_set(&self) -> Result<RuleSet> {
        RuleSet::from_config(&self.rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TableConfig::from_json("{}").unwrap();
        assert!(config.channel.is_none());
        assert!(config.blank_record.is_none());
        assert!(config.rules.is_empty());
        assert!(!config.adopt_peer_changes);
        assert!(!config.data_abandons_session);
    }

    #[test]
    fn test_full_config() {
        let config = TableConfig::from_json(
            r#"{
                "channel": "t1",
                "blank_record": {"id": 0, "qty": 0},
                "rules": [{"property": "qty", "rule": "min", "value": 0}],
                "adopt_peer_changes": true
            }"#,
        )
        .unwrap();
        assert_eq!(config.channel.as_deref(), Some("t1"));
        assert_eq!(config.blank_record.unwrap().display("qty"), "0");
        assert_eq!(config.rules.len(), 1);
        assert!(config.adopt_peer_changes);
    }

    #[test]
    fn test_rule_set_compiles() {
        let config = TableConfig::from_json(
            r#"{"rules": [{"property": "code", "rule": "pattern", "regex": "["}]}"#,
        )
        .unwrap();
        assert!(config.rule_set().is_err());
    }
}
