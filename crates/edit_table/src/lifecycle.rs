//! Attribute and lifecycle surface shared by table components.
//!
//! A component declares which attribute names it observes and gets a callback
//! with the previous and next value whenever one of them changes. The
//! `connected` and `disconnected` hooks bracket the time a component is live;
//! anything acquired in `connected` must be released in `disconnected`.

use std::collections::BTreeMap;

/// A change to one attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeChange {
    pub name: String,
    pub previous: Option<String>,
    pub next: String,
}

/// String attributes of a component.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Attributes {
    values: BTreeMap<String, String>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Store a value.
    ///
    /// Returns the change, or `None` if the attribute already had this value.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Option<AttributeChange> {
        let next = value.into();
        if self.get(name) == Some(next.as_str()) {
            return None;
        }
        let previous = self.values.insert(name.to_string(), next.clone());
        Some(AttributeChange {
            name: name.to_string(),
            previous,
            next,
        })
    }

    /// Drop a value. Returns the value it had.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.values.remove(name)
    }
}

/// Lifecycle and attribute callbacks of a component.
pub trait Component {
    /// Attribute names whose changes reach [`attribute_changed`](Self::attribute_changed).
    fn observed_attributes(&self) -> &'static [&'static str];

    fn attributes(&self) -> &Attributes;

    fn attributes_mut(&mut self) -> &mut Attributes;

    fn attribute_changed(&mut self, change: &AttributeChange);

    /// Called when the component becomes live.
    fn connected(&mut self) {}

    /// Called when the component stops being live.
    fn disconnected(&mut self) {}

    /// Set an attribute, forwarding real changes of observed attributes.
    ///
    /// Returns `true` if `attribute_changed` was called.
    fn set_attribute(&mut self, name: &str, value: impl Into<String>) -> bool
    where
        Self: Sized,
    {
        let Some(change) = self.attributes_mut().set(name, value) else {
            return false;
        };
        if !self.observed_attributes().contains(&name) {
            return false;
        }
        self.attribute_changed(&change);
        true
    }

    fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes().get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Probe {
        attributes: Attributes,
        changes: Vec<AttributeChange>,
    }

    impl Component for Probe {
        fn observed_attributes(&self) -> &'static [&'static str] {
            &["watched"]
        }

        fn attributes(&self) -> &Attributes {
            &self.attributes
        }

        fn attributes_mut(&mut self) -> &mut Attributes {
            &mut self.attributes
        }

        fn attribute_changed(&mut self, change: &AttributeChange) {
            self.changes.push(change.clone());
        }
    }

    #[test]
    fn test_observed_attribute_forwards_change() {
        let mut probe = Probe::default();
        assert!(probe.set_attribute("watched", "a"));
        assert!(probe.set_attribute("watched", "b"));

        assert_eq!(probe.changes.len(), 2);
        assert_eq!(probe.changes[1].previous.as_deref(), Some("a"));
        assert_eq!(probe.changes[1].next, "b");
    }

    #[test]
    fn test_unchanged_value_is_not_forwarded() {
        let mut probe = Probe::default();
        probe.set_attribute("watched", "a");
        assert!(!probe.set_attribute("watched", "a"));
        assert_eq!(probe.changes.len(), 1);
    }

    #[test]
    fn test_unobserved_attribute_is_stored_only() {
        let mut probe = Probe::default();
        assert!(!probe.set_attribute("other", "x"));
        assert_eq!(probe.get_attribute("other"), Some("x"));
        assert!(probe.changes.is_empty());
    }
}
