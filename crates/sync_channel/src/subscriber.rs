//! Identifiers and envelopes for channel traffic.
//!
//! This module provides the types that travel with every posted message and
//! the hub-side record that owns the delivery queue of one subscription.

use crate::error::{ChannelError, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Name of a channel. Every subscription opened with the same name shares
/// one channel.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChannelName(String);

impl ChannelName {
    /// Create a channel name.
    ///
    /// # Errors
    ///
    /// Returns `ChannelError::EmptyName` if the name is empty or whitespace.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ChannelError::EmptyName);
        }
        Ok(ChannelName(name))
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ChannelName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for one subscription.
///
/// A component that opens the same channel twice gets two ids; the id
/// identifies the membership, not the component.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriberId(pub String);

impl SubscriberId {
    /// Create a subscriber ID.
    pub fn new(id: impl Into<String>) -> Self {
        SubscriberId(id.into())
    }

    /// Generate a new unique subscriber ID.
    pub fn generate() -> Self {
        SubscriberId(uuid::Uuid::new_v4().to_string())
    }
}

impl std::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SubscriberId {
    fn from(s: &str) -> Self {
        SubscriberId(s.to_string())
    }
}

/// A posted message as seen by a receiver.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Subscription that posted the message.
    pub sender: SubscriberId,
    /// Position of this message among the sender's posts, starting at 0.
    pub seq: u64,
    /// The message itself.
    pub payload: T,
}

/// Hub-side half of a subscription: the queue messages are delivered into.
#[derive(Debug)]
pub(crate) struct Subscriber<T> {
    id: SubscriberId,
    sender: mpsc::UnboundedSender<Envelope<T>>,
    delivered: u64,
}

impl<T> Subscriber<T> {
    pub(crate) fn new(id: SubscriberId, sender: mpsc::UnboundedSender<Envelope<T>>) -> Self {
        Self {
            id,
            sender,
            delivered: 0,
        }
    }

    pub(crate) fn id(&self) -> &SubscriberId {
        &self.id
    }

    pub(crate) fn delivered(&self) -> u64 {
        self.delivered
    }

    /// Queue an envelope for this subscriber.
    ///
    /// Returns `false` if the receiving side has been dropped.
    pub(crate) fn deliver(&mut self, envelope: Envelope<T>) -> bool {
        if self.sender.send(envelope).is_err() {
            return false;
        }
        self.delivered += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_name_rejects_blank() {
        assert_eq!(ChannelName::new(""), Err(ChannelError::EmptyName));
        assert_eq!(ChannelName::new("   "), Err(ChannelError::EmptyName));
        assert_eq!(ChannelName::new("t1").unwrap().as_str(), "t1");
    }

    #[test]
    fn test_subscriber_id_generation() {
        let id1 = SubscriberId::generate();
        let id2 = SubscriberId::generate();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_subscriber_deliver_counts() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut subscriber = Subscriber::new(SubscriberId::from("a"), tx);

        assert!(subscriber.deliver(Envelope {
            sender: SubscriberId::from("b"),
            seq: 0,
            payload: 7u32,
        }));
        assert_eq!(subscriber.delivered(), 1);
        assert_eq!(rx.try_recv().unwrap().payload, 7);

        drop(rx);
        assert!(!subscriber.deliver(Envelope {
            sender: SubscriberId::from("b"),
            seq: 1,
            payload: 8u32,
        }));
        assert_eq!(subscriber.delivered(), 1);
    }

    #[test]
    fn test_envelope_json_shape() {
        let envelope = Envelope {
            sender: SubscriberId::from("s-1"),
            seq: 3,
            payload: "edit".to_string(),
        };
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["sender"], "s-1");
        assert_eq!(json["seq"], 3);
        assert_eq!(json["payload"], "edit");
    }
}
