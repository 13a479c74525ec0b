//! Shared registry of named channels.
//!
//! This module provides the `ChannelHub` that every participant in one
//! execution context shares. It creates channels on first use, routes posts
//! to the channel with the matching name, and drops channels once their last
//! subscriber leaves.

use crate::channel::NamedChannel;
use crate::error::{ChannelError, Result};
use crate::subscriber::{ChannelName, Envelope, Subscriber, SubscriberId};
use crate::subscription::Subscription;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;

/// Whether a post is delivered back to the subscription that made it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Loopback {
    /// Never deliver a post to its own sender.
    #[default]
    Exclude,
    /// Deliver a post to every subscriber, its sender included.
    Include,
}

/// Configuration for a channel hub.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// Loopback behaviour for every channel of the hub.
    pub loopback: Loopback,
    /// Maximum number of subscribers on one channel.
    pub max_subscribers: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            loopback: Loopback::Exclude,
            max_subscribers: 64,
        }
    }
}

/// Counters describing a hub.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HubStats {
    /// Channels with at least one subscriber.
    pub channels: usize,
    /// Subscribers across all channels.
    pub subscribers: usize,
    /// Posts routed so far.
    pub published: u64,
    /// Envelopes queued for live channels so far.
    pub delivered: u64,
}

struct HubState<T> {
    channels: HashMap<ChannelName, NamedChannel<T>>,
    published: u64,
}

/// Registry of named channels.
///
/// Cloning a hub is cheap and every clone refers to the same channels, so a
/// hub can be handed to each component that needs to open a channel.
pub struct ChannelHub<T> {
    state: Arc<Mutex<HubState<T>>>,
    config: Arc<HubConfig>,
}

impl<T> Clone for ChannelHub<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            config: Arc::clone(&self.config),
        }
    }
}

impl<T> std::fmt::Debug for ChannelHub<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelHub")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<T: Clone + Send + 'static> ChannelHub<T> {
    /// Create a new hub.
    pub fn new(config: HubConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(HubState {
                channels: HashMap::new(),
                published: 0,
            })),
            config: Arc::new(config),
        }
    }

    /// Create a new hub with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(HubConfig::default())
    }

    /// Get the hub configuration.
    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    fn lock(&self) -> MutexGuard<'_, HubState<T>> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // ========== Membership ==========

    /// Open a subscription on the named channel, creating the channel if
    /// needed.
    ///
    /// # Arguments
    ///
    /// * `name` - The channel name.
    ///
    /// # Returns
    ///
    /// A new `Subscription`, or an error if the name is empty or the channel
    /// is full.
    pub fn open(&self, name: &str) -> Result<Subscription<T>> {
        let name = ChannelName::new(name)?;
        let id = SubscriberId::generate();
        let (tx, rx) = mpsc::unbounded_channel();

        let mut state = self.lock();
        let channel = state
            .channels
            .entry(name.clone())
            .or_insert_with(|| NamedChannel::new(name.clone()));

        if channel.len() >= self.config.max_subscribers {
            let max = self.config.max_subscribers;
            if channel.is_empty() {
                state.channels.remove(&name);
            }
            return Err(ChannelError::ChannelFull { name, max });
        }

        channel.join(Subscriber::new(id.clone(), tx));
        tracing::debug!(
            "Subscriber {} joined channel {} ({} member(s))",
            id,
            channel.name(),
            channel.len()
        );
        drop(state);

        Ok(Subscription::new(id, name, self.clone(), rx))
    }

    /// Remove a subscriber from a channel. Unknown names and ids are ignored.
    pub(crate) fn leave(&self, name: &ChannelName, id: &SubscriberId) {
        let mut state = self.lock();
        let Some(channel) = state.channels.get_mut(name) else {
            return;
        };
        if channel.leave(id) {
            tracing::debug!("Subscriber {} left channel {}", id, name);
        }
        if channel.is_empty() {
            state.channels.remove(name);
        }
    }

    /// Disconnect every subscriber of a channel.
    ///
    /// Receivers see the end of their queue once they have drained what was
    /// already delivered. Returns the number of subscribers disconnected.
    pub fn close_channel(&self, name: &str) -> usize {
        let Ok(name) = ChannelName::new(name) else {
            return 0;
        };
        let removed = self
            .lock()
            .channels
            .remove(&name)
            .map(|channel| channel.len())
            .unwrap_or(0);
        if removed > 0 {
            tracing::debug!("Closed channel {} ({} member(s))", name, removed);
        }
        removed
    }

    // ========== Routing ==========

    /// Route an envelope to the channel with the given name.
    ///
    /// Returns the number of subscribers the envelope was queued for, or
    /// `ChannelError::Closed` if the channel no longer exists.
    pub(crate) fn publish(&self, name: &ChannelName, envelope: Envelope<T>) -> Result<usize> {
        let mut state = self.lock();
        state.published += 1;

        let Some(channel) = state.channels.get_mut(name) else {
            return Err(ChannelError::Closed(name.clone()));
        };

        let delivered = match self.config.loopback {
            Loopback::Exclude => channel.broadcast_to_others(envelope),
            Loopback::Include => channel.broadcast_to_all(envelope),
        };
        tracing::trace!("Routed post on {} to {} subscriber(s)", name, delivered);
        Ok(delivered)
    }

    // ========== Inspection ==========

    /// Get the number of subscribers on a channel.
    pub fn subscriber_count(&self, name: &str) -> usize {
        let Ok(name) = ChannelName::new(name) else {
            return 0;
        };
        self.lock()
            .channels
            .get(&name)
            .map(NamedChannel::len)
            .unwrap_or(0)
    }

    /// Get the names of all channels with subscribers, sorted.
    pub fn channel_names(&self) -> Vec<ChannelName> {
        let mut names: Vec<ChannelName> = self.lock().channels.keys().cloned().collect();
        names.sort();
        names
    }

    /// Get hub counters.
    pub fn stats(&self) -> HubStats {
        let state = self.lock();
        HubStats {
            channels: state.channels.len(),
            subscribers: state.channels.values().map(NamedChannel::len).sum(),
            published: state.published,
            delivered: state.channels.values().map(NamedChannel::delivered).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_creates_channel() {
        let hub = ChannelHub::<u32>::with_defaults();
        let _a = hub.open("t1").unwrap();
        let _b = hub.open("t1").unwrap();
        let _c = hub.open("t2").unwrap();

        assert_eq!(hub.subscriber_count("t1"), 2);
        assert_eq!(hub.subscriber_count("t2"), 1);
        assert_eq!(hub.subscriber_count("missing"), 0);
        assert_eq!(hub.channel_names().len(), 2);
    }

    #[test]
    fn test_open_rejects_empty_name() {
        let hub = ChannelHub::<u32>::with_defaults();
        assert!(matches!(hub.open(""), Err(ChannelError::EmptyName)));
        assert_eq!(hub.stats().channels, 0);
    }

    #[test]
    fn test_open_respects_max_subscribers() {
        let hub = ChannelHub::<u32>::new(HubConfig {
            max_subscribers: 1,
            ..Default::default()
        });
        let _a = hub.open("t1").unwrap();
        let err = hub.open("t1").unwrap_err();
        assert!(matches!(err, ChannelError::ChannelFull { max: 1, .. }));
    }

    #[test]
    fn test_post_excludes_sender_by_default() {
        let hub = ChannelHub::<u32>::with_defaults();
        let mut a = hub.open("t1").unwrap();
        let mut b = hub.open("t1").unwrap();

        assert_eq!(a.post(1).unwrap(), 1);
        assert!(a.try_recv().is_none());
        assert_eq!(b.try_recv().unwrap().payload, 1);
    }

    #[test]
    fn test_post_includes_sender_with_loopback() {
        let hub = ChannelHub::<u32>::new(HubConfig {
            loopback: Loopback::Include,
            ..Default::default()
        });
        let mut a = hub.open("t1").unwrap();
        let mut b = hub.open("t1").unwrap();

        assert_eq!(a.post(1).unwrap(), 2);
        assert_eq!(&a.try_recv().unwrap().sender, a.id());
        assert_eq!(b.try_recv().unwrap().payload, 1);
    }

    #[test]
    fn test_channels_are_isolated() {
        let hub = ChannelHub::<u32>::with_defaults();
        let mut a = hub.open("t1").unwrap();
        let mut other = hub.open("t2").unwrap();

        assert_eq!(a.post(1).unwrap(), 0);
        assert!(other.try_recv().is_none());
    }

    #[test]
    fn test_last_leave_removes_channel() {
        let hub = ChannelHub::<u32>::with_defaults();
        let a = hub.open("t1").unwrap();
        drop(a);
        assert!(hub.channel_names().is_empty());
    }

    #[test]
    fn test_close_channel_disconnects_members() {
        let hub = ChannelHub::<u32>::with_defaults();
        let mut a = hub.open("t1").unwrap();
        let _b = hub.open("t1").unwrap();

        assert_eq!(hub.close_channel("t1"), 2);
        assert!(matches!(a.post(1), Err(ChannelError::Closed(_))));
    }

    #[test]
    fn test_stats() {
        let hub = ChannelHub::<u32>::with_defaults();
        let mut a = hub.open("t1").unwrap();
        let _b = hub.open("t1").unwrap();
        let _c = hub.open("t1").unwrap();
        a.post(1).unwrap();

        let stats = hub.stats();
        assert_eq!(stats.channels, 1);
        assert_eq!(stats.subscribers, 3);
        assert_eq!(stats.published, 1);
        assert_eq!(stats.delivered, 2);
    }

    #[test]
    fn test_config_deserialize_defaults() {
        let config: HubConfig = serde_json::from_str(r#"{"loopback":"include"}"#).unwrap();
        assert_eq!(config.loopback, Loopback::Include);
        assert_eq!(config.max_subscribers, 64);
    }
}
