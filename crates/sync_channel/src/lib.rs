//! Named publish/subscribe channels.
//!
//! A [`ChannelHub`] holds every channel of one execution context. Each
//! participant opens a [`Subscription`] by name; whatever it posts is queued
//! for every other subscription on that name (and for itself too when the hub
//! is configured with [`Loopback::Include`]). Posting never blocks and delivery
//! happens on a later turn, when the receiver drains its queue.
//!
//! # Modules
//!
//! - `subscriber`: identifiers, envelopes and the hub-side subscriber record
//! - `channel`: membership and fan-out for a single channel name
//! - `hub`: the shared registry of named channels
//! - `subscription`: the participant-side handle
//! - `error`: error types for the crate
//!
//! # Example
//!
//! ```
//! use sync_channel::ChannelHub;
//!
//! let hub = ChannelHub::<String>::with_defaults();
//! let mut owner = hub.open("t1").unwrap();
//! let mut table = hub.open("t1").unwrap();
//!
//! assert_eq!(owner.post("save".to_string()).unwrap(), 1);
//!
//! let envelope = table.try_recv().unwrap();
//! assert_eq!(envelope.payload, "save");
//! assert_eq!(&envelope.sender, owner.id());
//! ```

mod channel;
pub mod error;
pub mod hub;
pub mod subscriber;
pub mod subscription;

pub use error::{ChannelError, Result};
pub use hub::{ChannelHub, HubConfig, HubStats, Loopback};
pub use subscriber::{ChannelName, Envelope, SubscriberId};
pub use subscription::Subscription;
