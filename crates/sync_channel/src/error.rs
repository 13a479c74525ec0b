//! Error types for the sync channel

use crate::subscriber::ChannelName;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    #[error("Channel name must not be empty")]
    EmptyName,

    #[error("Channel {name} is full (max: {max})")]
    ChannelFull { name: ChannelName, max: usize },

    #[error("Subscription to channel {0} is closed")]
    Closed(ChannelName),
}

pub type Result<T> = std::result::Result<T, ChannelError>;
