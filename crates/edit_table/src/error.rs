//! Error types for table configuration and wire messages
//!
//! Edit-session transitions never fail; these errors only come from parsing
//! and channel setup.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid pattern for column '{property}': {message}")]
    InvalidPattern { property: String, message: String },

    #[error("Channel error: {0}")]
    Channel(#[from] sync_channel::ChannelError),
}

pub type Result<T> = std::result::Result<T, TableError>;
