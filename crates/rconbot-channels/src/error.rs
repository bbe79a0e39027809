//! Error types for rconbot-channels

use thiserror::Error;

/// Channel error type
#[derive(Debug, Error)]
pub enum Error {
    /// Discord API error
    #[error("discord error: {0}")]
    Discord(String),

    /// Gateway login or connection failed
    #[error("login failed: {0}")]
    Login(String),

    /// Missing or invalid configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Target channel missing or not text-capable
    #[error("channel unavailable: {0}")]
    ChannelUnavailable(String),
}

impl From<serenity::Error> for Error {
    fn from(e: serenity::Error) -> Self {
        Self::Discord(e.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
