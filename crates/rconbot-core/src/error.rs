//! Error types for rconbot-core

use thiserror::Error;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// The external command could not be started.
    ///
    /// Displays the bare launcher message so transcripts read `Failed: <message>`.
    #[error("{0}")]
    Launch(String),

    /// The command was started but waiting on it failed
    #[error("execution failed: {0}")]
    Execution(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
