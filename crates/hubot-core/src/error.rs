use thiserror::Error;

/// Top-level error type for Hubot.
#[derive(Debug, Error)]
pub enum HubotError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// The host worker could not satisfy a request (missing contract, failed insert).
    #[error("worker error: {0}")]
    Worker(String),

    /// Leave lookup error.
    #[error("leave error: {0}")]
    Leave(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
