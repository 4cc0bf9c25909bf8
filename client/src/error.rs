//! Error types for the sync layer.
//!
//! None of these are fatal to a [`Session`](crate::Session): it turns them
//! into a [`SyncStatus`](crate::SyncStatus) and a log line.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("remote API error: {0}")]
    Api(String),

    #[error("cache IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("engine error: {0}")]
    Engine(#[from] medbox_engine::Error),

    #[error("remote document is not configured")]
    NotConfigured,

    #[error("no tokio runtime available")]
    NoRuntime,

    #[error("invalid configuration: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Result type alias for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;
