//! Error types for the MedBox engine.

use thiserror::Error;

/// All possible errors from the MedBox engine.
///
/// Store mutations never fail; errors only come from decoding and encoding
/// persisted state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("failed to encode: {0}")]
    Encode(String),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
