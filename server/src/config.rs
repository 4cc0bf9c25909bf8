//! Configuration management for the server.

use std::env;
use std::path::PathBuf;

/// Default cap on a stored document body.
pub const DEFAULT_MAX_DOCUMENT_BYTES: usize = 1024 * 1024;

/// Server configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Directory holding one `<id>.json` file per document
    pub data_dir: PathBuf,
    /// Bearer token every document request must carry
    pub auth_token: String,
    /// Largest accepted `PUT` body
    pub max_document_bytes: usize,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("data_dir", &self.data_dir)
            .field("auth_token", &"[REDACTED]")
            .field("max_document_bytes", &self.max_document_bytes)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let data_dir = lookup("DATA_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .unwrap_or_else(|| "./data".to_string())
            .into();

        let auth_token = lookup("AUTH_TOKEN")
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .ok_or(ConfigError::MissingAuthToken)?;

        let max_document_bytes = match lookup("MAX_DOCUMENT_BYTES") {
            Some(raw) => raw
                .trim()
                .parse()
                .ok()
                .filter(|bytes| *bytes > 0)
                .ok_or(ConfigError::InvalidMaxDocumentBytes)?,
            None => DEFAULT_MAX_DOCUMENT_BYTES,
        };

        Ok(Self {
            host,
            port,
            data_dir,
            auth_token,
            max_document_bytes,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("AUTH_TOKEN environment variable is required")]
    MissingAuthToken,

    #[error("Invalid PORT value")]
    InvalidPort,

    #[error("Invalid MAX_DOCUMENT_BYTES value")]
    InvalidMaxDocumentBytes,
}
