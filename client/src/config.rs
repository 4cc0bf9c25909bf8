//! Configuration for a sync session, loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default coalescing window for remote writes.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);

/// Default scope requested from the identity provider: access to files this
/// app created, nothing else.
pub const DEFAULT_SCOPE: &str = "documents.file";

/// Session configuration.
#[derive(Clone)]
pub struct SyncConfig {
    /// Base URL of the document endpoint
    pub remote_url: String,
    /// Identifier of the single shared document; sync is refused without it
    pub document_id: Option<String>,
    /// Delay after the last mutation before pushing
    pub debounce: Duration,
    /// Directory holding the local snapshot
    pub cache_dir: PathBuf,
    /// Scope requested when signing in
    pub scope: String,
    /// Pre-issued access token, if any
    pub access_token: Option<String>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            remote_url: "http://localhost:3000".to_string(),
            document_id: None,
            debounce: DEFAULT_DEBOUNCE,
            cache_dir: PathBuf::from(".medbox"),
            scope: DEFAULT_SCOPE.to_string(),
            access_token: None,
        }
    }
}

impl std::fmt::Debug for SyncConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncConfig")
            .field("remote_url", &self.remote_url)
            .field("document_id", &self.document_id)
            .field("debounce", &self.debounce)
            .field("cache_dir", &self.cache_dir)
            .field("scope", &self.scope)
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl SyncConfig {
    /// Load `.env` if present, then read the environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let text = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let remote_url = match text("MEDBOX_REMOTE_URL") {
            Some(url) if url.starts_with("http://") || url.starts_with("https://") => {
                url.trim_end_matches('/').to_string()
            }
            Some(_) => return Err(ConfigError::InvalidRemoteUrl),
            None => defaults.remote_url,
        };

        let debounce = match text("MEDBOX_DEBOUNCE_MS") {
            Some(raw) => Duration::from_millis(
                raw.parse()
                    .map_err(|_| ConfigError::InvalidDebounce(raw.clone()))?,
            ),
            None => defaults.debounce,
        };

        Ok(Self {
            remote_url,
            document_id: text("MEDBOX_DOCUMENT_ID"),
            debounce,
            cache_dir: text("MEDBOX_CACHE_DIR").map_or(defaults.cache_dir, PathBuf::from),
            scope: text("MEDBOX_SCOPE").unwrap_or(defaults.scope),
            access_token: text("MEDBOX_ACCESS_TOKEN"),
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("MEDBOX_REMOTE_URL must include http:// or https://")]
    InvalidRemoteUrl,

    #[error("Invalid MEDBOX_DEBOUNCE_MS value: {0}")]
    InvalidDebounce(String),
}
