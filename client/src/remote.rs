//! Access to the single shared remote document.
//!
//! The remote API has two calls: fetch the whole content, replace the
//! whole content. There is no diffing, versioning or locking.

use crate::auth::AccessToken;
use crate::error::{Result, SyncError};
use reqwest::StatusCode;
use std::future::Future;

/// A remote location holding one JSON document.
pub trait RemoteDocument: Send + Sync + 'static {
    /// Whether a document identifier is configured. Sync is disabled
    /// otherwise.
    fn is_configured(&self) -> bool {
        true
    }

    /// Fetch the document content. `None` means the document has no content.
    fn fetch(&self, token: &AccessToken) -> impl Future<Output = Result<Option<String>>> + Send;

    /// Overwrite the document content in full.
    fn replace(
        &self,
        token: &AccessToken,
        content: String,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// A document served over HTTP at `{base}/documents/{id}`.
///
/// `GET` reads the content, `PUT` replaces it; both carry the bearer token.
#[derive(Debug, Clone)]
pub struct HttpRemote {
    base_url: String,
    document_id: Option<String>,
    client: reqwest::Client,
}

impl HttpRemote {
    pub fn new(base_url: impl Into<String>, document_id: Option<String>) -> Result<Self> {
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            document_id: document_id.filter(|id| !id.trim().is_empty()),
            client: reqwest::Client::builder().build()?,
        })
    }

    /// Build from session configuration.
    pub fn from_config(config: &crate::SyncConfig) -> Result<Self> {
        Self::new(config.remote_url.clone(), config.document_id.clone())
    }

    fn document_url(&self) -> Result<String> {
        let id = self.document_id.as_deref().ok_or(SyncError::NotConfigured)?;
        Ok(format!("{}/documents/{}", self.base_url, id))
    }
}

impl RemoteDocument for HttpRemote {
    fn is_configured(&self) -> bool {
        self.document_id.is_some()
    }

    async fn fetch(&self, token: &AccessToken) -> Result<Option<String>> {
        let url = self.document_url()?;
        let response = self
            .client
            .get(&url)
            .bearer_auth(token.secret())
            .header("Accept", "application/json")
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let body = response.text().await?;
                Ok((!body.trim().is_empty()).then_some(body))
            }
            status => Err(SyncError::Api(format!("fetch returned HTTP {}", status.as_u16()))),
        }
    }

    async fn replace(&self, token: &AccessToken, content: String) -> Result<()> {
        let url = self.document_url()?;
        let response = self
            .client
            .put(&url)
            .bearer_auth(token.secret())
            .header("Content-Type", "application/json")
            .body(content)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(SyncError::Api(format!("replace returned HTTP {}", status.as_u16())))
        }
    }
}
