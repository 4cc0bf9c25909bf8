//! Remote document sync: whole-document pull and push.
//!
//! Pull replaces, push overwrites. There is no conflict detection; when two
//! sessions edit concurrently the later push wins.

use crate::auth::AccessToken;
use crate::error::Result;
use crate::remote::RemoteDocument;
use medbox_engine::Document;
use std::sync::Arc;

/// Pull/push front for a [`RemoteDocument`]. Cheap to clone.
#[derive(Debug)]
pub struct RemoteSync<R> {
    remote: Arc<R>,
}

impl<R> Clone for RemoteSync<R> {
    fn clone(&self) -> Self {
        Self {
            remote: Arc::clone(&self.remote),
        }
    }
}

impl<R: RemoteDocument> RemoteSync<R> {
    pub fn new(remote: R) -> Self {
        Self {
            remote: Arc::new(remote),
        }
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn is_configured(&self) -> bool {
        self.remote.is_configured()
    }

    /// Fetch and decode the document. Empty content is an empty document.
    pub async fn pull(&self, token: &AccessToken) -> Result<Document> {
        let content = self.remote.fetch(token).await?;
        let Some(content) = content else {
            return Ok(Document::default());
        };

        let decoded = Document::decode(&content)?;
        if decoded.skipped > 0 {
            tracing::warn!(
                "Dropped {} unreadable entries from remote document",
                decoded.skipped
            );
        }
        let document = decoded.value;
        tracing::debug!(
            "Pulled document with {} records and {} categories",
            document.meds.len(),
            document.categories.len()
        );
        Ok(document)
    }

    /// Encode `document` and overwrite the remote copy.
    pub async fn push(&self, token: &AccessToken, document: &Document) -> Result<()> {
        let content = document.to_json()?;
        self.remote.replace(token, content).await?;
        tracing::debug!("Pushed document with {} records", document.meds.len());
        Ok(())
    }
}
