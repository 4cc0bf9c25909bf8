//! Fetch handler - serves a document's full content.

use std::sync::Arc;

use crate::error::Result;
use crate::storage::{DocumentId, DocumentStore};

/// Content served for a document that was never written.
pub const EMPTY_DOCUMENT: &str = r#"{"meds":[],"categories":[]}"#;

/// Read the stored content of `id`, or the empty document.
pub async fn handle_fetch(store: &DocumentStore, id: &DocumentId) -> Result<Arc<str>> {
    match store.get(id).await? {
        Some(content) => Ok(content),
        None => {
            tracing::debug!("Document {} not written yet", id.as_str());
            Ok(Arc::from(EMPTY_DOCUMENT))
        }
    }
}
