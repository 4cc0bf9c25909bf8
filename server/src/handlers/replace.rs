//! Replace handler - overwrites a document's content.

use medbox_engine::Document;

use crate::error::Result;
use crate::storage::{DocumentId, DocumentStore};

/// Validate `body` as a document and store it verbatim.
///
/// A blank body stores the empty document.
pub async fn handle_replace(store: &DocumentStore, id: &DocumentId, body: String) -> Result<()> {
    let document = Document::from_json(&body)?;
    let body = if body.trim().is_empty() {
        document.to_json()?
    } else {
        body
    };

    store.put(id, body).await?;
    tracing::info!(
        "Replaced document {}: {} records, {} categories",
        id.as_str(),
        document.meds.len(),
        document.categories.len()
    );
    Ok(())
}
