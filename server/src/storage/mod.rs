//! On-disk document storage.

mod documents;

pub use documents::{DocumentId, DocumentStore};
