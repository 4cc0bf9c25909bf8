//! Named JSON documents, one file each.
//!
//! Writes go to `<id>.json.tmp` and are renamed over `<id>.json`, so a reader
//! never sees a half-written document. The latest content per id is also held
//! in memory; the file is only read on the first access after startup.

use dashmap::DashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::{AppError, Result};

/// Longest accepted document identifier.
const MAX_ID_LEN: usize = 128;

/// A validated document identifier: `[A-Za-z0-9_-]{1,128}`.
///
/// The identifier becomes a file name, so nothing else is allowed through.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn parse(raw: &str) -> Result<Self> {
        let valid = !raw.is_empty()
            && raw.len() <= MAX_ID_LEN
            && raw
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
        if valid {
            Ok(Self(raw.to_string()))
        } else {
            Err(AppError::BadRequest(format!("Invalid document id: {raw:?}")))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Store of named documents under a data directory.
#[derive(Debug)]
pub struct DocumentStore {
    dir: PathBuf,
    cache: DashMap<DocumentId, Arc<str>>,
    write_lock: Mutex<()>,
}

impl DocumentStore {
    /// Open the store, creating `dir` if needed.
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self {
            dir,
            cache: DashMap::new(),
            write_lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_of(&self, id: &DocumentId) -> PathBuf {
        self.dir.join(format!("{}.json", id.as_str()))
    }

    /// Current content of a document, or `None` if it was never written.
    pub async fn get(&self, id: &DocumentId) -> Result<Option<Arc<str>>> {
        if let Some(content) = self.cache.get(id) {
            return Ok(Some(Arc::clone(content.value())));
        }

        match tokio::fs::read_to_string(self.path_of(id)).await {
            Ok(content) => {
                let content: Arc<str> = content.into();
                // A concurrent put may have landed while we were reading.
                let entry = self
                    .cache
                    .entry(id.clone())
                    .or_insert_with(|| Arc::clone(&content));
                Ok(Some(Arc::clone(entry.value())))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace a document's content in full. The last write wins.
    pub async fn put(&self, id: &DocumentId, content: String) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let path = self.path_of(id);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content.as_bytes()).await?;
        tokio::fs::rename(&tmp, &path).await?;

        tracing::debug!("Stored document {} ({} bytes)", id.as_str(), content.len());
        self.cache.insert(id.clone(), content.into());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> DocumentId {
        DocumentId::parse(raw).unwrap()
    }

    #[test]
    fn test_document_id_validation() {
        assert!(DocumentId::parse("household").is_ok());
        assert!(DocumentId::parse("a-b_C9").is_ok());
        assert!(DocumentId::parse(&"x".repeat(128)).is_ok());

        assert!(DocumentId::parse("").is_err());
        assert!(DocumentId::parse(&"x".repeat(129)).is_err());
        assert!(DocumentId::parse("../etc/passwd").is_err());
        assert!(DocumentId::parse("a.json").is_err());
        assert!(DocumentId::parse("with space").is_err());
    }

    #[tokio::test]
    async fn test_missing_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::open(dir.path()).await.unwrap();
        assert!(store.get(&id("nothing")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::open(dir.path()).await.unwrap();

        store.put(&id("doc"), "first".into()).await.unwrap();
        store.put(&id("doc"), "second".into()).await.unwrap();

        assert_eq!(store.get(&id("doc")).await.unwrap().as_deref(), Some("second"));
        let on_disk = std::fs::read_to_string(dir.path().join("doc.json")).unwrap();
        assert_eq!(on_disk, "second");
        assert!(!dir.path().join("doc.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_reopen_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = DocumentStore::open(dir.path()).await.unwrap();
            store.put(&id("doc"), r#"{"meds":[]}"#.into()).await.unwrap();
        }

        let store = DocumentStore::open(dir.path()).await.unwrap();
        assert_eq!(
            store.get(&id("doc")).await.unwrap().as_deref(),
            Some(r#"{"meds":[]}"#)
        );
    }

    #[tokio::test]
    async fn test_open_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = DocumentStore::open(&nested).await.unwrap();
        assert!(store.dir().is_dir());
    }
}
