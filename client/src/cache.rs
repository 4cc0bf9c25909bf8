//! Local snapshot cache: the on-device copy of the record collection.
//!
//! Only medicine records are cached. Categories are not, so category edits
//! made while signed out are lost on restart unless a remote pull restores
//! them.

use crate::error::Result;
use medbox_engine::{snapshot, MedicineRecord, SNAPSHOT_KEY};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// A durable slot holding the last-known records.
pub trait SnapshotCache: Send {
    /// Read the snapshot. Missing or malformed content yields an empty
    /// collection; this never fails.
    fn load(&self) -> Vec<MedicineRecord>;

    /// Overwrite the snapshot with `records`.
    fn save(&mut self, records: &[MedicineRecord]) -> Result<()>;
}

fn decode_or_empty(raw: &str, source: &dyn std::fmt::Display) -> Vec<MedicineRecord> {
    match snapshot::decode_snapshot(raw) {
        Ok(decoded) => {
            if decoded.skipped > 0 {
                tracing::warn!(
                    "Dropped {} unreadable records from snapshot at {}",
                    decoded.skipped,
                    source
                );
            }
            decoded.value
        }
        Err(e) => {
            tracing::warn!("Discarding malformed snapshot at {}: {}", source, e);
            Vec::new()
        }
    }
}

/// Snapshot stored as a JSON file named after [`SNAPSHOT_KEY`].
#[derive(Debug, Clone)]
pub struct FileCache {
    path: PathBuf,
}

impl FileCache {
    /// Cache inside `dir`. The directory is created on first save.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{SNAPSHOT_KEY}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotCache for FileCache {
    fn load(&self) -> Vec<MedicineRecord> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => decode_or_empty(&raw, &self.path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No snapshot at {}", self.path.display());
                Vec::new()
            }
            Err(e) => {
                tracing::warn!("Failed to read snapshot {}: {}", self.path.display(), e);
                Vec::new()
            }
        }
    }

    fn save(&mut self, records: &[MedicineRecord]) -> Result<()> {
        let json = snapshot::encode_records(records)?;
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Snapshot held in memory. Clones share the same slot, so a test can keep a
/// handle and inspect what a session wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cache whose slot already holds `raw`.
    pub fn with_contents(raw: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(raw.into()))),
        }
    }

    /// The raw slot content.
    pub fn contents(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }
}

impl SnapshotCache for MemoryCache {
    fn load(&self) -> Vec<MedicineRecord> {
        self.contents()
            .map(|raw| decode_or_empty(&raw, &SNAPSHOT_KEY))
            .unwrap_or_default()
    }

    fn save(&mut self, records: &[MedicineRecord]) -> Result<()> {
        let json = snapshot::encode_records(records)?;
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(json);
        }
        Ok(())
    }
}
