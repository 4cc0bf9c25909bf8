//! The session: one user's running view of the inventory.
//!
//! A [`Session`] owns the record [`Store`] for its whole lifetime and is the
//! surface a UI talks to. Every mutation runs synchronously:
//!
//! 1. the store is updated,
//! 2. the local snapshot is written,
//! 3. if signed in, a push of the full document is (re)scheduled.
//!
//! Pushes run in the background after the debounce window; a burst of edits
//! produces one push carrying the final state. Signing in pulls the remote
//! document once and replaces the store with it, discarding any local edits
//! that were never pushed.

use crate::auth::{AuthGate, IdentityProvider};
use crate::cache::SnapshotCache;
use crate::config::SyncConfig;
use crate::debounce::Debouncer;
use crate::error::Result;
use crate::remote::RemoteDocument;
use crate::status::SyncStatus;
use crate::sync::RemoteSync;
use chrono::Utc;
use medbox_engine::{Category, MedicineRecord, NewRecord, RecordPatch, Store, Tab, Timestamp};
use std::sync::Arc;
use tokio::sync::watch;

pub struct Session<R, P> {
    store: Store,
    cache: Box<dyn SnapshotCache>,
    sync: RemoteSync<R>,
    auth: AuthGate<P>,
    debouncer: Debouncer,
    status: Arc<watch::Sender<SyncStatus>>,
}

fn now_millis() -> Timestamp {
    Timestamp::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
}

impl<R: RemoteDocument, P: IdentityProvider> Session<R, P> {
    /// Start a session, restoring records from `cache`.
    ///
    /// Must be called inside a tokio runtime; background pushes are spawned
    /// onto it.
    pub fn open(
        config: &SyncConfig,
        cache: impl SnapshotCache + 'static,
        remote: R,
        provider: P,
    ) -> Result<Self> {
        let records = cache.load();
        tracing::info!("Restored {} records from local snapshot", records.len());

        let (status, _) = watch::channel(SyncStatus::Idle);
        Ok(Self {
            store: Store::with_records(records),
            cache: Box::new(cache),
            sync: RemoteSync::new(remote),
            auth: AuthGate::new(provider, config.scope.clone()),
            debouncer: Debouncer::new(config.debounce)?,
            status: Arc::new(status),
        })
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn records(&self) -> &[MedicineRecord] {
        self.store.records()
    }

    pub fn categories(&self) -> &[Category] {
        self.store.categories()
    }

    /// Records to show for a tab key (`all`, `low`, `expiring`,
    /// `category:<id>`) and a search query, as of now.
    pub fn visible_records(&self, tab: &str, query: &str) -> Vec<&MedicineRecord> {
        self.store.visible(&Tab::parse(tab), query, Utc::now())
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    pub fn add_record(&mut self, fields: NewRecord) -> MedicineRecord {
        let record = self.store.add_record(fields, now_millis());
        self.commit();
        record
    }

    pub fn update_record(&mut self, id: &str, patch: RecordPatch) -> bool {
        self.commit_if(|store| store.update_record(id, patch))
    }

    pub fn decrement_qty(&mut self, id: &str) -> bool {
        self.commit_if(|store| store.decrement_qty(id))
    }

    pub fn delete_record(&mut self, id: &str) -> bool {
        self.commit_if(|store| store.delete_record(id))
    }

    pub fn add_category(&mut self, name: &str, color: Option<&str>) -> Option<Category> {
        let category = self.store.add_category(name, color, now_millis())?;
        self.commit();
        Some(category)
    }

    pub fn rename_category(&mut self, id: &str, name: &str, color: &str) -> bool {
        self.commit_if(|store| store.rename_category(id, name, color))
    }

    pub fn delete_category(&mut self, id: &str) -> bool {
        self.commit_if(|store| store.delete_category(id))
    }

    fn commit_if(&mut self, mutate: impl FnOnce(&mut Store) -> bool) -> bool {
        let changed = mutate(&mut self.store);
        if changed {
            self.commit();
        }
        changed
    }

    /// Persist locally, then schedule the remote write.
    fn commit(&mut self) {
        self.persist_local();
        self.schedule_push();
    }

    fn persist_local(&mut self) {
        if let Err(e) = self.cache.save(self.store.records()) {
            tracing::warn!("Failed to write local snapshot: {}", e);
        }
    }

    fn schedule_push(&mut self) {
        let Some(token) = self.auth.token().cloned() else {
            return;
        };
        if !self.sync.is_configured() {
            return;
        }

        let sync = self.sync.clone();
        let status = Arc::clone(&self.status);
        let document = self.store.to_document();
        tracing::debug!("Scheduling push in {:?}", self.debouncer.window());

        self.debouncer.schedule(async move {
            match sync.push(&token, &document).await {
                Ok(()) => {
                    status.send_replace(SyncStatus::Synced);
                }
                Err(e) => {
                    tracing::warn!("Push failed: {}", e);
                    status.send_replace(SyncStatus::PushFailed);
                }
            }
        });
    }

    // ------------------------------------------------------------------
    // Auth and sync
    // ------------------------------------------------------------------

    /// Sign in and pull the remote document once.
    ///
    /// On success the store is replaced wholesale by the remote content. A
    /// failed pull leaves the store as it was. Returns the resulting status.
    pub async fn sign_in(&mut self) -> SyncStatus {
        if !self.sync.is_configured() {
            tracing::warn!("Sign-in refused: no remote document configured");
            return self.set_status(SyncStatus::NotConfigured);
        }

        // A push still waiting from before would overwrite what we pull.
        self.debouncer.cancel();

        if let Err(e) = self.auth.authenticate().await {
            tracing::warn!("Sign-in failed: {}", e);
            return self.set_status(SyncStatus::SignInFailed);
        }
        let Some(token) = self.auth.token().cloned() else {
            return self.set_status(SyncStatus::SignInFailed);
        };
        tracing::info!("Signed in; pulling remote document");

        match self.sync.pull(&token).await {
            Ok(document) => {
                tracing::info!(
                    "Replacing local state with {} remote records",
                    document.meds.len()
                );
                self.store.replace(document);
                self.persist_local();
                self.set_status(SyncStatus::Synced)
            }
            Err(e) => {
                tracing::warn!("Pull failed: {}", e);
                self.set_status(SyncStatus::PullFailed)
            }
        }
    }

    /// Stop syncing. A push still waiting for its window is dropped.
    pub fn sign_out(&mut self) {
        self.debouncer.cancel();
        self.auth.sign_out();
        self.set_status(SyncStatus::Idle);
    }

    pub fn is_signed_in(&self) -> bool {
        self.auth.is_authenticated()
    }

    /// Whether a push is waiting for its debounce window.
    pub fn has_pending_push(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn status(&self) -> SyncStatus {
        *self.status.borrow()
    }

    /// The status as shown to the user: "Synced", "Pull failed", ... or empty.
    pub fn current_status(&self) -> String {
        self.status().to_string()
    }

    /// Observe status changes, including those made by background pushes.
    pub fn subscribe_status(&self) -> watch::Receiver<SyncStatus> {
        self.status.subscribe()
    }

    /// Tear the session down. A push still waiting for its window never runs.
    pub fn close(mut self) {
        self.debouncer.cancel();
        tracing::debug!("Session closed");
    }

    fn set_status(&self, status: SyncStatus) -> SyncStatus {
        self.status.send_replace(status);
        status
    }
}
