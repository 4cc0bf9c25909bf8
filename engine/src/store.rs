//! Store - the in-memory state container.
//!
//! The Store holds every medicine record and category for a running session.
//! All mutations are synchronous and immediately visible to later reads.
//! Mutations aimed at an id that does not exist are silent no-ops; each
//! mutation reports whether it changed anything so callers can skip
//! persisting and syncing unchanged state.

use crate::snapshot::dedup_by_id;
use crate::{
    default_categories, view, Category, Document, IdClock, MedicineRecord, NewRecord,
    RecordPatch, Tab, Timestamp, DEFAULT_CATEGORY_COLOR,
};
use chrono::{DateTime, Utc};

/// The main store holding all state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Store {
    /// Records, newest first
    meds: Vec<MedicineRecord>,
    /// Categories in creation order
    categories: Vec<Category>,
    /// Id source for new records and categories
    clock: IdClock,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// Create an empty store seeded with the default categories.
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Create a store from records restored at boot.
    ///
    /// Categories are not part of the local snapshot, so the defaults are used
    /// until a remote document replaces them.
    pub fn with_records(records: Vec<MedicineRecord>) -> Self {
        Self::from_document(Document::new(records, default_categories()))
    }

    /// Create a store holding exactly the contents of `document`.
    pub fn from_document(document: Document) -> Self {
        let mut store = Self {
            meds: Vec::new(),
            categories: Vec::new(),
            clock: IdClock::new(),
        };
        store.replace(document);
        store
    }

    /// Replace the whole state with `document` (no merge).
    pub fn replace(&mut self, document: Document) {
        let Document {
            mut meds,
            mut categories,
        } = document;
        dedup_by_id(&mut meds, |r| &r.id);
        dedup_by_id(&mut categories, |c| &c.id);

        for id in meds.iter().map(|r| &r.id).chain(categories.iter().map(|c| &c.id)) {
            self.clock.observe(id);
        }

        self.meds = meds;
        self.categories = categories;
    }

    /// Copy the state into a shareable document.
    pub fn to_document(&self) -> Document {
        Document::new(self.meds.clone(), self.categories.clone())
    }

    // ------------------------------------------------------------------
    // Records
    // ------------------------------------------------------------------

    /// All records, newest first.
    pub fn records(&self) -> &[MedicineRecord] {
        &self.meds
    }

    pub fn len(&self) -> usize {
        self.meds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meds.is_empty()
    }

    /// Get a record by ID.
    pub fn get(&self, id: &str) -> Option<&MedicineRecord> {
        self.meds.iter().find(|r| r.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut MedicineRecord> {
        self.meds.iter_mut().find(|r| r.id == id)
    }

    /// Add a record under a fresh id and put it first.
    pub fn add_record(&mut self, fields: NewRecord, now: Timestamp) -> MedicineRecord {
        let id = self.fresh_id(now);
        let record = fields.into_record(id);
        self.meds.insert(0, record.clone());
        record
    }

    /// Apply a partial update. Returns `false` if the id is unknown or the
    /// patch changed nothing.
    pub fn update_record(&mut self, id: &str, patch: RecordPatch) -> bool {
        self.get_mut(id).is_some_and(|record| patch.apply(record))
    }

    /// Take one unit out of stock, stopping at zero.
    pub fn decrement_qty(&mut self, id: &str) -> bool {
        match self.get_mut(id) {
            Some(record) if record.qty > 0 => {
                record.qty -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn delete_record(&mut self, id: &str) -> bool {
        let before = self.meds.len();
        self.meds.retain(|r| r.id != id);
        self.meds.len() != before
    }

    // ------------------------------------------------------------------
    // Categories
    // ------------------------------------------------------------------

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// The category a record belongs to, if its reference resolves.
    pub fn category_of(&self, record: &MedicineRecord) -> Option<&Category> {
        record
            .category_id
            .as_deref()
            .and_then(|id| self.category(id))
    }

    /// Add a category. Blank names are rejected and create nothing.
    pub fn add_category(
        &mut self,
        name: &str,
        color: Option<&str>,
        now: Timestamp,
    ) -> Option<Category> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let color = color
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CATEGORY_COLOR);
        let category = Category::new(self.fresh_id(now), name, color);
        self.categories.push(category.clone());
        Some(category)
    }

    /// Set a category's name and color.
    pub fn rename_category(&mut self, id: &str, name: &str, color: &str) -> bool {
        match self.categories.iter_mut().find(|c| c.id == id) {
            Some(category) if category.name != name || category.color != color => {
                category.name = name.to_string();
                category.color = color.to_string();
                true
            }
            _ => false,
        }
    }

    /// Delete a category and clear every record reference to it.
    pub fn delete_category(&mut self, id: &str) -> bool {
        let before = self.categories.len();
        self.categories.retain(|c| c.id != id);
        let removed = self.categories.len() != before;

        let mut cleared = false;
        for record in &mut self.meds {
            if record.category_id.as_deref() == Some(id) {
                record.category_id = None;
                cleared = true;
            }
        }

        removed || cleared
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    /// Records visible under `tab` and `query` at time `now`.
    pub fn visible(&self, tab: &Tab, query: &str, now: DateTime<Utc>) -> Vec<&MedicineRecord> {
        view::visible_records(&self.meds, tab, query, now)
    }

    fn is_taken(&self, id: &str) -> bool {
        self.meds.iter().any(|r| r.id == id) || self.categories.iter().any(|c| c.id == id)
    }

    fn fresh_id(&mut self, now: Timestamp) -> String {
        let mut id = self.clock.next_id(now);
        let mut suffix = 0u64;
        while self.is_taken(&id) {
            if self.clock.last() == Timestamp::MAX {
                // saturated by an observed id; numbers alone cannot be unique
                suffix += 1;
                id = format!("{}-{suffix}", Timestamp::MAX);
            } else {
                id = self.clock.next_id(now);
            }
        }
        id
    }
}
