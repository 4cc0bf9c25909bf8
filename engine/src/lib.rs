//! # MedBox Engine
//!
//! The pure core of a household medicine inventory tracker.
//!
//! This crate owns the in-memory record state and everything that can be
//! computed from it without touching the outside world. Persistence, network
//! sync and timers live in `medbox-sync`; the engine only describes *what* the
//! state is and how it changes.
//!
//! ## Design Principles
//!
//! - **No IO**: the engine never reads files, sockets or the system clock
//! - **Explicit time**: operations that depend on "now" take it as an argument
//! - **Silent no-ops**: mutations aimed at a missing id change nothing
//! - **Lenient decoding**: documents written by older clients load without error
//!
//! ## Core Concepts
//!
//! ### Records and categories
//!
//! A [`MedicineRecord`] is one inventory entry (name, stock count, optional
//! low-stock threshold, optional expiry date, optional category). A
//! [`Category`] is a user-defined, colored grouping. Records reference
//! categories by id; a dangling reference reads as "uncategorized".
//!
//! ### Store
//!
//! The [`Store`] is the single source of truth for a running session. It
//! assigns unique ids through an [`IdClock`], clamps stock counts at zero and
//! clears category references when a category is deleted.
//!
//! ### Documents and snapshots
//!
//! A [`Document`] is the `{ meds, categories }` shape shared through the remote
//! store. The local snapshot is the bare `meds` array (see [`snapshot`]).
//!
//! ### Views
//!
//! [`visible_records`] derives the list a UI shows from a [`Tab`] and a free
//! text query. It is pure and deterministic for a given `now`.
//!
//! ## Quick Start
//!
//! ```rust
//! use medbox_engine::{NewRecord, RecordPatch, Store, Tab};
//! use chrono::{TimeZone, Utc};
//!
//! let mut store = Store::new();
//! let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
//!
//! let record = store.add_record(
//!     NewRecord::new("Ibuprofen").brand("Advil").qty(2).low(5),
//!     now.timestamp_millis() as u64,
//! );
//!
//! store.update_record(&record.id, RecordPatch::new().qty(8));
//! assert_eq!(store.get(&record.id).unwrap().qty, 8);
//!
//! assert!(store.visible(&Tab::Low, "", now).is_empty());
//! assert_eq!(store.visible(&Tab::All, "advil", now).len(), 1);
//! ```

pub mod category;
pub mod clock;
pub mod error;
mod lenient;
pub mod record;
pub mod snapshot;
pub mod store;
pub mod view;

// Re-export main types at crate root
pub use category::{default_categories, Category, DEFAULT_CATEGORY_COLOR};
pub use clock::IdClock;
pub use error::Error;
pub use record::{DosageForm, MedicineRecord, NewRecord, RecordPatch};
pub use snapshot::{Decoded, Document, SNAPSHOT_KEY};
pub use store::Store;
pub use view::{days_remaining, expiry_status, is_low_stock, visible_records, ExpiryStatus, Tab};

/// Type aliases for clarity
pub type RecordId = String;
pub type CategoryId = String;
/// Milliseconds since the Unix epoch.
pub type Timestamp = u64;
