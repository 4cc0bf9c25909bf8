//! Id generation for records and categories.
//!
//! Ids are millisecond timestamps rendered as decimal strings, which keeps them
//! compatible with documents written by earlier clients. The clock guarantees
//! strictly increasing values even when several ids are minted within the same
//! millisecond or the wall clock steps backwards.

use crate::Timestamp;
use serde::{Deserialize, Serialize};

/// A monotonic id source.
///
/// Ordering rule: every issued value is greater than both the supplied wall
/// time and every value issued or observed before.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdClock {
    /// Highest value issued or observed so far
    last: Timestamp,
}

impl IdClock {
    /// Create a clock that has issued nothing yet.
    pub fn new() -> Self {
        Self { last: 0 }
    }

    /// The highest value issued or observed.
    pub fn last(&self) -> Timestamp {
        self.last
    }

    /// Issue the next value for wall time `now`.
    pub fn next(&mut self, now: Timestamp) -> Timestamp {
        self.last = now.max(self.last.saturating_add(1));
        self.last
    }

    /// Issue the next value as an id string.
    pub fn next_id(&mut self, now: Timestamp) -> String {
        self.next(now).to_string()
    }

    /// Advance past an id that already exists.
    ///
    /// Non-numeric ids carry no ordering information and are ignored.
    pub fn observe(&mut self, id: &str) {
        if let Ok(value) = id.parse::<Timestamp>() {
            self.last = self.last.max(value);
        }
    }
}
