//! View derivation: which records a UI shows for a tab and a search query.
//!
//! Everything here is a pure function of its arguments. Time enters only as an
//! explicit `now`, so results are reproducible in tests.

use crate::{CategoryId, MedicineRecord};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const DAY_MS: i64 = 86_400_000;

/// Records expiring within this many days count as "expiring soon".
pub const EXPIRING_WITHIN_DAYS: i64 = 30;

/// A tab of the record list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Tab {
    #[default]
    All,
    Low,
    Expiring,
    Category(CategoryId),
}

impl Tab {
    /// Parse a tab key. Accepts `all`, `low`, `expiring`, `category:<id>` and
    /// the short `cat:<id>`; anything else is [`Tab::All`].
    pub fn parse(raw: &str) -> Self {
        match raw {
            "low" => Tab::Low,
            "expiring" => Tab::Expiring,
            _ => raw
                .strip_prefix("category:")
                .or_else(|| raw.strip_prefix("cat:"))
                .map_or(Tab::All, |id| Tab::Category(id.to_string())),
        }
    }
}

impl FromStr for Tab {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Tab::parse(s))
    }
}

impl From<String> for Tab {
    fn from(value: String) -> Self {
        Tab::parse(&value)
    }
}

impl From<Tab> for String {
    fn from(value: Tab) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tab::All => f.write_str("all"),
            Tab::Low => f.write_str("low"),
            Tab::Expiring => f.write_str("expiring"),
            Tab::Category(id) => write!(f, "category:{id}"),
        }
    }
}

/// How close a record is to its expiry date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "days", rename_all = "camelCase")]
pub enum ExpiryStatus {
    /// No expiry date recorded
    None,
    /// Past expiry; carries whole days since
    Expired(i64),
    /// Expires within [`EXPIRING_WITHIN_DAYS`]; carries days left
    ExpiringSoon(i64),
    /// Carries days left
    Ok(i64),
}

impl fmt::Display for ExpiryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpiryStatus::None => f.write_str("No Expiry"),
            ExpiryStatus::Expired(days) => write!(f, "Expired {days}d"),
            ExpiryStatus::ExpiringSoon(days) | ExpiryStatus::Ok(days) => {
                write!(f, "{days}d left")
            }
        }
    }
}

/// `qty <= low` with a threshold set.
pub fn is_low_stock(record: &MedicineRecord) -> bool {
    record.low.is_some_and(|low| record.qty <= low)
}

/// Milliseconds from `now` until the start (UTC) of the expiry day.
fn millis_until_expiry(expiry: NaiveDate, now: DateTime<Utc>) -> i64 {
    let expires_at = expiry.and_time(NaiveTime::MIN).and_utc();
    (expires_at - now).num_milliseconds()
}

/// Whole days until expiry, rounded up. Negative once expired.
pub fn days_remaining(record: &MedicineRecord, now: DateTime<Utc>) -> Option<i64> {
    record.expiry.map(|expiry| {
        let millis = millis_until_expiry(expiry, now);
        -(-millis).div_euclid(DAY_MS)
    })
}

pub fn expiry_status(record: &MedicineRecord, now: DateTime<Utc>) -> ExpiryStatus {
    match days_remaining(record, now) {
        None => ExpiryStatus::None,
        Some(days) if days < 0 => ExpiryStatus::Expired(days.abs()),
        Some(days) if days <= EXPIRING_WITHIN_DAYS => ExpiryStatus::ExpiringSoon(days),
        Some(days) => ExpiryStatus::Ok(days),
    }
}

/// Expiry set and at most 30 days away, expired records included.
fn is_expiring(record: &MedicineRecord, now: DateTime<Utc>) -> bool {
    record
        .expiry
        .is_some_and(|expiry| millis_until_expiry(expiry, now) <= EXPIRING_WITHIN_DAYS * DAY_MS)
}

fn matches_tab(record: &MedicineRecord, tab: &Tab, now: DateTime<Utc>) -> bool {
    match tab {
        Tab::All => true,
        Tab::Low => is_low_stock(record),
        Tab::Expiring => is_expiring(record, now),
        Tab::Category(id) => record.category_id.as_deref() == Some(id.as_str()),
    }
}

/// Filter `records` by `tab`, then by a case-insensitive substring `query`
/// over name, brand, notes and strength. A blank query matches everything.
/// Input order is preserved.
pub fn visible_records<'a>(
    records: &'a [MedicineRecord],
    tab: &Tab,
    query: &str,
    now: DateTime<Utc>,
) -> Vec<&'a MedicineRecord> {
    let needle = (!query.trim().is_empty()).then(|| query.to_lowercase());

    records
        .iter()
        .filter(|record| matches_tab(record, tab, now))
        .filter(|record| {
            needle
                .as_deref()
                .map_or(true, |needle| record.search_text().to_lowercase().contains(needle))
        })
        .collect()
}
