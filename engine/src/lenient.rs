//! Tolerant field decoders for persisted documents.
//!
//! Documents are produced by browser forms as well as by this crate, so ids may
//! be numbers, counts may arrive as strings or floats, and cleared inputs show
//! up as empty strings. These helpers normalise all of that at the edge.

use crate::record::DosageForm;
use chrono::NaiveDate;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Required id: a string or a JSON number.
pub(crate) fn id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

/// Optional id; empty strings and values of any other type mean unset.
pub(crate) fn optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(Value::deserialize(deserializer)?).and_then(normalize_text))
}

/// Optional free text; blank strings, arrays and objects mean unset.
pub(crate) fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(Value::deserialize(deserializer)?).and_then(normalize_text))
}

/// Required text; anything that is not a string or number reads as empty.
pub(crate) fn name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(Value::deserialize(deserializer)?).unwrap_or_default())
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Stock count: any number or numeric string, clamped to `0..=u32::MAX`.
/// Anything unparseable counts as zero.
pub(crate) fn count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number(Value::deserialize(deserializer)?).map_or(0, clamp_count))
}

/// Optional threshold; unparseable values mean unset.
pub(crate) fn optional_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number(Value::deserialize(deserializer)?).map(clamp_count))
}

/// Expiry date: `YYYY-MM-DD` or a timestamp whose first ten characters are one.
/// Anything else reads as unset.
pub(crate) fn date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(raw) => parse_date(&raw),
        _ => None,
    })
}

/// Dosage form; unknown values decode as [`DosageForm::Other`].
pub(crate) fn form<'de, D>(deserializer: D) -> Result<Option<DosageForm>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .and_then(normalize_text)
        .map(|raw| DosageForm::parse(&raw)))
}

/// A list field; null or a non-array value reads as empty and elements that
/// do not decode are dropped.
pub(crate) fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(elements(Some(Value::deserialize(deserializer)?)).0)
}

/// Decode each element of an array on its own. Returns the decoded elements
/// and how many were dropped. Anything but an array yields nothing.
pub(crate) fn elements<T: DeserializeOwned>(value: Option<Value>) -> (Vec<T>, usize) {
    let Some(Value::Array(items)) = value else {
        return (Vec::new(), 0);
    };

    let total = items.len();
    let decoded: Vec<T> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();
    let skipped = total - decoded.len();
    (decoded, skipped)
}

pub(crate) fn normalize_text(raw: String) -> Option<String> {
    if raw.trim().is_empty() {
        None
    } else {
        Some(raw)
    }
}

pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let head = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

fn number(value: Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_count(n: f64) -> u32 {
    n.floor().clamp(0.0, f64::from(u32::MAX)) as u32
}
