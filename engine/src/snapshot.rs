//! Serialized forms of the store state.
//!
//! Two shapes are persisted:
//!
//! - the [`Document`] `{ "meds": [...], "categories": [...] }` that is shared
//!   through the remote store, and
//! - the local snapshot, a bare array of records kept under [`SNAPSHOT_KEY`].
//!
//! Both decoders are lenient: array elements that cannot be decoded are
//! dropped one by one and counted in [`Decoded::skipped`]. Only JSON that is
//! malformed or has the wrong top-level shape is an error; callers decide how
//! to recover.

use crate::{error::Result, lenient, Category, Error, MedicineRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// Key of the local snapshot slot.
pub const SNAPSHOT_KEY: &str = "medbox-data-v3";

/// Decoded content plus the number of array elements that were dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded<T> {
    pub value: T,
    pub skipped: usize,
}

/// The whole shared state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default, deserialize_with = "lenient::list")]
    pub meds: Vec<MedicineRecord>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub categories: Vec<Category>,
}

impl Document {
    pub fn new(meds: Vec<MedicineRecord>, categories: Vec<Category>) -> Self {
        Self { meds, categories }
    }

    /// Serialize to compact JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::Encode(e.to_string()))
    }

    /// Serialize to pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Encode(e.to_string()))
    }

    /// Deserialize from JSON, dropping records and categories that cannot be
    /// decoded.
    ///
    /// Blank content is an empty document; absent or non-array fields are
    /// empty lists. Entries sharing an id keep their first occurrence.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::decode(json).map(|decoded| decoded.value)
    }

    /// Like [`Document::from_json`], also reporting how many entries were
    /// dropped.
    pub fn decode(json: &str) -> Result<Decoded<Self>> {
        if json.trim().is_empty() {
            return Ok(Decoded {
                value: Self::default(),
                skipped: 0,
            });
        }

        let value: Value =
            serde_json::from_str(json).map_err(|e| Error::InvalidDocument(e.to_string()))?;
        let Value::Object(mut fields) = value else {
            return Err(Error::InvalidDocument("expected a JSON object".into()));
        };

        let (mut meds, bad_meds) = lenient::elements(fields.remove("meds"));
        let (mut categories, bad_categories) = lenient::elements(fields.remove("categories"));
        dedup_by_id(&mut meds, |r: &MedicineRecord| &r.id);
        dedup_by_id(&mut categories, |c: &Category| &c.id);

        Ok(Decoded {
            value: Self { meds, categories },
            skipped: bad_meds + bad_categories,
        })
    }
}

/// Encode the local snapshot.
pub fn encode_records(records: &[MedicineRecord]) -> Result<String> {
    serde_json::to_string(records).map_err(|e| Error::Encode(e.to_string()))
}

/// Decode the local snapshot. Blank content is an empty collection.
pub fn decode_records(json: &str) -> Result<Vec<MedicineRecord>> {
    decode_snapshot(json).map(|decoded| decoded.value)
}

/// Decode the local snapshot, reporting how many records were dropped.
///
/// The top level must be an array; records inside it that cannot be decoded
/// are skipped and the rest are kept.
pub fn decode_snapshot(json: &str) -> Result<Decoded<Vec<MedicineRecord>>> {
    if json.trim().is_empty() {
        return Ok(Decoded {
            value: Vec::new(),
            skipped: 0,
        });
    }

    let value: Value =
        serde_json::from_str(json).map_err(|e| Error::InvalidSnapshot(e.to_string()))?;
    if !value.is_array() {
        return Err(Error::InvalidSnapshot("expected a JSON array".into()));
    }

    let (mut records, skipped) = lenient::elements(Some(value));
    dedup_by_id(&mut records, |r: &MedicineRecord| &r.id);
    Ok(Decoded {
        value: records,
        skipped,
    })
}

pub(crate) fn dedup_by_id<T>(items: &mut Vec<T>, id: impl Fn(&T) -> &String) {
    let mut seen = HashSet::new();
    items.retain(|item| seen.insert(id(item).clone()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NewRecord;

    fn record(id: &str, name: &str) -> MedicineRecord {
        NewRecord::new(name).qty(1).into_record(id.into())
    }

    #[test]
    fn empty_document_shape() {
        let json = Document::default().to_json().unwrap();
        assert_eq!(json, r#"{"meds":[],"categories":[]}"#);
    }

    #[test]
    fn json_roundtrip() {
        let document = Document::new(
            vec![record("2", "Ibuprofen"), record("1", "Aspirin")],
            crate::default_categories(),
        );

        let json = document.to_json().unwrap();
        let restored = Document::from_json(&json).unwrap();

        assert_eq!(document, restored);
    }

    #[test]
    fn missing_fields_are_empty() {
        assert_eq!(Document::from_json("{}").unwrap(), Document::default());
        assert_eq!(Document::from_json("  ").unwrap(), Document::default());

        let only_meds = Document::from_json(r#"{"meds":[{"id":1,"name":"A"}]}"#).unwrap();
        assert_eq!(only_meds.meds.len(), 1);
        assert!(only_meds.categories.is_empty());

        let wrong_type = Document::from_json(r#"{"meds":"nope","categories":null}"#).unwrap();
        assert_eq!(wrong_type, Document::default());
    }

    #[test]
    fn malformed_document() {
        let result = Document::from_json("{not json");
        assert!(matches!(result, Err(Error::InvalidDocument(_))));

        let result = Document::from_json("[]");
        assert!(matches!(result, Err(Error::InvalidDocument(_))));
    }

    #[test]
    fn bad_entries_are_dropped_not_fatal() {
        let json = r#"{
            "meds": [
                {"id": 1, "name": "Aspirin", "qty": 3},
                {"name": "no id"},
                {"id": null, "name": "null id"},
                {"id": {"nested": true}, "name": "object id"},
                {"id": 2, "name": "Ibuprofen", "categoryId": false}
            ],
            "categories": [{"id": "pain", "name": "Pain"}, {"id": [], "name": "broken"}]
        }"#;

        let decoded = Document::decode(json).unwrap();
        assert_eq!(decoded.skipped, 4);

        let names: Vec<_> = decoded.value.meds.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Aspirin", "Ibuprofen"]);
        assert_eq!(decoded.value.meds[1].category_id, None);
        assert_eq!(decoded.value.categories.len(), 1);
    }

    #[test]
    fn duplicate_ids_keep_first() {
        let json = r#"{"meds":[{"id":"7","name":"first"},{"id":7,"name":"second"}]}"#;
        let document = Document::from_json(json).unwrap();
        assert_eq!(document.meds.len(), 1);
        assert_eq!(document.meds[0].name, "first");
    }

    #[test]
    fn snapshot_roundtrip() {
        let records = vec![record("3", "Loratadine"), record("1", "Aspirin")];
        let json = encode_records(&records).unwrap();
        assert_eq!(decode_records(&json).unwrap(), records);
    }

    #[test]
    fn malformed_snapshot() {
        assert!(matches!(
            decode_records("{\"meds\": []}"),
            Err(Error::InvalidSnapshot(_))
        ));
        assert!(matches!(decode_records("]["), Err(Error::InvalidSnapshot(_))));
        assert!(matches!(decode_records("null"), Err(Error::InvalidSnapshot(_))));
        assert_eq!(decode_records("").unwrap(), Vec::new());
    }

    #[test]
    fn snapshot_keeps_valid_records() {
        let raw = r#"[
            {"id": 1, "name": "Aspirin", "qty": 3},
            {"id": 2, "name": "Ibuprofen", "qty": 1},
            {"name": "legacy without id"},
            true
        ]"#;

        let decoded = decode_snapshot(raw).unwrap();
        assert_eq!(decoded.skipped, 2);
        let ids: Vec<_> = decoded.value.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["1", "2"]);
    }
}
