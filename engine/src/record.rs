//! Medicine records and the inputs that create and modify them.

use crate::lenient::{self, normalize_text};
use crate::{CategoryId, RecordId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Physical form of a medicine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DosageForm {
    #[default]
    Tablet,
    Capsule,
    Syrup,
    Ointment,
    Other,
}

impl DosageForm {
    /// All forms in display order.
    pub const ALL: [DosageForm; 5] = [
        DosageForm::Tablet,
        DosageForm::Capsule,
        DosageForm::Syrup,
        DosageForm::Ointment,
        DosageForm::Other,
    ];

    /// Parse a stored value. Unknown values map to [`DosageForm::Other`].
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "tablet" => DosageForm::Tablet,
            "capsule" => DosageForm::Capsule,
            "syrup" => DosageForm::Syrup,
            "ointment" => DosageForm::Ointment,
            _ => DosageForm::Other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DosageForm::Tablet => "tablet",
            DosageForm::Capsule => "capsule",
            DosageForm::Syrup => "syrup",
            DosageForm::Ointment => "ointment",
            DosageForm::Other => "other",
        }
    }
}

impl fmt::Display for DosageForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One medicine inventory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineRecord {
    /// Unique, stable identifier
    #[serde(deserialize_with = "lenient::id")]
    pub id: RecordId,
    /// Display name
    #[serde(default, deserialize_with = "lenient::name")]
    pub name: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::text"
    )]
    pub brand: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::text"
    )]
    pub strength: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::form"
    )]
    pub form: Option<DosageForm>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::text"
    )]
    pub notes: Option<String>,
    /// Units currently in stock
    #[serde(default, deserialize_with = "lenient::count")]
    pub qty: u32,
    /// Low-stock threshold; the record is low when `qty <= low`
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_count"
    )]
    pub low: Option<u32>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::date"
    )]
    pub expiry: Option<NaiveDate>,
    /// Category reference; may dangle after a category is deleted elsewhere
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_id"
    )]
    pub category_id: Option<CategoryId>,
}

impl MedicineRecord {
    /// The searchable text of this record: name, brand, notes and strength,
    /// skipping absent fields, joined by single spaces.
    pub fn search_text(&self) -> String {
        [
            Some(self.name.as_str()),
            self.brand.as_deref(),
            self.notes.as_deref(),
            self.strength.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }
}

/// Fields for a record that does not exist yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewRecord {
    pub name: String,
    pub brand: Option<String>,
    pub strength: Option<String>,
    pub form: Option<DosageForm>,
    pub notes: Option<String>,
    pub qty: u32,
    pub low: Option<u32>,
    pub expiry: Option<NaiveDate>,
    pub category_id: Option<CategoryId>,
}

impl NewRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = normalize_text(brand.into());
        self
    }

    pub fn strength(mut self, strength: impl Into<String>) -> Self {
        self.strength = normalize_text(strength.into());
        self
    }

    pub fn form(mut self, form: DosageForm) -> Self {
        self.form = Some(form);
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = normalize_text(notes.into());
        self
    }

    pub fn qty(mut self, qty: u32) -> Self {
        self.qty = qty;
        self
    }

    pub fn low(mut self, low: u32) -> Self {
        self.low = Some(low);
        self
    }

    pub fn expiry(mut self, expiry: NaiveDate) -> Self {
        self.expiry = Some(expiry);
        self
    }

    pub fn category(mut self, category_id: impl Into<CategoryId>) -> Self {
        self.category_id = normalize_text(category_id.into());
        self
    }

    /// Materialise the record under an id chosen by the store.
    pub(crate) fn into_record(self, id: RecordId) -> MedicineRecord {
        MedicineRecord {
            id,
            name: self.name.trim().to_string(),
            brand: self.brand.and_then(normalize_text),
            strength: self.strength.and_then(normalize_text),
            form: self.form,
            notes: self.notes.and_then(normalize_text),
            qty: self.qty,
            low: self.low,
            expiry: self.expiry,
            category_id: self.category_id.and_then(normalize_text),
        }
    }
}

/// A partial update. `None` leaves a field alone; for optional fields
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordPatch {
    pub name: Option<String>,
    pub brand: Option<Option<String>>,
    pub strength: Option<Option<String>>,
    pub form: Option<Option<DosageForm>>,
    pub notes: Option<Option<String>>,
    pub qty: Option<u32>,
    pub low: Option<Option<u32>>,
    pub expiry: Option<Option<NaiveDate>>,
    pub category_id: Option<Option<CategoryId>>,
}

impl RecordPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn brand(mut self, brand: Option<&str>) -> Self {
        self.brand = Some(brand.map(str::to_string));
        self
    }

    pub fn strength(mut self, strength: Option<&str>) -> Self {
        self.strength = Some(strength.map(str::to_string));
        self
    }

    pub fn form(mut self, form: Option<DosageForm>) -> Self {
        self.form = Some(form);
        self
    }

    pub fn notes(mut self, notes: Option<&str>) -> Self {
        self.notes = Some(notes.map(str::to_string));
        self
    }

    pub fn qty(mut self, qty: u32) -> Self {
        self.qty = Some(qty);
        self
    }

    pub fn low(mut self, low: Option<u32>) -> Self {
        self.low = Some(low);
        self
    }

    pub fn expiry(mut self, expiry: Option<NaiveDate>) -> Self {
        self.expiry = Some(expiry);
        self
    }

    pub fn category(mut self, category_id: Option<&str>) -> Self {
        self.category_id = Some(category_id.map(str::to_string));
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply to `record`, returning whether anything changed.
    pub(crate) fn apply(self, record: &mut MedicineRecord) -> bool {
        let before = record.clone();

        if let Some(name) = self.name {
            record.name = name.trim().to_string();
        }
        if let Some(brand) = self.brand {
            record.brand = brand.and_then(normalize_text);
        }
        if let Some(strength) = self.strength {
            record.strength = strength.and_then(normalize_text);
        }
        if let Some(form) = self.form {
            record.form = form;
        }
        if let Some(notes) = self.notes {
            record.notes = notes.and_then(normalize_text);
        }
        if let Some(qty) = self.qty {
            record.qty = qty;
        }
        if let Some(low) = self.low {
            record.low = low;
        }
        if let Some(expiry) = self.expiry {
            record.expiry = expiry;
        }
        if let Some(category_id) = self.category_id {
            record.category_id = category_id.and_then(normalize_text);
        }

        *record != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> MedicineRecord {
        NewRecord::new("Cetirizine")
            .brand("Zyrtec")
            .strength("10mg")
            .qty(12)
            .low(4)
            .category("allergy")
            .into_record("1000".into())
    }

    #[test]
    fn create_record() {
        let record = sample();
        assert_eq!(record.id, "1000");
        assert_eq!(record.name, "Cetirizine");
        assert_eq!(record.brand.as_deref(), Some("Zyrtec"));
        assert_eq!(record.qty, 12);
        assert_eq!(record.low, Some(4));
        assert_eq!(record.category_id.as_deref(), Some("allergy"));
        assert_eq!(record.form, None);
    }

    #[test]
    fn blank_text_is_unset() {
        let record = NewRecord::new("  Dolo 650 ")
            .brand("")
            .notes("   ")
            .into_record("1".into());
        assert_eq!(record.name, "Dolo 650");
        assert_eq!(record.brand, None);
        assert_eq!(record.notes, None);
    }

    #[test]
    fn patch_updates_and_clears() {
        let mut record = sample();
        let changed = RecordPatch::new()
            .qty(3)
            .brand(None)
            .category(None)
            .apply(&mut record);

        assert!(changed);
        assert_eq!(record.qty, 3);
        assert_eq!(record.brand, None);
        assert_eq!(record.category_id, None);
        assert_eq!(record.strength.as_deref(), Some("10mg"));
    }

    #[test]
    fn patch_without_effect() {
        let mut record = sample();
        assert!(!RecordPatch::new().qty(12).apply(&mut record));
        assert!(RecordPatch::new().is_empty());
        assert!(!RecordPatch::new().notes(Some("x")).is_empty());
    }

    #[test]
    fn search_text_skips_absent_fields() {
        let record = NewRecord::new("Paracetamol")
            .notes("after food")
            .into_record("1".into());
        assert_eq!(record.search_text(), "Paracetamol after food");
    }

    #[test]
    fn camel_case_wire_format() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "1000",
                "name": "Cetirizine",
                "brand": "Zyrtec",
                "strength": "10mg",
                "qty": 12,
                "low": 4,
                "categoryId": "allergy"
            })
        );
    }

    #[test]
    fn decode_browser_written_record() {
        let record: MedicineRecord = serde_json::from_value(json!({
            "id": 1_706_745_600_000_u64,
            "name": "Cough syrup",
            "brand": "",
            "form": "syrup",
            "qty": "3",
            "low": 0,
            "expiry": "2026-12-31",
            "categoryId": null
        }))
        .unwrap();

        assert_eq!(record.id, "1706745600000");
        assert_eq!(record.brand, None);
        assert_eq!(record.form, Some(DosageForm::Syrup));
        assert_eq!(record.qty, 3);
        assert_eq!(record.low, Some(0));
        assert_eq!(record.expiry, NaiveDate::from_ymd_opt(2026, 12, 31));
        assert_eq!(record.category_id, None);
    }

    #[test]
    fn unknown_form_is_other() {
        assert_eq!(DosageForm::parse("drops"), DosageForm::Other);
        assert_eq!(DosageForm::parse("Capsule"), DosageForm::Capsule);
        assert_eq!(DosageForm::default().to_string(), "tablet");
    }

    #[test]
    fn serialization_roundtrip() {
        let record = sample();
        let json = serde_json::to_string(&record).unwrap();
        let parsed: MedicineRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, parsed);
    }
}
