//! Categories: user-defined, colored groupings of records.

use crate::lenient;
use crate::CategoryId;
use serde::{Deserialize, Serialize};

/// Color given to a category when the caller does not pick one.
pub const DEFAULT_CATEGORY_COLOR: &str = "#0ea5e9";

/// A grouping tag for records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(deserialize_with = "lenient::id")]
    pub id: CategoryId,
    /// Display label, not necessarily unique
    #[serde(default, deserialize_with = "lenient::name")]
    pub name: String,
    /// Display color token, usually `#rrggbb`
    #[serde(default, deserialize_with = "lenient::name")]
    pub color: String,
}

impl Category {
    pub fn new(
        id: impl Into<CategoryId>,
        name: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
        }
    }
}

/// The categories a store starts with before any remote document is pulled.
pub fn default_categories() -> Vec<Category> {
    vec![
        Category::new("allergy", "Allergy", "#06b6d4"),
        Category::new("pain", "Pain Relief", "#f97316"),
        Category::new("cold", "Cold & Flu", "#22c55e"),
        Category::new("firstaid", "First Aid", "#ef4444"),
    ]
}
