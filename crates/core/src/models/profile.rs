//! Typed views over the profile rows the grade promotion step reads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CutoverError, Result};
use crate::models::row::Row;

/// A `students` row. Only the columns the promotion step needs are decoded;
/// the row itself is always copied verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub user_id: String,
    pub grade: i64,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub login_id: Option<String>,
    #[serde(default)]
    pub course: Option<String>,
}

/// A `profiles` row, keyed by the identity account id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Decode a raw row into one of the typed views above.
pub fn decode_row<T: serde::de::DeserializeOwned>(row: &Row) -> Result<T> {
    serde_json::from_value(Value::Object(row.clone())).map_err(|e| {
        let id = row.get("id").map(Value::to_string).unwrap_or_default();
        CutoverError::Serialization(format!("failed to decode row {id}: {e}"))
    })
}
