use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::Item;

/// Success payload of `GET /emails`.
///
/// Records stay as raw JSON so that one malformed entry cannot fail the
/// whole payload; they are normalised through [`Item::from_record`].
/// A missing or `null` list reads as no emails.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmailsResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub emails: Vec<Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default())
}

impl EmailsResponse {
    pub fn items(&self) -> Vec<Item> {
        self.emails.iter().map(Item::from_record).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub project: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub total: usize,
    pub by_category: BTreeMap<String, usize>,
    pub by_priority: BTreeMap<String, usize>,
}
