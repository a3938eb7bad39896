use std::{
    collections::BTreeMap,
    io,
    path::{Path, PathBuf},
};

use serde_json::Value;
use shared::{
    domain::Item,
    protocol::{EmailsResponse, SummaryResponse},
};
use thiserror::Error;

pub const UNKNOWN_BUCKET: &str = "UNKNOWN";

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("email fixture not found at '{}'", .0.display())]
    Missing(PathBuf),
    #[error("failed to read email fixture '{}': {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("email fixture '{}' is not valid JSON: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Already-classified records read from a JSON file.
///
/// The file holds either `{"emails": [...]}` or a bare array of records. It
/// is re-read on every request so edits show up without a restart.
#[derive(Debug, Clone)]
pub struct FixtureSource {
    path: PathBuf,
}

impl FixtureSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Result<EmailsResponse, FixtureError> {
        let raw = tokio::fs::read(&self.path).await.map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                FixtureError::Missing(self.path.clone())
            } else {
                FixtureError::Unreadable {
                    path: self.path.clone(),
                    source,
                }
            }
        })?;
        parse_fixture(&raw).map_err(|source| FixtureError::Malformed {
            path: self.path.clone(),
            source,
        })
    }
}

pub fn parse_fixture(raw: &[u8]) -> Result<EmailsResponse, serde_json::Error> {
    match serde_json::from_slice::<Value>(raw)? {
        Value::Array(emails) => Ok(EmailsResponse { emails }),
        other => serde_json::from_value(other),
    }
}

/// Counts per category and per priority; missing values land in `UNKNOWN`.
pub fn summarize(emails: &[Value]) -> SummaryResponse {
    let mut by_category = BTreeMap::new();
    let mut by_priority = BTreeMap::new();

    for record in emails {
        let item = Item::from_record(record);
        let category = item
            .category
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(UNKNOWN_BUCKET);
        let priority = item.priority.as_str().unwrap_or(UNKNOWN_BUCKET);
        *by_category.entry(category.to_string()).or_insert(0) += 1;
        *by_priority.entry(priority.to_string()).or_insert(0) += 1;
    }

    SummaryResponse {
        total: emails.len(),
        by_category,
        by_priority,
    }
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
