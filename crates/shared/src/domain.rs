use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

pub const UNCATEGORIZED: &str = "UNCATEGORIZED";
pub const NO_SUBJECT_PLACEHOLDER: &str = "(No subject)";

/// Rank given to any priority outside `HIGH | MEDIUM | LOW`, absent included.
pub const UNRANKED: u8 = 99;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "HIGH",
            Priority::Medium => "MEDIUM",
            Priority::Low => "LOW",
        }
    }

    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown priority '{0}', expected HIGH, MEDIUM or LOW")]
pub struct PriorityParseError(pub String);

impl FromStr for Priority {
    type Err = PriorityParseError;

    // Exact match: the wire spelling is upper case and ordering is case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HIGH" => Ok(Priority::High),
            "MEDIUM" => Ok(Priority::Medium),
            "LOW" => Ok(Priority::Low),
            other => Err(PriorityParseError(other.to_string())),
        }
    }
}

/// A priority as received: one of the known levels, some other string, or nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum PriorityValue {
    Known(Priority),
    Unrecognized(String),
    #[default]
    Absent,
}

impl PriorityValue {
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() {
            return PriorityValue::Absent;
        }
        match raw.parse::<Priority>() {
            Ok(priority) => PriorityValue::Known(priority),
            Err(_) => PriorityValue::Unrecognized(raw.to_string()),
        }
    }

    pub fn rank(&self) -> u8 {
        match self {
            PriorityValue::Known(priority) => priority.rank(),
            PriorityValue::Unrecognized(_) | PriorityValue::Absent => UNRANKED,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PriorityValue::Known(priority) => Some(priority.as_str()),
            PriorityValue::Unrecognized(raw) => Some(raw),
            PriorityValue::Absent => None,
        }
    }
}

impl From<Priority> for PriorityValue {
    fn from(value: Priority) -> Self {
        PriorityValue::Known(value)
    }
}

impl Serialize for PriorityValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_str() {
            Some(raw) => serializer.serialize_str(raw),
            None => serializer.serialize_none(),
        }
    }
}

/// One classified message as delivered by the item source.
///
/// Every field is optional: records are read leniently and missing data is
/// defaulted at display time instead of rejected.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Item {
    pub id: Option<String>,
    pub subject: Option<String>,
    /// The `from` field of the record.
    pub sender: Option<String>,
    pub category: Option<String>,
    pub priority: PriorityValue,
    pub explanation: Option<String>,
    pub snippet: Option<String>,
}

impl Item {
    /// Builds an item from an arbitrary JSON record. Never fails; anything
    /// unusable becomes an absent field.
    pub fn from_record(record: &Value) -> Self {
        let Some(fields) = record.as_object() else {
            return Self::default();
        };
        let text = |key: &str| fields.get(key).and_then(Value::as_str).map(str::to_string);

        Self {
            id: fields.get("id").and_then(key_text),
            subject: fields.get("subject").and_then(key_text),
            sender: text("from"),
            category: text("category"),
            priority: text("priority")
                .map(|raw| PriorityValue::parse(&raw))
                .unwrap_or_default(),
            explanation: text("explanation"),
            snippet: text("snippet"),
        }
    }

    /// Join key against persisted overrides: `id`, falling back to `subject`.
    pub fn identity(&self) -> Option<&str> {
        non_empty(self.id.as_deref()).or_else(|| non_empty(self.subject.as_deref()))
    }

    pub fn category_label(&self) -> &str {
        non_empty(self.category.as_deref()).unwrap_or(UNCATEGORIZED)
    }

    pub fn display_subject(&self) -> &str {
        non_empty(self.subject.as_deref()).unwrap_or(NO_SUBJECT_PLACEHOLDER)
    }

    pub fn display_explanation(&self) -> Option<&str> {
        trimmed(self.explanation.as_deref())
    }

    pub fn display_snippet(&self) -> Option<&str> {
        trimmed(self.snippet.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn trimmed(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// Used for both identity fields. Falsy values (0, false, null, "") do not count,
// so an id like that falls back to the subject; numbers become their text.
fn key_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}
