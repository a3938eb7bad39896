use std::time::Duration;

use thiserror::Error;

pub const TIMEOUT_MESSAGE: &str = "Request timed out";
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to fetch emails";

/// Why a triage load produced no items.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("item source did not answer within {after:?}")]
    Timeout { after: Duration },
    #[error("item source request failed: {}", .detail.as_deref().unwrap_or(GENERIC_FAILURE_MESSAGE))]
    Failure {
        detail: Option<String>,
        #[source]
        source: Option<reqwest::Error>,
    },
}

impl LoadError {
    pub fn failure(detail: impl Into<String>) -> Self {
        LoadError::Failure {
            detail: Some(detail.into()),
            source: None,
        }
    }

    pub fn transport(source: reqwest::Error) -> Self {
        LoadError::Failure {
            detail: None,
            source: Some(source),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, LoadError::Timeout { .. })
    }

    /// The single message shown to the user for this failure.
    pub fn user_message(&self) -> &str {
        match self {
            LoadError::Timeout { .. } => TIMEOUT_MESSAGE,
            LoadError::Failure { detail, .. } => {
                detail.as_deref().unwrap_or(GENERIC_FAILURE_MESSAGE)
            }
        }
    }
}
