use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::ACCEPT, Client, StatusCode};
use shared::{domain::Item, error::ErrorDetail, protocol::EmailsResponse};
use tracing::{info, warn};

use crate::error::LoadError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);

/// Where raw classified items come from.
#[async_trait]
pub trait ItemSource: Send + Sync {
    async fn fetch_items(&self) -> Result<Vec<Item>, LoadError>;
}

/// Fetches items from `GET {base_url}/emails`.
pub struct HttpItemSource {
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpItemSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    async fn request(&self) -> Result<Vec<Item>, LoadError> {
        let url = format!("{}/emails", self.base_url);
        let response = self
            .http
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(LoadError::transport)?;

        let status = response.status();
        let body = response.bytes().await.map_err(LoadError::transport)?;

        if !status.is_success() {
            return Err(failure_from_body(status, &body));
        }

        let payload: EmailsResponse = serde_json::from_slice(&body).map_err(|err| {
            warn!(error = %err, "source: malformed emails payload");
            LoadError::failure(format!("Malformed response from item source: {err}"))
        })?;
        Ok(payload.items())
    }
}

#[async_trait]
impl ItemSource for HttpItemSource {
    async fn fetch_items(&self) -> Result<Vec<Item>, LoadError> {
        match tokio::time::timeout(self.timeout, self.request()).await {
            Ok(Ok(items)) => {
                info!(count = items.len(), "source: items fetched");
                Ok(items)
            }
            Ok(Err(err)) => Err(err),
            Err(_) => {
                warn!(timeout_ms = self.timeout.as_millis() as u64, "source: request timed out");
                Err(LoadError::Timeout {
                    after: self.timeout,
                })
            }
        }
    }
}

fn failure_from_body(status: StatusCode, body: &[u8]) -> LoadError {
    let detail = serde_json::from_slice::<ErrorDetail>(body)
        .ok()
        .map(|body| body.detail)
        .filter(|detail| !detail.is_empty());
    warn!(status = status.as_u16(), detail = ?detail, "source: item source returned failure");
    LoadError::Failure {
        detail,
        source: None,
    }
}

/// Fixed item list, mostly for tests and offline rendering.
#[derive(Debug, Clone, Default)]
pub struct StaticItemSource {
    items: Vec<Item>,
}

impl StaticItemSource {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }
}

#[async_trait]
impl ItemSource for StaticItemSource {
    async fn fetch_items(&self) -> Result<Vec<Item>, LoadError> {
        Ok(self.items.clone())
    }
}

#[cfg(test)]
#[path = "tests/source_tests.rs"]
mod tests;
