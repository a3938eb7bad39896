use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{OverrideSnapshot, OverrideStore};

/// Process-local override store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryOverrideStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryOverrideStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: RwLock::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

#[async_trait]
impl OverrideStore for MemoryOverrideStore {
    async fn get(&self, identity: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(identity).cloned())
    }

    async fn set(&self, identity: &str, priority: &str) -> Result<()> {
        self.entries
            .write()
            .await
            .insert(identity.to_string(), priority.to_string());
        Ok(())
    }

    async fn clear(&self, identity: &str) -> Result<bool> {
        Ok(self.entries.write().await.remove(identity).is_some())
    }

    async fn snapshot(&self) -> Result<OverrideSnapshot> {
        Ok(OverrideSnapshot::new(self.entries.read().await.clone()))
    }
}
