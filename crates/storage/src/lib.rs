use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Row, Sqlite,
};
use tracing::debug;

mod memory;

pub use memory::MemoryOverrideStore;

/// Persisted per-item priority corrections, keyed by item identity.
///
/// Values are stored verbatim; deciding whether a value is a usable priority
/// is left to the reader.
#[async_trait]
pub trait OverrideStore: Send + Sync {
    async fn get(&self, identity: &str) -> Result<Option<String>>;
    async fn set(&self, identity: &str, priority: &str) -> Result<()>;
    /// Drops the correction for `identity`; returns whether one existed.
    async fn clear(&self, identity: &str) -> Result<bool>;
    async fn snapshot(&self) -> Result<OverrideSnapshot>;
}

/// Point-in-time copy of every stored override.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideSnapshot {
    entries: HashMap<String, String>,
}

impl OverrideSnapshot {
    pub fn new(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }

    /// Stored value for `identity`. Empty values count as no override.
    pub fn get(&self, identity: &str) -> Option<&str> {
        self.entries
            .get(identity)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by identity.
    pub fn entries(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<_> = self
            .entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        entries.sort_unstable();
        entries
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for OverrideSnapshot {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredOverride {
    pub identity: String,
    pub priority: String,
    pub updated_at: String,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("invalid database url '{database_url}'"))?
            .create_if_missing(true);
        // A single connection keeps `sqlite::memory:` databases shared across queries.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(connect_options)
            .await
            .with_context(|| format!("failed to open override database '{database_url}'"))?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to apply override store migrations")?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn list_overrides(&self) -> Result<Vec<StoredOverride>> {
        let rows = sqlx::query(
            "SELECT identity, priority, updated_at FROM priority_overrides ORDER BY identity",
        )
        .fetch_all(&self.pool)
        .await
        .context("failed to list priority overrides")?;
        Ok(rows
            .into_iter()
            .map(|r| StoredOverride {
                identity: r.get::<String, _>(0),
                priority: r.get::<String, _>(1),
                updated_at: r.get::<String, _>(2),
            })
            .collect())
    }
}

#[async_trait]
impl OverrideStore for Storage {
    async fn get(&self, identity: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT priority FROM priority_overrides WHERE identity = ?")
            .bind(identity)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("failed to read override for '{identity}'"))?;
        Ok(row.map(|r| r.get::<String, _>(0)))
    }

    async fn set(&self, identity: &str, priority: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO priority_overrides (identity, priority, updated_at)
             VALUES (?, ?, CURRENT_TIMESTAMP)
             ON CONFLICT(identity) DO UPDATE SET
                priority = excluded.priority,
                updated_at = CURRENT_TIMESTAMP",
        )
        .bind(identity)
        .bind(priority)
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to store override for '{identity}'"))?;
        debug!(identity, priority, "storage: override stored");
        Ok(())
    }

    async fn clear(&self, identity: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM priority_overrides WHERE identity = ?")
            .bind(identity)
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to clear override for '{identity}'"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn snapshot(&self) -> Result<OverrideSnapshot> {
        let rows = sqlx::query("SELECT identity, priority FROM priority_overrides")
            .fetch_all(&self.pool)
            .await
            .context("failed to snapshot priority overrides")?;
        Ok(rows
            .into_iter()
            .map(|r| (r.get::<String, _>(0), r.get::<String, _>(1)))
            .collect())
    }
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.starts_with("sqlite::memory:") || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

/// Turns a bare filesystem path into a `sqlite://` url; urls pass through.
pub fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.starts_with("sqlite:") || raw_database_url.contains("://") {
        return raw_database_url.to_string();
    }

    format!("sqlite://{}", raw_database_url.replace('\\', "/"))
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
