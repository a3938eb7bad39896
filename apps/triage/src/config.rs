use std::{collections::HashMap, fs, path::Path, time::Duration};

use client_core::DEFAULT_TIMEOUT;
use storage::normalize_database_url;
use tracing::warn;

pub const DEFAULT_CONFIG_FILE: &str = "triage.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    pub database_url: String,
    pub timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8000".into(),
            database_url: "sqlite://./data/triage.db".into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Explicit values from the command line; these win over everything else.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub server_url: Option<String>,
    pub database_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

pub fn load_settings(config_path: Option<&Path>, flags: Overrides) -> Settings {
    let mut settings = Settings::default();

    let path = config_path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
    if let Ok(raw) = fs::read_to_string(path) {
        apply_file(&mut settings, &raw);
    } else if config_path.is_some() {
        warn!(path = %path.display(), "config: file not readable, using defaults");
    }
    apply_env(&mut settings, |key| std::env::var(key).ok());
    apply_flags(&mut settings, flags);

    settings.database_url = normalize_database_url(&settings.database_url);
    settings
}

pub(crate) fn apply_file(settings: &mut Settings, raw: &str) {
    let file_cfg = match toml::from_str::<HashMap<String, toml::Value>>(raw) {
        Ok(cfg) => cfg,
        Err(err) => {
            warn!(error = %err, "config: ignoring malformed config file");
            return;
        }
    };
    if let Some(v) = file_cfg.get("server_url").and_then(toml::Value::as_str) {
        settings.server_url = v.to_string();
    }
    if let Some(v) = file_cfg.get("database_url").and_then(toml::Value::as_str) {
        settings.database_url = v.to_string();
    }
    if let Some(secs) = file_cfg.get("timeout_secs").and_then(toml::Value::as_integer) {
        if let Ok(secs) = u64::try_from(secs) {
            settings.timeout = Duration::from_secs(secs);
        }
    }
}

pub(crate) fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("TRIAGE_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = lookup("TRIAGE_DATABASE_URL") {
        settings.database_url = v;
    }
    if let Some(v) = lookup("TRIAGE_TIMEOUT_SECS") {
        match v.parse::<u64>() {
            Ok(secs) => settings.timeout = Duration::from_secs(secs),
            Err(_) => warn!(value = %v, "config: TRIAGE_TIMEOUT_SECS is not a number"),
        }
    }
}

fn apply_flags(settings: &mut Settings, flags: Overrides) {
    if let Some(v) = flags.server_url {
        settings.server_url = v;
    }
    if let Some(v) = flags.database_url {
        settings.database_url = v;
    }
    if let Some(secs) = flags.timeout_secs {
        settings.timeout = Duration::from_secs(secs);
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
