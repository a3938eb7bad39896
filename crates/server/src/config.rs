use std::{collections::HashMap, fs};

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub server_bind: String,
    pub fixture_path: String,
    pub project_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8000".into(),
            fixture_path: "./fixtures/emails.json".into(),
            project_name: "inbox-triage".into(),
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("server.toml") {
        apply_file(&mut settings, &raw);
    }
    apply_env(&mut settings, |key| std::env::var(key).ok());

    settings
}

pub(crate) fn apply_file(settings: &mut Settings, raw: &str) {
    let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) else {
        return;
    };
    if let Some(v) = file_cfg.get("bind_addr") {
        settings.server_bind = v.clone();
    }
    if let Some(v) = file_cfg.get("fixture_path") {
        settings.fixture_path = v.clone();
    }
    if let Some(v) = file_cfg.get("project_name") {
        settings.project_name = v.clone();
    }
}

pub(crate) fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = lookup("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = lookup("FIXTURE_PATH") {
        settings.fixture_path = v;
    }
    if let Some(v) = lookup("APP__FIXTURE_PATH") {
        settings.fixture_path = v;
    }

    if let Some(v) = lookup("APP__PROJECT_NAME") {
        settings.project_name = v;
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
