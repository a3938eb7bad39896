use super::{apply_env, apply_file, Settings};

use std::collections::HashMap;

#[test]
fn file_values_override_defaults() {
    let mut settings = Settings::default();
    apply_file(
        &mut settings,
        r#"
        bind_addr = "0.0.0.0:9000"
        fixture_path = "/srv/emails.json"
        "#,
    );
    assert_eq!(settings.server_bind, "0.0.0.0:9000");
    assert_eq!(settings.fixture_path, "/srv/emails.json");
    assert_eq!(settings.project_name, Settings::default().project_name);
}

#[test]
fn unparseable_file_is_ignored() {
    let mut settings = Settings::default();
    apply_file(&mut settings, "bind_addr = [");
    assert_eq!(settings, Settings::default());
}

#[test]
fn prefixed_env_wins_over_plain_env() {
    let env: HashMap<&str, &str> = HashMap::from([
        ("SERVER_BIND", "127.0.0.1:1"),
        ("APP__BIND_ADDR", "127.0.0.1:2"),
        ("FIXTURE_PATH", "a.json"),
    ]);
    let mut settings = Settings::default();
    apply_env(&mut settings, |key| env.get(key).map(|v| v.to_string()));
    assert_eq!(settings.server_bind, "127.0.0.1:2");
    assert_eq!(settings.fixture_path, "a.json");
}
