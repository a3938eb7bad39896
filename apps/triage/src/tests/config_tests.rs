use super::*;

#[test]
fn file_then_env_then_flags() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("triage.toml");
    fs::write(
        &path,
        r#"
        server_url = "http://file:1"
        database_url = "./file.db"
        timeout_secs = 3
        "#,
    )
    .expect("write config");

    let settings = load_settings(
        Some(&path),
        Overrides {
            timeout_secs: Some(20),
            ..Overrides::default()
        },
    );
    assert_eq!(settings.timeout, Duration::from_secs(20));

    let mut from_file = Settings::default();
    apply_file(&mut from_file, &fs::read_to_string(&path).expect("read"));
    assert_eq!(from_file.server_url, "http://file:1");
    assert_eq!(from_file.database_url, "./file.db");
    assert_eq!(from_file.timeout, Duration::from_secs(3));
}

#[test]
fn env_values_replace_file_values() {
    let mut settings = Settings::default();
    apply_file(&mut settings, r#"server_url = "http://file:1""#);
    apply_env(&mut settings, |key| match key {
        "TRIAGE_SERVER_URL" => Some("http://env:2".into()),
        "TRIAGE_TIMEOUT_SECS" => Some("nope".into()),
        _ => None,
    });
    assert_eq!(settings.server_url, "http://env:2");
    assert_eq!(settings.timeout, DEFAULT_TIMEOUT);
}

#[test]
fn malformed_file_keeps_defaults() {
    let mut settings = Settings::default();
    apply_file(&mut settings, "server_url = ");
    assert_eq!(settings, Settings::default());
}

#[test]
fn plain_database_path_is_normalized() {
    let settings = load_settings(
        Some(Path::new("/definitely/not/here/triage.toml")),
        Overrides {
            database_url: Some("./state/overrides.db".into()),
            ..Overrides::default()
        },
    );
    assert_eq!(settings.database_url, "sqlite://./state/overrides.db");
}
