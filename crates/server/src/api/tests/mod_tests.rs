use super::*;
use serde_json::json;

#[test]
fn parses_wrapped_and_bare_fixtures() {
    let wrapped = parse_fixture(br#"{"emails": [{"id": "a"}]}"#).expect("wrapped");
    assert_eq!(wrapped.emails.len(), 1);

    let bare = parse_fixture(br#"[{"id": "a"}, {"id": "b"}]"#).expect("bare");
    assert_eq!(bare.emails.len(), 2);

    let no_field = parse_fixture(b"{}").expect("object without emails");
    assert!(no_field.emails.is_empty());
}

#[test]
fn rejects_invalid_json() {
    assert!(parse_fixture(b"{not json").is_err());
}

#[test]
fn summary_counts_missing_values_as_unknown() {
    let emails = vec![
        json!({"category": "JOBS", "priority": "HIGH"}),
        json!({"category": "JOBS", "priority": "LOW"}),
        json!({"category": "", "priority": ""}),
        json!({"subject": "bare"}),
    ];
    let summary = summarize(&emails);
    assert_eq!(summary.total, 4);
    assert_eq!(summary.by_category.get("JOBS"), Some(&2));
    assert_eq!(summary.by_category.get(UNKNOWN_BUCKET), Some(&2));
    assert_eq!(summary.by_priority.get("HIGH"), Some(&1));
    assert_eq!(summary.by_priority.get("LOW"), Some(&1));
    assert_eq!(summary.by_priority.get(UNKNOWN_BUCKET), Some(&2));
}

#[tokio::test]
async fn missing_fixture_is_reported_as_missing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = FixtureSource::new(dir.path().join("absent.json"));
    let err = source.load().await.expect_err("should fail");
    assert!(matches!(err, FixtureError::Missing(_)));
}

#[tokio::test]
async fn malformed_fixture_is_reported_as_malformed() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("emails.json");
    std::fs::write(&path, "[{").expect("write");
    let err = FixtureSource::new(path).load().await.expect_err("should fail");
    assert!(matches!(err, FixtureError::Malformed { .. }));
}
