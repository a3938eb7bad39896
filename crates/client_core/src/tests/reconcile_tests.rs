use super::*;
use serde_json::json;
use shared::domain::Priority;

fn item(record: serde_json::Value) -> Item {
    Item::from_record(&record)
}

#[test]
fn override_replaces_server_priority() {
    let overrides: OverrideSnapshot = [("1", "HIGH")].into_iter().collect();
    let out = reconcile(
        vec![item(json!({"id": "1", "priority": "LOW"}))],
        &overrides,
    );
    assert_eq!(out[0].item.priority, PriorityValue::Known(Priority::High));
    assert!(out[0].overridden);
}

#[test]
fn override_keys_by_subject_when_id_missing() {
    let overrides: OverrideSnapshot = [("Invoice due", "MEDIUM")].into_iter().collect();
    let out = reconcile(
        vec![item(json!({"subject": "Invoice due", "priority": "LOW"}))],
        &overrides,
    );
    assert_eq!(out[0].item.priority, PriorityValue::Known(Priority::Medium));
}

#[test]
fn items_without_override_keep_their_priority_untouched() {
    let out = reconcile(
        vec![
            item(json!({"id": "a", "priority": "URGENT"})),
            item(json!({"id": "b"})),
        ],
        &OverrideSnapshot::default(),
    );
    assert_eq!(out[0].item.priority, PriorityValue::Unrecognized("URGENT".into()));
    assert_eq!(out[1].item.priority, PriorityValue::Absent);
    assert!(out.iter().all(|r| !r.overridden));
}

#[test]
fn items_without_identity_pass_through() {
    // An entry under the empty key must never match an identity-less item.
    let overrides: OverrideSnapshot = [("", "HIGH")].into_iter().collect();
    let original = item(json!({"category": "NORMAL", "priority": "LOW"}));
    let out = reconcile(vec![original.clone()], &overrides);
    assert_eq!(out[0].item, original);
    assert!(!out[0].overridden);
}

#[test]
fn preserves_input_order_one_to_one() {
    let items: Vec<Item> = ["3", "1", "2"]
        .iter()
        .map(|id| item(json!({"id": id, "priority": "LOW"})))
        .collect();
    let overrides: OverrideSnapshot = [("1", "HIGH")].into_iter().collect();
    let out = reconcile(items, &overrides);
    let ids: Vec<_> = out.iter().map(|r| r.identity()).collect();
    assert_eq!(ids, vec![Some("3"), Some("1"), Some("2")]);
}

#[test]
fn unrecognized_stored_value_still_wins() {
    let overrides: OverrideSnapshot = [("1", "someday")].into_iter().collect();
    let out = reconcile(vec![item(json!({"id": "1", "priority": "HIGH"}))], &overrides);
    assert_eq!(out[0].item.priority, PriorityValue::Unrecognized("someday".into()));
    assert_eq!(out[0].rank(), shared::domain::UNRANKED);
}

#[test]
fn only_priority_is_overridden() {
    let overrides: OverrideSnapshot = [("1", "LOW")].into_iter().collect();
    let original = item(json!({
        "id": "1",
        "subject": "Standup",
        "category": "MEETINGS",
        "priority": "MEDIUM",
        "explanation": "Meeting invite",
    }));
    let out = reconcile(vec![original.clone()], &overrides);
    let mut expected = original;
    expected.priority = PriorityValue::Known(Priority::Low);
    assert_eq!(out[0].item, expected);
}
