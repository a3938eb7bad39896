use client_core::{present, reconcile, ViewModel};
use proptest::prelude::*;
use serde_json::{json, Map, Value};
use shared::domain::{Item, PriorityValue};
use storage::OverrideSnapshot;

fn priority_strategy() -> impl Strategy<Value = Option<&'static str>> {
    prop::sample::select(vec![
        Some("HIGH"),
        Some("MEDIUM"),
        Some("LOW"),
        Some("urgent"),
        Some(""),
        None,
    ])
}

fn record_strategy() -> impl Strategy<Value = Value> {
    (
        prop::option::of(0u8..6),
        prop::option::of("[a-c]{0,2}"),
        prop::sample::select(vec!["", "JOBS", "FINANCE", "SOCIAL"]),
        priority_strategy(),
    )
        .prop_map(|(id, subject, category, priority)| {
            let mut fields = Map::new();
            if let Some(id) = id {
                fields.insert("id".into(), json!(format!("m{id}")));
            }
            if let Some(subject) = subject {
                fields.insert("subject".into(), json!(subject));
            }
            fields.insert("category".into(), json!(category));
            if let Some(priority) = priority {
                fields.insert("priority".into(), json!(priority));
            }
            Value::Object(fields)
        })
}

fn overrides_strategy() -> impl Strategy<Value = OverrideSnapshot> {
    prop::collection::vec(
        (
            prop::sample::select(vec!["m0", "m1", "m2", "m3", "a", "b"]),
            prop::sample::select(vec!["HIGH", "MEDIUM", "LOW", "later", ""]),
        ),
        0..5,
    )
    .prop_map(|entries| entries.into_iter().collect())
}

fn items_from(records: &[Value]) -> Vec<Item> {
    records.iter().map(Item::from_record).collect()
}

proptest! {
    #[test]
    fn groups_are_exhaustive_and_disjoint(
        records in prop::collection::vec(record_strategy(), 0..24),
        overrides in overrides_strategy(),
    ) {
        let reconciled = reconcile(items_from(&records), &overrides);
        let view = present(&reconciled);

        let mut positions: Vec<usize> = view.cards().map(|card| card.position).collect();
        positions.sort_unstable();
        prop_assert_eq!(positions, (0..records.len()).collect::<Vec<_>>());

        if records.is_empty() {
            prop_assert_eq!(view, ViewModel::Empty);
        } else {
            prop_assert!(!view.groups().is_empty());
        }
    }

    #[test]
    fn groups_follow_rank_then_input_order(
        records in prop::collection::vec(record_strategy(), 1..24),
        overrides in overrides_strategy(),
    ) {
        let reconciled = reconcile(items_from(&records), &overrides);
        let view = present(&reconciled);

        for group in view.groups() {
            prop_assert_eq!(group.count(), group.cards.len());
            for pair in group.cards.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                prop_assert!(a.item.rank() <= b.item.rank());
                if a.item.rank() == b.item.rank() {
                    prop_assert!(a.position < b.position);
                }
                prop_assert_eq!(a.item.item.category_label(), group.category.as_str());
            }
        }

        // A category's group starts where that category first shows up in the sorted order.
        for pair in view.groups().windows(2) {
            let (a, b) = (&pair[0].cards[0], &pair[1].cards[0]);
            prop_assert!(
                a.item.rank() < b.item.rank()
                    || (a.item.rank() == b.item.rank() && a.position < b.position)
            );
        }
    }

    #[test]
    fn stored_override_always_wins(
        records in prop::collection::vec(record_strategy(), 0..24),
        overrides in overrides_strategy(),
    ) {
        let reconciled = reconcile(items_from(&records), &overrides);
        for (original, after) in items_from(&records).iter().zip(&reconciled) {
            match original.identity().and_then(|identity| overrides.get(identity)) {
                Some(stored) => {
                    prop_assert_eq!(&after.item.priority, &PriorityValue::parse(stored));
                    prop_assert!(after.overridden);
                }
                None => prop_assert_eq!(&after.item, original),
            }
        }
    }

    #[test]
    fn presenting_is_idempotent(
        records in prop::collection::vec(record_strategy(), 0..24),
        overrides in overrides_strategy(),
    ) {
        let first = present(&reconcile(items_from(&records), &overrides));
        let second = present(&reconcile(items_from(&records), &overrides));
        prop_assert_eq!(first, second);
    }
}
