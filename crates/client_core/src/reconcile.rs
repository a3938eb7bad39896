use shared::domain::{Item, PriorityValue};
use storage::OverrideSnapshot;

/// An item after persisted corrections have been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciledItem {
    pub item: Item,
    /// Whether `item.priority` came from a user correction.
    pub overridden: bool,
}

impl ReconciledItem {
    pub fn identity(&self) -> Option<&str> {
        self.item.identity()
    }

    pub fn priority(&self) -> &PriorityValue {
        &self.item.priority
    }

    pub fn rank(&self) -> u8 {
        self.item.priority.rank()
    }
}

/// Applies stored priority corrections to `items`, one output per input in
/// the same order.
///
/// Only `priority` is ever replaced. Items without an identity, or without a
/// stored correction, keep whatever priority they arrived with.
pub fn reconcile(items: Vec<Item>, overrides: &OverrideSnapshot) -> Vec<ReconciledItem> {
    items
        .into_iter()
        .map(|item| reconcile_one(item, overrides))
        .collect()
}

fn reconcile_one(mut item: Item, overrides: &OverrideSnapshot) -> ReconciledItem {
    let stored = item.identity().and_then(|identity| overrides.get(identity));
    match stored {
        Some(value) => {
            item.priority = PriorityValue::parse(value);
            ReconciledItem {
                item,
                overridden: true,
            }
        }
        None => ReconciledItem {
            item,
            overridden: false,
        },
    }
}

#[cfg(test)]
#[path = "tests/reconcile_tests.rs"]
mod tests;
