use std::sync::Arc;

use shared::domain::{Item, Priority};
use storage::{OverrideSnapshot, OverrideStore};
use tracing::{info, warn};

use crate::{
    error::LoadError,
    present::{present, ViewModel},
    reconcile::{reconcile, ReconciledItem},
    source::ItemSource,
};

/// Reconciles fetched items with the override store and serves edits.
///
/// The session keeps its items in the order they were last presented.
/// An edit re-sorts that displayed sequence, so ties keep the order the user
/// last saw. Positions used by [`TriageSession::on_priority_edit`] index this
/// sequence.
pub struct TriageSession {
    overrides: Arc<dyn OverrideStore>,
    items: Vec<ReconciledItem>,
}

impl TriageSession {
    pub fn new(overrides: Arc<dyn OverrideStore>) -> Self {
        Self {
            overrides,
            items: Vec::new(),
        }
    }

    pub fn items(&self) -> &[ReconciledItem] {
        &self.items
    }

    /// Fetches items, applies stored corrections and presents the result.
    ///
    /// On failure the previous items are left untouched.
    pub async fn load(&mut self, source: &dyn ItemSource) -> Result<ViewModel, LoadError> {
        let fetched = source.fetch_items().await?;
        Ok(self.replace_items(fetched).await)
    }

    /// Same as [`TriageSession::load`] for items already in hand.
    pub async fn replace_items(&mut self, items: Vec<Item>) -> ViewModel {
        let snapshot = self.snapshot().await;
        self.items = reconcile(items, &snapshot);
        self.sort_items();
        let overridden = self.items.iter().filter(|item| item.overridden).count();
        info!(
            count = self.items.len(),
            overridden,
            "triage: items reconciled"
        );
        self.present()
    }

    pub fn present(&self) -> ViewModel {
        present(&self.items)
    }

    pub fn position_of(&self, identity: &str) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.identity() == Some(identity))
    }

    /// Records a user correction and re-presents the in-memory items.
    ///
    /// Items without an identity are only updated for this session. A failed
    /// store write is logged and the session view still reflects the edit.
    /// Returns `None` when `position` is out of range.
    pub async fn on_priority_edit(
        &mut self,
        position: usize,
        priority: Priority,
    ) -> Option<ViewModel> {
        let item = self.items.get(position)?;

        match item.identity() {
            Some(identity) => {
                if let Err(err) = self.overrides.set(identity, priority.as_str()).await {
                    warn!(identity, error = %err, "triage: failed to persist priority override");
                } else {
                    info!(identity, priority = %priority, "triage: priority override stored");
                }
            }
            None => {
                warn!(position, "triage: item has no identity, override kept for this session only");
            }
        }

        let item = &mut self.items[position];
        item.item.priority = priority.into();
        item.overridden = true;
        self.sort_items();
        Some(self.present())
    }

    // Same stable rank order `present` uses, applied to the session's own
    // sequence so card positions match `items()`.
    fn sort_items(&mut self) {
        self.items.sort_by_key(ReconciledItem::rank);
    }

    async fn snapshot(&self) -> OverrideSnapshot {
        match self.overrides.snapshot().await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(error = %err, "triage: override store unavailable, using server priorities");
                OverrideSnapshot::default()
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
