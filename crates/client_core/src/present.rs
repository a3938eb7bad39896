use serde::{Serialize, Serializer};
use shared::domain::PriorityValue;

use crate::reconcile::ReconciledItem;

/// Display-ready triage output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "groups", rename_all = "snake_case")]
pub enum ViewModel {
    /// Nothing was returned; consumers show a dedicated message.
    Empty,
    Groups(Vec<CategoryGroup>),
}

impl ViewModel {
    pub fn is_empty(&self) -> bool {
        matches!(self, ViewModel::Empty)
    }

    pub fn groups(&self) -> &[CategoryGroup] {
        match self {
            ViewModel::Empty => &[],
            ViewModel::Groups(groups) => groups.as_slice(),
        }
    }

    /// Every card in display order, group by group.
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.groups().iter().flat_map(|group| group.cards.iter())
    }

    pub fn ordered_identities(&self) -> Vec<Option<&str>> {
        self.cards().map(Card::identity).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryGroup {
    pub category: String,
    pub cards: Vec<Card>,
}

impl CategoryGroup {
    pub fn count(&self) -> usize {
        self.cards.len()
    }
}

#[derive(Serialize)]
struct GroupView<'a> {
    category: &'a str,
    count: usize,
    cards: &'a [Card],
}

impl Serialize for CategoryGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        GroupView {
            category: &self.category,
            count: self.count(),
            cards: &self.cards,
        }
        .serialize(serializer)
    }
}

/// One presented item. `position` indexes the sequence passed to [`present`],
/// which is how edits address the item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub position: usize,
    pub item: ReconciledItem,
}

impl Card {
    pub fn identity(&self) -> Option<&str> {
        self.item.identity()
    }

    pub fn subject(&self) -> &str {
        self.item.item.display_subject()
    }

    pub fn priority(&self) -> &PriorityValue {
        self.item.priority()
    }

    pub fn explanation(&self) -> Option<&str> {
        self.item.item.display_explanation()
    }

    pub fn snippet(&self) -> Option<&str> {
        self.item.item.display_snippet()
    }
}

#[derive(Serialize)]
struct CardView<'a> {
    position: usize,
    identity: Option<&'a str>,
    subject: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    from: Option<&'a str>,
    priority: &'a PriorityValue,
    overridden: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    explanation: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    snippet: Option<&'a str>,
}

impl Serialize for Card {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        CardView {
            position: self.position,
            identity: self.identity(),
            subject: self.subject(),
            from: self.item.item.sender.as_deref(),
            priority: self.priority(),
            overridden: self.item.overridden,
            explanation: self.explanation(),
            snippet: self.snippet(),
        }
        .serialize(serializer)
    }
}

/// Orders and groups reconciled items for display.
///
/// Items are stably sorted by priority rank, then split into categories in
/// the order each category first appears in the sorted sequence. Items keep
/// their sorted order inside a group.
pub fn present(items: &[ReconciledItem]) -> ViewModel {
    if items.is_empty() {
        return ViewModel::Empty;
    }

    let mut order: Vec<usize> = (0..items.len()).collect();
    // `sort_by_key` is stable: equal ranks keep input order.
    order.sort_by_key(|&position| items[position].rank());

    let mut groups: Vec<CategoryGroup> = Vec::new();
    for position in order {
        let item = &items[position];
        let category = item.item.category_label();
        let card = Card {
            position,
            item: item.clone(),
        };
        match groups.iter_mut().find(|group| group.category == category) {
            Some(group) => group.cards.push(card),
            None => groups.push(CategoryGroup {
                category: category.to_string(),
                cards: vec![card],
            }),
        }
    }

    ViewModel::Groups(groups)
}

#[cfg(test)]
#[path = "tests/present_tests.rs"]
mod tests;
