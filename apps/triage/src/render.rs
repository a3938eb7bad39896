use std::fmt::Write as _;

use client_core::{Card, ViewModel};
use storage::StoredOverride;

pub const EMPTY_MESSAGE: &str = "No emails returned.";

pub fn render_view(view: &ViewModel) -> String {
    let mut out = String::new();
    let groups = match view {
        ViewModel::Empty => {
            out.push_str(EMPTY_MESSAGE);
            out.push('\n');
            return out;
        }
        ViewModel::Groups(groups) => groups,
    };

    for (index, group) in groups.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "{} ({})", group.category, group.count());
        for card in &group.cards {
            render_card(&mut out, card);
        }
    }
    out
}

fn render_card(out: &mut String, card: &Card) {
    let badge = card.priority().as_str().unwrap_or("-");
    let marker = if card.item.overridden { "*" } else { "" };
    let _ = writeln!(out, "  [{badge}{marker}] {}", card.subject());
    match card.identity() {
        Some(identity) => {
            let _ = writeln!(out, "      id: {identity}");
        }
        None => {
            let _ = writeln!(out, "      id: (none, edits are not saved)");
        }
    }
    if let Some(sender) = card.item.item.sender.as_deref().filter(|s| !s.is_empty()) {
        let _ = writeln!(out, "      from: {sender}");
    }
    if let Some(explanation) = card.explanation() {
        let _ = writeln!(out, "      {explanation}");
    }
    if let Some(snippet) = card.snippet() {
        let _ = writeln!(out, "      > {snippet}");
    }
}

pub fn render_overrides(overrides: &[StoredOverride]) -> String {
    if overrides.is_empty() {
        return "No priority overrides stored.\n".to_string();
    }
    let mut out = String::new();
    for entry in overrides {
        let _ = writeln!(
            out,
            "{}\t{}\t{}",
            entry.identity, entry.priority, entry.updated_at
        );
    }
    out
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
