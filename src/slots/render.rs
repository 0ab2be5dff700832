//! Pure rendering of the active slot

use std::collections::HashSet;

use super::RepoSlot;
use crate::ActiveView;

/// Non-active branches to list: trimmed, blanks dropped, first occurrence kept,
/// active branch excluded.
pub fn sibling_branches(branches: &[String], active: &str) -> Vec<String> {
    let active = active.trim();
    let mut seen = HashSet::new();

    branches
        .iter()
        .map(|b| b.trim())
        .filter(|b| !b.is_empty() && *b != active)
        .filter(|b| seen.insert(*b))
        .map(str::to_string)
        .collect()
}

/// Render a slot (or no slot) into what the UI shows
pub fn render(slot: Option<&RepoSlot>) -> ActiveView {
    let Some(slot) = slot else {
        return ActiveView::default();
    };

    let (branch, siblings) = match &slot.context {
        Some(ctx) => {
            let active = ctx.active_branch.trim();
            let branch = (!active.is_empty()).then(|| active.to_string());
            (branch, sibling_branches(&ctx.branches, active))
        }
        None => (None, Vec::new()),
    };

    ActiveView {
        label: slot.label.clone(),
        branch,
        siblings,
    }
}
