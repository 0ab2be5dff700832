//! Open repository slots (UI tabs) and the active-slot reference
//!
//! The store keeps slot order and which slot is active. Every change to the
//! active slot re-renders synchronously into an [`ActiveView`], which is also
//! pushed to the UI channel when one is attached.

mod render;

pub use render::{render, sibling_branches};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::debug;

use crate::{ActiveView, RepositoryContext, UiEvent};

/// Stable identity of a slot within its store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotId(pub u64);

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "slot#{}", self.0)
    }
}

/// A UI-visible tab, optionally bound to a resolved repository
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoSlot {
    pub label: String,
    pub filepath: String,
    pub context: Option<RepositoryContext>,
}

impl RepoSlot {
    pub fn new(label: impl Into<String>, filepath: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            filepath: filepath.into(),
            context: None,
        }
    }
}

/// Ordered slots plus the active reference
pub struct RepoSlotStore {
    slots: Vec<(SlotId, RepoSlot)>,
    active: Option<SlotId>,
    next_id: u64,
    /// Label used when a slot has no repository context
    default_label: String,
    ui_tx: Option<mpsc::UnboundedSender<UiEvent>>,
    view: ActiveView,
}

impl RepoSlotStore {
    pub fn new(default_label: impl Into<String>) -> Self {
        Self {
            slots: Vec::new(),
            active: None,
            next_id: 1,
            default_label: default_label.into(),
            ui_tx: None,
            view: ActiveView::default(),
        }
    }

    /// Push every re-render to this channel
    pub fn with_ui_channel(mut self, ui_tx: mpsc::UnboundedSender<UiEvent>) -> Self {
        self.ui_tx = Some(ui_tx);
        self
    }

    pub fn default_label(&self) -> &str {
        &self.default_label
    }

    /// Append a slot
    pub fn add(&mut self, slot: RepoSlot) -> SlotId {
        let id = SlotId(self.next_id);
        self.next_id += 1;
        self.slots.push((id, slot));
        id
    }

    /// Remove a slot; clears the active reference if it was active.
    ///
    /// Callers choose what to activate next (see [`close`](Self::close)).
    pub fn remove(&mut self, id: SlotId) -> Option<RepoSlot> {
        let idx = self.index_of(id)?;
        let (_, slot) = self.slots.remove(idx);
        if self.active == Some(id) {
            self.active = None;
        }
        Some(slot)
    }

    /// Change the active slot and re-render. Unknown ids activate nothing.
    pub fn set_active(&mut self, id: Option<SlotId>) -> ActiveView {
        self.active = id.filter(|id| self.index_of(*id).is_some());
        debug!(active = ?self.active, "Active slot changed");
        self.rerender()
    }

    /// Create an empty slot at the end and activate it
    pub fn create_slot(&mut self) -> SlotId {
        let id = self.add(RepoSlot::new("", ""));
        self.set_active(Some(id));
        id
    }

    /// Adopt a pre-existing tab at startup and activate it.
    ///
    /// A blank label falls back to `fallback`.
    pub fn hydrate(&mut self, label: &str, fallback: &str) -> SlotId {
        let label = match label.trim() {
            "" => fallback,
            trimmed => trimmed,
        };
        let id = self.add(RepoSlot::new(label, ""));
        self.set_active(Some(id));
        id
    }

    /// Close a slot. If it was active, activate the following sibling, else
    /// the preceding one, else nothing. Returns the new active slot.
    pub fn close(&mut self, id: SlotId) -> Option<SlotId> {
        let was_active = self.active == Some(id);
        let next = if was_active { self.neighbor_of(id) } else { None };

        self.remove(id)?;

        if was_active {
            self.set_active(next);
        }
        self.active
    }

    /// Following sibling, else preceding sibling
    pub fn neighbor_of(&self, id: SlotId) -> Option<SlotId> {
        let idx = self.index_of(id)?;
        self.slots
            .get(idx + 1)
            .or_else(|| idx.checked_sub(1).and_then(|prev| self.slots.get(prev)))
            .map(|(id, _)| *id)
    }

    /// Bind a resolved context to the active slot.
    ///
    /// `relabel` is set when the repository root changed; only then does the
    /// slot label change. Returns `false` when no slot is active.
    pub fn apply_context(&mut self, context: RepositoryContext, relabel: bool) -> bool {
        let Some(slot) = self.active_slot_mut() else {
            return false;
        };

        slot.filepath = context.root.clone();
        if relabel {
            slot.label = context.name.clone();
        }
        slot.context = Some(context);

        let view = render(self.active());
        if view != self.view {
            self.view = view.clone();
            self.emit(UiEvent::rendered(view));
        }
        true
    }

    /// Drop the active slot's context and restore the default label
    pub fn clear_active_context(&mut self) -> bool {
        let default_label = self.default_label.clone();
        let Some(slot) = self.active_slot_mut() else {
            return false;
        };

        slot.context = None;
        slot.filepath.clear();
        slot.label = default_label;
        self.rerender();
        true
    }

    pub fn active_id(&self) -> Option<SlotId> {
        self.active
    }

    pub fn active(&self) -> Option<&RepoSlot> {
        let id = self.active?;
        self.get(id)
    }

    pub fn get(&self, id: SlotId) -> Option<&RepoSlot> {
        self.slots.iter().find(|(sid, _)| *sid == id).map(|(_, s)| s)
    }

    /// Slots in display order
    pub fn slots(&self) -> impl Iterator<Item = (SlotId, &RepoSlot)> {
        self.slots.iter().map(|(id, slot)| (*id, slot))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Last rendered view of the active slot
    pub fn active_view(&self) -> &ActiveView {
        &self.view
    }

    fn active_slot_mut(&mut self) -> Option<&mut RepoSlot> {
        let id = self.active?;
        self.slots
            .iter_mut()
            .find(|(sid, _)| *sid == id)
            .map(|(_, s)| s)
    }

    fn index_of(&self, id: SlotId) -> Option<usize> {
        self.slots.iter().position(|(sid, _)| *sid == id)
    }

    fn rerender(&mut self) -> ActiveView {
        let view = render(self.active());
        self.view = view.clone();
        self.emit(UiEvent::rendered(view.clone()));
        view
    }

    fn emit(&self, event: UiEvent) {
        if let Some(tx) = &self.ui_tx {
            let _ = tx.send(event);
        }
    }
}
