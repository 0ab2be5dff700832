use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the UI currently shows for the active slot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveView {
    /// Slot label (tab title)
    pub label: String,
    /// Active-branch indicator; `None` means hidden
    pub branch: Option<String>,
    /// Non-active branches; the container is hidden when empty
    pub siblings: Vec<String>,
}

impl ActiveView {
    pub fn branch_visible(&self) -> bool {
        self.branch.is_some()
    }

    pub fn siblings_visible(&self) -> bool {
        !self.siblings.is_empty()
    }
}

/// The kind of UI update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiEventKind {
    /// The visible title of the active slot changed
    TitleChanged,
    /// The active slot was re-rendered
    ViewRendered,
}

impl std::fmt::Display for UiEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UiEventKind::TitleChanged => write!(f, "title"),
            UiEventKind::ViewRendered => write!(f, "render"),
        }
    }
}

/// A UI-visible update produced by reconciliation or slot changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiEvent {
    pub timestamp: DateTime<Utc>,
    pub kind: UiEventKind,
    /// New title for `TitleChanged`
    pub title: Option<String>,
    /// Snapshot for `ViewRendered`
    pub view: Option<ActiveView>,
}

impl UiEvent {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            kind: UiEventKind::TitleChanged,
            title: Some(title.into()),
            view: None,
        }
    }

    pub fn rendered(view: ActiveView) -> Self {
        Self {
            timestamp: Utc::now(),
            kind: UiEventKind::ViewRendered,
            title: None,
            view: Some(view),
        }
    }

    pub fn is_title(&self) -> bool {
        self.kind == UiEventKind::TitleChanged
    }
}

impl std::fmt::Display for UiEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.kind, &self.title, &self.view) {
            (UiEventKind::TitleChanged, Some(title), _) => write!(f, "[title] {}", title),
            (UiEventKind::ViewRendered, _, Some(view)) => {
                write!(f, "[render] {}", view.label)?;
                if let Some(branch) = &view.branch {
                    write!(f, " ({})", branch)?;
                }
                if !view.siblings.is_empty() {
                    write!(f, " +{} branches", view.siblings.len())?;
                }
                Ok(())
            }
            (kind, _, _) => write!(f, "[{}]", kind),
        }
    }
}
