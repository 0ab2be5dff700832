//! Core domain types for cwdsync

mod context;
mod marker;
mod platform;
mod ui_event;

pub use context::{RepoLookup, RepositoryContext};
pub use marker::{DirectoryChange, DirectoryMarker, MarkerEncoding, MarkerOrigin, MarkerSource};
pub use platform::{Platform, ShellKind};
pub use ui_event::{ActiveView, UiEvent, UiEventKind};
