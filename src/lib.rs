//! cwdsync - working-directory sync for embedded terminals
//!
//! Tracks which directory, and which repository, a shell running inside a
//! terminal currently occupies, and keeps a set of repository slots (tabs) in
//! sync with it as the user navigates.
//!
//! ## Pipeline
//!
//! 1. **Instrumentation**: [`shell::HookInjector`] makes the shell announce
//!    its directory on every prompt with in-band OSC 7 / OSC 777 markers.
//! 2. **Detection**: [`detector::CwdMarkerDetector`] finds markers in the
//!    output stream, through a passive scan and a control-sequence parser,
//!    and reports each emission once.
//! 3. **Reconciliation**: [`reconciler::ContextReconciler`] resolves the
//!    directory to repository context and applies only the newest result.
//! 4. **Slots**: [`slots::RepoSlotStore`] holds the tabs and renders the
//!    active one.

pub mod config;
pub mod detector;
pub mod domain;
pub mod path;
pub mod reconciler;
pub mod resolver;
pub mod shell;
pub mod slots;
pub mod terminal;

pub use domain::*;
