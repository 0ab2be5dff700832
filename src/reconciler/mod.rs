//! Directory change reconciliation
//!
//! Turns a normalized directory into repository context and pushes it to the
//! slot store. Resolutions for one session may run concurrently; each gets a
//! token from the session and only the most recently issued token may apply
//! its result, so a slow lookup for an old directory never overwrites newer
//! state.

mod session;


pub use session::{ResolveToken, Session};

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::resolver::{ContextResolver, enrich};
use crate::slots::RepoSlotStore;
use crate::{DirectoryChange, RepositoryContext, UiEvent};

/// Result of reconciling one directory change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Context applied to the active slot
    Resolved { root: String, root_changed: bool },
    /// A previously known root was cleared
    Cleared,
    /// No repository and none known before
    Unchanged,
    /// Resolver call failed; nothing changed
    Failed,
    /// A newer change was issued while this one was in flight
    Stale,
    /// The session was torn down
    Closed,
}

/// Shared handle to the slot store
pub type SharedSlotStore = Arc<Mutex<RepoSlotStore>>;

/// Resolves directory changes and fans results out to the UI
pub struct ContextReconciler {
    resolver: Arc<dyn ContextResolver>,
    store: SharedSlotStore,
    ui_tx: Option<mpsc::UnboundedSender<UiEvent>>,
}

impl ContextReconciler {
    pub fn new(resolver: Arc<dyn ContextResolver>, store: SharedSlotStore) -> Self {
        Self {
            resolver,
            store,
            ui_tx: None,
        }
    }

    /// Send title changes to this channel
    pub fn with_ui_channel(mut self, ui_tx: mpsc::UnboundedSender<UiEvent>) -> Self {
        self.ui_tx = Some(ui_tx);
        self
    }

    pub fn store(&self) -> &SharedSlotStore {
        &self.store
    }

    /// Reconcile one directory change for `session`
    pub async fn reconcile(&self, session: &Session, change: &DirectoryChange) -> ReconcileOutcome {
        let token = session.issue_token();
        self.reconcile_with_token(session, token, change).await
    }

    /// Reconcile with a token issued earlier.
    ///
    /// Lets callers issue tokens in detection order and run the resolutions
    /// on separate tasks.
    pub async fn reconcile_with_token(
        &self,
        session: &Session,
        token: ResolveToken,
        change: &DirectoryChange,
    ) -> ReconcileOutcome {
        if !session.is_live() {
            return ReconcileOutcome::Closed;
        }

        debug!(token, path = %change.path, source = ?change.source, "Resolving directory");

        let lookup = match self.resolver.resolve_context(&change.path).await {
            Ok(lookup) => lookup,
            Err(e) => {
                warn!("Failed to resolve context for {}: {}", change.path, e);
                return ReconcileOutcome::Failed;
            }
        };

        match lookup {
            None => self.apply_absent(session, token),
            Some(lookup) => {
                let context = enrich(self.resolver.as_ref(), lookup).await;
                self.apply_context(session, token, context)
            }
        }
    }

    fn apply_absent(&self, session: &Session, token: ResolveToken) -> ReconcileOutcome {
        if let Some(outcome) = self.check_fresh(session, token) {
            return outcome;
        }

        let Some(previous) = session.clear_resolved_root() else {
            return ReconcileOutcome::Unchanged;
        };

        info!("Left repository {}", previous);
        let default_label = {
            let mut store = self.lock_store();
            store
                .clear_active_context()
                .then(|| store.default_label().to_string())
        };
        if let Some(label) = default_label {
            self.emit(UiEvent::title(label));
        }
        ReconcileOutcome::Cleared
    }

    fn apply_context(
        &self,
        session: &Session,
        token: ResolveToken,
        context: RepositoryContext,
    ) -> ReconcileOutcome {
        if let Some(outcome) = self.check_fresh(session, token) {
            return outcome;
        }

        let root = context.root.clone();
        let name = context.name.clone();
        let root_changed = session.set_resolved_root(&root);

        // The session tracks the shell's root even while no slot is open
        if !self.lock_store().apply_context(context, root_changed) {
            debug!("No active slot for {}; title left as is", root);
            return ReconcileOutcome::Resolved { root, root_changed };
        }

        if root_changed {
            info!("Entered repository {} ({})", name, root);
            self.emit(UiEvent::title(name));
        }

        ReconcileOutcome::Resolved { root, root_changed }
    }

    fn check_fresh(&self, session: &Session, token: ResolveToken) -> Option<ReconcileOutcome> {
        if !session.is_live() {
            debug!(token, "Session closed; dropping resolution");
            return Some(ReconcileOutcome::Closed);
        }
        if !session.is_current(token) {
            debug!(token, "Discarding stale resolution");
            return Some(ReconcileOutcome::Stale);
        }
        None
    }

    fn lock_store(&self) -> std::sync::MutexGuard<'_, RepoSlotStore> {
        self.store.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn emit(&self, event: UiEvent) {
        if let Some(tx) = &self.ui_tx {
            let _ = tx.send(event);
        }
    }
}
