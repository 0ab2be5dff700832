//! One terminal instance and everything tracking its directory

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::PtyTransport;
use crate::config::Config;
use crate::detector::{CwdMarkerDetector, OscDispatcher, VteDispatcher};
use crate::reconciler::{ContextReconciler, ReconcileOutcome, Session, SharedSlotStore};
use crate::resolver::ContextResolver;
use crate::shell::{HookInjector, InjectOutcome, home_command};
use crate::slots::{RepoSlotStore, SlotId};
use crate::{Platform, ShellKind, UiEvent};

/// Per-view settings
#[derive(Debug, Clone)]
pub struct ViewConfig {
    pub platform: Platform,
    pub shell: ShellKind,
    pub install_hook: bool,
    pub suppress_echo: bool,
    pub dedup_window: Duration,
    /// Feed output through a control-sequence parser as well as the scan
    pub structured_dispatch: bool,
    /// Label restored when the shell leaves a repository
    pub default_title: String,
    /// Label of a pre-existing first tab (blank uses `initial_label`)
    pub hydrate_label: String,
    pub initial_label: String,
}

impl ViewConfig {
    pub fn from_config(config: &Config, shell: ShellKind) -> Self {
        Self {
            platform: Platform::current(),
            shell,
            install_hook: config.shell.install_hook,
            suppress_echo: config.shell.suppress_echo,
            dedup_window: config.detector.dedup_window(),
            structured_dispatch: config.detector.structured_dispatch,
            default_title: config.ui.default_title.clone(),
            hydrate_label: String::new(),
            initial_label: config.ui.initial_label.clone(),
        }
    }
}

/// Lifecycle owner of one [`Session`]
pub struct TerminalView {
    session: Arc<Session>,
    transport: Arc<dyn PtyTransport>,
    injector: HookInjector,
    detector: CwdMarkerDetector,
    dispatcher: Option<Box<dyn OscDispatcher>>,
    reconciler: Arc<ContextReconciler>,
    store: SharedSlotStore,
    shell: ShellKind,
    install_hook: bool,
}

impl TerminalView {
    /// Build the view and hydrate its first slot
    pub fn new(
        transport: Arc<dyn PtyTransport>,
        resolver: Arc<dyn ContextResolver>,
        config: ViewConfig,
        ui_tx: Option<mpsc::UnboundedSender<UiEvent>>,
    ) -> Self {
        let mut store = RepoSlotStore::new(config.default_title.clone());
        if let Some(tx) = &ui_tx {
            store = store.with_ui_channel(tx.clone());
        }
        store.hydrate(&config.hydrate_label, &config.initial_label);
        let store: SharedSlotStore = Arc::new(Mutex::new(store));

        let mut reconciler = ContextReconciler::new(resolver, Arc::clone(&store));
        if let Some(tx) = ui_tx {
            reconciler = reconciler.with_ui_channel(tx);
        }

        let detector = CwdMarkerDetector::new(config.platform, config.dedup_window);
        let dispatcher: Option<Box<dyn OscDispatcher>> = if config.structured_dispatch {
            let mut dispatcher = VteDispatcher::new();
            detector.register(&mut dispatcher);
            Some(Box::new(dispatcher))
        } else {
            None
        };

        Self {
            session: Arc::new(Session::new(config.platform)),
            transport,
            injector: HookInjector::for_shell(config.shell, config.suppress_echo),
            detector,
            dispatcher,
            reconciler: Arc::new(reconciler),
            store,
            shell: config.shell,
            install_hook: config.install_hook,
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn store(&self) -> &SharedSlotStore {
        &self.store
    }

    pub fn transport(&self) -> &Arc<dyn PtyTransport> {
        &self.transport
    }

    pub fn shell(&self) -> ShellKind {
        self.shell
    }

    /// Probe the current directory, then install the persistent hook
    pub async fn attach(&self) {
        let transport = self.transport.as_ref();
        if self.injector.probe(&self.session, transport).await != InjectOutcome::Written {
            return;
        }
        if self.install_hook {
            self.injector.install(&self.session, transport).await;
        }
    }

    /// Install the hook now (no-op when already installed)
    pub async fn install_hook(&self) -> InjectOutcome {
        self.injector.install(&self.session, self.transport.as_ref()).await
    }

    /// Detect directory changes in one output chunk and start reconciling them.
    ///
    /// Tokens are issued here, in detection order, so the last detected
    /// change wins no matter which resolution finishes first.
    pub fn handle_output(&mut self, chunk: &[u8]) -> Vec<JoinHandle<ReconcileOutcome>> {
        if !self.session.is_live() {
            return Vec::new();
        }

        let changes = self.detector.detect(chunk, self.dispatcher.as_deref_mut());
        changes
            .into_iter()
            .map(|change| {
                debug!(path = %change.path, encoding = ?change.encoding, "Directory change");
                let token = self.session.issue_token();
                let reconciler = Arc::clone(&self.reconciler);
                let session = Arc::clone(&self.session);
                tokio::spawn(async move {
                    reconciler
                        .reconcile_with_token(&session, token, &change)
                        .await
                })
            })
            .collect()
    }

    /// Pump the transport's output until it closes or the view is torn down.
    ///
    /// `on_output` sees every chunk before detection.
    pub async fn run<F>(&mut self, mut on_output: F)
    where
        F: FnMut(&[u8]),
    {
        let Some(mut output) = self.transport.subscribe() else {
            warn!("Terminal output already subscribed");
            return;
        };

        while let Some(chunk) = output.recv().await {
            if !self.session.is_live() {
                break;
            }
            on_output(&chunk);
            self.handle_output(&chunk);
        }
        debug!(session = %self.session.id(), "Terminal output closed");
    }

    /// Open a new slot, activate it and move the shell home
    pub async fn new_slot(&self) -> SlotId {
        let id = self.lock_store().create_slot();
        info!(slot = %id, "New slot");

        let command = home_command(self.shell);
        if let Err(e) = self.transport.write_input(command.as_bytes()).await {
            warn!("Failed to send {:?}: {}", command.trim_end(), e);
        }
        id
    }

    /// Close a slot; returns the slot that is active afterwards
    pub fn close_slot(&self, id: SlotId) -> Option<SlotId> {
        let next = self.lock_store().close(id);
        info!(slot = %id, next = ?next, "Closed slot");
        next
    }

    /// Stop applying results for this view
    pub fn teardown(&self) {
        self.session.close();
        info!(session = %self.session.id(), "Terminal view torn down");
    }

    fn lock_store(&self) -> std::sync::MutexGuard<'_, RepoSlotStore> {
        self.store.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for TerminalView {
    fn drop(&mut self) {
        self.session.close();
    }
}
