//! Writes instrumentation into a session's shell

use tracing::{debug, error, info};

use super::{ShellIntegration, select_integration};
use crate::ShellKind;
use crate::reconciler::Session;
use crate::terminal::PtyTransport;

/// What an install or probe call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectOutcome {
    Written,
    /// Hook was already installed for this session
    AlreadyInstalled,
    /// A previous transport failure stopped instrumentation
    Aborted,
    /// The write failed; instrumentation is now aborted
    Failed,
}

/// Installs the directory hook and sends probes, once per session
pub struct HookInjector {
    integration: Box<dyn ShellIntegration>,
}

impl HookInjector {
    pub fn new(integration: Box<dyn ShellIntegration>) -> Self {
        Self { integration }
    }

    pub fn for_shell(kind: ShellKind, suppress_echo: bool) -> Self {
        Self::new(select_integration(kind, suppress_echo))
    }

    pub fn integration(&self) -> &dyn ShellIntegration {
        self.integration.as_ref()
    }

    /// Install the persistent hook. No-op after the first call.
    ///
    /// Shells without prompt hooks only get a single probe.
    pub async fn install(&self, session: &Session, transport: &dyn PtyTransport) -> InjectOutcome {
        if session.instrumentation_aborted() {
            return InjectOutcome::Aborted;
        }
        if !session.mark_hook_installed() {
            debug!(session = %session.id(), "Hook already installed");
            return InjectOutcome::AlreadyInstalled;
        }

        let kind = self.integration.kind();
        if !self.integration.supports_persistent_hook() {
            info!(shell = %kind, "No prompt hook support; sending single probe");
        }

        let payload = self.integration.install_payload();
        let outcome = self.write(session, transport, &payload, "install").await;
        if outcome == InjectOutcome::Written {
            info!(session = %session.id(), shell = %kind, "Installed directory hook");
        }
        outcome
    }

    /// Emit both markers once, regardless of hook state
    pub async fn probe(&self, session: &Session, transport: &dyn PtyTransport) -> InjectOutcome {
        if session.instrumentation_aborted() {
            return InjectOutcome::Aborted;
        }
        let payload = self.integration.probe_payload();
        self.write(session, transport, &payload, "probe").await
    }

    async fn write(
        &self,
        session: &Session,
        transport: &dyn PtyTransport,
        payload: &str,
        what: &str,
    ) -> InjectOutcome {
        match transport.write_input(payload.as_bytes()).await {
            Ok(()) => {
                debug!(session = %session.id(), bytes = payload.len(), "Sent {}", what);
                InjectOutcome::Written
            }
            Err(e) => {
                error!(session = %session.id(), "Failed to send {}: {}", what, e);
                session.abort_instrumentation();
                InjectOutcome::Failed
            }
        }
    }
}
