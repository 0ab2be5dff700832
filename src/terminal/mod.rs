//! Embedded terminal plumbing
//!
//! [`PtyTransport`] is the byte channel to the shell. [`NativePty`] backs it
//! with a real pseudo-terminal; [`TerminalView`] ties a transport to the
//! detector, injector, reconciler and slot store for one terminal instance.

mod native;
mod view;

pub use native::{NativePty, SpawnOptions};
pub use view::{TerminalView, ViewConfig};

use async_trait::async_trait;
use tokio::sync::mpsc;

/// Error type for PTY operations
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Failed to open PTY: {0}")]
    Open(String),

    #[error("Failed to spawn shell: {0}")]
    Spawn(String),

    #[error("PTY I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("PTY closed")]
    Closed,
}

/// Byte channel to a running shell
#[async_trait]
pub trait PtyTransport: Send + Sync {
    /// Write bytes to the shell's input
    async fn write_input(&self, bytes: &[u8]) -> Result<(), TransportError>;

    /// Take the output stream. Only the first caller gets it.
    ///
    /// Chunk boundaries are arbitrary and may split escape sequences.
    fn subscribe(&self) -> Option<mpsc::UnboundedReceiver<Vec<u8>>>;
}
