//! Shell running in a native pseudo-terminal

use std::io::{Read, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread;

use async_trait::async_trait;
use portable_pty::{Child, CommandBuilder, MasterPty, PtySize, native_pty_system};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::{PtyTransport, TransportError};
use crate::shell::ShellCommand;

/// How to start the shell
#[derive(Debug, Clone)]
pub struct SpawnOptions {
    /// Tried in order until one spawns
    pub candidates: Vec<ShellCommand>,
    pub cols: u16,
    pub rows: u16,
    /// Value exported as `TERM`
    pub term: String,
    pub cwd: Option<PathBuf>,
}

impl SpawnOptions {
    pub fn new(candidates: Vec<ShellCommand>) -> Self {
        Self {
            candidates,
            cols: 80,
            rows: 24,
            term: "xterm-256color".to_string(),
            cwd: None,
        }
    }

    pub fn with_size(mut self, cols: u16, rows: u16) -> Self {
        self.cols = cols;
        self.rows = rows;
        self
    }

    pub fn with_term(mut self, term: impl Into<String>) -> Self {
        self.term = term.into();
        self
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }
}

/// A running shell behind a PTY
pub struct NativePty {
    shell: ShellCommand,
    writer: Arc<Mutex<Box<dyn Write + Send>>>,
    output: Mutex<Option<mpsc::UnboundedReceiver<Vec<u8>>>>,
    /// Kept alive for the lifetime of the session
    _master: Mutex<Box<dyn MasterPty + Send>>,
    child: Mutex<Box<dyn Child + Send + Sync>>,
}

impl NativePty {
    /// Open a PTY and start the first candidate shell that spawns
    pub fn spawn(options: SpawnOptions) -> Result<Self, TransportError> {
        let pty_system = native_pty_system();
        let pair = pty_system
            .openpty(PtySize {
                rows: options.rows,
                cols: options.cols,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(|e| TransportError::Open(e.to_string()))?;

        let mut last_error = None;
        let mut spawned = None;
        for shell in options.candidates {
            let mut cmd = CommandBuilder::new(&shell.program);
            cmd.args(&shell.args);
            cmd.env("TERM", &options.term);
            if let Some(cwd) = &options.cwd {
                cmd.cwd(cwd);
            }

            match pair.slave.spawn_command(cmd) {
                Ok(child) => {
                    spawned = Some((shell, child));
                    break;
                }
                Err(e) => {
                    warn!("Failed to spawn {}: {}", shell.program, e);
                    last_error = Some(format!("{} failed: {}", shell.program, e));
                }
            }
        }

        let (shell, child) = spawned.ok_or_else(|| {
            TransportError::Spawn(last_error.unwrap_or_else(|| "no shell candidates".to_string()))
        })?;
        info!(program = %shell.program, kind = %shell.kind, "Spawned shell");

        let mut reader = pair
            .master
            .try_clone_reader()
            .map_err(|e| TransportError::Open(e.to_string()))?;
        let writer = pair
            .master
            .take_writer()
            .map_err(|e| TransportError::Open(e.to_string()))?;

        let (tx, rx) = mpsc::unbounded_channel();
        thread::spawn(move || {
            let mut buf = [0u8; 8192];
            loop {
                match reader.read(&mut buf) {
                    Ok(0) => break,
                    Ok(n) => {
                        if tx.send(buf[..n].to_vec()).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        debug!("PTY reader stopped: {}", e);
                        break;
                    }
                }
            }
        });

        Ok(Self {
            shell,
            writer: Arc::new(Mutex::new(writer)),
            output: Mutex::new(Some(rx)),
            _master: Mutex::new(pair.master),
            child: Mutex::new(child),
        })
    }

    /// The shell that was started
    pub fn shell(&self) -> &ShellCommand {
        &self.shell
    }

    /// Whether the shell is still running
    pub fn is_running(&self) -> bool {
        let mut child = self.child.lock().unwrap_or_else(|e| e.into_inner());
        matches!(child.try_wait(), Ok(None))
    }

    /// Terminate the shell
    pub fn kill(&self) -> Result<(), TransportError> {
        let mut child = self.child.lock().unwrap_or_else(|e| e.into_inner());
        if matches!(child.try_wait(), Ok(Some(_))) {
            return Ok(());
        }
        child.kill()?;
        Ok(())
    }
}

#[async_trait]
impl PtyTransport for NativePty {
    async fn write_input(&self, bytes: &[u8]) -> Result<(), TransportError> {
        let writer = Arc::clone(&self.writer);
        let bytes = bytes.to_vec();
        tokio::task::spawn_blocking(move || {
            let mut writer = writer.lock().unwrap_or_else(|e| e.into_inner());
            writer.write_all(&bytes)?;
            writer.flush()
        })
        .await
        .map_err(|_| TransportError::Closed)??;
        Ok(())
    }

    fn subscribe(&self) -> Option<mpsc::UnboundedReceiver<Vec<u8>>> {
        self.output.lock().unwrap_or_else(|e| e.into_inner()).take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_options_builder() {
        let options = SpawnOptions::new(vec![ShellCommand::new("/bin/bash")])
            .with_size(120, 40)
            .with_term("xterm")
            .with_cwd("/tmp");

        assert_eq!((options.cols, options.rows), (120, 40));
        assert_eq!(options.term, "xterm");
        assert_eq!(options.cwd, Some(PathBuf::from("/tmp")));
        assert_eq!(options.candidates[0].args, vec!["-i"]);
    }

    #[test]
    fn test_spawn_without_candidates_fails() {
        let result = NativePty::spawn(SpawnOptions::new(Vec::new()));
        assert!(matches!(
            result,
            Err(TransportError::Spawn(_)) | Err(TransportError::Open(_))
        ));
    }
}
