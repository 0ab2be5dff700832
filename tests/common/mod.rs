//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::process::Command;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::sync::{mpsc, oneshot};

use cwdsync::path::encode_uri_path;
use cwdsync::resolver::{ContextResolver, ResolveError};
use cwdsync::terminal::{PtyTransport, TransportError, ViewConfig};
use cwdsync::{Platform, RepoLookup, ShellKind};

/// Creates a temporary git repository on `main` with a `feature` branch
pub fn create_test_repo() -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let repo_path = temp_dir.path();

    let git = |args: &[&str]| {
        Command::new("git")
            .args(args)
            .current_dir(repo_path)
            .output()
            .unwrap_or_else(|e| panic!("Failed to run git {:?}: {}", args, e))
    };

    git(&["init"]);
    git(&["config", "user.email", "test@test.com"]);
    git(&["config", "user.name", "Test User"]);

    fs::write(repo_path.join("test.txt"), "initial content\n")
        .expect("Failed to write initial file");
    fs::create_dir_all(repo_path.join("src/nested")).expect("Failed to create subdirectory");

    git(&["add", "."]);
    git(&["commit", "-m", "Initial commit"]);
    git(&["branch", "-M", "main"]);
    git(&["branch", "feature"]);

    temp_dir
}

/// Both marker encodings for one prompt, as a POSIX hook prints them
pub fn prompt(path: &str) -> Vec<u8> {
    let uri = encode_uri_path(path);
    format!("\x1b]777;cwd={path}\x07\x1b]7;file://host{uri}\x07{path} $ ").into_bytes()
}

/// View settings for tests: POSIX zsh, no echo suppression
pub fn view_config() -> ViewConfig {
    ViewConfig {
        platform: Platform::Posix,
        shell: ShellKind::Zsh,
        install_hook: true,
        suppress_echo: false,
        dedup_window: Duration::from_millis(250),
        structured_dispatch: true,
        default_title: "terminal".to_string(),
        hydrate_label: String::new(),
        initial_label: "main".to_string(),
    }
}

/// Resolver answering from fixed roots, with optional per-path gates
#[derive(Default)]
pub struct MockResolver {
    roots: Vec<String>,
    branches: Vec<String>,
    current: String,
    gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
}

impl MockResolver {
    pub fn new(roots: &[&str]) -> Self {
        Self {
            roots: roots.iter().map(|r| r.to_string()).collect(),
            branches: vec!["main".to_string(), "dev".to_string()],
            current: "main".to_string(),
            gates: Mutex::new(HashMap::new()),
        }
    }

    /// Hold lookups of `path` until the returned sender fires
    pub fn gate(&self, path: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(path.to_string(), rx);
        tx
    }
}

#[async_trait]
impl ContextResolver for MockResolver {
    async fn resolve_context(&self, path: &str) -> Result<Option<RepoLookup>, ResolveError> {
        let gate = self.gates.lock().unwrap().remove(path);
        if let Some(rx) = gate {
            let _ = rx.await;
        }
        Ok(self
            .roots
            .iter()
            .find(|root| path.starts_with(root.as_str()))
            .map(|root| RepoLookup::from_root(root.clone())))
    }

    async fn list_branches(&self, _root: &str) -> Result<Vec<String>, ResolveError> {
        Ok(self.branches.clone())
    }

    async fn current_branch(&self, _root: &str) -> Result<String, ResolveError> {
        Ok(self.current.clone())
    }
}

/// In-memory transport recording writes and replaying output
pub struct MockTransport {
    writes: Mutex<Vec<String>>,
    output_tx: Mutex<Option<mpsc::UnboundedSender<Vec<u8>>>>,
    output_rx: Mutex<Option<mpsc::UnboundedReceiver<Vec<u8>>>>,
    fail_writes: AtomicBool,
}

impl MockTransport {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            writes: Mutex::new(Vec::new()),
            output_tx: Mutex::new(Some(tx)),
            output_rx: Mutex::new(Some(rx)),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().unwrap().clone()
    }

    /// Queue a chunk as if the shell printed it
    pub fn push_output(&self, chunk: &[u8]) {
        if let Some(tx) = self.output_tx.lock().unwrap().as_ref() {
            tx.send(chunk.to_vec()).unwrap();
        }
    }

    /// End the output stream
    pub fn close_output(&self) {
        self.output_tx.lock().unwrap().take();
    }

    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl PtyTransport for MockTransport {
    async fn write_input(&self, bytes: &[u8]) -> Result<(), TransportError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(TransportError::Closed);
        }
        self.writes
            .lock()
            .unwrap()
            .push(String::from_utf8_lossy(bytes).into_owned());
        Ok(())
    }

    fn subscribe(&self) -> Option<mpsc::UnboundedReceiver<Vec<u8>>> {
        self.output_rx.lock().unwrap().take()
    }
}
