//! Per-terminal session state
//!
//! One [`Session`] exists per terminal view and is passed to every operation
//! instead of living in module-level statics.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use uuid::Uuid;

use crate::Platform;

/// Token identifying one directory-change resolution
pub type ResolveToken = u64;

#[derive(Debug)]
pub struct Session {
    id: Uuid,
    platform: Platform,
    /// Flips false -> true exactly once
    hook_installed: AtomicBool,
    /// Set after a transport failure; no further instrumentation is written
    instrumentation_aborted: AtomicBool,
    /// False once the owning view is torn down
    live: AtomicBool,
    latest_token: AtomicU64,
    /// Root of the last successful resolution
    last_resolved_root: Mutex<Option<String>>,
}

impl Session {
    pub fn new(platform: Platform) -> Self {
        Self {
            id: Uuid::new_v4(),
            platform,
            hook_installed: AtomicBool::new(false),
            instrumentation_aborted: AtomicBool::new(false),
            live: AtomicBool::new(true),
            latest_token: AtomicU64::new(0),
            last_resolved_root: Mutex::new(None),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn hook_installed(&self) -> bool {
        self.hook_installed.load(Ordering::SeqCst)
    }

    /// Claim the one-time hook installation.
    ///
    /// Returns `true` only for the call that performed the transition.
    pub fn mark_hook_installed(&self) -> bool {
        self.hook_installed
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub fn instrumentation_aborted(&self) -> bool {
        self.instrumentation_aborted.load(Ordering::SeqCst)
    }

    pub fn abort_instrumentation(&self) {
        self.instrumentation_aborted.store(true, Ordering::SeqCst);
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    /// Tear down: late results for this session are ignored from now on
    pub fn close(&self) {
        self.live.store(false, Ordering::SeqCst);
    }

    /// Issue a fresh token; it becomes the only one whose result may apply
    pub fn issue_token(&self) -> ResolveToken {
        self.latest_token.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, token: ResolveToken) -> bool {
        self.latest_token.load(Ordering::SeqCst) == token
    }

    pub fn last_resolved_root(&self) -> Option<String> {
        self.root_lock().clone()
    }

    /// Record a successful resolution; returns `true` if the root changed
    pub fn set_resolved_root(&self, root: &str) -> bool {
        let mut current = self.root_lock();
        if current.as_deref() == Some(root) {
            return false;
        }
        *current = Some(root.to_string());
        true
    }

    /// Forget the resolved root; returns the previous one
    pub fn clear_resolved_root(&self) -> Option<String> {
        self.root_lock().take()
    }

    fn root_lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.last_resolved_root
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }
}
