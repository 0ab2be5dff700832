//! Directory marker detection
//!
//! Two paths read the shell's output and converge on [`DirectoryChange`]:
//!
//! 1. **Passive scan**: every output chunk is matched against both marker
//!    encodings ([`scan_markers`]).
//! 2. **Structured dispatch**: when the terminal exposes an [`OscDispatcher`],
//!    handlers for OSC 7 and 777 receive pre-parsed payloads and consume them.
//!
//! Both feed one [`MarkerQueue`], so an emission seen by both paths is
//! reconciled once.

mod dispatch;
mod queue;
mod scan;

pub use dispatch::{OscDispatcher, OscHandler, VteDispatcher};
pub use queue::MarkerQueue;
pub use scan::{decode_osc, scan_markers};

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::path::normalize;
use crate::{DirectoryChange, DirectoryMarker, MarkerEncoding, MarkerSource, Platform};

struct DetectorState {
    queue: MarkerQueue,
    /// Changes accepted by dispatcher handlers, waiting to be drained
    dispatched: Vec<DirectoryChange>,
}

impl DetectorState {
    fn accept(
        &mut self,
        marker: DirectoryMarker,
        source: MarkerSource,
        platform: Platform,
        now: Instant,
    ) -> Option<DirectoryChange> {
        let path = normalize(&marker.path, platform);
        if self.queue.offer(&path, (source, marker.encoding), now) {
            Some(DirectoryChange::new(path, marker.encoding, source))
        } else {
            None
        }
    }
}

/// Turns terminal output into normalized, deduplicated directory changes
#[derive(Clone)]
pub struct CwdMarkerDetector {
    platform: Platform,
    state: Arc<Mutex<DetectorState>>,
}

impl CwdMarkerDetector {
    pub fn new(platform: Platform, dedup_window: Duration) -> Self {
        Self {
            platform,
            state: Arc::new(Mutex::new(DetectorState {
                queue: MarkerQueue::new(dedup_window),
                dispatched: Vec::new(),
            })),
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Install OSC 7 and OSC 777 handlers on a terminal dispatcher.
    ///
    /// Handlers consume only payloads that decode as directory markers;
    /// other uses of those codes (e.g. `777;notify`) pass through.
    pub fn register(&self, dispatcher: &mut dyn OscDispatcher) {
        for encoding in [MarkerEncoding::LegacyCwd, MarkerEncoding::FileUri] {
            let code = encoding.osc_code();
            let state = Arc::clone(&self.state);
            let platform = self.platform;

            dispatcher.register_osc_handler(
                code,
                Box::new(move |params: &[&[u8]]| {
                    let Some(marker) = decode_osc(code, params) else {
                        return false;
                    };
                    let mut state = state.lock().unwrap_or_else(|e| e.into_inner());
                    if let Some(change) =
                        state.accept(marker, MarkerSource::Dispatch, platform, Instant::now())
                    {
                        state.dispatched.push(change);
                    }
                    true
                }),
            );
        }
    }

    /// Drain changes produced by dispatcher handlers
    pub fn take_dispatched(&self) -> Vec<DirectoryChange> {
        std::mem::take(&mut self.lock().dispatched)
    }

    /// Passive path: scan one chunk
    pub fn scan_chunk(&self, chunk: &[u8]) -> Vec<DirectoryChange> {
        self.scan_chunk_at(chunk, Instant::now())
    }

    pub fn scan_chunk_at(&self, chunk: &[u8], now: Instant) -> Vec<DirectoryChange> {
        let markers = scan_markers(chunk);
        if markers.is_empty() {
            return Vec::new();
        }

        let mut state = self.lock();
        markers
            .into_iter()
            .filter_map(|marker| state.accept(marker, MarkerSource::Scan, self.platform, now))
            .collect()
    }

    /// Run a chunk through the dispatcher (if any) and the passive scan.
    ///
    /// Dispatcher results come first, then whatever the scan adds that the
    /// dispatcher did not already report.
    pub fn detect(
        &self,
        chunk: &[u8],
        dispatcher: Option<&mut (dyn OscDispatcher + '_)>,
    ) -> Vec<DirectoryChange> {
        let mut changes = Vec::new();
        if let Some(dispatcher) = dispatcher {
            dispatcher.advance(chunk);
            changes = self.take_dispatched();
        }
        changes.extend(self.scan_chunk(chunk));
        changes
    }

    fn lock(&self) -> MutexGuard<'_, DetectorState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}
