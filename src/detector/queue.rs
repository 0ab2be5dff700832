//! Cross-path deduplication of directory changes
//!
//! The passive scan and the dispatcher read the same stream, and the shell
//! emits each directory in both encodings. Accepting a change leaves a claim
//! for every other origin on that path; the first matching change from each
//! of those origins within the window consumes its claim and is dropped.
//! Repeats through the same origin are never collapsed, since a shell can
//! legitimately announce the same directory twice in a row.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::{MarkerEncoding, MarkerOrigin, MarkerSource};

const ALL_ORIGINS: [MarkerOrigin; 4] = [
    (MarkerSource::Scan, MarkerEncoding::LegacyCwd),
    (MarkerSource::Scan, MarkerEncoding::FileUri),
    (MarkerSource::Dispatch, MarkerEncoding::LegacyCwd),
    (MarkerSource::Dispatch, MarkerEncoding::FileUri),
];

#[derive(Debug, Clone)]
struct Claim {
    path: String,
    origin: MarkerOrigin,
    at: Instant,
}

/// Short-window deduplication keyed by normalized path and origin
#[derive(Debug, Clone)]
pub struct MarkerQueue {
    window: Duration,
    claims: VecDeque<Claim>,
}

impl MarkerQueue {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            claims: VecDeque::new(),
        }
    }

    /// Offer a change; returns `true` if it should be reconciled.
    pub fn offer(&mut self, path: &str, origin: MarkerOrigin, now: Instant) -> bool {
        self.expire(now);

        if let Some(idx) = self
            .claims
            .iter()
            .position(|c| c.origin == origin && c.path == path)
        {
            self.claims.remove(idx);
            return false;
        }

        for other in ALL_ORIGINS.iter().filter(|o| **o != origin) {
            self.claims.push_back(Claim {
                path: path.to_string(),
                origin: *other,
                at: now,
            });
        }
        true
    }

    /// Number of outstanding claims (after expiry at `now`)
    pub fn pending(&mut self, now: Instant) -> usize {
        self.expire(now);
        self.claims.len()
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    fn expire(&mut self, now: Instant) {
        let window = self.window;
        self.claims
            .retain(|c| now.saturating_duration_since(c.at) <= window);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCAN_LEGACY: MarkerOrigin = (MarkerSource::Scan, MarkerEncoding::LegacyCwd);
    const SCAN_URI: MarkerOrigin = (MarkerSource::Scan, MarkerEncoding::FileUri);
    const DISPATCH_LEGACY: MarkerOrigin = (MarkerSource::Dispatch, MarkerEncoding::LegacyCwd);
    const DISPATCH_URI: MarkerOrigin = (MarkerSource::Dispatch, MarkerEncoding::FileUri);

    fn queue() -> MarkerQueue {
        MarkerQueue::new(Duration::from_millis(250))
    }

    #[test]
    fn test_one_emission_through_both_paths_is_reported_once() {
        let mut q = queue();
        let now = Instant::now();

        assert!(q.offer("/repo", DISPATCH_LEGACY, now));
        assert!(!q.offer("/repo", DISPATCH_URI, now));
        assert!(!q.offer("/repo", SCAN_LEGACY, now));
        assert!(!q.offer("/repo", SCAN_URI, now));
        assert_eq!(q.pending(now), 0);
    }

    #[test]
    fn test_same_origin_repeats_are_kept() {
        let mut q = queue();
        let now = Instant::now();

        assert!(q.offer("/a", SCAN_LEGACY, now));
        assert!(q.offer("/a", SCAN_LEGACY, now));
        assert!(q.offer("/a", SCAN_LEGACY, now));
    }

    #[test]
    fn test_interleaved_navigation_pairs_off() {
        let mut q = queue();
        let now = Instant::now();

        // Dispatcher sees a, b, a first; the scan sees the same chunk afterwards
        let accepted: Vec<bool> = ["/a", "/b", "/a"]
            .iter()
            .map(|p| q.offer(p, DISPATCH_LEGACY, now))
            .collect();
        assert_eq!(accepted, vec![true, true, true]);

        let rescanned: Vec<bool> = ["/a", "/b", "/a"]
            .iter()
            .map(|p| q.offer(p, SCAN_LEGACY, now))
            .collect();
        assert_eq!(rescanned, vec![false, false, false]);
    }

    #[test]
    fn test_claims_expire_after_window() {
        let mut q = queue();
        let start = Instant::now();

        assert!(q.offer("/repo", DISPATCH_LEGACY, start));
        let later = start + Duration::from_millis(400);
        assert!(q.offer("/repo", SCAN_LEGACY, later));
    }

    #[test]
    fn test_different_paths_do_not_collide() {
        let mut q = queue();
        let now = Instant::now();

        assert!(q.offer("/one", DISPATCH_LEGACY, now));
        assert!(q.offer("/two", SCAN_LEGACY, now));
    }
}
