//! Scan command implementation

use anyhow::{Context, Result};
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncReadExt;

use cwdsync::Platform;
use cwdsync::detector::{CwdMarkerDetector, scan_markers};

/// Print directory markers found in a captured terminal stream.
///
/// By default markers go through the detector (normalized, deduplicated);
/// `raw` prints every match as decoded.
pub async fn scan_command(file: Option<&Path>, raw: bool, dedup_window: Duration) -> Result<()> {
    let bytes = match file {
        Some(file) => tokio::fs::read(file)
            .await
            .with_context(|| format!("Failed to read {}", file.display()))?,
        None => {
            let mut bytes = Vec::new();
            tokio::io::stdin()
                .read_to_end(&mut bytes)
                .await
                .context("Failed to read stdin")?;
            bytes
        }
    };

    if raw {
        for marker in scan_markers(&bytes) {
            println!("{}", serde_json::to_string(&marker)?);
        }
        return Ok(());
    }

    let detector = CwdMarkerDetector::new(Platform::current(), dedup_window);
    let changes = detector.scan_chunk(&bytes);
    if changes.is_empty() {
        eprintln!("No markers found.");
    }
    for change in changes {
        println!("{}", serde_json::to_string(&change)?);
    }

    Ok(())
}
