//! Passive marker scanning over raw output bytes
//!
//! Both encodings are matched by one pattern so a chunk is walked once and
//! matches come out in left-to-right order:
//!
//! - `ESC ] 777 ; cwd=<path> BEL`
//! - `ESC ] 7 ; file://<host><path>` terminated by BEL, `ESC \` or C1 ST (UTF-8 form)

use once_cell::sync::Lazy;
use regex::bytes::Regex;

use crate::path::uri_path;
use crate::{DirectoryMarker, MarkerEncoding};

static MARKER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    // Groups: 1=legacy path, 2=uri host, 3=uri path
    Regex::new(
        r"(?-u)\x1b\](?:777;cwd=([^\x07\x1b]*)\x07|7;file://([^/\x07\x1b]*)(/[^\x07\x1b]*?)(?:\x07|\x1b\\|\xc2\x9c))",
    )
    .expect("marker pattern is valid")
});

/// Find every well-formed directory marker in `chunk`.
///
/// Partial or malformed sequences are skipped without error; a marker split
/// across two chunks is missed here and picked up on the next prompt.
pub fn scan_markers(chunk: &[u8]) -> Vec<DirectoryMarker> {
    MARKER_PATTERN
        .captures_iter(chunk)
        .filter_map(|caps| {
            if let Some(legacy) = caps.get(1) {
                let path = String::from_utf8_lossy(legacy.as_bytes()).into_owned();
                return (!path.is_empty()).then(|| DirectoryMarker::legacy(path));
            }

            let host = String::from_utf8_lossy(caps.get(2)?.as_bytes());
            let raw = String::from_utf8_lossy(caps.get(3)?.as_bytes());
            uri_path(&format!("file://{host}{raw}")).map(DirectoryMarker::file_uri)
        })
        .collect()
}

/// Decode a structured OSC payload (parameters after the code).
///
/// Used by dispatcher handlers, which receive sequences already split on `;`.
pub fn decode_osc(code: u16, params: &[&[u8]]) -> Option<DirectoryMarker> {
    let payload = params
        .iter()
        .map(|p| String::from_utf8_lossy(p))
        .collect::<Vec<_>>()
        .join(";");

    match code {
        777 => {
            let path = payload.strip_prefix("cwd=")?;
            (!path.is_empty()).then(|| DirectoryMarker::new(path, MarkerEncoding::LegacyCwd))
        }
        7 => uri_path(&payload).map(DirectoryMarker::file_uri),
        _ => None,
    }
}
