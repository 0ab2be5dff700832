//! Path canonicalization for directory markers
//!
//! File-URI markers always carry a host-relative leading slash, which is wrong
//! for Windows drive paths (`/C:/Users/me`). The resolver wants native forms.

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use url::Url;

use crate::Platform;

/// Characters the shell hooks escape in the file-URI marker path
pub const URI_PATH_ESCAPES: &AsciiSet = &CONTROLS.add(b' ').add(b'#').add(b'%').add(b'?');

/// Canonicalize a detected path for the given platform.
///
/// On Windows, `/C:/...` becomes `C:/...`. Everything else is returned unchanged.
pub fn normalize(path: &str, platform: Platform) -> String {
    if platform == Platform::Windows && is_slashed_drive_path(path) {
        return path[1..].to_string();
    }
    path.to_string()
}

/// `/X:` followed by end of string or a separator
fn is_slashed_drive_path(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 3
        && bytes[0] == b'/'
        && bytes[1].is_ascii_alphabetic()
        && bytes[2] == b':'
        && (bytes.len() == 3 || bytes[3] == b'/' || bytes[3] == b'\\')
}

/// Escape a directory the way the hooks do before writing `file://<host><path>`
pub fn encode_uri_path(path: &str) -> String {
    utf8_percent_encode(path, URI_PATH_ESCAPES).to_string()
}

/// Extract the decoded path component of a `file://<host><path>` payload.
///
/// Returns `None` when the payload is not a file URI or has no path.
pub fn uri_path(payload: &str) -> Option<String> {
    let rest = payload.strip_prefix("file://")?;
    // A bare authority is not a directory
    rest.find('/')?;

    // Strict parse first, then a lenient split for hosts `url` rejects
    if let Ok(url) = Url::parse(payload) {
        if url.scheme() == "file" && url.path().starts_with('/') {
            return decoded(url.path());
        }
    }

    let raw = &rest[rest.find('/')?..];
    let raw = match raw.find(['?', '#']) {
        Some(idx) => &raw[..idx],
        None => raw,
    };
    decoded(raw)
}

fn decoded(raw: &str) -> Option<String> {
    let path = percent_decode_str(raw).decode_utf8_lossy().into_owned();
    (!path.is_empty()).then_some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_windows_drive() {
        assert_eq!(normalize("/C:/Users/me", Platform::Windows), "C:/Users/me");
        assert_eq!(normalize("/d:/", Platform::Windows), "d:/");
        assert_eq!(normalize("/C:", Platform::Windows), "C:");
    }

    #[test]
    fn test_normalize_leaves_other_paths() {
        assert_eq!(normalize("/home/me", Platform::Posix), "/home/me");
        assert_eq!(normalize("/C:/Users/me", Platform::Posix), "/C:/Users/me");
        assert_eq!(normalize("C:/Users/me", Platform::Windows), "C:/Users/me");
        assert_eq!(normalize("/CD:/x", Platform::Windows), "/CD:/x");
        assert_eq!(normalize("/1:/x", Platform::Windows), "/1:/x");
        assert_eq!(normalize("", Platform::Windows), "");
    }

    #[test]
    fn test_uri_path_strips_host() {
        assert_eq!(uri_path("file:///home/me").as_deref(), Some("/home/me"));
        assert_eq!(uri_path("file://box/home/me").as_deref(), Some("/home/me"));
        assert_eq!(uri_path("file://localhost/tmp?x=1#y").as_deref(), Some("/tmp"));
        assert_eq!(uri_path("file:///C:/Users/me").as_deref(), Some("/C:/Users/me"));
    }

    #[test]
    fn test_uri_path_rejects_non_uri() {
        assert_eq!(uri_path("/home/me"), None);
        assert_eq!(uri_path("file://hostonly"), None);
        assert_eq!(uri_path("http://example.com/x"), None);
    }

    #[test]
    fn test_uri_path_decodes_escapes() {
        assert_eq!(
            uri_path("file:///home/me/my%20project").as_deref(),
            Some("/home/me/my project")
        );
        assert_eq!(uri_path("file:///caf%C3%A9").as_deref(), Some("/café"));
        assert_eq!(uri_path("file:///raw space").as_deref(), Some("/raw space"));
    }

    #[test]
    fn test_encoded_paths_survive_decoding() {
        for dir in ["/work/c#proj/src", "/work/a%41b", "/work/my dir", "/work/what?", "/work/café"] {
            let payload = format!("file://host{}", encode_uri_path(dir));
            assert_eq!(uri_path(&payload).as_deref(), Some(dir), "{payload}");
        }
    }

    #[test]
    fn test_encode_uri_path_keeps_separators() {
        assert_eq!(encode_uri_path("/C:/a b/c#d"), "/C:/a%20b/c%23d");
        assert_eq!(encode_uri_path("/plain/path"), "/plain/path");
    }
}
