use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wire encoding a directory marker arrived in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerEncoding {
    /// `ESC ] 777 ; cwd = <path> BEL`
    LegacyCwd,
    /// `ESC ] 7 ; file://<host><path> ST`
    FileUri,
}

impl MarkerEncoding {
    /// OSC code carrying this encoding
    pub fn osc_code(&self) -> u16 {
        match self {
            MarkerEncoding::LegacyCwd => 777,
            MarkerEncoding::FileUri => 7,
        }
    }
}

/// Which detection path reported a marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerSource {
    /// Regex scan over raw output chunks
    Scan,
    /// Handler registered with the terminal's control-sequence parser
    Dispatch,
}

/// Detection path and encoding of one marker occurrence
pub type MarkerOrigin = (MarkerSource, MarkerEncoding);

/// An in-band directory announcement decoded from terminal output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryMarker {
    /// Path as carried by the marker (host stripped, percent-decoded)
    pub path: String,
    pub encoding: MarkerEncoding,
}

impl DirectoryMarker {
    pub fn new(path: impl Into<String>, encoding: MarkerEncoding) -> Self {
        Self {
            path: path.into(),
            encoding,
        }
    }

    pub fn legacy(path: impl Into<String>) -> Self {
        Self::new(path, MarkerEncoding::LegacyCwd)
    }

    pub fn file_uri(path: impl Into<String>) -> Self {
        Self::new(path, MarkerEncoding::FileUri)
    }
}

/// A normalized directory change, ready for reconciliation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryChange {
    /// Platform-normalized path
    pub path: String,
    pub encoding: MarkerEncoding,
    pub source: MarkerSource,
    pub detected_at: DateTime<Utc>,
}

impl DirectoryChange {
    pub fn new(path: impl Into<String>, encoding: MarkerEncoding, source: MarkerSource) -> Self {
        Self {
            path: path.into(),
            encoding,
            source,
            detected_at: Utc::now(),
        }
    }

    pub fn origin(&self) -> MarkerOrigin {
        (self.source, self.encoding)
    }
}
