//! Settings sections

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// `[shell]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShellSettings {
    /// Shell to spawn. Empty means `$SHELL` (or the platform default)
    #[serde(default)]
    pub program: String,

    /// Install the persistent prompt hook after the initial probe
    #[serde(default = "default_true")]
    pub install_hook: bool,

    /// Hide the POSIX install script with `stty -echo`
    #[serde(default = "default_true")]
    pub suppress_echo: bool,
}

impl Default for ShellSettings {
    fn default() -> Self {
        Self {
            program: String::new(),
            install_hook: true,
            suppress_echo: true,
        }
    }
}

/// `[terminal]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminalSettings {
    #[serde(default = "default_cols")]
    pub cols: u16,

    #[serde(default = "default_rows")]
    pub rows: u16,

    /// Exported as `TERM`
    #[serde(default = "default_term")]
    pub term: String,
}

impl Default for TerminalSettings {
    fn default() -> Self {
        Self {
            cols: default_cols(),
            rows: default_rows(),
            term: default_term(),
        }
    }
}

/// `[detector]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorSettings {
    /// How long a marker seen on one path suppresses the other path
    #[serde(default = "default_dedup_window_ms")]
    pub dedup_window_ms: u64,

    /// Also parse output with a control-sequence parser
    #[serde(default = "default_true")]
    pub structured_dispatch: bool,
}

impl DetectorSettings {
    pub fn dedup_window(&self) -> Duration {
        Duration::from_millis(self.dedup_window_ms)
    }
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self {
            dedup_window_ms: default_dedup_window_ms(),
            structured_dispatch: true,
        }
    }
}

/// `[ui]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiSettings {
    /// Title shown when the shell is outside any repository
    #[serde(default = "default_title")]
    pub default_title: String,

    /// Label of the first slot when it has none
    #[serde(default = "default_initial_label")]
    pub initial_label: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            default_title: default_title(),
            initial_label: default_initial_label(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_cols() -> u16 {
    80
}

fn default_rows() -> u16 {
    24
}

fn default_term() -> String {
    "xterm-256color".to_string()
}

fn default_dedup_window_ms() -> u64 {
    250
}

fn default_title() -> String {
    "terminal".to_string()
}

fn default_initial_label() -> String {
    "main".to_string()
}
