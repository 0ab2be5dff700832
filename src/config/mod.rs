//! Configuration loading and management

mod io;
mod settings;

pub use settings::{DetectorSettings, ShellSettings, TerminalSettings, UiSettings};

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Shell program and instrumentation
    #[serde(default)]
    pub shell: ShellSettings,

    /// PTY geometry and environment
    #[serde(default)]
    pub terminal: TerminalSettings,

    /// Marker detection
    #[serde(default)]
    pub detector: DetectorSettings,

    /// Slot labels
    #[serde(default)]
    pub ui: UiSettings,
}

impl Config {
    /// Create a config with defaults
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Configured shell program, if one is set
    pub fn shell_program(&self) -> Option<&str> {
        let program = self.shell.program.trim();
        (!program.is_empty()).then_some(program)
    }
}
