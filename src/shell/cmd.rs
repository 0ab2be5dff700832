//! cmd.exe (degraded)
//!
//! cmd has no reliable prompt hook, so only the one-shot probe is available.
//! The probe shells out to PowerShell to write the escape sequences.

use super::ShellIntegration;
use super::powershell::probe_command;
use crate::ShellKind;

#[derive(Default)]
pub struct CmdIntegration;

impl CmdIntegration {
    pub fn new() -> Self {
        Self
    }
}

impl ShellIntegration for CmdIntegration {
    fn kind(&self) -> ShellKind {
        ShellKind::Cmd
    }

    fn supports_persistent_hook(&self) -> bool {
        false
    }

    fn install_lines(&self) -> Vec<String> {
        Vec::new()
    }

    fn probe_lines(&self) -> Vec<String> {
        vec![probe_command()]
    }
}
