//! Shell instrumentation
//!
//! Each supported shell family gets one [`ShellIntegration`] strategy, chosen
//! once per session by [`select_integration`]. A strategy produces two
//! payloads: the persistent hook (emit markers on every prompt) and a one-shot
//! probe (emit markers now).

mod cmd;
mod detect;
mod injector;
mod posix;
mod powershell;

pub use cmd::CmdIntegration;
pub use detect::{
    DEFAULT_POSIX_SHELL, ShellCommand, detect_shell, shell_args, spawn_candidates, windows_attempts,
};
pub use injector::{HookInjector, InjectOutcome};
pub use posix::PosixIntegration;
pub use powershell::PowerShellIntegration;

use crate::ShellKind;

/// Name of the emitter function defined in the shell
pub const EMIT_FUNCTION: &str = "__cwdsync_emit";

/// Shell-family specific instrumentation
pub trait ShellIntegration: Send + Sync {
    fn kind(&self) -> ShellKind;

    /// Whether the shell can run a hook on every prompt redraw.
    ///
    /// When `false`, installing degrades to a single probe.
    fn supports_persistent_hook(&self) -> bool;

    /// Lines that define, register and invoke the emitter
    fn install_lines(&self) -> Vec<String>;

    /// Lines that emit both markers once
    fn probe_lines(&self) -> Vec<String>;

    /// Install payload as written to the PTY
    fn install_payload(&self) -> String {
        let lines = if self.supports_persistent_hook() {
            self.install_lines()
        } else {
            self.probe_lines()
        };
        encode_lines(&lines, self.kind())
    }

    fn probe_payload(&self) -> String {
        encode_lines(&self.probe_lines(), self.kind())
    }
}

/// Pick the strategy for a shell
pub fn select_integration(kind: ShellKind, suppress_echo: bool) -> Box<dyn ShellIntegration> {
    match kind {
        ShellKind::Zsh | ShellKind::Bash | ShellKind::Posix => {
            Box::new(PosixIntegration::new(kind).with_echo_suppression(suppress_echo))
        }
        ShellKind::PowerShell => Box::new(PowerShellIntegration::new()),
        ShellKind::Cmd => Box::new(CmdIntegration::new()),
    }
}

/// Command that moves the shell to the user's home directory
pub fn home_command(kind: ShellKind) -> String {
    let command = match kind {
        ShellKind::Cmd => "cd /d %USERPROFILE%",
        _ => "cd ~",
    };
    format!("{command}{}", kind.line_ending())
}

/// Join lines with the shell's line ending, terminating the last one too
fn encode_lines(lines: &[String], kind: ShellKind) -> String {
    let ending = kind.line_ending();
    lines.iter().map(|line| format!("{line}{ending}")).collect()
}
