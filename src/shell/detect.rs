//! Which shell to spawn

use crate::{Platform, ShellKind};

/// Used when `$SHELL` is unset
pub const DEFAULT_POSIX_SHELL: &str = "/bin/zsh";

/// A shell program with the arguments it is started with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    pub program: String,
    pub args: Vec<String>,
    pub kind: ShellKind,
}

impl ShellCommand {
    pub fn new(program: impl Into<String>) -> Self {
        let program = program.into();
        let kind = ShellKind::from_program(&program);
        Self {
            program,
            args: shell_args(kind),
            kind,
        }
    }
}

/// Startup arguments per shell family.
///
/// zsh and bash are forced interactive so `precmd` / `PROMPT_COMMAND` run.
pub fn shell_args(kind: ShellKind) -> Vec<String> {
    let args: &[&str] = match kind {
        ShellKind::Zsh | ShellKind::Bash => &["-i"],
        ShellKind::Posix => &[],
        ShellKind::PowerShell => &["-NoLogo", "-NoProfile", "-NoExit"],
        ShellKind::Cmd => &["/d", "/k"],
    };
    args.iter().map(|a| a.to_string()).collect()
}

/// POSIX shell: the configured program, else `$SHELL`, else [`DEFAULT_POSIX_SHELL`]
pub fn detect_shell(configured: Option<&str>) -> ShellCommand {
    detect_shell_from(configured, std::env::var("SHELL").ok())
}

fn detect_shell_from(configured: Option<&str>, env_shell: Option<String>) -> ShellCommand {
    let program = configured
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .or(env_shell.filter(|s| !s.trim().is_empty()))
        .unwrap_or_else(|| DEFAULT_POSIX_SHELL.to_string());
    ShellCommand::new(program)
}

/// Windows fallbacks, tried in order
pub fn windows_attempts() -> Vec<ShellCommand> {
    ["pwsh.exe", "powershell.exe", "cmd.exe"]
        .into_iter()
        .map(ShellCommand::new)
        .collect()
}

/// Shells to try for `platform`; a configured program is the only candidate
pub fn spawn_candidates(configured: Option<&str>, platform: Platform) -> Vec<ShellCommand> {
    match (platform, configured.map(str::trim).filter(|p| !p.is_empty())) {
        (_, Some(program)) => vec![ShellCommand::new(program)],
        (Platform::Posix, None) => vec![detect_shell(None)],
        (Platform::Windows, None) => windows_attempts(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_prefers_configured_program() {
        let shell = detect_shell_from(Some("/usr/bin/bash"), Some("/bin/zsh".into()));
        assert_eq!(shell.program, "/usr/bin/bash");
        assert_eq!(shell.kind, ShellKind::Bash);
        assert_eq!(shell.args, vec!["-i"]);
    }

    #[test]
    fn test_detect_falls_back_to_env_then_default() {
        assert_eq!(detect_shell_from(None, Some("/bin/bash".into())).program, "/bin/bash");
        assert_eq!(detect_shell_from(Some("  "), None).program, DEFAULT_POSIX_SHELL);
        assert_eq!(detect_shell_from(None, Some(String::new())).program, DEFAULT_POSIX_SHELL);
    }

    #[test]
    fn test_plain_sh_is_not_forced_interactive() {
        let shell = ShellCommand::new("/bin/dash");
        assert_eq!(shell.kind, ShellKind::Posix);
        assert!(shell.args.is_empty());
    }

    #[test]
    fn test_windows_attempt_order() {
        let attempts = windows_attempts();
        let programs: Vec<_> = attempts.iter().map(|a| a.program.as_str()).collect();

        assert_eq!(programs, vec!["pwsh.exe", "powershell.exe", "cmd.exe"]);
        assert_eq!(attempts[0].args, vec!["-NoLogo", "-NoProfile", "-NoExit"]);
        assert_eq!(attempts[2].args, vec!["/d", "/k"]);
        assert_eq!(attempts[2].kind, ShellKind::Cmd);
    }

    #[test]
    fn test_spawn_candidates() {
        assert_eq!(spawn_candidates(None, Platform::Windows).len(), 3);
        let configured = spawn_candidates(Some("pwsh"), Platform::Windows);
        assert_eq!(configured.len(), 1);
        assert_eq!(configured[0].kind, ShellKind::PowerShell);
    }
}
