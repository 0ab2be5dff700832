//! PowerShell prompt wrapping
//!
//! The existing `prompt` function is saved once and called after the markers
//! are written, so custom prompts survive. The script is sent as one line.

use super::{EMIT_FUNCTION, ShellIntegration};
use crate::ShellKind;

/// Writes both markers for the current location (forward slashes).
///
/// The file-URI path escapes `%`, `#`, `?` and space; `%` is built from
/// `[char]37` so the probe also survives cmd.exe variable expansion.
const EMIT_BODY: &str = "$p = (Get-Location).Path -replace '\\\\','/'; \
$u = if ($p.StartsWith('/')) { $p } else { '/' + $p }; \
$pc = [char]37; \
$u = $u -replace $pc,($pc + '25') -replace '#',($pc + '23') -replace '\\?',($pc + '3F') -replace ' ',($pc + '20'); \
[Console]::Write([char]27 + ']777;cwd=' + $p + [char]7 + [char]27 + ']7;file://' + $u + [char]7)";

const SAVED_PROMPT: &str = "__cwdsync_prompt";

#[derive(Default)]
pub struct PowerShellIntegration;

impl PowerShellIntegration {
    pub fn new() -> Self {
        Self
    }

    fn script(&self) -> Vec<String> {
        vec![
            format!("function global:{EMIT_FUNCTION} {{ {EMIT_BODY} }}"),
            format!(
                "if (-not (Test-Path function:global:{SAVED_PROMPT})) {{ \
                 if (Test-Path function:prompt) {{ $function:global:{SAVED_PROMPT} = $function:prompt }} }}"
            ),
            format!(
                "function global:prompt {{ {EMIT_FUNCTION}; \
                 if (Test-Path function:global:{SAVED_PROMPT}) {{ {SAVED_PROMPT} }} \
                 else {{ \"PS \" + (Get-Location) + \"> \" }} }}"
            ),
            EMIT_FUNCTION.to_string(),
        ]
    }
}

/// Trim every line, drop blanks and join with `; `
pub(crate) fn compact(lines: &[String]) -> String {
    lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ShellIntegration for PowerShellIntegration {
    fn kind(&self) -> ShellKind {
        ShellKind::PowerShell
    }

    fn supports_persistent_hook(&self) -> bool {
        true
    }

    fn install_lines(&self) -> Vec<String> {
        vec![compact(&self.script())]
    }

    fn probe_lines(&self) -> Vec<String> {
        vec![EMIT_BODY.to_string()]
    }
}

/// The probe as a standalone PowerShell command, for hosts like cmd.exe
pub(crate) fn probe_command() -> String {
    format!("powershell -NoLogo -NoProfile -Command \"{EMIT_BODY}\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_is_single_line() {
        let lines = PowerShellIntegration::new().install_lines();
        assert_eq!(lines.len(), 1);
        assert!(!lines[0].contains('\n'));
    }

    #[test]
    fn test_install_preserves_existing_prompt() {
        let script = PowerShellIntegration::new().install_lines().remove(0);

        assert!(script.contains("$function:global:__cwdsync_prompt = $function:prompt"));
        assert!(script.contains("if (-not (Test-Path function:global:__cwdsync_prompt))"));
        assert!(script.contains("function global:prompt { __cwdsync_emit;"));
        assert!(script.ends_with("; __cwdsync_emit"));
    }

    #[test]
    fn test_emitter_writes_both_markers() {
        assert!(EMIT_BODY.contains("']777;cwd='"));
        assert!(EMIT_BODY.contains("']7;file://'"));
        assert!(EMIT_BODY.contains(r"-replace '\\','/'"));
    }

    #[test]
    fn test_emitter_escapes_uri_path() {
        assert!(EMIT_BODY.contains("$pc = [char]37"));
        assert!(EMIT_BODY.contains("-replace $pc,($pc + '25')"));
        assert!(EMIT_BODY.contains("-replace '#',($pc + '23')"));
        assert!(EMIT_BODY.contains(r"-replace '\?',($pc + '3F')"));
        assert!(EMIT_BODY.contains("-replace ' ',($pc + '20')"));
        assert!(!probe_command().contains('%'));
    }

    #[test]
    fn test_compact_trims_and_joins() {
        let lines = vec!["  a = 1 ".to_string(), String::new(), "\tb".to_string()];
        assert_eq!(compact(&lines), "a = 1; b");
    }
}
