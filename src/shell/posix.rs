//! zsh, bash and plain POSIX sh
//!
//! Every line starts with a space so `HIST_IGNORE_SPACE` (zsh) and
//! `HISTCONTROL=ignorespace` (bash) keep the instrumentation out of history.
//! Neither is on by default, so bash lines also delete their own history
//! entry and zsh installs a `zshaddhistory` filter first. zsh cannot delete
//! an entry, so the probe and the filter line itself stay in its history
//! unless `HIST_IGNORE_SPACE` is set.

use super::{EMIT_FUNCTION, ShellIntegration};
use crate::ShellKind;

/// Prints both markers; the escaped file-URI path is appended as the last argument
const PRINT_MARKERS: &str = r#"printf '\033]777;cwd=%s\007\033]7;file://%s%s\007' "$PWD" "${HOST:-${HOSTNAME:-}}""#;

/// `%`, `#`, `?` and space escaped with parameter expansion (zsh, bash)
const ESCAPE_EXPANSION: &str = r#"__cwdsync_uri=${PWD//\%/%25}; __cwdsync_uri=${__cwdsync_uri//\#/%23}; __cwdsync_uri=${__cwdsync_uri//\?/%3F}; __cwdsync_uri=${__cwdsync_uri//\ /%20}"#;

/// Same escapes through sed, for shells without `${var//pat/rep}`
const ESCAPE_SED: &str = r#"$(printf '%s' "$PWD" | sed 's/%/%25/g; s/#/%23/g; s/?/%3F/g; s/ /%20/g')"#;

/// Drops the current line from bash history when `ignorespace` did not already
const BASH_FORGET_LINE: &str = r#"if [ -o history ]; then case ":${HISTCONTROL:-}:" in *:ignorespace:*|*:ignoreboth:*) ;; *) __cwdsync_h=$(history 1); __cwdsync_h=${__cwdsync_h#"${__cwdsync_h%%[0-9]*}"}; history -d "${__cwdsync_h%%[!0-9]*}"; unset __cwdsync_h ;; esac; fi"#;

/// zsh history filter for the space-prefixed lines this module sends
const ZSH_HISTORY_FILTER: &str = r#"__cwdsync_history() { [[ $1 != ' '*__cwdsync* && $1 != ' [ -t 0 ] && stty'* ]] }; (( ${zshaddhistory_functions[(Ie)__cwdsync_history]} )) || zshaddhistory_functions+=(__cwdsync_history)"#;

/// Emitter body for `kind`; the file-URI path is percent-escaped
fn emit_body(kind: ShellKind) -> String {
    match kind {
        ShellKind::Zsh | ShellKind::Bash => format!(
            "{ESCAPE_EXPANSION}; {PRINT_MARKERS} \"$__cwdsync_uri\"; unset __cwdsync_uri"
        ),
        _ => format!("{PRINT_MARKERS} \"{ESCAPE_SED}\""),
    }
}

pub struct PosixIntegration {
    kind: ShellKind,
    suppress_echo: bool,
}

impl PosixIntegration {
    pub fn new(kind: ShellKind) -> Self {
        Self {
            kind,
            suppress_echo: false,
        }
    }

    /// Wrap the install in `stty -echo` / `stty echo`
    pub fn with_echo_suppression(mut self, suppress_echo: bool) -> Self {
        self.suppress_echo = suppress_echo;
        self
    }

    fn registration(&self) -> Option<String> {
        let f = EMIT_FUNCTION;
        match self.kind {
            ShellKind::Zsh => Some(format!(
                "(( ${{precmd_functions[(Ie){f}]}} )) || precmd_functions+=({f}); \
                 (( ${{chpwd_functions[(Ie){f}]}} )) || chpwd_functions+=({f})"
            )),
            ShellKind::Bash => Some(format!(
                "case \";${{PROMPT_COMMAND:-}};\" in *\";{f};\"*) ;; \
                 *) PROMPT_COMMAND=\"{f}${{PROMPT_COMMAND:+;$PROMPT_COMMAND}}\" ;; esac"
            )),
            _ => None,
        }
    }

    /// Space-prefix a command and keep it out of history where the shell allows
    fn hidden(&self, line: &str) -> String {
        match self.kind {
            ShellKind::Bash => format!(" {line}; {BASH_FORGET_LINE}"),
            _ => format!(" {line}"),
        }
    }
}

impl ShellIntegration for PosixIntegration {
    fn kind(&self) -> ShellKind {
        self.kind
    }

    fn supports_persistent_hook(&self) -> bool {
        self.registration().is_some()
    }

    fn install_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if self.kind == ShellKind::Zsh {
            lines.push(ZSH_HISTORY_FILTER.to_string());
        }
        if self.suppress_echo {
            lines.push("[ -t 0 ] && stty -echo 2>/dev/null".to_string());
        }
        lines.push(format!("{EMIT_FUNCTION}() {{ {}; }}", emit_body(self.kind)));
        if let Some(registration) = self.registration() {
            lines.push(registration);
        }
        lines.push(EMIT_FUNCTION.to_string());
        if self.suppress_echo {
            // Restore echo and wipe the line the first command echoed on
            lines.push(r"[ -t 0 ] && stty echo 2>/dev/null; printf '\r\033[2K'".to_string());
        }
        lines.iter().map(|line| self.hidden(line)).collect()
    }

    fn probe_lines(&self) -> Vec<String> {
        vec![self.hidden(&emit_body(self.kind))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zsh_registers_both_hooks_once() {
        let lines = PosixIntegration::new(ShellKind::Zsh).install_lines();
        let script = lines.join("\n");

        assert!(script.contains("precmd_functions+=(__cwdsync_emit)"));
        assert!(script.contains("chpwd_functions+=(__cwdsync_emit)"));
        assert!(script.contains("[(Ie)__cwdsync_emit]"));
        assert!(!script.contains("PROMPT_COMMAND"));
    }

    #[test]
    fn test_bash_prepends_prompt_command() {
        let script = PosixIntegration::new(ShellKind::Bash).install_lines().join("\n");

        assert!(script.contains(r#"PROMPT_COMMAND="__cwdsync_emit${PROMPT_COMMAND:+;$PROMPT_COMMAND}""#));
        assert!(script.contains(r#"*";__cwdsync_emit;"*) ;;"#));
        assert!(!script.contains("precmd_functions"));
    }

    #[test]
    fn test_every_line_is_history_hidden() {
        let lines = PosixIntegration::new(ShellKind::Zsh)
            .with_echo_suppression(true)
            .install_lines();

        assert!(lines.iter().all(|line| line.starts_with(' ')));
    }

    #[test]
    fn test_echo_suppression_wraps_install() {
        let lines = PosixIntegration::new(ShellKind::Bash)
            .with_echo_suppression(true)
            .install_lines();

        assert!(lines.first().unwrap().starts_with(" [ -t 0 ] && stty -echo"));
        assert!(lines.last().unwrap().starts_with(" [ -t 0 ] && stty echo"));
        assert!(lines[lines.len() - 2].starts_with(" __cwdsync_emit; "));
    }

    #[test]
    fn test_install_invokes_emitter_immediately() {
        let lines = PosixIntegration::new(ShellKind::Zsh).install_lines();
        assert_eq!(lines.last().map(String::as_str), Some(" __cwdsync_emit"));
        assert!(lines[1].starts_with(" __cwdsync_emit() {"));
    }

    #[test]
    fn test_probe_emits_both_encodings() {
        let probe = PosixIntegration::new(ShellKind::Zsh).probe_lines().join("");
        assert!(probe.contains(r"\033]777;cwd=%s\007"));
        assert!(probe.contains(r"\033]7;file://%s%s\007"));
        assert!(!probe.contains("__cwdsync_emit"));
    }

    #[test]
    fn test_uri_path_is_escaped() {
        for kind in [ShellKind::Zsh, ShellKind::Bash] {
            let probe = PosixIntegration::new(kind).probe_lines().join("");
            assert!(probe.contains(r"${PWD//\%/%25}"));
            assert!(probe.contains(r"//\#/%23}"));
            assert!(probe.contains(r"//\?/%3F}"));
            assert!(probe.contains(r"//\ /%20}"));
            assert!(probe.contains(r#""$__cwdsync_uri"; unset __cwdsync_uri"#));
        }

        let sh = PosixIntegration::new(ShellKind::Posix).probe_lines().join("");
        assert!(sh.contains("sed 's/%/%25/g; s/#/%23/g; s/?/%3F/g; s/ /%20/g'"));
        assert!(!sh.contains("${PWD//"));
    }

    #[test]
    fn test_bash_lines_forget_themselves() {
        let integration = PosixIntegration::new(ShellKind::Bash).with_echo_suppression(true);
        let lines = integration.install_lines();

        for line in lines.iter().chain(integration.probe_lines().iter()) {
            assert!(line.ends_with(BASH_FORGET_LINE), "{line}");
        }
        assert!(BASH_FORGET_LINE.contains("*:ignorespace:*|*:ignoreboth:*) ;;"));
        assert!(BASH_FORGET_LINE.contains(r#"history -d "${__cwdsync_h%%[!0-9]*}""#));
    }

    #[test]
    fn test_zsh_filters_history_before_anything_else() {
        let lines = PosixIntegration::new(ShellKind::Zsh)
            .with_echo_suppression(true)
            .install_lines();

        assert_eq!(lines[0], format!(" {ZSH_HISTORY_FILTER}"));
        assert!(lines[1].contains("stty -echo"));
        assert!(lines.iter().all(|line| !line.contains("history -d")));
        // Every later line matches the filter's patterns
        for line in &lines[1..] {
            assert!(line.contains("__cwdsync") || line.starts_with(" [ -t 0 ] && stty"), "{line}");
        }
    }

    #[test]
    fn test_plain_sh_lines_are_only_space_prefixed() {
        let probe = PosixIntegration::new(ShellKind::Posix).probe_lines();
        assert_eq!(probe.len(), 1);
        assert!(probe[0].starts_with(" printf"));
        assert!(!probe[0].contains("history"));
    }
}
