use serde::{Deserialize, Serialize};

/// Path convention of the machine the shell runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Posix,
    Windows,
}

impl Platform {
    /// Platform of the running binary
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Posix
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Posix => write!(f, "posix"),
            Platform::Windows => write!(f, "windows"),
        }
    }
}

/// Shell family running inside the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShellKind {
    Zsh,
    Bash,
    /// Any other POSIX-compatible shell (sh, dash, ksh, ...)
    Posix,
    PowerShell,
    Cmd,
}

impl ShellKind {
    /// Guess the shell family from a program path or name.
    ///
    /// Unknown programs are assumed to be POSIX-compatible.
    pub fn from_program(program: &str) -> Self {
        // Split on both separators so Windows paths parse on any host
        let file = program.rsplit(['/', '\\']).next().unwrap_or(program);
        let name = file.to_lowercase();
        let name = name.strip_suffix(".exe").unwrap_or(&name);

        match name {
            "zsh" => ShellKind::Zsh,
            "bash" => ShellKind::Bash,
            "pwsh" | "powershell" => ShellKind::PowerShell,
            "cmd" => ShellKind::Cmd,
            _ => ShellKind::Posix,
        }
    }

    /// Whether this shell understands POSIX syntax
    pub fn is_posix(&self) -> bool {
        matches!(self, ShellKind::Zsh | ShellKind::Bash | ShellKind::Posix)
    }

    /// Line terminator to submit a command to this shell
    pub fn line_ending(&self) -> &'static str {
        if self.is_posix() { "\n" } else { "\r" }
    }
}

impl std::fmt::Display for ShellKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShellKind::Zsh => write!(f, "zsh"),
            ShellKind::Bash => write!(f, "bash"),
            ShellKind::Posix => write!(f, "posix"),
            ShellKind::PowerShell => write!(f, "powershell"),
            ShellKind::Cmd => write!(f, "cmd"),
        }
    }
}

impl std::str::FromStr for ShellKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "zsh" => Ok(ShellKind::Zsh),
            "bash" => Ok(ShellKind::Bash),
            "posix" | "sh" => Ok(ShellKind::Posix),
            "powershell" | "pwsh" => Ok(ShellKind::PowerShell),
            "cmd" => Ok(ShellKind::Cmd),
            other => Err(format!("unknown shell kind: {}", other)),
        }
    }
}
