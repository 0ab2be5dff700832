//! Script command implementation

use anyhow::Result;

use cwdsync::config::Config;
use cwdsync::shell::{select_integration, spawn_candidates};
use cwdsync::{Platform, ShellKind};

/// Print the instrumentation a shell would receive
pub async fn script_command(config: &Config, shell: Option<ShellKind>, probe: bool) -> Result<()> {
    let kind = shell.unwrap_or_else(|| {
        spawn_candidates(config.shell_program(), Platform::current())
            .first()
            .map(|candidate| candidate.kind)
            .unwrap_or(ShellKind::Posix)
    });

    let integration = select_integration(kind, config.shell.suppress_echo);
    let lines = if probe || !integration.supports_persistent_hook() {
        integration.probe_lines()
    } else {
        integration.install_lines()
    };

    for line in lines {
        println!("{}", line);
    }
    Ok(())
}
