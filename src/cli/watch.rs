//! Watch command implementation

use anyhow::{Context, Result};
use std::io::Write;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tokio::sync::mpsc;
use tracing::{info, warn};

use cwdsync::Platform;
use cwdsync::config::Config;
use cwdsync::resolver::GitResolver;
use cwdsync::shell::spawn_candidates;
use cwdsync::terminal::{NativePty, PtyTransport, SpawnOptions, TerminalView, ViewConfig};

/// Run the configured shell, mirror it to stdout and track its directory
pub async fn watch_command(config: &Config, label: Option<String>) -> Result<()> {
    let candidates = spawn_candidates(config.shell_program(), Platform::current());
    let options = SpawnOptions::new(candidates)
        .with_size(config.terminal.cols, config.terminal.rows)
        .with_term(config.terminal.term.clone());
    let pty = Arc::new(NativePty::spawn(options).context("Failed to start shell")?);

    let mut view_config = ViewConfig::from_config(config, pty.shell().kind);
    if let Some(label) = label {
        view_config.hydrate_label = label;
    }

    let (ui_tx, mut ui_rx) = mpsc::unbounded_channel();
    let transport: Arc<dyn PtyTransport> = pty.clone();
    let mut view = TerminalView::new(
        Arc::clone(&transport),
        Arc::new(GitResolver::new()),
        view_config,
        Some(ui_tx),
    );

    let ui_task = tokio::spawn(async move {
        while let Some(event) = ui_rx.recv().await {
            info!("{}", event);
        }
    });
    let input_task = tokio::spawn(forward_stdin(transport));

    view.attach().await;

    let mut stdout = std::io::stdout();
    view.run(|chunk| {
        let _ = stdout.write_all(chunk);
        let _ = stdout.flush();
    })
    .await;

    view.teardown();
    input_task.abort();
    ui_task.abort();
    if let Err(e) = pty.kill() {
        warn!("Failed to stop shell: {}", e);
    }

    Ok(())
}

/// Copy our stdin to the shell until either side closes
async fn forward_stdin(transport: Arc<dyn PtyTransport>) {
    let mut stdin = tokio::io::stdin();
    let mut buf = [0u8; 1024];
    loop {
        match stdin.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                if let Err(e) = transport.write_input(&buf[..n]).await {
                    warn!("Failed to forward input: {}", e);
                    break;
                }
            }
        }
    }
}
