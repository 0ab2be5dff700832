use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use cwdsync::ShellKind;
use cwdsync::config::Config;

mod cli;

#[derive(Parser)]
#[command(name = "cwdsync")]
#[command(about = "Keep repository tabs in sync with a terminal shell's working directory")]
#[command(version)]
struct Cli {
    /// Path to the config file (defaults to ~/.cwdsync/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a shell and track its directory (default)
    Watch {
        /// Label of the initial slot
        #[arg(long)]
        label: Option<String>,
    },

    /// Print the repository context of a directory as JSON
    Resolve {
        /// Directory to resolve
        path: PathBuf,
    },

    /// Print directory markers found in captured terminal output
    Scan {
        /// File to read (defaults to stdin)
        file: Option<PathBuf>,

        /// Print every match without normalization or deduplication
        #[arg(long)]
        raw: bool,
    },

    /// Print the shell instrumentation script
    Script {
        /// Shell family (zsh, bash, sh, powershell, cmd)
        #[arg(long)]
        shell: Option<ShellKind>,

        /// Print the one-shot probe instead of the hook
        #[arg(long)]
        probe: bool,
    },

    /// Write a default ~/.cwdsync/config.toml
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the shell's output
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let load_config = || Config::load(cli.config.as_deref());

    match cli.command.unwrap_or(Commands::Watch { label: None }) {
        Commands::Watch { label } => {
            cli::watch::watch_command(&load_config()?, label).await?;
        }
        Commands::Resolve { path } => {
            cli::resolve::resolve_command(&path).await?;
        }
        Commands::Scan { file, raw } => {
            let window = load_config()?.detector.dedup_window();
            cli::scan::scan_command(file.as_deref(), raw, window).await?;
        }
        Commands::Script { shell, probe } => {
            cli::script::script_command(&load_config()?, shell, probe).await?;
        }
        Commands::Init { force } => {
            cli::init::init_command(cli.config.as_deref(), force).await?;
        }
    }

    Ok(())
}
