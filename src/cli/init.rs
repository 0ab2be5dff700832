//! Init command implementation

use anyhow::Result;
use std::path::Path;

use cwdsync::config::Config;

/// Write the default configuration file
pub async fn init_command(config_path: Option<&Path>, force: bool) -> Result<()> {
    let config_path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(Config::global_config_path);
    Config::init(&config_path, force)?;
    println!("Created: {}", config_path.display());
    Ok(())
}
