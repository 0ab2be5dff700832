//! Resolve command implementation

use anyhow::{Context, Result};
use std::path::Path;

use cwdsync::Platform;
use cwdsync::path::normalize;
use cwdsync::resolver::{ContextResolver, GitResolver, enrich};

/// Print the repository context of `path` as JSON
pub async fn resolve_command(path: &Path) -> Result<()> {
    let path = normalize(&path.to_string_lossy(), Platform::current());
    let resolver = GitResolver::new();

    let lookup = resolver
        .resolve_context(&path)
        .await
        .with_context(|| format!("Failed to resolve {}", path))?;

    match lookup {
        Some(lookup) => {
            let context = enrich(&resolver, lookup).await;
            println!("{}", serde_json::to_string_pretty(&context)?);
        }
        None => println!("null"),
    }

    Ok(())
}
