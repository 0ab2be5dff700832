//! Git CLI backed resolver

use async_trait::async_trait;
use std::process::Output;
use tokio::process::Command;
use tracing::debug;

use super::{ContextResolver, ResolveError};
use crate::RepoLookup;

/// Resolves repository context by shelling out to `git`
#[derive(Debug, Clone)]
pub struct GitResolver {
    binary: String,
}

impl GitResolver {
    pub fn new() -> Self {
        Self::with_binary("git")
    }

    /// Use a specific git executable
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    async fn git(&self, dir: &str, args: &[&str]) -> Result<Output, ResolveError> {
        Command::new(&self.binary)
            .arg("-C")
            .arg(dir)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ResolveError::Spawn {
                command: format!("{} {}", self.binary, args.join(" ")),
                source,
            })
    }

    async fn git_stdout(&self, dir: &str, args: &[&str]) -> Result<String, ResolveError> {
        let output = self.git(dir, args).await?;
        if !output.status.success() {
            return Err(ResolveError::CommandFailed {
                command: format!("git {}", args.join(" ")),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for GitResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContextResolver for GitResolver {
    async fn resolve_context(&self, path: &str) -> Result<Option<RepoLookup>, ResolveError> {
        let output = self.git(path, &["rev-parse", "--show-toplevel"]).await?;

        // Outside a repository (or a missing directory) is "no context", not an error
        if !output.status.success() {
            debug!(
                "No repository for {}: {}",
                path,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return Ok(None);
        }

        let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if root.is_empty() {
            Ok(None)
        } else {
            Ok(Some(RepoLookup::from_root(root)))
        }
    }

    async fn list_branches(&self, root: &str) -> Result<Vec<String>, ResolveError> {
        let stdout = self.git_stdout(root, &["branch", "-a"]).await?;
        Ok(parse_branch_list(&stdout))
    }

    async fn current_branch(&self, root: &str) -> Result<String, ResolveError> {
        let stdout = self.git_stdout(root, &["branch", "--show-current"]).await?;
        Ok(stdout.trim().to_string())
    }
}

/// Parse `git branch -a` output into branch names.
///
/// Strips the current (`*`) and worktree (`+`) markers and skips symbolic refs
/// such as `remotes/origin/HEAD -> origin/main`.
pub fn parse_branch_list(output: &str) -> Vec<String> {
    output
        .lines()
        .map(|line| {
            line.trim()
                .trim_start_matches("* ")
                .trim_start_matches("+ ")
                .trim()
        })
        .filter(|line| !line.is_empty() && !line.contains(" -> "))
        .map(str::to_string)
        .collect()
}
