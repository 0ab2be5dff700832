//! Repository context lookup
//!
//! The resolver is the backend that turns a directory into repository
//! metadata. All three calls are asynchronous and fail independently.

mod git;

pub use git::{GitResolver, parse_branch_list};

use async_trait::async_trait;
use tracing::warn;

use crate::{RepoLookup, RepositoryContext};

/// Error type for resolver calls
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("Failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("Resolver unavailable: {0}")]
    Unavailable(String),
}

/// Backend that resolves repository context for a directory
#[async_trait]
pub trait ContextResolver: Send + Sync {
    /// Repository containing `path`, or `None` when it is not inside one
    async fn resolve_context(&self, path: &str) -> Result<Option<RepoLookup>, ResolveError>;

    /// All branch names known for the repository at `root`
    async fn list_branches(&self, root: &str) -> Result<Vec<String>, ResolveError>;

    /// The checked-out branch of the repository at `root`
    async fn current_branch(&self, root: &str) -> Result<String, ResolveError>;
}

/// Add branch data to a lookup.
///
/// Both branch calls run concurrently; a failure degrades to an empty list or
/// an empty active branch instead of failing the whole context.
pub async fn enrich(resolver: &dyn ContextResolver, lookup: RepoLookup) -> RepositoryContext {
    let (branches, current) = tokio::join!(
        resolver.list_branches(&lookup.root),
        resolver.current_branch(&lookup.root)
    );

    let branches = branches.unwrap_or_else(|e| {
        warn!("Failed to list branches for {}: {}", lookup.root, e);
        Vec::new()
    });
    let current = current.unwrap_or_else(|e| {
        warn!("Failed to read current branch for {}: {}", lookup.root, e);
        String::new()
    });

    RepositoryContext::new(lookup, branches, current)
}
