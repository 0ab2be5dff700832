use serde::{Deserialize, Serialize};

/// Base result of a repository lookup for a directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoLookup {
    /// Repository root directory
    pub root: String,
    /// Display name (final component of the root)
    pub name: String,
}

impl RepoLookup {
    /// Build a lookup from a root path, deriving the display name
    pub fn from_root(root: impl Into<String>) -> Self {
        let root = root.into();
        let name = root
            .trim_end_matches(['/', '\\'])
            .rsplit(['/', '\\'])
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or(&root)
            .to_string();
        Self { root, name }
    }
}

/// A resolved repository snapshot, enriched with branch data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryContext {
    pub root: String,
    pub name: String,
    /// Branch names in resolver order (may contain blanks and duplicates)
    pub branches: Vec<String>,
    /// Checked-out branch, empty when detached or unknown
    pub active_branch: String,
}

impl RepositoryContext {
    pub fn new(lookup: RepoLookup, branches: Vec<String>, active_branch: impl Into<String>) -> Self {
        Self {
            root: lookup.root,
            name: lookup.name,
            branches,
            active_branch: active_branch.into(),
        }
    }

    /// Context without branch enrichment
    pub fn bare(lookup: RepoLookup) -> Self {
        Self::new(lookup, Vec::new(), "")
    }
}
