//! Repository reference shared by every fetch and search in a run.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies the repository and the exact revision a run is scoped to.
///
/// `head_revision` is always the change's head commit, never the base
/// branch, so fetched bodies match the code under review.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryRef {
    pub owner: String,
    pub repo: String,
    pub head_revision: String,
}

impl RepositoryRef {
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        head_revision: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            head_revision: head_revision.into(),
        }
    }

    /// `owner/repo` slug.
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.owner, self.repo, self.head_revision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_revision() {
        let r = RepositoryRef::new("acme", "shop", "abc123");
        assert_eq!(r.slug(), "acme/shop");
        assert_eq!(r.to_string(), "acme/shop@abc123");
    }
}
