//! Shared types used across all modules.
//!
//! This module defines the changed-file records, related-file bundles,
//! repository references, and the context strategy ladder. Other modules
//! import from here rather than reaching into each other's internals.

pub mod file;
pub mod related;
pub mod repo;
pub mod summary;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use file::{ChangedFile, FileStatus};
pub use related::{Dependencies, RelatedFile, Relationship};
pub use repo::RepositoryRef;
pub use summary::Summary;

/// How much context is assembled for each changed file.
///
/// Variants are ordered by richness: every strategy includes everything
/// the previous one does.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ContextStrategy {
    /// Patch text only; no I/O.
    DiffOnly,
    /// Patch plus the complete file body at the head revision.
    FullFiles,
    /// Full bodies plus verified dependents and tests.
    #[default]
    DependencyAware,
}

impl fmt::Display for ContextStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextStrategy::DiffOnly => write!(f, "diff_only"),
            ContextStrategy::FullFiles => write!(f, "full_files"),
            ContextStrategy::DependencyAware => write!(f, "dependency_aware"),
        }
    }
}

impl std::str::FromStr for ContextStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "diff_only" | "diff" => Ok(ContextStrategy::DiffOnly),
            "full_files" | "full" => Ok(ContextStrategy::FullFiles),
            "dependency_aware" | "deps" => Ok(ContextStrategy::DependencyAware),
            other => Err(format!(
                "unsupported strategy: '{other}'. Supported: diff_only, full_files, dependency_aware"
            )),
        }
    }
}
