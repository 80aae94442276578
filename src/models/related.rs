//! Related-file bundles attached to changed files.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How a related file relates to the changed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relationship {
    /// Imports the changed file (confirmed by re-parsing).
    Dependent,
    /// Tests the changed file (confirmed by exact name and content scan).
    Test,
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relationship::Dependent => write!(f, "dependent"),
            Relationship::Test => write!(f, "test"),
        }
    }
}

/// A verified file related to a changed file.
///
/// Only the relationship verifier constructs these, and only after the
/// candidate's own content confirmed the relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedFile {
    pub filename: String,
    pub relationship: Relationship,
    /// Verified body, possibly truncated to an excerpt.
    pub content: String,
    /// Changed file whose discovery surfaced this file.
    pub target: String,
}

/// The context bundle attached to one changed file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependencies {
    pub related_files: Vec<RelatedFile>,
}

impl Dependencies {
    pub fn dependents(&self) -> impl Iterator<Item = &RelatedFile> {
        self.of(Relationship::Dependent)
    }

    pub fn tests(&self) -> impl Iterator<Item = &RelatedFile> {
        self.of(Relationship::Test)
    }

    fn of(&self, relationship: Relationship) -> impl Iterator<Item = &RelatedFile> {
        self.related_files
            .iter()
            .filter(move |r| r.relationship == relationship)
    }

    pub fn is_empty(&self) -> bool {
        self.related_files.is_empty()
    }
}
