//! Aggregate counts for an assembly run.

use serde::{Deserialize, Serialize};

use super::{ChangedFile, Relationship};

/// Summary statistics for an assembled change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub files: usize,
    pub with_content: usize,
    pub dependents: usize,
    pub tests: usize,
    pub degraded: usize,
}

impl Summary {
    /// Compute summary from assembled files.
    pub fn from_files(files: &[ChangedFile]) -> Self {
        let mut s = Summary::default();
        for f in files {
            s.files += 1;
            if f.full_content.is_some() {
                s.with_content += 1;
            }
            if f.degradation.is_some() {
                s.degraded += 1;
            }
            for rf in f.dependencies.iter().flat_map(|d| &d.related_files) {
                match rf.relationship {
                    Relationship::Dependent => s.dependents += 1,
                    Relationship::Test => s.tests += 1,
                }
            }
        }
        s
    }
}
