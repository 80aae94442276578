//! Changed-file records and path helpers.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ContextStrategy;
use super::related::Dependencies;

/// How a file was touched by the change under review.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Added,
    #[default]
    Modified,
    Removed,
    Renamed,
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileStatus::Added => write!(f, "added"),
            FileStatus::Modified => write!(f, "modified"),
            FileStatus::Removed => write!(f, "removed"),
            FileStatus::Renamed => write!(f, "renamed"),
        }
    }
}

impl std::str::FromStr for FileStatus {
    type Err = String;

    /// Accepts the GitHub pull-request file statuses, folding the
    /// rarer ones onto the four tracked here.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "added" | "copied" => Ok(FileStatus::Added),
            "modified" | "changed" | "unchanged" => Ok(FileStatus::Modified),
            "removed" | "deleted" => Ok(FileStatus::Removed),
            "renamed" => Ok(FileStatus::Renamed),
            other => Err(format!("unknown file status: '{other}'")),
        }
    }
}

/// One file touched by the reviewed change.
///
/// Created from the change's file list; only the context assembler
/// fills in `full_content`, `context_strategy`, and `dependencies`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedFile {
    /// Repository-relative path.
    pub filename: String,
    pub status: FileStatus,
    /// Unified diff text for this file, absent for binary or oversized diffs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<String>,
    /// Complete body at the head revision, truncated with a marker when oversized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_content: Option<String>,
    /// Strategy that produced this record. `None` means no enrichment happened.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_strategy: Option<ContextStrategy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Dependencies>,
    /// Why this file received less context than requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degradation: Option<String>,
}

impl ChangedFile {
    pub fn new(filename: impl Into<String>, status: FileStatus, patch: Option<String>) -> Self {
        Self {
            filename: filename.into(),
            status,
            patch,
            full_content: None,
            context_strategy: None,
            dependencies: None,
            degradation: None,
        }
    }

    pub fn is_removed(&self) -> bool {
        self.status == FileStatus::Removed
    }
}

/// File name without directory path or extension (`src/Profile.ts` → `Profile`).
pub fn base_name(path: &str) -> &str {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
}

/// Final path component (`src/Profile.ts` → `Profile.ts`).
pub fn file_name(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
}

/// Extension including the leading dot (`Profile.ts` → `.ts`), or `""`.
pub fn extension(path: &str) -> String {
    Path::new(path)
        .extension()
        .and_then(|s| s.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default()
}
