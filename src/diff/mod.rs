//! Change lists from local diffs: git CLI wrapper and unified diff parsing.

pub mod git;
pub mod parser;

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::ChangedFile;

/// Errors from the diff engine.
#[derive(Error, Debug)]
pub enum DiffError {
    #[error("git command failed: {0}")]
    GitError(String),

    #[error("failed to read diff: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("path not found: {0}")]
    PathNotFound(String),
}

/// Where the unified diff for a local change comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffInput {
    /// `git diff <base> <head>` in the repository.
    GitRange { base: String, head: String },
    /// A unified diff file on disk.
    File(PathBuf),
    /// A unified diff piped on stdin.
    Stdin,
}

impl DiffInput {
    /// Raw unified diff text for this input.
    pub async fn read(&self, repo_root: &Path) -> Result<String, DiffError> {
        match self {
            DiffInput::GitRange { base, head } => git::git_diff(repo_root, base, head).await,
            DiffInput::File(path) => match tokio::fs::read_to_string(path).await {
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    Err(DiffError::PathNotFound(path.display().to_string()))
                }
                other => Ok(other?),
            },
            DiffInput::Stdin => {
                use tokio::io::AsyncReadExt;
                let mut buf = String::new();
                tokio::io::stdin().read_to_string(&mut buf).await?;
                Ok(buf)
            }
        }
    }
}

/// Produce the changed-file list for `input`.
pub async fn changed_files(input: &DiffInput, repo_root: &Path) -> Result<Vec<ChangedFile>, DiffError> {
    let diff = input.read(repo_root).await?;
    Ok(parser::parse_unified_diff(&diff))
}
