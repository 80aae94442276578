//! Local git repository adapter.
//!
//! Shells out to `git` via `tokio::process::Command`. Every read is
//! pinned to the revision carried by the [`RepositoryRef`], never the
//! working tree.

use std::path::PathBuf;
use std::process::Output;

use async_trait::async_trait;

use super::{CodeSearch, ContentFetcher, SearchHit, SearchQuery, SourceError};
use crate::models::RepositoryRef;
use crate::models::file::file_name;

/// A local clone used as both content fetcher and code search.
#[derive(Debug, Clone)]
pub struct GitRepository {
    root: PathBuf,
}

impl GitRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve `rev` to a full commit sha.
    pub async fn resolve_revision(&self, rev: &str) -> Result<String, SourceError> {
        let spec = format!("{rev}^{{commit}}");
        let output = self.git(&["rev-parse", "--verify", &spec]).await?;
        if !output.status.success() {
            return Err(SourceError::NotFound(format!("revision {rev}")));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Build a [`RepositoryRef`] for this clone pinned to `head`.
    ///
    /// Local clones have no owner, so `local` stands in for it.
    pub async fn repository_ref(&self, head: &str) -> Result<RepositoryRef, SourceError> {
        let sha = self.resolve_revision(head).await?;
        let name = self
            .root
            .canonicalize()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_else(|| "repository".to_string());
        Ok(RepositoryRef::new("local", name, sha))
    }

    async fn git(&self, args: &[&str]) -> Result<Output, SourceError> {
        tokio::process::Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .output()
            .await
            .map_err(|e| SourceError::Git(format!("failed to run git: {e}")))
    }
}

#[async_trait]
impl ContentFetcher for GitRepository {
    async fn get_content(&self, repo: &RepositoryRef, path: &str) -> Result<String, SourceError> {
        let object = format!("{}:{path}", repo.head_revision);
        let output = self.git(&["show", &object]).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stderr.contains("does not exist") || stderr.contains("exists on disk") {
                return Err(SourceError::NotFound(path.to_string()));
            }
            return Err(SourceError::Git(format!(
                "git show failed (exit {}): {}",
                output.status,
                stderr.trim()
            )));
        }

        String::from_utf8(output.stdout)
            .map_err(|_| SourceError::Api(format!("{path} is not valid UTF-8")))
    }
}

#[async_trait]
impl CodeSearch for GitRepository {
    async fn search(
        &self,
        repo: &RepositoryRef,
        query: &SearchQuery,
        limit: usize,
    ) -> Result<Vec<SearchHit>, SourceError> {
        let rev = repo.head_revision.as_str();
        let paths: Vec<String> = match query {
            SearchQuery::Text { terms } => {
                let mut args = vec!["grep", "-l", "-I", "-F", "--all-match"];
                for term in terms {
                    args.push("-e");
                    args.push(term.as_str());
                }
                args.push(rev);
                args.push("--");
                let output = self.git(&args).await?;
                // Exit status 1 means "no matches".
                if output.status.code() == Some(1) {
                    return Ok(Vec::new());
                }
                if !output.status.success() {
                    return Err(SourceError::Git(format!(
                        "git grep failed (exit {}): {}",
                        output.status,
                        String::from_utf8_lossy(&output.stderr).trim()
                    )));
                }
                let prefix = format!("{rev}:");
                String::from_utf8_lossy(&output.stdout)
                    .lines()
                    .map(|l| l.strip_prefix(&prefix).unwrap_or(l).to_string())
                    .collect()
            }
            SearchQuery::Filename(name) => {
                let output = self.git(&["ls-tree", "-r", "--name-only", rev]).await?;
                if !output.status.success() {
                    return Err(SourceError::Git(format!(
                        "git ls-tree failed (exit {}): {}",
                        output.status,
                        String::from_utf8_lossy(&output.stderr).trim()
                    )));
                }
                String::from_utf8_lossy(&output.stdout)
                    .lines()
                    .filter(|l| file_name(l) == name)
                    .map(str::to_string)
                    .collect()
            }
        };

        Ok(paths
            .into_iter()
            .take(limit)
            .map(|path| SearchHit { path })
            .collect())
    }
}
