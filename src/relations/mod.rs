//! Relationship verifier: search-then-verify discovery of related files.
//!
//! Search hits are only candidates. A candidate becomes a [`RelatedFile`]
//! after its own content confirms the relationship: a relative import of
//! the target for dependents, an exact test-name match plus a textual
//! reference for tests. Unconfirmed hits are logged and dropped.

mod dependents;
mod tests_for;

use std::sync::Arc;
use std::time::Duration;

use crate::config::ContextConfig;
use crate::models::{ChangedFile, RelatedFile, RepositoryRef};
use crate::parser;
use crate::sources::{
    CodeSearch, ContentFetcher, SearchHit, SearchQuery, SourceError, with_timeout,
};

pub use tests_for::{looks_like_test, test_name_candidates};

/// Path components that mark vendored or generated trees.
const SKIPPED_DIRS: &[&str] = &[
    "node_modules",
    "dist",
    "build",
    "vendor",
    ".git",
    "target",
    "__pycache__",
    "venv",
    "coverage",
    ".next",
    ".cache",
];

/// Whether `path` lives in a vendored or generated tree.
pub fn is_vendored(path: &str) -> bool {
    path.ends_with(".min.js") || path.split('/').any(|c| SKIPPED_DIRS.contains(&c))
}

/// Discovers verified dependents and tests of changed files.
pub struct RelationshipVerifier {
    fetcher: Arc<dyn ContentFetcher>,
    search: Arc<dyn CodeSearch>,
    max_dependents: usize,
    max_tests: usize,
    timeout: Duration,
}

impl RelationshipVerifier {
    pub fn new(
        fetcher: Arc<dyn ContentFetcher>,
        search: Arc<dyn CodeSearch>,
        config: &ContextConfig,
    ) -> Self {
        Self {
            fetcher,
            search,
            max_dependents: config.max_dependents,
            max_tests: config.max_tests,
            timeout: config.request_timeout(),
        }
    }

    /// Parse `content` and run dependent then test discovery for `file`.
    ///
    /// Only fatal collaborator errors are returned; everything else
    /// degrades to fewer related files.
    pub async fn discover(
        &self,
        file: &ChangedFile,
        content: &str,
        repo: &RepositoryRef,
    ) -> Result<Vec<RelatedFile>, SourceError> {
        let record = parser::parse(&file.filename, content);
        tracing::debug!(
            file = %file.filename,
            imports = record.imports.len(),
            exports = record.exports.len(),
            "parsed changed file"
        );

        let mut related = self
            .find_dependents(&file.filename, &record.exports, repo)
            .await?;
        related.extend(self.find_related_tests(&file.filename, repo).await?);
        Ok(related)
    }

    /// Run a search, mapping non-fatal failures to "no candidates".
    async fn candidates(
        &self,
        target: &str,
        repo: &RepositoryRef,
        query: &SearchQuery,
        limit: usize,
    ) -> Result<Vec<SearchHit>, SourceError> {
        match with_timeout(self.timeout, self.search.search(repo, query, limit)).await {
            Ok(hits) => Ok(hits),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                tracing::warn!(file = target, query = ?query, reason = %e, "search failed, no candidates");
                Ok(Vec::new())
            }
        }
    }

    /// Fetch a candidate body. `Ok(None)` means the candidate is discarded.
    async fn candidate_content(
        &self,
        repo: &RepositoryRef,
        path: &str,
    ) -> Result<Option<String>, SourceError> {
        match with_timeout(self.timeout, self.fetcher.get_content(repo, path)).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                tracing::debug!(candidate = path, reason = %e, "candidate fetch failed, discarded");
                Ok(None)
            }
        }
    }
}
