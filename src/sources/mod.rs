//! External collaborators: file-content fetch and repository search.
//!
//! The context engine only talks to these traits. Two adapters ship with
//! the crate: [`git::GitRepository`] for a local clone and
//! [`github::GitHubClient`] for the GitHub REST API. Tests inject
//! in-memory implementations.

pub mod git;
pub mod github;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::RepositoryRef;

/// Errors from a fetch or search collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("access denied: {0}")]
    Unauthorized(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("API error: {0}")]
    Api(String),

    #[error("git command failed: {0}")]
    Git(String),
}

impl SourceError {
    /// Whether every further call against the same source will fail the same way.
    ///
    /// Fatal errors abort the running strategy (triggering fallback) instead
    /// of degrading a single file or candidate.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SourceError::Unauthorized(_))
    }
}

/// A repository search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    /// Files whose text contains every term.
    Text { terms: Vec<String> },
    /// Files whose final path component is exactly this name.
    Filename(String),
}

impl SearchQuery {
    pub fn text<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SearchQuery::Text {
            terms: terms.into_iter().map(Into::into).collect(),
        }
    }
}

/// One search result: a candidate path, not yet verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub path: String,
}

/// Fetches a file body at a revision.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Return the text of `path` at `repo.head_revision`.
    async fn get_content(&self, repo: &RepositoryRef, path: &str) -> Result<String, SourceError>;
}

/// Searches a repository for candidate files.
#[async_trait]
pub trait CodeSearch: Send + Sync {
    /// Return at most `limit` candidates matching `query`.
    async fn search(
        &self,
        repo: &RepositoryRef,
        query: &SearchQuery,
        limit: usize,
    ) -> Result<Vec<SearchHit>, SourceError>;
}

/// Await `call`, converting an elapsed deadline into [`SourceError::Timeout`].
pub async fn with_timeout<T, F>(timeout: Duration, call: F) -> Result<T, SourceError>
where
    F: Future<Output = Result<T, SourceError>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => Err(SourceError::Timeout(timeout)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn with_timeout_passes_through_results() {
        let ok = with_timeout(Duration::from_secs(1), async { Ok::<_, SourceError>(7) }).await;
        assert_eq!(ok, Ok(7));

        let err = with_timeout(Duration::from_secs(1), async {
            Err::<(), _>(SourceError::NotFound("x".into()))
        })
        .await;
        assert_eq!(err, Err(SourceError::NotFound("x".into())));
    }

    #[tokio::test]
    async fn with_timeout_reports_elapsed_deadline() {
        let result = with_timeout(Duration::from_millis(50), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, SourceError>(())
        })
        .await;
        assert_eq!(result, Err(SourceError::Timeout(Duration::from_millis(50))));
    }

    #[test]
    fn only_access_errors_are_fatal() {
        assert!(SourceError::Unauthorized("bad token".into()).is_fatal());
        assert!(!SourceError::NotFound("a.rs".into()).is_fatal());
        assert!(!SourceError::RateLimited("slow down".into()).is_fatal());
        assert!(!SourceError::Timeout(Duration::from_secs(1)).is_fatal());
    }

    #[test]
    fn text_query_builder() {
        assert_eq!(
            SearchQuery::text(["import", "Profile"]),
            SearchQuery::Text {
                terms: vec!["import".to_string(), "Profile".to_string()]
            }
        );
    }
}
