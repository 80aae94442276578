//! Context strategy controller.
//!
//! Enriches a change's file list with full bodies and, for
//! `dependency_aware`, verified related files. Assembly is best-effort:
//! a failing strategy is retried once with the configured fallback and a
//! second failure returns the input unenriched.

mod truncate;

use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::Instrument;

use crate::config::ContextConfig;
use crate::models::{ChangedFile, ContextStrategy, Dependencies, RelatedFile, Relationship, RepositoryRef};
use crate::relations::RelationshipVerifier;
use crate::sources::{CodeSearch, ContentFetcher, SourceError, with_timeout};

pub use truncate::{is_truncated, truncate, truncation_marker};

/// Why a strategy step could not complete.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DegradationReason {
    #[error("content fetch failed: {0}")]
    Fetch(SourceError),

    #[error("relationship discovery failed for {file}: {error}")]
    Relationships { file: String, error: SourceError },

    #[error("fetch task failed: {0}")]
    Task(String),
}

/// Assembles review context for one change at a time.
pub struct ContextAssembler {
    fetcher: Arc<dyn ContentFetcher>,
    search: Arc<dyn CodeSearch>,
    config: ContextConfig,
}

impl ContextAssembler {
    pub fn new(
        fetcher: Arc<dyn ContentFetcher>,
        search: Arc<dyn CodeSearch>,
        config: ContextConfig,
    ) -> Self {
        Self {
            fetcher,
            search,
            config,
        }
    }

    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    /// Enrich `files` using the configured strategy against `repo`.
    ///
    /// Never fails. The outcome is visible per file through
    /// `context_strategy` and `degradation`.
    pub async fn assemble(&self, files: Vec<ChangedFile>, repo: &RepositoryRef) -> Vec<ChangedFile> {
        let requested = self.config.effective(self.config.strategy);
        let span = tracing::info_span!(
            "assemble",
            run_id = %uuid::Uuid::new_v4(),
            strategy = %requested,
            repo = %repo,
        );

        async move {
            let reason = match self.run(requested, &files, repo).await {
                Ok(enriched) => return enriched,
                Err(reason) => reason,
            };

            let fallback = self.config.effective(self.config.fallback_strategy);
            if fallback == requested {
                tracing::warn!(%reason, "strategy failed, fallback is the same strategy");
                return unenriched(files, &reason);
            }

            tracing::warn!(%reason, %fallback, "strategy failed, falling back");
            match self.run(fallback, &files, repo).await {
                Ok(enriched) => enriched,
                Err(reason) => {
                    tracing::warn!(%reason, "fallback strategy failed, returning files unenriched");
                    unenriched(files, &reason)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn run(
        &self,
        strategy: ContextStrategy,
        files: &[ChangedFile],
        repo: &RepositoryRef,
    ) -> Result<Vec<ChangedFile>, DegradationReason> {
        match strategy {
            ContextStrategy::DiffOnly => Ok(diff_only(files)),
            ContextStrategy::FullFiles => self.full_files(files, repo).await,
            ContextStrategy::DependencyAware => self.dependency_aware(files, repo).await,
        }
    }

    /// Fetch every non-removed file concurrently.
    ///
    /// Removed files have no body at the head revision and stay `diff_only`.
    /// A non-fatal fetch failure degrades that file to `diff_only`; a fatal
    /// one fails the whole step.
    async fn full_files(
        &self,
        files: &[ChangedFile],
        repo: &RepositoryRef,
    ) -> Result<Vec<ChangedFile>, DegradationReason> {
        let mut enriched: Vec<ChangedFile> = files
            .iter()
            .cloned()
            .map(|mut f| {
                f.context_strategy = Some(if f.is_removed() {
                    ContextStrategy::DiffOnly
                } else {
                    ContextStrategy::FullFiles
                });
                f
            })
            .collect();

        let timeout = self.config.request_timeout();
        let mut join_set = JoinSet::new();
        for (index, file) in files.iter().enumerate() {
            if file.is_removed() {
                continue;
            }
            let fetcher = Arc::clone(&self.fetcher);
            let repo = repo.clone();
            let path = file.filename.clone();
            join_set.spawn(async move {
                let result = with_timeout(timeout, fetcher.get_content(&repo, &path)).await;
                (index, result)
            });
        }

        let ceiling = self.config.max_file_size;
        while let Some(joined) = join_set.join_next().await {
            let (index, result) = joined.map_err(|e| DegradationReason::Task(e.to_string()))?;
            let file = &mut enriched[index];
            match result {
                Ok(content) => {
                    let body = truncate(&content, ceiling);
                    if is_truncated(&body) {
                        tracing::debug!(file = %file.filename, ceiling, "content truncated");
                    }
                    file.full_content = Some(body);
                }
                Err(e) if e.is_fatal() => return Err(DegradationReason::Fetch(e)),
                Err(e) => {
                    tracing::warn!(file = %file.filename, reason = %e, "content fetch failed, keeping diff only");
                    file.context_strategy = Some(ContextStrategy::DiffOnly);
                    file.degradation = Some(format!("content fetch failed: {e}"));
                }
            }
        }

        Ok(enriched)
    }

    /// `full_files`, then sequential relationship discovery per file.
    async fn dependency_aware(
        &self,
        files: &[ChangedFile],
        repo: &RepositoryRef,
    ) -> Result<Vec<ChangedFile>, DegradationReason> {
        let mut enriched = self.full_files(files, repo).await?;
        let verifier = RelationshipVerifier::new(
            Arc::clone(&self.fetcher),
            Arc::clone(&self.search),
            &self.config,
        );

        let mut pool: IndexMap<String, RelatedFile> = IndexMap::new();
        let mut own: Vec<IndexSet<String>> = vec![IndexSet::new(); enriched.len()];

        for (index, file) in enriched.iter().enumerate() {
            let Some(content) = file.full_content.as_deref() else {
                continue;
            };
            let related = verifier
                .discover(file, content, repo)
                .await
                .map_err(|error| DegradationReason::Relationships {
                    file: file.filename.clone(),
                    error,
                })?;
            for rf in related {
                own[index].insert(rf.filename.clone());
                pool.entry(rf.filename.clone()).or_insert(rf);
            }
        }

        tracing::info!(pooled = pool.len(), "relationship discovery complete");

        for (file, own) in enriched.iter_mut().zip(&own) {
            if file.full_content.is_none() {
                continue;
            }
            file.context_strategy = Some(ContextStrategy::DependencyAware);
            file.dependencies = Some(self.bundle(&file.filename, own, &pool));
        }

        Ok(enriched)
    }

    /// Draw capped, excerpted related files for `filename` from the batch pool.
    ///
    /// Files discovered for `filename` itself come first, then the rest of
    /// the pool in discovery order.
    fn bundle(
        &self,
        filename: &str,
        own: &IndexSet<String>,
        pool: &IndexMap<String, RelatedFile>,
    ) -> Dependencies {
        let combined = self.config.max_dependents.saturating_add(self.config.max_tests);
        let ordered = own
            .iter()
            .filter_map(|name| pool.get(name))
            .chain(pool.values().filter(|rf| !own.contains(&rf.filename)));

        let (mut dependents, mut tests) = (0, 0);
        let mut related_files = Vec::new();
        for rf in ordered {
            if related_files.len() >= combined {
                break;
            }
            if rf.filename == filename {
                continue;
            }
            let (count, cap) = match rf.relationship {
                Relationship::Dependent => (&mut dependents, self.config.max_dependents),
                Relationship::Test => (&mut tests, self.config.max_tests),
            };
            if *count >= cap {
                continue;
            }
            *count += 1;
            related_files.push(RelatedFile {
                content: truncate(&rf.content, self.config.max_chars_per_file),
                ..rf.clone()
            });
        }

        Dependencies { related_files }
    }
}

fn diff_only(files: &[ChangedFile]) -> Vec<ChangedFile> {
    files
        .iter()
        .cloned()
        .map(|mut f| {
            f.context_strategy = Some(ContextStrategy::DiffOnly);
            f
        })
        .collect()
}

/// Input files tagged as having received no enrichment.
fn unenriched(files: Vec<ChangedFile>, reason: &DegradationReason) -> Vec<ChangedFile> {
    files
        .into_iter()
        .map(|mut f| {
            f.context_strategy = None;
            f.degradation = Some(reason.to_string());
            f
        })
        .collect()
}
