//! Dependent discovery: files that import the target.

use indexmap::IndexSet;

use super::{RelationshipVerifier, is_vendored};
use crate::models::file::base_name;
use crate::models::{RelatedFile, Relationship, RepositoryRef};
use crate::parser::{self, Language};
use crate::sources::{SearchQuery, SourceError};

impl RelationshipVerifier {
    /// Find files that import `target`, confirmed by re-parsing each candidate.
    ///
    /// A target without exports cannot have a genuine dependent, so no
    /// search is issued for it. At most `2 × max_dependents` candidates
    /// are examined and discovery stops once `max_dependents` are accepted.
    pub async fn find_dependents(
        &self,
        target: &str,
        exports: &IndexSet<String>,
        repo: &RepositoryRef,
    ) -> Result<Vec<RelatedFile>, SourceError> {
        if exports.is_empty() || self.max_dependents == 0 {
            tracing::debug!(file = target, "no exports, skipping dependent search");
            return Ok(Vec::new());
        }

        let language = Language::from_path(target);
        let Some(keyword) = language.import_keyword() else {
            return Ok(Vec::new());
        };
        if !language.has_relative_imports() {
            tracing::debug!(file = target, ?language, "language has no relative imports");
            return Ok(Vec::new());
        }

        let base = base_name(target);
        let budget = self.max_dependents.saturating_mul(2);
        let query = SearchQuery::text([keyword, base]);
        let hits = self.candidates(target, repo, &query, budget).await?;

        let mut accepted = Vec::new();
        for hit in hits.into_iter().take(budget) {
            if accepted.len() >= self.max_dependents {
                break;
            }
            if hit.path == target || is_vendored(&hit.path) {
                continue;
            }
            if Language::from_path(&hit.path) == Language::Unknown {
                continue;
            }

            let Some(content) = self.candidate_content(repo, &hit.path).await? else {
                continue;
            };

            let record = parser::parse(&hit.path, &content);
            if record.imports_base_name(base) {
                tracing::debug!(file = target, candidate = %hit.path, "accepted dependent");
                accepted.push(RelatedFile {
                    filename: hit.path,
                    relationship: Relationship::Dependent,
                    content,
                    target: target.to_string(),
                });
            } else {
                tracing::debug!(
                    file = target,
                    candidate = %hit.path,
                    "rejected false positive: no relative import of target"
                );
            }
        }

        Ok(accepted)
    }
}
