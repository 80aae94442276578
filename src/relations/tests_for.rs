//! Test discovery: conventionally named files that exercise the target.

use super::RelationshipVerifier;
use crate::models::file::{base_name, extension, file_name};
use crate::models::{RelatedFile, Relationship, RepositoryRef};
use crate::parser::Language;
use crate::sources::{SearchQuery, SourceError};

/// Whether `path` already names a test or spec file.
pub fn looks_like_test(path: &str) -> bool {
    if path.split('/').any(|c| c == "__tests__") {
        return true;
    }
    let name = file_name(path).to_lowercase();
    let base = base_name(path);
    name.contains(".test.")
        || name.contains(".spec.")
        || name.starts_with("test_")
        || base.ends_with("_test")
        || base.ends_with("Test")
        || base.ends_with("Tests")
        || base.ends_with("Spec")
}

/// Conventional test file names for `target`, most common first.
pub fn test_name_candidates(target: &str) -> Vec<String> {
    let base = base_name(target);
    let ext = extension(target);
    let mut names = vec![
        format!("{base}.test{ext}"),
        format!("{base}.spec{ext}"),
        format!("{base}Test{ext}"),
        format!("{base}Tests{ext}"),
        format!("{base}_test{ext}"),
    ];
    if Language::from_path(target) == Language::Python {
        names.push(format!("test_{base}{ext}"));
    }
    names
}

impl RelationshipVerifier {
    /// Find test files for `target` by exact-filename search.
    ///
    /// A hit is accepted only when its file name equals a generated
    /// pattern exactly and its content mentions the target's base name.
    pub async fn find_related_tests(
        &self,
        target: &str,
        repo: &RepositoryRef,
    ) -> Result<Vec<RelatedFile>, SourceError> {
        if looks_like_test(target) || self.max_tests == 0 {
            tracing::debug!(file = target, "target is a test, skipping test search");
            return Ok(Vec::new());
        }

        let base = base_name(target);
        let mut accepted: Vec<RelatedFile> = Vec::new();

        for pattern in test_name_candidates(target) {
            if accepted.len() >= self.max_tests {
                break;
            }

            let query = SearchQuery::Filename(pattern.clone());
            let hits = self.candidates(target, repo, &query, self.max_tests).await?;

            for hit in hits {
                if accepted.len() >= self.max_tests {
                    break;
                }
                if hit.path == target || accepted.iter().any(|r| r.filename == hit.path) {
                    continue;
                }
                if file_name(&hit.path) != pattern {
                    tracing::debug!(
                        file = target,
                        candidate = %hit.path,
                        pattern = %pattern,
                        "rejected test candidate: name is not an exact match"
                    );
                    continue;
                }

                let Some(content) = self.candidate_content(repo, &hit.path).await? else {
                    continue;
                };
                if !content.contains(base) {
                    tracing::debug!(
                        file = target,
                        candidate = %hit.path,
                        "rejected test candidate: target never referenced"
                    );
                    continue;
                }

                tracing::debug!(file = target, candidate = %hit.path, "accepted test");
                accepted.push(RelatedFile {
                    filename: hit.path,
                    relationship: Relationship::Test,
                    content,
                    target: target.to_string(),
                });
            }
        }

        Ok(accepted)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::ContextConfig;
    use crate::relations::testing::{MemoryRepo, repo_ref, verifier};

    #[test]
    fn detects_test_names() {
        assert!(looks_like_test("src/Profile.test.ts"));
        assert!(looks_like_test("src/Profile.spec.js"));
        assert!(looks_like_test("Tests/ProfileServiceTests.swift"));
        assert!(looks_like_test("app/ProfileTest.kt"));
        assert!(looks_like_test("pkg/profile_test.go"));
        assert!(looks_like_test("tests/test_profile.py"));
        assert!(looks_like_test("src/__tests__/profile.ts"));
        assert!(!looks_like_test("src/Profile.ts"));
        assert!(!looks_like_test("src/Contest.ts"));
    }

    #[test]
    fn candidates_follow_conventions() {
        assert_eq!(
            test_name_candidates("Sources/ProfileService.swift"),
            vec![
                "ProfileService.test.swift",
                "ProfileService.spec.swift",
                "ProfileServiceTest.swift",
                "ProfileServiceTests.swift",
                "ProfileService_test.swift",
            ]
        );
        assert!(test_name_candidates("app/models.py").contains(&"test_models.py".to_string()));
    }

    #[tokio::test]
    async fn accepts_exact_name_with_reference() {
        let repo = Arc::new(MemoryRepo::with_files(&[
            ("src/Profile.ts", "export class ProfileService {}"),
            (
                "test/Profile.test.ts",
                "import { ProfileService } from '../src/Profile';",
            ),
        ]));
        let v = verifier(repo.clone(), &ContextConfig::default());

        let found = v.find_related_tests("src/Profile.ts", &repo_ref()).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].filename, "test/Profile.test.ts");
        assert_eq!(found[0].relationship, Relationship::Test);
    }

    #[tokio::test]
    async fn rejects_near_miss_names() {
        let repo = Arc::new(MemoryRepo::with_files(&[
            ("ProfileService.swift", "public class ProfileService {}"),
            (
                "Tests/UserProfileService.test.swift",
                "let s = ProfileService()",
            ),
        ]));
        let v = verifier(repo.clone(), &ContextConfig::default());

        let found = v
            .find_related_tests("ProfileService.swift", &repo_ref())
            .await
            .unwrap();
        assert!(found.is_empty());
        // The near miss was never even fetched.
        assert!(repo.fetches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejects_exact_name_without_reference() {
        let repo = Arc::new(MemoryRepo::with_files(&[
            ("lib/Cart.js", "export class Cart {}"),
            ("old/Cart.spec.js", "describe('Basket', () => {});"),
        ]));
        let v = verifier(repo.clone(), &ContextConfig::default());

        let found = v.find_related_tests("lib/Cart.js", &repo_ref()).await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_targets_are_skipped() {
        let repo = Arc::new(MemoryRepo::default());
        let v = verifier(repo.clone(), &ContextConfig::default());

        let found = v
            .find_related_tests("src/Profile.test.ts", &repo_ref())
            .await
            .unwrap();
        assert!(found.is_empty());
        assert_eq!(repo.search_count(), 0);
    }

    #[tokio::test]
    async fn caps_at_max_tests() {
        let repo = Arc::new(MemoryRepo::with_files(&[
            ("src/Cart.ts", "export class Cart {}"),
            ("a/Cart.test.ts", "Cart"),
            ("b/Cart.spec.ts", "Cart"),
            ("c/CartTest.ts", "Cart"),
        ]));
        let config = ContextConfig {
            max_tests: 2,
            ..ContextConfig::default()
        };
        let v = verifier(repo.clone(), &config);

        let found = v.find_related_tests("src/Cart.ts", &repo_ref()).await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(repo.search_count(), 2);
    }

    #[tokio::test]
    async fn candidate_fetch_failure_discards_only_that_candidate() {
        let mut repo = MemoryRepo::with_files(&[("a/Cart.test.ts", "Cart")]);
        repo.fetch_error = Some(SourceError::NotFound("a/Cart.test.ts".into()));
        let repo = Arc::new(repo);
        let v = verifier(repo.clone(), &ContextConfig::default());

        let found = v.find_related_tests("src/Cart.ts", &repo_ref()).await.unwrap();
        assert!(found.is_empty());
    }
}
