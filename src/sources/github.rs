//! GitHub REST API adapter.
//!
//! Fetches file bodies through the contents API, searches through the
//! code-search API, and loads pull-request file lists for the CLI.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::StatusCode;
use serde::Deserialize;

use super::{CodeSearch, ContentFetcher, SearchHit, SearchQuery, SourceError};
use crate::models::{ChangedFile, FileStatus, RepositoryRef};

/// GitHub caps `per_page` at 100 for both search and pull-request files.
const MAX_PER_PAGE: usize = 100;

/// GitHub stops listing pull-request files after 3000 entries.
const MAX_FILE_PAGES: usize = 30;

/// Client for one GitHub (or GitHub Enterprise) API endpoint.
#[derive(Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("api_url", &self.api_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    #[serde(default)]
    content: String,
    #[serde(default)]
    encoding: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    path: String,
}

#[derive(Debug, Deserialize)]
struct PullResponse {
    head: PullHead,
}

#[derive(Debug, Deserialize)]
struct PullHead {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct PullFile {
    filename: String,
    status: String,
    #[serde(default)]
    patch: Option<String>,
}

impl GitHubClient {
    pub fn new(api_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Head commit sha of pull request `number`.
    pub async fn pull_request_head(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<String, SourceError> {
        let url = format!("{}/repos/{owner}/{repo}/pulls/{number}", self.api_url);
        let pull: PullResponse = self.get_json(&url, &[]).await?;
        Ok(pull.head.sha)
    }

    /// Files changed by pull request `number`, following pagination.
    pub async fn pull_request_files(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<ChangedFile>, SourceError> {
        let url = format!("{}/repos/{owner}/{repo}/pulls/{number}/files", self.api_url);
        let mut files = Vec::new();

        for page in 1..=MAX_FILE_PAGES {
            let batch: Vec<PullFile> = self
                .get_json(
                    &url,
                    &[
                        ("per_page", MAX_PER_PAGE.to_string()),
                        ("page", page.to_string()),
                    ],
                )
                .await?;
            let done = batch.len() < MAX_PER_PAGE;
            files.extend(batch.into_iter().map(to_changed_file));
            if done {
                break;
            }
        }

        Ok(files)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, SourceError> {
        let mut request = self
            .http
            .get(url)
            .query(query)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .header(
                "User-Agent",
                format!("{}/{}", crate::constants::APP_NAME, crate::constants::VERSION),
            );
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SourceError::Api(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let rate_exhausted = response
                .headers()
                .get("x-ratelimit-remaining")
                .and_then(|v| v.to_str().ok())
                == Some("0");
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(status_error(status, rate_exhausted, url, &body));
        }

        response
            .json()
            .await
            .map_err(|e| SourceError::Api(format!("invalid response from {url}: {e}")))
    }
}

#[async_trait]
impl ContentFetcher for GitHubClient {
    async fn get_content(&self, repo: &RepositoryRef, path: &str) -> Result<String, SourceError> {
        let url = format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_url,
            repo.owner,
            repo.repo,
            path.trim_start_matches('/')
        );
        let body: ContentResponse = self
            .get_json(&url, &[("ref", repo.head_revision.clone())])
            .await?;
        decode_content(path, &body)
    }
}

#[async_trait]
impl CodeSearch for GitHubClient {
    async fn search(
        &self,
        repo: &RepositoryRef,
        query: &SearchQuery,
        limit: usize,
    ) -> Result<Vec<SearchHit>, SourceError> {
        let url = format!("{}/search/code", self.api_url);
        let per_page = limit.clamp(1, MAX_PER_PAGE);
        let body: SearchResponse = self
            .get_json(
                &url,
                &[
                    ("q", search_query(repo, query)),
                    ("per_page", per_page.to_string()),
                ],
            )
            .await?;

        Ok(body
            .items
            .into_iter()
            .take(limit)
            .map(|item| SearchHit { path: item.path })
            .collect())
    }
}

/// Render a [`SearchQuery`] in GitHub code-search syntax, scoped to `repo`.
fn search_query(repo: &RepositoryRef, query: &SearchQuery) -> String {
    let scope = format!("repo:{}", repo.slug());
    match query {
        SearchQuery::Text { terms } => {
            let mut parts: Vec<String> = terms.iter().map(|t| quote_term(t)).collect();
            parts.push(scope);
            parts.join(" ")
        }
        SearchQuery::Filename(name) => format!("filename:{name} {scope}"),
    }
}

fn quote_term(term: &str) -> String {
    if term.contains(char::is_whitespace) {
        format!("\"{}\"", term.replace('"', ""))
    } else {
        term.to_string()
    }
}

fn status_error(status: StatusCode, rate_exhausted: bool, url: &str, body: &str) -> SourceError {
    match status {
        StatusCode::NOT_FOUND => SourceError::NotFound(url.to_string()),
        StatusCode::TOO_MANY_REQUESTS => SourceError::RateLimited(body.to_string()),
        StatusCode::FORBIDDEN if rate_exhausted => SourceError::RateLimited(body.to_string()),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            SourceError::Unauthorized(format!("HTTP {status} for {url}"))
        }
        _ => SourceError::Api(format!("HTTP {status} for {url}: {body}")),
    }
}

fn decode_content(path: &str, body: &ContentResponse) -> Result<String, SourceError> {
    if body.encoding != "base64" {
        return Err(SourceError::Api(format!(
            "{path}: unsupported content encoding '{}'",
            body.encoding
        )));
    }
    let compact: String = body
        .content
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let bytes = STANDARD
        .decode(compact)
        .map_err(|e| SourceError::Api(format!("{path}: invalid base64 content: {e}")))?;
    String::from_utf8(bytes).map_err(|_| SourceError::Api(format!("{path} is not valid UTF-8")))
}

fn to_changed_file(file: PullFile) -> ChangedFile {
    let status = file.status.parse().unwrap_or(FileStatus::Modified);
    ChangedFile::new(file.filename, status, file.patch)
}
