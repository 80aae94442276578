//! App-wide constants.
//!
//! Centralises the tool name, config paths, environment variable names,
//! and built-in budgets so a rename only requires changing this file.

/// Display name of the tool (lowercase).
pub const APP_NAME: &str = "reviewctx";

/// Crate version baked in at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Local config filename (e.g. `.reviewctx.toml` in repo root).
pub const CONFIG_FILENAME: &str = ".reviewctx.toml";

/// Directory name under `~/.config/` for global config.
pub const CONFIG_DIR: &str = "reviewctx";

/// Default GitHub REST API base URL.
pub const GITHUB_API_URL: &str = "https://api.github.com";

// ── Built-in budgets ────────────────────────────────────────────────

/// Characters of a fetched file kept before truncation.
pub const DEFAULT_MAX_FILE_SIZE: usize = 100_000;

/// Characters of each related file included in a bundle.
pub const DEFAULT_MAX_CHARS_PER_FILE: usize = 5_000;

/// Accepted dependents per changed file.
pub const DEFAULT_MAX_DEPENDENTS: usize = 5;

/// Accepted test files per changed file.
pub const DEFAULT_MAX_TESTS: usize = 3;

/// Seconds before a single fetch or search call is abandoned.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

// ── Environment variable names ──────────────────────────────────────

pub const ENV_STRATEGY: &str = "REVIEWCTX_STRATEGY";
pub const ENV_FALLBACK_STRATEGY: &str = "REVIEWCTX_FALLBACK_STRATEGY";
pub const ENV_MAX_FILE_SIZE: &str = "REVIEWCTX_MAX_FILE_SIZE";
pub const ENV_MAX_CHARS_PER_FILE: &str = "REVIEWCTX_MAX_CHARS_PER_FILE";
pub const ENV_MAX_DEPENDENTS: &str = "REVIEWCTX_MAX_DEPENDENTS";
pub const ENV_MAX_TESTS: &str = "REVIEWCTX_MAX_TESTS";
pub const ENV_ENABLE_RELATIONSHIPS: &str = "REVIEWCTX_ENABLE_RELATIONSHIPS";
pub const ENV_REQUEST_TIMEOUT: &str = "REVIEWCTX_REQUEST_TIMEOUT";
pub const ENV_GITHUB_TOKEN: &str = "REVIEWCTX_GITHUB_TOKEN";
pub const ENV_GITHUB_TOKEN_FALLBACK: &str = "GITHUB_TOKEN";
pub const ENV_GITHUB_API_URL: &str = "REVIEWCTX_GITHUB_API_URL";
