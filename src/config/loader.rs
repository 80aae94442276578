//! Config struct and loading logic.
//!
//! Priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables
//! 3. `.reviewctx.toml` in repo root
//! 4. `~/.config/reviewctx/config.toml` (global defaults)
//! 5. Built-in defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::constants;
use crate::env::Env;
use crate::models::ContextStrategy;

/// Errors during config loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub context: ContextConfig,
    pub github: GitHubConfig,
}

/// Context assembly budgets and strategy selection.
///
/// Handed to the assembler by value; never mutated during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Requested strategy.
    pub strategy: ContextStrategy,
    /// Strategy retried once when the requested one fails.
    pub fallback_strategy: ContextStrategy,
    /// Characters of a fetched body kept before truncation.
    pub max_file_size: usize,
    /// Characters of each related file included in a bundle.
    pub max_chars_per_file: usize,
    /// Accepted dependents per changed file.
    pub max_dependents: usize,
    /// Accepted test files per changed file.
    pub max_tests: usize,
    /// When false, `dependency_aware` behaves as `full_files`.
    pub enable_relationships: bool,
    /// Deadline for each fetch or search call, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            strategy: ContextStrategy::DependencyAware,
            fallback_strategy: ContextStrategy::FullFiles,
            max_file_size: constants::DEFAULT_MAX_FILE_SIZE,
            max_chars_per_file: constants::DEFAULT_MAX_CHARS_PER_FILE,
            max_dependents: constants::DEFAULT_MAX_DEPENDENTS,
            max_tests: constants::DEFAULT_MAX_TESTS,
            enable_relationships: true,
            request_timeout_secs: constants::DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ContextConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// The strategy actually run for `requested`, honouring `enable_relationships`.
    pub fn effective(&self, requested: ContextStrategy) -> ContextStrategy {
        if requested == ContextStrategy::DependencyAware && !self.enable_relationships {
            ContextStrategy::FullFiles
        } else {
            requested
        }
    }
}

/// GitHub API access.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    pub api_url: String,
    pub token: Option<String>,
}

impl std::fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("api_url", &self.api_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: constants::GITHUB_API_URL.to_string(),
            token: None,
        }
    }
}

impl Config {
    /// Load configuration with proper layering.
    ///
    /// Reads from global config, repo-local config, then applies
    /// environment variable overrides.
    pub fn load(repo_root: Option<&Path>, env: &Env) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        // Layer 4: global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global = Self::load_file(&global_path)?;
                config.merge(global);
            }
        }

        // Layer 3: repo-local config
        if let Some(root) = repo_root {
            let local_path = root.join(constants::CONFIG_FILENAME);
            if local_path.exists() {
                let local = Self::load_file(&local_path)?;
                config.merge(local);
            }
        }

        // Layer 2: environment variables
        config.apply_env_vars(env);

        Ok(config)
    }

    /// Load a config from a specific file.
    fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the global config file path.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(constants::CONFIG_DIR).join("config.toml"))
    }

    /// Merge another config into this one (other takes precedence for non-default values).
    fn merge(&mut self, other: Config) {
        let defaults = ContextConfig::default();
        let ctx = other.context;
        if ctx.strategy != defaults.strategy {
            self.context.strategy = ctx.strategy;
        }
        if ctx.fallback_strategy != defaults.fallback_strategy {
            self.context.fallback_strategy = ctx.fallback_strategy;
        }
        if ctx.max_file_size != defaults.max_file_size {
            self.context.max_file_size = ctx.max_file_size;
        }
        if ctx.max_chars_per_file != defaults.max_chars_per_file {
            self.context.max_chars_per_file = ctx.max_chars_per_file;
        }
        if ctx.max_dependents != defaults.max_dependents {
            self.context.max_dependents = ctx.max_dependents;
        }
        if ctx.max_tests != defaults.max_tests {
            self.context.max_tests = ctx.max_tests;
        }
        // Disabled overrides enabled
        if !ctx.enable_relationships {
            self.context.enable_relationships = false;
        }
        if ctx.request_timeout_secs != defaults.request_timeout_secs {
            self.context.request_timeout_secs = ctx.request_timeout_secs;
        }

        if other.github.api_url != GitHubConfig::default().api_url {
            self.github.api_url = other.github.api_url;
        }
        if other.github.token.is_some() {
            self.github.token = other.github.token;
        }
    }

    /// Apply environment variable overrides.
    fn apply_env_vars(&mut self, env: &Env) {
        let ctx = &mut self.context;
        if let Some(val) = env.parsed(constants::ENV_STRATEGY) {
            ctx.strategy = val;
        }
        if let Some(val) = env.parsed(constants::ENV_FALLBACK_STRATEGY) {
            ctx.fallback_strategy = val;
        }
        if let Some(val) = env.parsed(constants::ENV_MAX_FILE_SIZE) {
            ctx.max_file_size = val;
        }
        if let Some(val) = env.parsed(constants::ENV_MAX_CHARS_PER_FILE) {
            ctx.max_chars_per_file = val;
        }
        if let Some(val) = env.parsed(constants::ENV_MAX_DEPENDENTS) {
            ctx.max_dependents = val;
        }
        if let Some(val) = env.parsed(constants::ENV_MAX_TESTS) {
            ctx.max_tests = val;
        }
        if let Some(val) = env.parsed(constants::ENV_REQUEST_TIMEOUT) {
            ctx.request_timeout_secs = val;
        }
        if let Some(enabled) = env.flag(constants::ENV_ENABLE_RELATIONSHIPS) {
            ctx.enable_relationships = enabled;
        }

        if let Some(val) = env.var(constants::ENV_GITHUB_API_URL) {
            self.github.api_url = val;
        }
        if let Some(token) =
            env.first_of(&[constants::ENV_GITHUB_TOKEN, constants::ENV_GITHUB_TOKEN_FALLBACK])
        {
            self.github.token = Some(token);
        }
    }
}
