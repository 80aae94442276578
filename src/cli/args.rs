//! Clap argument types, input validation, and config overrides.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use reviewctx::config::ContextConfig;
use reviewctx::diff::DiffInput;
use reviewctx::models::{ChangedFile, ContextStrategy};

/// Dependency-aware context assembly for code review.
#[derive(Parser, Debug)]
#[command(name = "reviewctx", version = reviewctx::constants::VERSION)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` wins when set.
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Assemble review context for a change.
    Assemble(Box<AssembleArgs>),

    /// Print the imports and exports extracted from a source file.
    Parse(ParseArgs),

    /// Print version information.
    Version,
}

/// Arguments for the `parse` subcommand.
#[derive(Parser, Debug)]
pub struct ParseArgs {
    /// Source file to parse.
    pub file: PathBuf,
}

/// Arguments for the `assemble` subcommand.
#[derive(Parser, Debug)]
pub struct AssembleArgs {
    // --- Local repository ---
    /// Path to the repository (default: current directory).
    #[arg(long, default_value = ".")]
    pub path: PathBuf,

    /// Base revision to diff against (uses git diff).
    #[arg(long)]
    pub base: Option<String>,

    /// Head revision whose contents are assembled (default: HEAD).
    #[arg(long)]
    pub head: Option<String>,

    /// Pre-computed unified diff file.
    #[arg(long)]
    pub diff_file: Option<PathBuf>,

    /// Read unified diff from stdin.
    #[arg(long, default_value_t = false)]
    pub diff_stdin: bool,

    // --- GitHub pull request ---
    /// GitHub repository as `owner/repo`.
    #[arg(long, value_name = "OWNER/REPO", requires = "pr")]
    pub github: Option<String>,

    /// Pull request number (with --github).
    #[arg(long, requires = "github")]
    pub pr: Option<u64>,

    // --- Strategy ---
    /// Context strategy: diff_only, full_files, or dependency_aware.
    #[arg(long)]
    pub strategy: Option<ContextStrategy>,

    /// Strategy retried once when the requested one fails.
    #[arg(long)]
    pub fallback: Option<ContextStrategy>,

    /// Characters of each fetched file kept before truncation.
    #[arg(long)]
    pub max_file_size: Option<usize>,

    /// Characters of each related file included in a bundle.
    #[arg(long)]
    pub max_chars_per_file: Option<usize>,

    /// Accepted dependents per changed file.
    #[arg(long)]
    pub max_dependents: Option<usize>,

    /// Accepted test files per changed file.
    #[arg(long)]
    pub max_tests: Option<usize>,

    /// Disable relationship discovery (dependency_aware behaves as full_files).
    #[arg(long, default_value_t = false)]
    pub no_relationships: bool,

    /// Per-call timeout for fetches and searches, in seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    // --- Output ---
    /// Output format.
    #[arg(long, default_value = "json")]
    pub format: OutputFormat,
}

/// Where the change comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Local { diff: DiffInput, head: String },
    GitHub { owner: String, repo: String, pr: u64 },
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Terminal,
    Json,
}

impl OutputFormat {
    /// Render assembled files using the renderer for this format.
    pub fn render(&self, files: &[ChangedFile]) -> String {
        use reviewctx::output::OutputRenderer;
        match self {
            OutputFormat::Terminal => reviewctx::output::terminal::TerminalRenderer.render(files),
            OutputFormat::Json => reviewctx::output::json::JsonRenderer.render(files),
        }
    }
}

impl AssembleArgs {
    /// Validate that exactly one input source is provided.
    pub fn validate_input(&self) -> Result<Input, String> {
        let sources = [
            self.base.is_some(),
            self.diff_file.is_some(),
            self.diff_stdin,
            self.github.is_some(),
        ];
        let count = sources.iter().filter(|&&x| x).count();

        if count == 0 {
            return Err(
                "one input source is required: --base, --diff-file, --diff-stdin, or --github"
                    .to_string(),
            );
        }
        if count > 1 {
            return Err(
                "only one input source allowed: --base, --diff-file, --diff-stdin, or --github"
                    .to_string(),
            );
        }

        if let Some(ref slug) = self.github {
            if self.head.is_some() {
                return Err("--head cannot be combined with --github".to_string());
            }
            let (owner, repo) = slug
                .split_once('/')
                .filter(|(o, r)| !o.is_empty() && !r.is_empty() && !r.contains('/'))
                .ok_or_else(|| format!("--github expects owner/repo, got '{slug}'"))?;
            let pr = self.pr.ok_or("--github requires --pr")?;
            return Ok(Input::GitHub {
                owner: owner.to_string(),
                repo: repo.to_string(),
                pr,
            });
        }

        let head = self.head.clone().unwrap_or_else(|| "HEAD".to_string());
        let diff = if let Some(ref base) = self.base {
            DiffInput::GitRange {
                base: base.clone(),
                head: head.clone(),
            }
        } else if let Some(ref path) = self.diff_file {
            DiffInput::File(path.clone())
        } else {
            DiffInput::Stdin
        };
        Ok(Input::Local { diff, head })
    }

    /// Apply CLI flags over the layered configuration.
    pub fn apply_overrides(&self, ctx: &mut ContextConfig) {
        if let Some(strategy) = self.strategy {
            ctx.strategy = strategy;
        }
        if let Some(fallback) = self.fallback {
            ctx.fallback_strategy = fallback;
        }
        if let Some(v) = self.max_file_size {
            ctx.max_file_size = v;
        }
        if let Some(v) = self.max_chars_per_file {
            ctx.max_chars_per_file = v;
        }
        if let Some(v) = self.max_dependents {
            ctx.max_dependents = v;
        }
        if let Some(v) = self.max_tests {
            ctx.max_tests = v;
        }
        if self.no_relationships {
            ctx.enable_relationships = false;
        }
        if let Some(v) = self.timeout {
            ctx.request_timeout_secs = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> AssembleArgs {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::Assemble(args) => *args,
            _ => panic!("expected Assemble command"),
        }
    }

    #[test]
    fn validate_no_input() {
        let args = parse(&["reviewctx", "assemble"]);
        let result = args.validate_input();
        assert!(result.unwrap_err().contains("one input source is required"));
    }

    #[test]
    fn validate_multiple_inputs() {
        let args = parse(&["reviewctx", "assemble", "--base", "main", "--diff-stdin"]);
        let result = args.validate_input();
        assert!(result.unwrap_err().contains("only one input source allowed"));
    }

    #[test]
    fn validate_base_defaults_head() {
        let args = parse(&["reviewctx", "assemble", "--base", "main"]);
        let input = args.validate_input().unwrap();
        assert_eq!(
            input,
            Input::Local {
                diff: DiffInput::GitRange {
                    base: "main".into(),
                    head: "HEAD".into()
                },
                head: "HEAD".into(),
            }
        );
    }

    #[test]
    fn validate_diff_file_with_head() {
        let args = parse(&["reviewctx", "assemble", "--diff-file", "x.diff", "--head", "abc123"]);
        let input = args.validate_input().unwrap();
        assert!(matches!(
            input,
            Input::Local { diff: DiffInput::File(_), ref head } if head == "abc123"
        ));
    }

    #[test]
    fn validate_github_input() {
        let args = parse(&["reviewctx", "assemble", "--github", "acme/shop", "--pr", "42"]);
        let input = args.validate_input().unwrap();
        assert_eq!(
            input,
            Input::GitHub {
                owner: "acme".into(),
                repo: "shop".into(),
                pr: 42
            }
        );
    }

    #[test]
    fn github_requires_pr() {
        assert!(Cli::try_parse_from(["reviewctx", "assemble", "--github", "acme/shop"]).is_err());
    }

    #[test]
    fn github_slug_is_validated() {
        let args = parse(&["reviewctx", "assemble", "--github", "acme", "--pr", "1"]);
        assert!(args.validate_input().unwrap_err().contains("owner/repo"));
    }

    #[test]
    fn strategy_flags_override_config() {
        let args = parse(&[
            "reviewctx",
            "assemble",
            "--base",
            "main",
            "--strategy",
            "full-files",
            "--fallback",
            "diff_only",
            "--max-dependents",
            "2",
            "--no-relationships",
            "--timeout",
            "3",
        ]);
        let mut ctx = ContextConfig::default();
        args.apply_overrides(&mut ctx);
        assert_eq!(ctx.strategy, ContextStrategy::FullFiles);
        assert_eq!(ctx.fallback_strategy, ContextStrategy::DiffOnly);
        assert_eq!(ctx.max_dependents, 2);
        assert_eq!(ctx.max_tests, 3);
        assert!(!ctx.enable_relationships);
        assert_eq!(ctx.request_timeout_secs, 3);
    }

    #[test]
    fn invalid_strategy_is_rejected() {
        assert!(
            Cli::try_parse_from(["reviewctx", "assemble", "--base", "main", "--strategy", "all"])
                .is_err()
        );
    }

    #[test]
    fn output_format_render_json() {
        let output = OutputFormat::Json.render(&[]);
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert!(parsed.get("files").is_some());
    }

    #[test]
    fn verbose_is_global() {
        let cli = Cli::try_parse_from(["reviewctx", "parse", "a.ts", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
