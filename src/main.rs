//! reviewctx: dependency-aware context assembly for code review.
//!
//! Entry point and error handling boundary. Uses `anyhow` for
//! ergonomic error propagation and user-facing messages.

mod cli;

use reviewctx::config;
use reviewctx::constants;
use reviewctx::context::ContextAssembler;
use reviewctx::diff;
use reviewctx::env;
use reviewctx::models::RepositoryRef;
use reviewctx::parser;
use reviewctx::sources::git::GitRepository;
use reviewctx::sources::github::GitHubClient;

use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::args::{AssembleArgs, Cli, Command, Input, ParseArgs};
use config::Config;
use env::Env;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Assemble(args) => run_assemble(*args).await,
        Command::Parse(args) => run_parse(args).await,
        Command::Version => run_version(),
    }
}

/// Install the stderr log subscriber. `RUST_LOG` takes precedence over `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}={level},warn", constants::APP_NAME)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run_version() -> Result<()> {
    use colored::Colorize;

    println!(
        "{} {}",
        constants::APP_NAME.bold(),
        constants::VERSION.green().bold()
    );
    Ok(())
}

/// Print the dependency record of a local source file as JSON.
async fn run_parse(args: ParseArgs) -> Result<()> {
    let path = &args.file;
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;

    let record = parser::parse(&path.to_string_lossy(), &content);
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

async fn run_assemble(args: AssembleArgs) -> Result<()> {
    let input = args.validate_input().map_err(|e| anyhow::anyhow!("{e}"))?;

    // Local inputs read config from the repository; GitHub inputs only from global/env
    let repo_root = match input {
        Input::Local { .. } => {
            let base_dir = std::fs::canonicalize(&args.path)
                .with_context(|| format!("--path directory not found: {}", args.path.display()))?;
            Some(
                diff::git::find_repo_root(&base_dir)
                    .await
                    .context("--path is not inside a git repository")?,
            )
        }
        Input::GitHub { .. } => None,
    };

    let mut config = Config::load(repo_root.as_deref(), &Env::real())
        .context("failed to load configuration")?;
    args.apply_overrides(&mut config.context);
    tracing::debug!(?config, "resolved configuration");

    let (files, repo, assembler) = match input {
        Input::Local { diff, head } => {
            let root = repo_root.context("repository root not resolved")?;
            let files = diff::changed_files(&diff, &root)
                .await
                .context("failed to read changes")?;
            let git = Arc::new(GitRepository::new(root));
            let repo = git
                .repository_ref(&head)
                .await
                .with_context(|| format!("failed to resolve head revision '{head}'"))?;
            let assembler = ContextAssembler::new(git.clone(), git, config.context);
            (files, repo, assembler)
        }
        Input::GitHub { owner, repo, pr } => {
            if config.github.token.is_none() {
                tracing::warn!("no GitHub token configured; code search requires authentication");
            }
            let client = Arc::new(GitHubClient::new(
                config.github.api_url.clone(),
                config.github.token.clone(),
            ));
            let head = client
                .pull_request_head(&owner, &repo, pr)
                .await
                .with_context(|| format!("failed to load pull request {owner}/{repo}#{pr}"))?;
            let files = client
                .pull_request_files(&owner, &repo, pr)
                .await
                .context("failed to list pull request files")?;
            let repo = RepositoryRef::new(owner, repo, head);
            let assembler = ContextAssembler::new(client.clone(), client, config.context);
            (files, repo, assembler)
        }
    };

    if files.is_empty() {
        eprintln!("No changes to assemble.");
        return Ok(());
    }

    let assembled = assembler.assemble(files, &repo).await;
    print!("{}", args.format.render(&assembled));
    Ok(())
}
