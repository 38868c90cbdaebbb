//! epitome - CLI entry point.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use epitome::config::{ApiConfig, CompletionConfig};
use epitome::error::GitError;
use epitome::git::{hook, is_binary_file, parse_status, FileOperation, GitCli};
use epitome::llm::{OpenAiTransport, TokenBudgeter};
use epitome::summarize::{FileChange, Summarizer};

/// Write commit messages by summarizing staged changes with an LLM.
#[derive(Parser, Debug)]
#[command(name = "epitome")]
#[command(about = "Write commit messages by summarizing staged changes with an LLM")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a commit message from the staged changes
    Commit(CommitArgs),
    /// Manage the prepare-commit-msg hook
    Hook {
        #[command(subcommand)]
        action: HookAction,
    },
}

#[derive(clap::Args, Debug)]
struct CommitArgs {
    /// Model identifier for the completion API
    #[arg(long, default_value = "gpt-3.5-turbo")]
    model: String,

    /// Maximum tokens the model may generate per request
    #[arg(long, default_value_t = 500)]
    max_tokens: usize,

    /// Sampling temperature (0.0 to 2.0)
    #[arg(long, default_value_t = 0.4)]
    temperature: f32,

    /// Nucleus sampling cutoff (0.0 exclusive to 1.0 inclusive)
    #[arg(long, default_value_t = 1.0)]
    top_p: f32,

    /// Maximum characters per text chunk and aggregation batch
    #[arg(long, default_value_t = 4000)]
    chunk_size: usize,

    /// Request a streamed response from the backend
    #[arg(long)]
    stream: bool,

    /// Additional pathspec patterns to exclude from diffs
    #[arg(long = "exclude")]
    excludes: Vec<String>,

    /// Context lines per diff hunk
    #[arg(long)]
    unified: Option<u32>,

    /// Write the message without creating the commit
    #[arg(long)]
    preview: bool,

    /// Output path for the message (defaults to <git-dir>/COMMIT_EDITMSG)
    #[arg(long)]
    file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum HookAction {
    /// Install the prepare-commit-msg hook
    Install,
    /// Remove the prepare-commit-msg hook
    Uninstall,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    GitCli::ensure_installed()?;

    match cli.command {
        Commands::Commit(args) => run_commit(args).await,
        Commands::Hook { action } => run_hook(action).await,
    }
}

async fn run_hook(action: HookAction) -> Result<()> {
    let git = GitCli::default();
    match action {
        HookAction::Install => {
            hook::install(&git).await.context("Failed to install hook")?;
            println!("Installed prepare-commit-msg hook");
        }
        HookAction::Uninstall => {
            hook::uninstall(&git)
                .await
                .context("Failed to uninstall hook")?;
            println!("Removed prepare-commit-msg hook");
        }
    }
    Ok(())
}

async fn run_commit(args: CommitArgs) -> Result<()> {
    let config = CompletionConfig {
        model: args.model.clone(),
        max_tokens: args.max_tokens,
        temperature: args.temperature,
        top_p: args.top_p,
        stream: args.stream,
        max_chunk_size: args.chunk_size,
    };

    let api = ApiConfig::from_env()?;
    let transport = OpenAiTransport::new(api).context("Failed to build HTTP transport")?;

    let git = GitCli::new(args.excludes.clone(), args.unified);

    // Run with repo-relative paths regardless of the invocation directory.
    let root = git.repo_root().await?;
    std::env::set_current_dir(&root)
        .with_context(|| format!("Failed to enter repository root {}", root.display()))?;

    // Fails with NoStagedChanges before any request is made.
    git.staged_file_names().await?;

    let status = git.status().await?;
    let changes = collect_changes(&git, &status).await?;

    println!("Summarizing {} staged file(s)...", changes.len());

    let mut summarizer = Summarizer::new(Arc::new(transport), TokenBudgeter::new(), config)?;
    let message = summarizer.commit_message(&changes).await?;

    println!("================ Commit message ================");
    println!("{message}");
    println!("================================================");
    println!("{}", summarizer.stats());

    let output_file = match args.file {
        Some(path) => path,
        None => git.git_dir().await?.join("COMMIT_EDITMSG"),
    };
    std::fs::write(&output_file, &message)
        .with_context(|| format!("Failed to write {}", output_file.display()))?;
    println!("Wrote commit message to {}", output_file.display());

    if args.preview {
        return Ok(());
    }

    let output = git.commit(&message).await?;
    println!("{}", output.trim_end());

    Ok(())
}

/// Build the pipeline's input from the parsed status, in the deterministic
/// added/removed/modified order.
async fn collect_changes(git: &GitCli, status: &str) -> Result<Vec<FileChange>> {
    let staged = parse_status(status);
    let mut changes = Vec::with_capacity(staged.len());

    for file in staged.added.iter().map(String::as_str) {
        if is_binary_file(file) {
            changes.push(FileChange::binary(file, FileOperation::Added));
            continue;
        }
        let content = std::fs::read_to_string(file).map_err(|source| GitError::ReadFile {
            path: file.to_string(),
            source,
        })?;
        changes.push(FileChange::content(file, FileOperation::Added, content));
    }

    for file in staged.removed.iter().map(String::as_str) {
        if is_binary_file(file) {
            changes.push(FileChange::binary(file, FileOperation::Removed));
            continue;
        }
        let content = git.show_deleted_file(file).await?;
        changes.push(FileChange::content(file, FileOperation::Removed, content));
    }

    for file in staged.modified.iter().map(String::as_str) {
        if is_binary_file(file) {
            changes.push(FileChange::binary(file, FileOperation::Modified));
            continue;
        }
        let diff = git.diff_file(file).await?;
        changes.push(FileChange::diff(file, diff));
    }

    Ok(changes)
}
