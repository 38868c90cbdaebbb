//! epitome - a CLI tool that writes commit messages by summarizing staged
//! changes with an LLM.
//!
//! # Overview
//!
//! epitome reads the staged changes in a git working tree, summarizes each
//! file's content or diff through a chat-completion API (chunked to fit the
//! model's context window, carrying continuation context between chunks),
//! folds the per-file summaries into size-bounded aggregation batches, and
//! produces a single commit message plus token-usage statistics.

pub mod config;
pub mod error;
pub mod git;
pub mod llm;
pub mod prompt;
pub mod summarize;

// Re-export commonly used types
pub use config::{ApiConfig, CompletionConfig};
pub use error::{CompletionError, ConfigError, GitError, TemplateError};
pub use git::{FileOperation, GitCli, StagedChanges};
pub use llm::{ChatTransport, OpenAiTransport, TokenBudgeter};
pub use summarize::{ChangePayload, FileChange, Summarizer, UsageStats};
