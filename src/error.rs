//! Error types for epitome modules using thiserror.

use thiserror::Error;

/// Errors from git operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("git executable not found in PATH. Install git and try again")]
    GitNotInstalled,

    #[error("Not a git repository (or any parent up to filesystem root)")]
    NotARepository,

    #[error("No staged changes found. Stage your changes with: git add <files...>")]
    NoStagedChanges,

    #[error("Failed to spawn git: {0}")]
    SpawnFailed(#[source] std::io::Error),

    #[error("git {command} exited with {code}: {stderr}")]
    CommandFailed {
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("git produced non-UTF-8 output for {command}")]
    InvalidOutput { command: String },

    #[error("Failed to read file '{path}': {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Hook file {0} already exists")]
    HookExists(String),

    #[error("Hook file {0} does not exist")]
    HookMissing(String),

    #[error("Failed to write hook: {0}")]
    HookWriteFailed(#[source] std::io::Error),

    #[error("Failed to remove hook: {0}")]
    HookRemoveFailed(#[source] std::io::Error),
}

/// Errors from configuration validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Model identifier must not be empty")]
    EmptyModel,

    #[error("temperature must be between 0.0 and 2.0 (got {0})")]
    TemperatureOutOfRange(f32),

    #[error("top_p must be greater than 0.0 and at most 1.0 (got {0})")]
    TopPOutOfRange(f32),

    #[error("max_tokens must be greater than zero")]
    ZeroMaxTokens,

    #[error("max_chunk_size must be greater than zero")]
    ZeroChunkSize,

    #[error(
        "No API key configured. Set EPITOME_OPENAI_API_KEY or OPENAI_API_KEY in the environment"
    )]
    MissingApiKey,
}

/// Errors from prompt template rendering.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template '{template}' has no value for variable '{variable}'")]
    MissingVariable { template: String, variable: String },
}

/// Errors from the completion pipeline (budgeting, prompting, transport).
#[derive(Error, Debug)]
pub enum CompletionError {
    #[error(
        "Request of ~{estimated} tokens exceeds the budget for model '{model}' \
         (context window {limit}, {reserved} reserved for the completion)"
    )]
    TooManyTokens {
        model: String,
        estimated: usize,
        limit: usize,
        reserved: usize,
    },

    #[error("No token counting rules for model '{0}'")]
    UnsupportedModel(String),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("Completion request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Completion API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Completion response contained no choices")]
    EmptyResponse,
}
