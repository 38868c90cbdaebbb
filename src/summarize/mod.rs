//! The summarization pipeline: per-file chunked summaries folded into one
//! commit message.

pub mod pipeline;
pub mod stats;

pub use pipeline::Summarizer;
pub use stats::UsageStats;

use crate::git::FileOperation;

/// What the pipeline is given for one file.
#[derive(Debug, Clone)]
pub enum ChangePayload {
    /// Whole file content (added and removed files).
    Content(String),
    /// Staged unified diff text (modified files).
    Diff(String),
    /// No payload; binary files get a fixed sentence and no completion
    /// calls.
    Binary,
}

/// One staged file handed to the pipeline by the git collaborator.
#[derive(Debug, Clone)]
pub struct FileChange {
    pub path: String,
    pub operation: FileOperation,
    pub payload: ChangePayload,
}

impl FileChange {
    pub fn content(path: impl Into<String>, operation: FileOperation, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            operation,
            payload: ChangePayload::Content(content.into()),
        }
    }

    pub fn diff(path: impl Into<String>, diff: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            operation: FileOperation::Modified,
            payload: ChangePayload::Diff(diff.into()),
        }
    }

    pub fn binary(path: impl Into<String>, operation: FileOperation) -> Self {
        Self {
            path: path.into(),
            operation,
            payload: ChangePayload::Binary,
        }
    }
}
