//! Git collaborator: subprocess wrapper, status parsing, and classifiers.

pub mod binary;
pub mod cli;
pub mod hook;
pub mod status;

use std::fmt;

pub use binary::is_binary_file;
pub use cli::GitCli;
pub use status::{parse_status, StagedChanges};

/// Kind of staged change for one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOperation {
    Added,
    Removed,
    Modified,
}

impl FileOperation {
    /// Verb prefixing a text file's summary ("Added file `X`:").
    pub fn text_verb(&self) -> &'static str {
        match self {
            FileOperation::Added => "Added",
            FileOperation::Removed => "Removed",
            FileOperation::Modified => "Modified",
        }
    }

    /// Verb for the fixed binary-file sentence. Modified binaries read
    /// "Replaced" because no diff is ever shown for them.
    pub fn binary_verb(&self) -> &'static str {
        match self {
            FileOperation::Added => "Added",
            FileOperation::Removed => "Removed",
            FileOperation::Modified => "Replaced",
        }
    }

    /// Past-tense form substituted into prompt templates.
    pub fn prompt_label(&self) -> &'static str {
        match self {
            FileOperation::Added => "added",
            FileOperation::Removed => "removed",
            FileOperation::Modified => "modified",
        }
    }
}

impl fmt::Display for FileOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text_verb())
    }
}
