//! Cumulative usage accounting for one pipeline run.

use std::fmt;

use crate::llm::Usage;

/// Counters accumulated across every completion call in a run.
///
/// Owned by the [`Summarizer`](crate::summarize::Summarizer); one instance
/// per run, no reset, read by the caller for the final report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsageStats {
    pub files_processed: usize,
    pub requests: usize,
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
    pub total_tokens: usize,
}

impl UsageStats {
    pub(crate) fn record_request(&mut self, usage: &Usage) {
        self.requests += 1;
        self.prompt_tokens += usage.prompt_tokens;
        self.completion_tokens += usage.completion_tokens;
        self.total_tokens += usage.total_tokens;
    }

    pub(crate) fn record_file(&mut self) {
        self.files_processed += 1;
    }
}

impl fmt::Display for UsageStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Processed {} file(s) in {} request(s): {} prompt + {} completion = {} tokens",
            self.files_processed,
            self.requests,
            self.prompt_tokens,
            self.completion_tokens,
            self.total_tokens
        )
    }
}
