//! Named prompt templates with strict variable substitution.
//!
//! Rendering is plain `{{variable}}` replacement, no scripting. A
//! placeholder with no supplied value is a configuration error rather than
//! an empty string, so a typo in a template cannot silently degrade the
//! prompt.

use regex_lite::Regex;
use std::sync::OnceLock;

use crate::error::TemplateError;

/// The prompt catalog, embedded as static strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptTemplate {
    /// System message for summarizing one chunk of a file's full content.
    SummarizeFile,
    /// System message for summarizing one chunk of a unified diff.
    SummarizeDiff,
    /// Continuation context carrying the previous chunk's summary.
    PrevChunkContext,
    /// System message for both aggregation batches and the final
    /// commit-message pass.
    SummarizeChanges,
}

const SUMMARIZE_FILE: &str = "\
You are an {{persona}} reviewing a commit. The user message contains a \
portion of the contents of the file `{{file}}`, which was {{operation}} in \
this commit. Describe what this portion of the file does in one or two \
short sentences. Mention notable functions, types, or configuration by \
name, but do not quote code and do not speculate about parts of the file \
you have not seen.";

const SUMMARIZE_DIFF: &str = "\
You are an {{persona}} reviewing a commit. The user message contains a \
portion of a unified diff for the file `{{file}}`. Summarize the intent of \
the change in one or two short sentences. Describe what changed and why it \
matters, not hunk headers or line numbers, and do not quote the diff.";

const PREV_CHUNK_CONTEXT: &str = "\
An earlier portion of the same input was summarized as:
{{prev_chunk_summary}}
Treat that summary as established context and keep your new summary \
consistent with it.";

const SUMMARIZE_CHANGES: &str = "\
You are an expert software engineer writing a commit message. The user \
message lists summaries of the changes in a single commit, one per line. \
Combine them into a concise commit message: a short imperative subject \
line, then a blank line, then an optional body listing the notable \
changes. Respond with the commit message text only.";

impl PromptTemplate {
    pub fn name(&self) -> &'static str {
        match self {
            PromptTemplate::SummarizeFile => "summarize-file",
            PromptTemplate::SummarizeDiff => "summarize-diff",
            PromptTemplate::PrevChunkContext => "prev-chunk-context",
            PromptTemplate::SummarizeChanges => "summarize-changes",
        }
    }

    pub fn source(&self) -> &'static str {
        match self {
            PromptTemplate::SummarizeFile => SUMMARIZE_FILE,
            PromptTemplate::SummarizeDiff => SUMMARIZE_DIFF,
            PromptTemplate::PrevChunkContext => PREV_CHUNK_CONTEXT,
            PromptTemplate::SummarizeChanges => SUMMARIZE_CHANGES,
        }
    }

    /// Render the template, substituting every `{{variable}}` from `vars`.
    ///
    /// Unused entries in `vars` are ignored; a placeholder missing from
    /// `vars` is a [`TemplateError::MissingVariable`]. The result is
    /// trimmed.
    pub fn render(&self, vars: &[(&str, &str)]) -> Result<String, TemplateError> {
        let mut rendered = String::with_capacity(self.source().len());
        let mut last = 0;

        for capture in placeholder_regex().captures_iter(self.source()) {
            let whole = capture.get(0).expect("capture 0 always present");
            let variable = &capture[1];
            let value = vars
                .iter()
                .find(|(key, _)| *key == variable)
                .map(|(_, value)| *value)
                .ok_or_else(|| TemplateError::MissingVariable {
                    template: self.name().to_string(),
                    variable: variable.to_string(),
                })?;
            rendered.push_str(&self.source()[last..whole.start()]);
            rendered.push_str(value);
            last = whole.end();
        }
        rendered.push_str(&self.source()[last..]);

        Ok(rendered.trim().to_string())
    }
}

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\{\{([a-z_]+)\}\}").expect("placeholder pattern is valid")
    })
}
