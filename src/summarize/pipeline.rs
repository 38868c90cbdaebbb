//! The chunked summarization pipeline.
//!
//! Each file is summarized independently: its content or diff is split into
//! word-boundary chunks, each chunk gets one completion call, and the
//! previous chunk's summary rides along as continuation context so the
//! model stays coherent across chunks. Per-file summaries are then folded
//! into size-bounded aggregation batches and collapsed by one final
//! completion into the commit message. Every request is token-budgeted
//! before it is sent, and usage is accumulated in [`UsageStats`].

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::config::CompletionConfig;
use crate::error::{CompletionError, ConfigError};
use crate::git::FileOperation;
use crate::llm::{split_text, ChatMessage, ChatRequest, ChatTransport, TokenBudgeter};
use crate::prompt::{developer_persona, PromptTemplate};
use crate::summarize::{ChangePayload, FileChange, UsageStats};

/// Drives the whole pipeline for one run and owns its [`UsageStats`].
///
/// Processing is sequential: a file's chunks are inherently ordered by
/// their continuation context, and files are processed in input order so
/// the aggregate digest is reproducible.
pub struct Summarizer {
    transport: Arc<dyn ChatTransport>,
    budgeter: TokenBudgeter,
    config: CompletionConfig,
    stats: UsageStats,
}

impl Summarizer {
    /// Build a pipeline instance, validating the configuration up front.
    pub fn new(
        transport: Arc<dyn ChatTransport>,
        budgeter: TokenBudgeter,
        config: CompletionConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            transport,
            budgeter,
            config,
            stats: UsageStats::default(),
        })
    }

    /// Usage accumulated so far; read at the end of the run for reporting.
    pub fn stats(&self) -> &UsageStats {
        &self.stats
    }

    /// One budgeted round trip: trim the messages, enforce the token
    /// budget, send, record usage, and return the first choice's trimmed
    /// text.
    async fn complete(
        &mut self,
        system_messages: &[String],
        user_content: &str,
    ) -> Result<String, CompletionError> {
        let mut messages: Vec<ChatMessage> = system_messages
            .iter()
            .map(|msg| ChatMessage::system(msg.trim()))
            .collect();
        messages.push(ChatMessage::user(user_content.trim()));

        let estimated = self.budgeter.ensure_within_budget(
            &self.config.model,
            &messages,
            self.config.max_tokens,
        )?;
        debug!(estimated, "request within token budget");

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            top_p: self.config.top_p,
            stream: self.config.stream,
            n: 1,
        };

        let response = self.transport.complete(&request).await?;
        self.stats.record_request(&response.usage);

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or(CompletionError::EmptyResponse)?;
        Ok(choice.message.content.trim().to_string())
    }

    /// Chunk loop shared by content and diff summarization.
    ///
    /// The previous chunk's summary starts empty and is replaced by each
    /// response; when non-empty it is appended as a second system message.
    /// Any failing chunk aborts the file and discards the partial results.
    async fn summarize_chunks(
        &mut self,
        template: PromptTemplate,
        vars: &[(&str, &str)],
        text: &str,
    ) -> Result<Vec<String>, CompletionError> {
        let mut summaries = Vec::new();
        let mut prev_chunk_summary = String::new();

        for chunk in split_text(text, self.config.max_chunk_size) {
            let mut system_messages = vec![template.render(vars)?];
            if !prev_chunk_summary.is_empty() {
                system_messages.push(
                    PromptTemplate::PrevChunkContext
                        .render(&[("prev_chunk_summary", prev_chunk_summary.as_str())])?,
                );
            }

            let completion = self.complete(&system_messages, &chunk).await?;
            prev_chunk_summary = completion.clone();
            summaries.push(completion);
        }

        Ok(summaries)
    }

    /// Summarize a file from its whole content (added and removed files).
    pub async fn summarize_file(
        &mut self,
        operation: FileOperation,
        file_name: &str,
        content: &str,
    ) -> Result<String, CompletionError> {
        let persona = developer_persona(file_name);
        let basename = file_basename(file_name);
        let vars = [
            ("persona", persona.as_str()),
            ("operation", operation.prompt_label()),
            ("file", basename),
        ];

        let mut parts = vec![format!("{} file `{}`:", operation.text_verb(), file_name)];
        parts.extend(
            self.summarize_chunks(PromptTemplate::SummarizeFile, &vars, content)
                .await?,
        );

        self.stats.record_file();
        Ok(parts.join(" ").trim().to_string())
    }

    /// Summarize a modified file from its staged diff.
    pub async fn summarize_diff(
        &mut self,
        file_name: &str,
        diff: &str,
    ) -> Result<String, CompletionError> {
        let persona = developer_persona(file_name);
        let basename = file_basename(file_name);
        let vars = [("persona", persona.as_str()), ("file", basename)];

        let mut parts = vec![format!("Modified file `{file_name}`:")];
        parts.extend(
            self.summarize_chunks(PromptTemplate::SummarizeDiff, &vars, diff)
                .await?,
        );

        self.stats.record_file();
        Ok(parts.join(" ").trim().to_string())
    }

    /// Fixed sentence for a binary file. No completion calls, but the file
    /// still counts toward the processed total.
    pub fn summarize_binary(&mut self, operation: FileOperation, file_name: &str) -> String {
        self.stats.record_file();
        format!("{} binary file `{}`", operation.binary_verb(), file_name)
    }

    /// Summarize one change according to its payload.
    pub async fn summarize_change(
        &mut self,
        change: &FileChange,
    ) -> Result<String, CompletionError> {
        match &change.payload {
            ChangePayload::Content(content) => {
                self.summarize_file(change.operation, &change.path, content.trim())
                    .await
            }
            ChangePayload::Diff(diff) => self.summarize_diff(&change.path, diff).await,
            ChangePayload::Binary => Ok(self.summarize_binary(change.operation, &change.path)),
        }
    }

    /// Phase one of the reduce: fold per-file summaries into size-bounded
    /// aggregation batches and newline-join the batch results.
    ///
    /// A batch is flushed before appending a summary that would push the
    /// buffer over `max_chunk_size`, so the number of aggregation requests
    /// is bounded by the total summary size, not the file count.
    pub async fn summarize_changes(
        &mut self,
        summaries: &[String],
    ) -> Result<String, CompletionError> {
        let system_message = PromptTemplate::SummarizeChanges.render(&[])?;

        let mut results = Vec::new();
        let mut buffer = String::new();

        for summary in summaries {
            if buffer.len() + summary.len() > self.config.max_chunk_size
                && !buffer.trim().is_empty()
            {
                let batch = self
                    .complete(std::slice::from_ref(&system_message), &buffer)
                    .await?;
                results.push(batch);
                buffer.clear();
            }

            if !buffer.is_empty() {
                buffer.push('\n');
            }
            buffer.push_str(summary);
        }

        if !buffer.trim().is_empty() {
            let batch = self
                .complete(std::slice::from_ref(&system_message), &buffer)
                .await?;
            results.push(batch);
        }

        Ok(results.join("\n").trim().to_string())
    }

    /// Phase two of the reduce: collapse the aggregate digest into the
    /// final commit message.
    pub async fn finalize_commit_message(
        &mut self,
        digest: &str,
    ) -> Result<String, CompletionError> {
        let system_message = PromptTemplate::SummarizeChanges.render(&[])?;
        self.complete(std::slice::from_ref(&system_message), digest)
            .await
    }

    /// Run the whole pipeline over an ordered change set.
    pub async fn commit_message(
        &mut self,
        changes: &[FileChange],
    ) -> Result<String, CompletionError> {
        let mut summaries = Vec::with_capacity(changes.len());
        for change in changes {
            summaries.push(self.summarize_change(change).await?);
        }

        let digest = self.summarize_changes(&summaries).await?;
        self.finalize_commit_message(&digest).await
    }
}

fn file_basename(file_name: &str) -> &str {
    Path::new(file_name)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(file_name)
}
