//! Token estimation and context-window budget enforcement.
//!
//! Estimates follow the OpenAI cookbook accounting: a per-message overhead
//! that varies by model family, a per-name adjustment when a message carries
//! a `name` field, and a fixed reply-priming overhead per request. The
//! estimate must stay under the model's context window minus the tokens
//! reserved for the completion, checked before any request leaves the
//! process.

use std::collections::HashMap;

use tiktoken_rs::get_bpe_from_model;
use tracing::warn;

use crate::error::CompletionError;
use crate::llm::transport::ChatMessage;

/// Every reply is primed with `<|start|>assistant<|message|>`.
const REPLY_PRIMING_TOKENS: i64 = 3;

/// Context window sizes for the models this tool knows how to budget for.
const DEFAULT_CONTEXT_WINDOWS: &[(&str, usize)] = &[
    ("gpt-4-32k-0613", 32_768),
    ("gpt-4-32k-0314", 32_768),
    ("gpt-4-32k", 32_768),
    ("gpt-4-0613", 8_192),
    ("gpt-4-0314", 8_192),
    ("gpt-4", 8_192),
    ("gpt-3.5-turbo-0613", 4_096),
    ("gpt-3.5-turbo-0301", 4_096),
    ("gpt-3.5-turbo-16k", 16_384),
    ("gpt-3.5-turbo-16k-0613", 16_384),
    ("gpt-3.5-turbo", 4_096),
    ("gpt-3.5-turbo-instruct", 4_096),
];

/// Per-message token overhead for one model family.
///
/// `per_name` may be negative: on gpt-3.5-turbo-0301 the role is omitted
/// when a name is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageOverhead {
    pub per_message: i64,
    pub per_name: i64,
}

const SNAPSHOT_OVERHEAD: MessageOverhead = MessageOverhead {
    per_message: 3,
    per_name: 1,
};

const TURBO_0301_OVERHEAD: MessageOverhead = MessageOverhead {
    per_message: 4,
    per_name: -1,
};

/// Models with exact per-message accounting rules, mapped to the snapshot
/// whose rules (and tokenizer) apply.
const EXACT_RULES: &[(&str, MessageOverhead)] = &[
    ("gpt-3.5-turbo-0613", SNAPSHOT_OVERHEAD),
    ("gpt-3.5-turbo-16k-0613", SNAPSHOT_OVERHEAD),
    ("gpt-4-0314", SNAPSHOT_OVERHEAD),
    ("gpt-4-32k-0314", SNAPSHOT_OVERHEAD),
    ("gpt-4-0613", SNAPSHOT_OVERHEAD),
    ("gpt-4-32k-0613", SNAPSHOT_OVERHEAD),
    ("gpt-3.5-turbo-0301", TURBO_0301_OVERHEAD),
];

/// Estimates request sizes and enforces the context-window budget.
///
/// Both tables are fixed at construction; one budgeter serves a whole
/// pipeline run.
#[derive(Debug, Clone)]
pub struct TokenBudgeter {
    context_windows: HashMap<String, usize>,
    overheads: HashMap<String, MessageOverhead>,
}

impl Default for TokenBudgeter {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenBudgeter {
    pub fn new() -> Self {
        let context_windows = DEFAULT_CONTEXT_WINDOWS
            .iter()
            .map(|(model, limit)| (model.to_string(), *limit))
            .collect();
        let overheads = EXACT_RULES
            .iter()
            .map(|(model, overhead)| (model.to_string(), *overhead))
            .collect();
        Self {
            context_windows,
            overheads,
        }
    }

    /// Build a budgeter with custom tables, e.g. for a compatible endpoint
    /// serving models the default tables do not know.
    pub fn from_tables(
        context_windows: HashMap<String, usize>,
        overheads: HashMap<String, MessageOverhead>,
    ) -> Self {
        Self {
            context_windows,
            overheads,
        }
    }

    /// Resolve a model id to the snapshot carrying its accounting rules.
    ///
    /// Unlisted variants fall back by name prefix with a warning; model
    /// families with no rules at all are an error.
    fn resolve_rules(&self, model: &str) -> Result<(String, MessageOverhead), CompletionError> {
        if let Some(overhead) = self.overheads.get(model) {
            return Ok((model.to_string(), *overhead));
        }
        if model.contains("gpt-3.5-turbo") {
            warn!(model, "unlisted gpt-3.5-turbo variant, assuming gpt-3.5-turbo-0613 rules");
            return self.resolve_rules("gpt-3.5-turbo-0613");
        }
        if model.contains("gpt-4") {
            warn!(model, "unlisted gpt-4 variant, assuming gpt-4-0613 rules");
            return self.resolve_rules("gpt-4-0613");
        }
        Err(CompletionError::UnsupportedModel(model.to_string()))
    }

    /// Context window for `model`, falling back to its rules snapshot for
    /// unlisted variants.
    pub fn context_window(&self, model: &str) -> Result<usize, CompletionError> {
        if let Some(limit) = self.context_windows.get(model) {
            return Ok(*limit);
        }
        let (snapshot, _) = self.resolve_rules(model)?;
        self.context_windows
            .get(&snapshot)
            .copied()
            .ok_or_else(|| CompletionError::UnsupportedModel(model.to_string()))
    }

    /// Estimate the prompt token count of `messages` for `model`.
    ///
    /// Deterministic for a fixed model and message set, and non-decreasing
    /// as message content grows.
    pub fn estimate(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<usize, CompletionError> {
        let (snapshot, overhead) = self.resolve_rules(model)?;
        let bpe = get_bpe_from_model(&snapshot)
            .map_err(|_| CompletionError::UnsupportedModel(model.to_string()))?;

        let mut tokens: i64 = 0;
        for message in messages {
            tokens += overhead.per_message;
            tokens += bpe.encode_with_special_tokens(&message.content).len() as i64;
            tokens += bpe.encode_with_special_tokens(message.role.as_str()).len() as i64;
            if let Some(name) = &message.name {
                tokens += bpe.encode_with_special_tokens(name).len() as i64;
                tokens += overhead.per_name;
            }
        }
        tokens += REPLY_PRIMING_TOKENS;

        Ok(tokens.max(0) as usize)
    }

    /// Fail with [`CompletionError::TooManyTokens`] when `messages` would not
    /// leave `reserved` completion tokens inside the model's context window.
    ///
    /// Returns the estimate so callers can log it.
    pub fn ensure_within_budget(
        &self,
        model: &str,
        messages: &[ChatMessage],
        reserved: usize,
    ) -> Result<usize, CompletionError> {
        let estimated = self.estimate(model, messages)?;
        let limit = self.context_window(model)?;
        if estimated > limit.saturating_sub(reserved) {
            return Err(CompletionError::TooManyTokens {
                model: model.to_string(),
                estimated,
                limit,
                reserved,
            });
        }
        Ok(estimated)
    }
}
