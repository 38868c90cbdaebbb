//! Shared test utilities for integration tests.
//!
//! Not all items are used by every test file.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use epitome::error::CompletionError;
use epitome::llm::{ChatRequest, ChatResponse, ChatTransport, Choice, ChoiceMessage, Usage};

/// Fixed usage attached to every scripted response.
pub const PROMPT_TOKENS_PER_CALL: usize = 10;
pub const COMPLETION_TOKENS_PER_CALL: usize = 5;

/// In-memory transport that replays scripted replies and records every
/// request for inspection.
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<String>>,
    calls: Mutex<Vec<ChatRequest>>,
}

impl ScriptedTransport {
    pub fn new<S: Into<String>>(replies: impl IntoIterator<Item = S>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A transport that answers every call with "reply <n>".
    pub fn unscripted() -> Self {
        Self::new(Vec::<String>::new())
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Snapshot of every request received so far, in call order.
    pub fn calls(&self) -> Vec<ChatRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, CompletionError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(request.clone());
        let call_number = calls.len();
        drop(calls);

        let content = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| format!("reply {call_number}"));

        Ok(ChatResponse {
            choices: vec![Choice {
                message: ChoiceMessage { content },
            }],
            usage: Usage {
                prompt_tokens: PROMPT_TOKENS_PER_CALL,
                completion_tokens: COMPLETION_TOKENS_PER_CALL,
                total_tokens: PROMPT_TOKENS_PER_CALL + COMPLETION_TOKENS_PER_CALL,
            },
        })
    }
}

/// Transport that counts calls and fails each one, for verifying both error
/// propagation and that budget rejections never reach the network.
pub struct FailingTransport {
    calls: Mutex<usize>,
}

impl FailingTransport {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl ChatTransport for FailingTransport {
    async fn complete(&self, _request: &ChatRequest) -> Result<ChatResponse, CompletionError> {
        *self.calls.lock().unwrap() += 1;
        Err(CompletionError::Api {
            status: 500,
            message: "scripted failure".to_string(),
        })
    }
}

/// All system-message contents of a recorded request.
pub fn system_contents(request: &ChatRequest) -> Vec<String> {
    request
        .messages
        .iter()
        .filter(|msg| msg.role == epitome::llm::Role::System)
        .map(|msg| msg.content.clone())
        .collect()
}

/// The single user-message content of a recorded request.
pub fn user_content(request: &ChatRequest) -> String {
    request
        .messages
        .iter()
        .find(|msg| msg.role == epitome::llm::Role::User)
        .map(|msg| msg.content.clone())
        .expect("request has a user message")
}
