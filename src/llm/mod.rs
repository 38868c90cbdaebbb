//! Chunking, token budgeting, and the completion transport.

pub mod budget;
pub mod chunk;
pub mod transport;

pub use budget::{MessageOverhead, TokenBudgeter};
pub use chunk::split_text;
pub use transport::{
    ChatMessage, ChatRequest, ChatResponse, ChatTransport, Choice, ChoiceMessage, OpenAiTransport,
    Role, Usage,
};
