//! Conversations domain: per-project AI chat transcripts, streaming replies

pub mod api;
pub mod domain;
pub mod service;
pub mod transcript;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{Attachment, ChatMessage, MessageRole};

// Re-export service types
pub use service::{ChatExchange, ChatService, ChatStreamEvent, LlmOverrides, SendOptions};
pub use transcript::TranscriptCache;

// Re-export API types
pub use api::routes;
pub use api::ConversationsState;
