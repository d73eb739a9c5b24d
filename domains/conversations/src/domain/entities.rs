//! Domain entities for Conversations domain
//!
//! Chat messages live only in memory, in the per-project transcript cache.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shipwright_llm::{LlmAttachment, LlmMessage, LlmRole};
use uuid::Uuid;

use shipwright_common::{Error, Result};

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl From<MessageRole> for LlmRole {
    fn from(role: MessageRole) -> Self {
        match role {
            MessageRole::User => LlmRole::User,
            MessageRole::Assistant => LlmRole::Assistant,
        }
    }
}

/// File or image attached to a user message.
///
/// `data` is base64 for images and plain text otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub media_type: String,
    pub data: String,
}

impl From<Attachment> for LlmAttachment {
    fn from(a: Attachment) -> Self {
        LlmAttachment {
            name: a.name,
            media_type: a.media_type,
            data: a.data,
        }
    }
}

/// Chat message entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: MessageRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    pub model: Option<String>,
    pub input_tokens: Option<i32>,
    pub output_tokens: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a user message; it needs text or at least one attachment
    pub fn new_user(content: String, attachments: Vec<Attachment>) -> Result<Self> {
        if content.trim().is_empty() && attachments.is_empty() {
            return Err(Error::Validation(
                "Message must have content or attachments".to_string(),
            ));
        }

        Ok(ChatMessage {
            id: Uuid::new_v4(),
            role: MessageRole::User,
            content,
            attachments,
            model: None,
            input_tokens: None,
            output_tokens: None,
            created_at: Utc::now(),
        })
    }

    /// Create an assistant message from a completed reply
    pub fn new_assistant(
        content: String,
        model: String,
        input_tokens: i32,
        output_tokens: i32,
    ) -> Self {
        ChatMessage {
            id: Uuid::new_v4(),
            role: MessageRole::Assistant,
            content,
            attachments: Vec::new(),
            model: Some(model),
            input_tokens: Some(input_tokens),
            output_tokens: Some(output_tokens),
            created_at: Utc::now(),
        }
    }

    /// Convert to the provider-facing message shape
    pub fn to_llm(&self) -> LlmMessage {
        LlmMessage {
            role: self.role.into(),
            content: self.content.clone(),
            attachments: self.attachments.iter().cloned().map(Into::into).collect(),
        }
    }
}
