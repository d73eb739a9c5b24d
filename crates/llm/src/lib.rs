//! LLM service: OpenAI-compatible chat completion integration
//!
//! `LlmService` is the seam between the chat domain and a model provider.
//! Two providers exist: `openai` (any OpenAI-compatible chat-completions
//! endpoint) and `mock` (deterministic, offline). Requests are sent once;
//! there is no retry, backoff or timeout.

pub mod mock;
pub mod openai;
mod sse;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

pub use mock::MockLlmService;
pub use openai::OpenAiService;

/// Stop reason reported when the caller cancelled a stream
pub const STOP_REASON_CANCELLED: &str = "cancelled";

/// Default model when neither config nor request names one
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default completion budget
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("LLM configuration error: {0}")]
    Configuration(String),

    #[error("No API key configured for the LLM provider")]
    MissingApiKey,

    #[error("LLM request failed: {0}")]
    Request(String),

    #[error("LLM response error: {0}")]
    Response(String),

    #[error("LLM rate limit exceeded")]
    RateLimit,
}

impl From<LlmError> for shipwright_common::Error {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Configuration(_) | LlmError::MissingApiKey => {
                shipwright_common::Error::Validation(err.to_string())
            }
            LlmError::RateLimit => shipwright_common::Error::RateLimit(err.to_string()),
            LlmError::Request(_) | LlmError::Response(_) => {
                shipwright_common::Error::Upstream(err.to_string())
            }
        }
    }
}

/// Message author as seen by the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmRole {
    User,
    Assistant,
}

/// A file or image sent alongside a user message.
///
/// Images carry base64 data; everything else carries text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmAttachment {
    pub name: String,
    pub media_type: String,
    pub data: String,
}

impl LlmAttachment {
    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmMessage {
    pub role: LlmRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<LlmAttachment>,
}

impl LlmMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: LlmRole::User,
            content: content.into(),
            attachments: Vec::new(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: LlmRole::Assistant,
            content: content.into(),
            attachments: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CompletionRequest {
    /// Model id; empty means the provider default
    pub model: String,
    pub system_prompt: Option<String>,
    pub messages: Vec<LlmMessage>,
    pub max_tokens: Option<u32>,
    /// Overrides the configured API key for this call
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub content: String,
    pub model: String,
    pub input_tokens: i32,
    pub output_tokens: i32,
    pub stop_reason: String,
}

impl CompletionResponse {
    pub fn was_cancelled(&self) -> bool {
        self.stop_reason == STOP_REASON_CANCELLED
    }
}

/// Chat completion provider
#[async_trait::async_trait]
pub trait LlmService: Send + Sync {
    /// Send the conversation and wait for the full reply
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;

    /// Send the conversation and forward content deltas through `tx`.
    ///
    /// Consumption stops when `cancel` fires or the receiver is dropped; the
    /// partial reply is then returned with `stop_reason = "cancelled"`.
    async fn stream(
        &self,
        request: CompletionRequest,
        tx: mpsc::Sender<String>,
        cancel: CancellationToken,
    ) -> Result<CompletionResponse, LlmError>;

    fn default_model(&self) -> &str;
}

/// LLM provider configuration
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Provider name (openai, mock)
    pub provider: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub default_model: String,
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "mock".to_string(),
            api_key: None,
            base_url: None,
            default_model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl LlmConfig {
    /// Create LLM config from environment variables
    pub fn from_env() -> Result<Self, LlmError> {
        dotenvy::dotenv().ok();

        let api_key = std::env::var("LLM_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());

        let provider = std::env::var("LLM_PROVIDER").unwrap_or_else(|_| {
            if api_key.is_some() {
                "openai".to_string()
            } else {
                "mock".to_string()
            }
        });

        let base_url = std::env::var("LLM_BASE_URL").ok();
        let default_model =
            std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let max_tokens = match std::env::var("LLM_MAX_TOKENS") {
            Ok(raw) => raw.parse().map_err(|_| {
                LlmError::Configuration(format!("LLM_MAX_TOKENS must be a number, got '{}'", raw))
            })?,
            Err(_) => DEFAULT_MAX_TOKENS,
        };

        Ok(Self {
            provider,
            api_key,
            base_url,
            default_model,
            max_tokens,
        })
    }
}

/// LLM service factory
pub struct LlmServiceFactory;

impl LlmServiceFactory {
    /// Create an LLM service based on configuration
    pub fn create(config: LlmConfig) -> Result<Box<dyn LlmService>, LlmError> {
        match config.provider.as_str() {
            "openai" => {
                tracing::info!(model = %config.default_model, "Creating OpenAI-compatible LLM service");
                Ok(Box::new(OpenAiService::new(config)))
            }
            "mock" => {
                tracing::info!("Creating mock LLM service");
                Ok(Box::new(MockLlmService::new()))
            }
            provider => Err(LlmError::Configuration(format!(
                "Unknown LLM provider: {}. Supported providers: openai, mock",
                provider
            ))),
        }
    }
}
