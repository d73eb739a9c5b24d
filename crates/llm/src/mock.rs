//! Mock LLM Service Implementation
//!
//! Used by `LlmServiceFactory` when provider is `"mock"`, which is also the
//! default when no API key is configured. Replies are deterministic so the
//! chat flow can be exercised offline.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::{CompletionRequest, CompletionResponse, LlmError, LlmService, STOP_REASON_CANCELLED};

const MOCK_MODEL: &str = "mock-model";

/// Mock LLM service for testing
#[derive(Debug, Clone, Default)]
pub struct MockLlmService;

impl MockLlmService {
    /// Create a new mock LLM service
    pub fn new() -> Self {
        Self
    }

    fn reply(request: &CompletionRequest) -> (String, String, i32) {
        let model = if request.model.is_empty() {
            MOCK_MODEL.to_string()
        } else {
            request.model.clone()
        };

        let last = request.messages.last();
        let mut content = format!(
            "Mock response to: {}",
            last.map(|m| m.content.as_str()).unwrap_or("empty")
        );
        if let Some(count) = last.map(|m| m.attachments.len()).filter(|n| *n > 0) {
            content.push_str(&format!(" ({} attachment(s))", count));
        }

        let input_tokens = request
            .messages
            .iter()
            .map(|m| m.content.len() as i32 / 4)
            .sum::<i32>();

        (model, content, input_tokens)
    }
}

#[async_trait::async_trait]
impl LlmService for MockLlmService {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        tracing::info!("Mock LLM service processing completion request");

        let (model, content, input_tokens) = Self::reply(&request);
        let output_tokens = content.len() as i32 / 4;

        Ok(CompletionResponse {
            content,
            model,
            input_tokens,
            output_tokens,
            stop_reason: "stop".to_string(),
        })
    }

    async fn stream(
        &self,
        request: CompletionRequest,
        tx: mpsc::Sender<String>,
        cancel: CancellationToken,
    ) -> Result<CompletionResponse, LlmError> {
        tracing::info!("Mock LLM service processing streaming request");

        let (model, full, input_tokens) = Self::reply(&request);
        let mut content = String::new();
        let mut stop_reason = "stop".to_string();

        for word in full.split_inclusive(' ') {
            if cancel.is_cancelled() {
                stop_reason = STOP_REASON_CANCELLED.to_string();
                break;
            }
            content.push_str(word);
            if tx.send(word.to_string()).await.is_err() {
                stop_reason = STOP_REASON_CANCELLED.to_string();
                break;
            }
        }

        let output_tokens = content.len() as i32 / 4;
        Ok(CompletionResponse {
            content,
            model,
            input_tokens,
            output_tokens,
            stop_reason,
        })
    }

    fn default_model(&self) -> &str {
        MOCK_MODEL
    }
}
