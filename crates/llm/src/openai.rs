//! OpenAI-compatible chat completions implementation
//!
//! Calls `POST {base_url}/v1/chat/completions` with a bearer key. Works with
//! OpenAI itself and with any gateway that speaks the same wire format.

use futures_util::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::sse::{self, SseLine, SseLineBuffer};
use crate::{
    CompletionRequest, CompletionResponse, LlmConfig, LlmError, LlmMessage, LlmRole, LlmService,
    STOP_REASON_CANCELLED,
};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Chat completions request body
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<MessageBody>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream_options: Option<StreamOptions>,
}

#[derive(Debug, Serialize)]
struct StreamOptions {
    include_usage: bool,
}

#[derive(Debug, Serialize)]
struct MessageBody {
    role: &'static str,
    content: MessageContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

/// Chat completions response body
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    model: String,
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: i32,
    completion_tokens: i32,
}

/// One `data:` payload of a streamed completion
#[derive(Debug, Deserialize)]
struct ChatCompletionChunk {
    model: Option<String>,
    #[serde(default)]
    choices: Vec<ChunkChoice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: Delta,
    finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Delta {
    content: Option<String>,
}

/// API error response
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(rename = "type")]
    error_type: Option<String>,
    message: String,
}

/// OpenAI-compatible LLM service implementation
pub struct OpenAiService {
    client: Client,
    config: LlmConfig,
    base_url: String,
}

impl OpenAiService {
    /// Create a new OpenAI-compatible service
    pub fn new(config: LlmConfig) -> Self {
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Self {
            client: Client::new(),
            config,
            base_url,
        }
    }

    fn build_body(&self, request: &CompletionRequest, stream: bool) -> (String, ChatCompletionRequest) {
        let model = if request.model.is_empty() {
            self.config.default_model.clone()
        } else {
            request.model.clone()
        };

        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if let Some(system) = request.system_prompt.as_ref() {
            messages.push(MessageBody {
                role: "system",
                content: MessageContent::Text(system.clone()),
            });
        }
        messages.extend(request.messages.iter().map(message_body));

        let body = ChatCompletionRequest {
            model: model.clone(),
            max_tokens: request.max_tokens.unwrap_or(self.config.max_tokens),
            messages,
            stream,
            stream_options: stream.then_some(StreamOptions {
                include_usage: true,
            }),
        };

        (model, body)
    }

    async fn send(
        &self,
        request: &CompletionRequest,
        stream: bool,
    ) -> Result<(String, reqwest::Response), LlmError> {
        let api_key = request
            .api_key
            .as_deref()
            .or(self.config.api_key.as_deref())
            .filter(|k| !k.is_empty())
            .ok_or(LlmError::MissingApiKey)?;

        let (model, body) = self.build_body(request, stream);
        let url = format!("{}/v1/chat/completions", self.base_url);

        tracing::debug!(
            model = %model,
            max_tokens = %body.max_tokens,
            messages = body.messages.len(),
            stream,
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Request(format!("HTTP request failed: {}", e)))?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimit);
        }

        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());

            if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(&error_body) {
                return Err(LlmError::Response(format!(
                    "Provider error ({}): {}",
                    error_response
                        .error
                        .error_type
                        .unwrap_or_else(|| status.as_u16().to_string()),
                    error_response.error.message
                )));
            }

            return Err(LlmError::Response(format!(
                "Provider returned {}: {}",
                status, error_body
            )));
        }

        Ok((model, response))
    }
}

fn message_body(message: &LlmMessage) -> MessageBody {
    let role = match message.role {
        LlmRole::User => "user",
        LlmRole::Assistant => "assistant",
    };

    if message.attachments.is_empty() {
        return MessageBody {
            role,
            content: MessageContent::Text(message.content.clone()),
        };
    }

    let mut parts = vec![ContentPart::Text {
        text: message.content.clone(),
    }];
    for attachment in &message.attachments {
        if attachment.is_image() {
            parts.push(ContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: format!("data:{};base64,{}", attachment.media_type, attachment.data),
                },
            });
        } else {
            parts.push(ContentPart::Text {
                text: format!("Attached file {}:\n{}", attachment.name, attachment.data),
            });
        }
    }

    MessageBody {
        role,
        content: MessageContent::Parts(parts),
    }
}

/// Rough token estimate for providers that omit usage on streams
fn estimate_tokens(text: &str) -> i32 {
    (text.len() / 4) as i32
}

#[async_trait::async_trait]
impl LlmService for OpenAiService {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let (_, response) = self.send(&request, false).await?;

        let api_response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Response(format!("Failed to parse response: {}", e)))?;

        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::Response("Response contained no choices".to_string()))?;

        let content = choice.message.content.unwrap_or_default();
        let (input_tokens, output_tokens) = match api_response.usage {
            Some(usage) => (usage.prompt_tokens, usage.completion_tokens),
            None => (0, estimate_tokens(&content)),
        };

        Ok(CompletionResponse {
            content,
            model: api_response.model,
            input_tokens,
            output_tokens,
            stop_reason: choice.finish_reason.unwrap_or_else(|| "stop".to_string()),
        })
    }

    async fn stream(
        &self,
        request: CompletionRequest,
        tx: mpsc::Sender<String>,
        cancel: CancellationToken,
    ) -> Result<CompletionResponse, LlmError> {
        let (mut model, response) = self.send(&request, true).await?;

        let mut stream = response.bytes_stream();
        let mut lines = SseLineBuffer::default();
        let mut content = String::new();
        let mut usage: Option<Usage> = None;
        let mut finish_reason: Option<String> = None;
        let mut cancelled = false;

        'read: loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                next = stream.next() => Some(next),
            };

            let Some(next) = next else {
                cancelled = true;
                break;
            };

            let (pending, exhausted) = match next {
                Some(chunk) => {
                    let chunk = chunk
                        .map_err(|e| LlmError::Request(format!("Stream read failed: {}", e)))?;
                    (lines.push(&chunk), false)
                }
                None => (lines.finish().into_iter().collect::<Vec<_>>(), true),
            };

            for line in pending {
                match sse::parse_line(&line) {
                    SseLine::Done => break 'read,
                    SseLine::Ignored => {}
                    SseLine::Data(payload) => {
                        let chunk: ChatCompletionChunk = serde_json::from_str(payload).map_err(|e| {
                            LlmError::Response(format!("Failed to parse stream chunk: {}", e))
                        })?;

                        if let Some(m) = chunk.model {
                            model = m;
                        }
                        if chunk.usage.is_some() {
                            usage = chunk.usage;
                        }
                        for choice in chunk.choices {
                            if choice.finish_reason.is_some() {
                                finish_reason = choice.finish_reason;
                            }
                            let Some(delta) = choice.delta.content.filter(|d| !d.is_empty())
                            else {
                                continue;
                            };
                            content.push_str(&delta);
                            if tx.send(delta).await.is_err() {
                                tracing::debug!("Stream receiver dropped; stopping consumption");
                                cancelled = true;
                                break 'read;
                            }
                        }
                    }
                }
            }

            if exhausted {
                break;
            }
        }

        let (input_tokens, output_tokens) = match usage {
            Some(usage) => (usage.prompt_tokens, usage.completion_tokens),
            None => (0, estimate_tokens(&content)),
        };

        let stop_reason = if cancelled {
            STOP_REASON_CANCELLED.to_string()
        } else {
            finish_reason.unwrap_or_else(|| "stop".to_string())
        };

        Ok(CompletionResponse {
            content,
            model,
            input_tokens,
            output_tokens,
            stop_reason,
        })
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }
}
