//! Chat service: builds provider requests from the project transcript and
//! records successful exchanges.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shipwright_common::Result;
use shipwright_llm::{CompletionRequest, CompletionResponse, LlmService};
use shipwright_projects::SettingsRepository;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::domain::entities::{Attachment, ChatMessage};
use crate::transcript::TranscriptCache;

/// Settings key overriding the configured model
pub const MODEL_SETTING: &str = "llm.model";

/// Settings key overriding the configured API key
pub const API_KEY_SETTING: &str = "llm.api_key";

/// Buffered deltas between the provider and the caller
const DELTA_BUFFER: usize = 64;

/// System prompt used when the caller does not supply one
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an expert software engineer working inside a \
browser-based IDE. Generate complete, working code for what the user asks for. When you create \
or change a file, reply with the full file content in a fenced code block preceded by its path. \
Prefer modern, accessible, secure defaults and keep explanations short.";

/// Inputs of one chat turn
#[derive(Debug, Clone, Default)]
pub struct SendOptions {
    pub message: String,
    /// Project files or other context appended to the system prompt
    pub context: Option<String>,
    pub system_prompt: Option<String>,
    pub attachments: Vec<Attachment>,
    pub model: Option<String>,
    pub api_key: Option<String>,
}

/// A recorded user message and the reply to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatExchange {
    pub user_message: ChatMessage,
    pub assistant_message: ChatMessage,
}

/// Events emitted while a reply streams
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatStreamEvent {
    Delta {
        content: String,
    },
    Done {
        user_message: ChatMessage,
        assistant_message: ChatMessage,
    },
    Error {
        message: String,
    },
}

impl ChatStreamEvent {
    /// SSE event name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Delta { .. } => "delta",
            Self::Done { .. } => "done",
            Self::Error { .. } => "error",
        }
    }
}

/// Runtime AI client overrides as shown to clients
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LlmOverrides {
    pub model: Option<String>,
    pub default_model: String,
    pub api_key_configured: bool,
}

/// Compose the system prompt for one turn
pub fn build_system_prompt(system_prompt: Option<&str>, context: Option<&str>) -> String {
    let mut prompt = system_prompt
        .filter(|p| !p.trim().is_empty())
        .unwrap_or(DEFAULT_SYSTEM_PROMPT)
        .to_string();

    if let Some(context) = context.filter(|c| !c.trim().is_empty()) {
        prompt.push_str("\n\nProject context:\n");
        prompt.push_str(context);
    }
    prompt
}

pub struct ChatService {
    llm: Arc<dyn LlmService>,
    settings: SettingsRepository,
    transcripts: TranscriptCache,
}

impl ChatService {
    pub fn new(
        llm: Arc<dyn LlmService>,
        settings: SettingsRepository,
        cache_capacity: usize,
        max_messages: usize,
    ) -> Result<Self> {
        Ok(Self {
            llm,
            settings,
            transcripts: TranscriptCache::new(cache_capacity, max_messages)?,
        })
    }

    /// Send a message and wait for the whole reply
    pub async fn send(&self, project_id: Uuid, options: SendOptions) -> Result<ChatExchange> {
        let (user_message, request) = self.prepare(project_id, options).await?;

        let response = self.llm.complete(request).await?;

        Ok(self.record(project_id, user_message, response))
    }

    /// Send a message and forward the reply as it arrives.
    ///
    /// Emits `Delta` events, then `Done`. A cancelled stream is returned to
    /// the caller but not recorded in the transcript.
    pub async fn stream(
        &self,
        project_id: Uuid,
        options: SendOptions,
        tx: mpsc::Sender<ChatStreamEvent>,
        cancel: CancellationToken,
    ) -> Result<ChatExchange> {
        let (user_message, request) = self.prepare(project_id, options).await?;

        let (delta_tx, delta_rx) = mpsc::channel(DELTA_BUFFER);
        let forward = async {
            let mut delta_rx = delta_rx;
            while let Some(content) = delta_rx.recv().await {
                if tx.send(ChatStreamEvent::Delta { content }).await.is_err() {
                    break;
                }
            }
        };

        let (response, ()) = tokio::join!(self.llm.stream(request, delta_tx, cancel), forward);
        let response = response?;

        if response.was_cancelled() {
            tracing::info!(%project_id, "Chat stream cancelled");
            let assistant_message = ChatMessage::new_assistant(
                response.content,
                response.model,
                response.input_tokens,
                response.output_tokens,
            );
            return Ok(ChatExchange {
                user_message,
                assistant_message,
            });
        }

        let exchange = self.record(project_id, user_message, response);
        // the receiver may already be gone; the exchange is recorded either way
        let _ = tx
            .send(ChatStreamEvent::Done {
                user_message: exchange.user_message.clone(),
                assistant_message: exchange.assistant_message.clone(),
            })
            .await;

        Ok(exchange)
    }

    /// A project's transcript, oldest first
    pub fn transcript(&self, project_id: Uuid) -> Vec<ChatMessage> {
        self.transcripts.history(project_id)
    }

    /// Forget a project's transcript
    pub fn clear(&self, project_id: Uuid) -> bool {
        self.transcripts.clear(project_id)
    }

    /// Current runtime overrides
    pub async fn overrides(&self) -> Result<LlmOverrides> {
        Ok(LlmOverrides {
            model: self.settings.get(MODEL_SETTING).await?,
            default_model: self.llm.default_model().to_string(),
            api_key_configured: self.settings.get(API_KEY_SETTING).await?.is_some(),
        })
    }

    /// Store overrides; `None` leaves a value untouched
    pub async fn set_overrides(
        &self,
        model: Option<&str>,
        api_key: Option<&str>,
    ) -> Result<LlmOverrides> {
        if let Some(model) = model {
            self.settings.put(MODEL_SETTING, model).await?;
        }
        if let Some(api_key) = api_key {
            self.settings.put(API_KEY_SETTING, api_key).await?;
        }
        self.overrides().await
    }

    /// Remove all overrides
    pub async fn clear_overrides(&self) -> Result<()> {
        self.settings.delete(MODEL_SETTING).await?;
        self.settings.delete(API_KEY_SETTING).await?;
        Ok(())
    }

    async fn prepare(
        &self,
        project_id: Uuid,
        options: SendOptions,
    ) -> Result<(ChatMessage, CompletionRequest)> {
        let user_message = ChatMessage::new_user(options.message, options.attachments)?;

        let model = match options.model.filter(|m| !m.is_empty()) {
            Some(model) => model,
            None => self.settings.get(MODEL_SETTING).await?.unwrap_or_default(),
        };
        let api_key = match options.api_key.filter(|k| !k.is_empty()) {
            Some(key) => Some(key),
            None => self.settings.get(API_KEY_SETTING).await?,
        };

        let mut messages: Vec<_> = self
            .transcripts
            .history(project_id)
            .iter()
            .map(ChatMessage::to_llm)
            .collect();
        messages.push(user_message.to_llm());

        tracing::debug!(
            %project_id,
            history = messages.len() - 1,
            model = %model,
            "Prepared chat request"
        );

        let request = CompletionRequest {
            model,
            system_prompt: Some(build_system_prompt(
                options.system_prompt.as_deref(),
                options.context.as_deref(),
            )),
            messages,
            max_tokens: None,
            api_key,
        };

        Ok((user_message, request))
    }

    fn record(
        &self,
        project_id: Uuid,
        user_message: ChatMessage,
        response: CompletionResponse,
    ) -> ChatExchange {
        let assistant_message = ChatMessage::new_assistant(
            response.content,
            response.model,
            response.input_tokens,
            response.output_tokens,
        );

        self.transcripts.append(
            project_id,
            [user_message.clone(), assistant_message.clone()],
        );

        ChatExchange {
            user_message,
            assistant_message,
        }
    }
}
