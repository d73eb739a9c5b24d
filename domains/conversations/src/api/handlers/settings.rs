//! AI client settings handlers
//!
//! The stored API key is never returned; clients only see whether one is set.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use shipwright_common::{Result, ValidatedJson};
use validator::Validate;

use crate::service::{ChatService, LlmOverrides};

/// Request for storing AI client overrides
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLlmSettingsRequest {
    #[validate(length(min = 1, max = 100))]
    pub model: Option<String>,
    #[validate(length(min = 1, max = 512))]
    pub api_key: Option<String>,
}

/// Show the current overrides
pub async fn get_llm_settings(State(chat): State<Arc<ChatService>>) -> Result<Json<LlmOverrides>> {
    Ok(Json(chat.overrides().await?))
}

/// Store overrides; omitted fields keep their value
pub async fn update_llm_settings(
    State(chat): State<Arc<ChatService>>,
    ValidatedJson(req): ValidatedJson<UpdateLlmSettingsRequest>,
) -> Result<Json<LlmOverrides>> {
    let overrides = chat
        .set_overrides(req.model.as_deref(), req.api_key.as_deref())
        .await?;
    tracing::info!(
        model = ?overrides.model,
        api_key_configured = overrides.api_key_configured,
        "Updated AI client settings"
    );
    Ok(Json(overrides))
}

/// Remove every override
pub async fn clear_llm_settings(State(chat): State<Arc<ChatService>>) -> Result<StatusCode> {
    chat.clear_overrides().await?;
    Ok(StatusCode::NO_CONTENT)
}
