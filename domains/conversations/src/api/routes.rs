//! Route definitions for Conversations domain API

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{messages, settings};
use super::middleware::ConversationsState;

/// Create chat routes
fn chat_routes() -> Router<ConversationsState> {
    Router::new()
        .route(
            "/v1/projects/{id}/chat/messages",
            get(messages::list_messages)
                .post(messages::send_message)
                .delete(messages::clear_messages),
        )
        .route(
            "/v1/projects/{id}/chat/stream",
            post(messages::stream_message),
        )
}

/// Create settings routes
fn settings_routes() -> Router<ConversationsState> {
    Router::new().route(
        "/v1/settings/llm",
        get(settings::get_llm_settings)
            .put(settings::update_llm_settings)
            .delete(settings::clear_llm_settings),
    )
}

/// Create all Conversations domain API routes
pub fn routes() -> Router<ConversationsState> {
    Router::new().merge(chat_routes()).merge(settings_routes())
}
