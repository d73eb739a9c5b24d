//! Shipwright application composition root
//!
//! Composes all domain routers into a single application.

use std::sync::Arc;

use anyhow::Context;
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::Router;
use shipwright_common::Config;
use shipwright_conversations::{ChatService, ConversationsState};
use shipwright_delivery::DeliveryState;
use shipwright_llm::LlmService;
use shipwright_projects::{ProjectsRepositories, ProjectsState};
use sqlx::SqlitePool;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Create the main application router with all routes and middleware
pub fn create_app(
    config: &Config,
    pool: SqlitePool,
    llm: Arc<dyn LlmService>,
) -> Result<Router, anyhow::Error> {
    let repos = ProjectsRepositories::new(pool);

    let chat = ChatService::new(
        llm,
        repos.settings.clone(),
        config.chat_cache_capacity,
        config.chat_max_messages,
    )?;

    let conversations_state = ConversationsState {
        repos: repos.clone(),
        chat: Arc::new(chat),
    };

    // Compose domain routers with shared infrastructure routes
    let app = Router::new()
        .route("/health", axum::routing::get(health_check))
        .route(
            "/",
            axum::routing::get(|| async { "Shipwright API v0.0.1-SNAPSHOT" }),
        )
        .merge(shipwright_projects::routes().with_state(ProjectsState::new(repos.clone())))
        .merge(shipwright_conversations::routes().with_state(conversations_state))
        .merge(shipwright_delivery::routes().with_state(DeliveryState::new(repos)))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(cors_layer(&config.cors_allowed_origins)?);

    Ok(app)
}

/// CORS policy from a comma-separated origin list, or "*" for any origin
fn cors_layer(allowed_origins: &str) -> Result<CorsLayer, anyhow::Error> {
    if allowed_origins.trim() == "*" {
        return Ok(CorsLayer::permissive());
    }

    let origins = allowed_origins
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(|o| {
            HeaderValue::from_str(o).with_context(|| format!("Invalid CORS origin: {}", o))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
