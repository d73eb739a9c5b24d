//! Common test utilities for integration tests
//!
//! Every `TestApp` owns a private in-memory database and the mock AI
//! client, so tests never share state.

use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::Body,
    http::{Method, Request, Response, StatusCode},
    Router,
};
use serde_json::Value;
use shipwright_common::{db, Config};
use shipwright_llm::{LlmService, MockLlmService};
use sqlx::SqlitePool;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
}

impl TestApp {
    pub async fn new() -> Result<Self> {
        Self::with_config(Config::default()).await
    }

    pub async fn with_config(config: Config) -> Result<Self> {
        Self::build(config, Arc::new(MockLlmService::new())).await
    }

    /// Build the app around a caller-supplied AI client
    pub async fn with_llm(llm: Arc<dyn LlmService>) -> Result<Self> {
        Self::build(Config::default(), llm).await
    }

    async fn build(config: Config, llm: Arc<dyn LlmService>) -> Result<Self> {
        let pool = db::connect_in_memory().await?;
        let router = shipwright_app::create_app(&config, pool.clone(), llm)?;
        Ok(Self { router, pool })
    }

    /// Send one request through a clone of the router
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
        self.send(json_request(method, uri, body)).await
    }

    /// Create a project and return its id
    pub async fn create_project(&self, name: &str) -> String {
        let resp = self
            .request(
                Method::POST,
                "/v1/projects",
                Some(serde_json::json!({ "name": name })),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = parse_body(resp).await;
        body["id"].as_str().unwrap().to_string()
    }

    pub async fn put_file(&self, project_id: &str, path: &str, content: &str) -> Response<Body> {
        self.request(
            Method::PUT,
            &format!("/v1/projects/{}/files/{}", project_id, path),
            Some(serde_json::json!({ "content": content })),
        )
        .await
    }
}

/// Build a request, with a JSON body when one is given
pub fn json_request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);

    if let Some(b) = body {
        builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&b).unwrap()))
            .unwrap()
    } else {
        builder.body(Body::empty()).unwrap()
    }
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

/// Parse response body as JSON
pub async fn parse_body(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Assert the standard error envelope and return its code
pub async fn error_code(response: Response<Body>) -> String {
    let body = parse_body(response).await;
    assert!(body["error"]["message"].is_string(), "{}", body);
    body["error"]["code"].as_str().unwrap().to_string()
}
