//! AI client settings integration tests

use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::common::{parse_body, TestApp};

const URI: &str = "/v1/settings/llm";

#[tokio::test]
async fn test_defaults_without_overrides() {
    let app = TestApp::new().await.unwrap();
    let body = parse_body(app.request(Method::GET, URI, None).await).await;

    assert!(body["model"].is_null());
    assert_eq!(body["default_model"], "mock-model");
    assert_eq!(body["api_key_configured"], false);
}

#[tokio::test]
async fn test_key_is_never_echoed() {
    let app = TestApp::new().await.unwrap();
    let resp = app
        .request(
            Method::PUT,
            URI,
            Some(json!({"model": "custom-model", "api_key": "sk-local-test-key"})),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = parse_body(app.request(Method::GET, URI, None).await).await;
    assert_eq!(body["model"], "custom-model");
    assert_eq!(body["api_key_configured"], true);
    assert!(!body.to_string().contains("sk-local-test-key"));
}

#[tokio::test]
async fn test_model_override_applies_to_chat() {
    let app = TestApp::new().await.unwrap();
    app.request(Method::PUT, URI, Some(json!({"model": "custom-model"})))
        .await;
    let id = app.create_project("Chat").await;

    let body = parse_body(
        app.request(
            Method::POST,
            &format!("/v1/projects/{}/chat/messages", id),
            Some(json!({"message": "Hello"})),
        )
        .await,
    )
    .await;
    assert_eq!(body["assistant_message"]["model"], "custom-model");

    // an explicit model still wins
    let body = parse_body(
        app.request(
            Method::POST,
            &format!("/v1/projects/{}/chat/messages", id),
            Some(json!({"message": "Hello", "model": "request-model"})),
        )
        .await,
    )
    .await;
    assert_eq!(body["assistant_message"]["model"], "request-model");
}

#[tokio::test]
async fn test_clear_overrides() {
    let app = TestApp::new().await.unwrap();
    app.request(Method::PUT, URI, Some(json!({"model": "custom-model"})))
        .await;

    let resp = app.request(Method::DELETE, URI, None).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let body = parse_body(app.request(Method::GET, URI, None).await).await;
    assert!(body["model"].is_null());
}
