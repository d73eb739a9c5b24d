//! Chat integration tests against the mock AI client

use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, Method, StatusCode};
use futures_util::StreamExt;
use serde_json::json;
use shipwright_llm::{
    CompletionRequest, CompletionResponse, LlmError, LlmService, STOP_REASON_CANCELLED,
};
use tokio::sync::{mpsc, Notify};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::common::{body_bytes, error_code, parse_body, TestApp};

/// Provider whose every call fails
struct FailingLlm;

#[async_trait::async_trait]
impl LlmService for FailingLlm {
    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        Err(LlmError::Response("provider unavailable".to_string()))
    }

    async fn stream(
        &self,
        _request: CompletionRequest,
        _tx: mpsc::Sender<String>,
        _cancel: CancellationToken,
    ) -> Result<CompletionResponse, LlmError> {
        Err(LlmError::Response("provider unavailable".to_string()))
    }

    fn default_model(&self) -> &str {
        "failing-model"
    }
}

/// Provider that sends one chunk, then waits until the stream is cancelled
struct StallingLlm {
    cancelled: Arc<Notify>,
}

#[async_trait::async_trait]
impl LlmService for StallingLlm {
    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        Err(LlmError::Response("streaming only".to_string()))
    }

    async fn stream(
        &self,
        _request: CompletionRequest,
        tx: mpsc::Sender<String>,
        cancel: CancellationToken,
    ) -> Result<CompletionResponse, LlmError> {
        let _ = tx.send("partial ".to_string()).await;
        cancel.cancelled().await;
        self.cancelled.notify_one();

        Ok(CompletionResponse {
            content: "partial ".to_string(),
            model: "stalling-model".to_string(),
            input_tokens: 1,
            output_tokens: 1,
            stop_reason: STOP_REASON_CANCELLED.to_string(),
        })
    }

    fn default_model(&self) -> &str {
        "stalling-model"
    }
}

#[tokio::test]
async fn test_send_message_records_exchange() {
    let app = TestApp::new().await.unwrap();
    let id = app.create_project("Chat").await;
    let uri = format!("/v1/projects/{}/chat/messages", id);

    let resp = app
        .request(Method::POST, &uri, Some(json!({"message": "Hello"})))
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = parse_body(resp).await;
    assert_eq!(body["user_message"]["role"], "user");
    assert_eq!(body["user_message"]["content"], "Hello");
    assert_eq!(body["assistant_message"]["role"], "assistant");
    assert_eq!(
        body["assistant_message"]["content"],
        "Mock response to: Hello"
    );
    assert_eq!(body["assistant_message"]["model"], "mock-model");

    let resp = app.request(Method::GET, &uri, None).await;
    let transcript = parse_body(resp).await;
    assert_eq!(transcript.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_clear_transcript() {
    let app = TestApp::new().await.unwrap();
    let id = app.create_project("Chat").await;
    let uri = format!("/v1/projects/{}/chat/messages", id);

    app.request(Method::POST, &uri, Some(json!({"message": "Hi"})))
        .await;
    let resp = app.request(Method::DELETE, &uri, None).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let transcript = parse_body(app.request(Method::GET, &uri, None).await).await;
    assert!(transcript.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_blank_message_is_rejected() {
    let app = TestApp::new().await.unwrap();
    let id = app.create_project("Chat").await;

    let resp = app
        .request(
            Method::POST,
            &format!("/v1/projects/{}/chat/messages", id),
            Some(json!({"message": "   "})),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(resp).await, "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_attachment_only_message_is_accepted() {
    let app = TestApp::new().await.unwrap();
    let id = app.create_project("Chat").await;

    let resp = app
        .request(
            Method::POST,
            &format!("/v1/projects/{}/chat/messages", id),
            Some(json!({
                "message": "",
                "attachments": [{"name": "logo.png", "media_type": "image/png", "data": "aGVsbG8="}]
            })),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = parse_body(resp).await;
    assert!(body["assistant_message"]["content"]
        .as_str()
        .unwrap()
        .ends_with("(1 attachment(s))"));
}

#[tokio::test]
async fn test_chat_for_unknown_project_returns_404() {
    let app = TestApp::new().await.unwrap();
    let resp = app
        .request(
            Method::POST,
            &format!("/v1/projects/{}/chat/messages", Uuid::new_v4()),
            Some(json!({"message": "Hello"})),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_stream_emits_deltas_then_done() {
    let app = TestApp::new().await.unwrap();
    let id = app.create_project("Chat").await;

    let resp = app
        .request(
            Method::POST,
            &format!("/v1/projects/{}/chat/stream", id),
            Some(json!({"message": "Hi there"})),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/event-stream"));

    let text = String::from_utf8(body_bytes(resp).await).unwrap();
    let first_delta = text.find("event: delta").unwrap();
    let done = text.find("event: done").unwrap();
    assert!(first_delta < done, "{}", text);
    assert!(!text.contains("event: error"));

    let transcript = parse_body(
        app.request(
            Method::GET,
            &format!("/v1/projects/{}/chat/messages", id),
            None,
        )
        .await,
    )
    .await;
    let messages = transcript.as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1]["content"], "Mock response to: Hi there");
}

#[tokio::test]
async fn test_history_is_sent_with_follow_up() {
    let app = TestApp::new().await.unwrap();
    let id = app.create_project("Chat").await;
    let uri = format!("/v1/projects/{}/chat/messages", id);

    app.request(Method::POST, &uri, Some(json!({"message": "first"})))
        .await;
    app.request(Method::POST, &uri, Some(json!({"message": "second"})))
        .await;

    let transcript = parse_body(app.request(Method::GET, &uri, None).await).await;
    let contents: Vec<&str> = transcript
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["content"].as_str().unwrap())
        .collect();
    assert_eq!(
        contents,
        vec![
            "first",
            "Mock response to: first",
            "second",
            "Mock response to: second"
        ]
    );
}

#[tokio::test]
async fn test_stream_reports_provider_failure_as_error_event() {
    let app = TestApp::with_llm(Arc::new(FailingLlm)).await.unwrap();
    let id = app.create_project("Chat").await;

    let resp = app
        .request(
            Method::POST,
            &format!("/v1/projects/{}/chat/stream", id),
            Some(json!({"message": "Hi"})),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let text = String::from_utf8(body_bytes(resp).await).unwrap();
    assert!(text.contains("event: error"), "{}", text);
    assert!(text.contains("provider unavailable"), "{}", text);
    assert!(!text.contains("event: done"), "{}", text);

    let transcript = parse_body(
        app.request(
            Method::GET,
            &format!("/v1/projects/{}/chat/messages", id),
            None,
        )
        .await,
    )
    .await;
    assert!(transcript.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_client_disconnect_cancels_stream_without_recording() {
    let cancelled = Arc::new(Notify::new());
    let llm = StallingLlm {
        cancelled: cancelled.clone(),
    };
    let app = TestApp::with_llm(Arc::new(llm)).await.unwrap();
    let id = app.create_project("Chat").await;
    let uri = format!("/v1/projects/{}/chat/messages", id);

    let resp = app
        .request(
            Method::POST,
            &format!("/v1/projects/{}/chat/stream", id),
            Some(json!({"message": "Hi"})),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let mut body = resp.into_body().into_data_stream();
    let first = tokio::time::timeout(Duration::from_secs(5), body.next())
        .await
        .expect("no frame before timeout")
        .expect("stream ended early")
        .unwrap();
    let frame = String::from_utf8_lossy(&first).to_string();
    assert!(frame.contains("event: delta"), "{}", frame);
    assert!(frame.contains("partial"), "{}", frame);

    drop(body);

    tokio::time::timeout(Duration::from_secs(5), cancelled.notified())
        .await
        .expect("provider stream was not cancelled");
    tokio::time::sleep(Duration::from_millis(50)).await;

    let transcript = parse_body(app.request(Method::GET, &uri, None).await).await;
    assert!(transcript.as_array().unwrap().is_empty());
}
