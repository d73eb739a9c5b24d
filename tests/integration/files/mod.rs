//! File store integration tests

use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::common::{error_code, parse_body, TestApp};

#[tokio::test]
async fn test_write_then_read_returns_identical_content() {
    let app = TestApp::new().await.unwrap();
    let id = app.create_project("Files").await;
    let content = "export const greeting = \"héllo\";\n\t// ✓\n";

    let resp = app.put_file(&id, "src/greeting.ts", content).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .request(
            Method::GET,
            &format!("/v1/projects/{}/files/src/greeting.ts", id),
            None,
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = parse_body(resp).await;
    assert_eq!(body["path"], "src/greeting.ts");
    assert_eq!(body["content"], content);
}

#[tokio::test]
async fn test_list_file_summaries() {
    let app = TestApp::new().await.unwrap();
    let id = app.create_project("Files").await;
    app.put_file(&id, "b.txt", "bb").await;
    app.put_file(&id, "a.txt", "é").await;

    let resp = app
        .request(Method::GET, &format!("/v1/projects/{}/files", id), None)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = parse_body(resp).await;
    let files = body.as_array().unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0]["path"], "a.txt");
    assert_eq!(files[0]["size_bytes"], 2);
    assert_eq!(files[1]["path"], "b.txt");
}

#[tokio::test]
async fn test_missing_file_returns_404() {
    let app = TestApp::new().await.unwrap();
    let id = app.create_project("Files").await;

    let resp = app
        .request(
            Method::GET,
            &format!("/v1/projects/{}/files/nope.js", id),
            None,
        )
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_code(resp).await, "NOT_FOUND");
}

#[tokio::test]
async fn test_delete_file() {
    let app = TestApp::new().await.unwrap();
    let id = app.create_project("Files").await;
    app.put_file(&id, "tmp.txt", "x").await;

    let uri = format!("/v1/projects/{}/files/tmp.txt", id);
    let resp = app.request(Method::DELETE, &uri, None).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = app.request(Method::GET, &uri, None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rename_moves_content() {
    let app = TestApp::new().await.unwrap();
    let id = app.create_project("Files").await;
    app.put_file(&id, "old.js", "let x = 1;").await;

    let resp = app
        .request(
            Method::POST,
            &format!("/v1/projects/{}/rename", id),
            Some(json!({"from": "old.js", "to": "lib/new.js"})),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .request(
            Method::GET,
            &format!("/v1/projects/{}/files/lib/new.js", id),
            None,
        )
        .await;
    assert_eq!(parse_body(resp).await["content"], "let x = 1;");

    let resp = app
        .request(
            Method::GET,
            &format!("/v1/projects/{}/files/old.js", id),
            None,
        )
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rename_missing_source_returns_404() {
    let app = TestApp::new().await.unwrap();
    let id = app.create_project("Files").await;

    let resp = app
        .request(
            Method::POST,
            &format!("/v1/projects/{}/rename", id),
            Some(json!({"from": "ghost.js", "to": "real.js"})),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_files_of_unknown_project_return_404() {
    let app = TestApp::new().await.unwrap();
    let resp = app
        .put_file(&uuid::Uuid::new_v4().to_string(), "a.txt", "x")
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
