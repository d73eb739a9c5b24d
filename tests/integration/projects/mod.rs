//! Project registry and archive integration tests

use std::io::{Cursor, Write};

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use serde_json::json;
use uuid::Uuid;

use crate::common::{body_bytes, error_code, parse_body, TestApp};

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await.unwrap();
    let resp = app.request(Method::GET, "/health", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_bytes(resp).await, b"OK");
}

#[tokio::test]
async fn test_create_and_list_projects() {
    let app = TestApp::new().await.unwrap();
    let first = app.create_project("First").await;
    let second = app.create_project("Second").await;

    let resp = app.request(Method::GET, "/v1/projects", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = parse_body(resp).await;
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&first.as_str()));
    assert!(ids.contains(&second.as_str()));
}

#[tokio::test]
async fn test_create_project_rejects_empty_name() {
    let app = TestApp::new().await.unwrap();
    let resp = app
        .request(Method::POST, "/v1/projects", Some(json!({"name": ""})))
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(resp).await, "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_get_unknown_project_returns_404() {
    let app = TestApp::new().await.unwrap();
    let resp = app
        .request(Method::GET, &format!("/v1/projects/{}", Uuid::new_v4()), None)
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_code(resp).await, "NOT_FOUND");
}

#[tokio::test]
async fn test_update_project_name_and_status() {
    let app = TestApp::new().await.unwrap();
    let id = app.create_project("Draft").await;

    let resp = app
        .request(
            Method::PATCH,
            &format!("/v1/projects/{}", id),
            Some(json!({"name": "Final", "status": "inactive"})),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = parse_body(resp).await;
    assert_eq!(body["name"], "Final");
    assert_eq!(body["status"], "inactive");
}

#[tokio::test]
async fn test_delete_project_cascades_files() {
    let app = TestApp::new().await.unwrap();
    let id = app.create_project("Doomed").await;
    assert_eq!(
        app.put_file(&id, "index.html", "<html></html>").await.status(),
        StatusCode::OK
    );

    let resp = app
        .request(Method::DELETE, &format!("/v1/projects/{}", id), None)
        .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM files")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0);

    let resp = app
        .request(Method::GET, &format!("/v1/projects/{}", id), None)
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_export_then_import_reproduces_files() {
    let app = TestApp::new().await.unwrap();
    let id = app.create_project("My App").await;
    app.put_file(&id, "index.html", "<html lang=\"en\"></html>").await;
    app.put_file(&id, "src/main.js", "console.info('héllo')").await;

    let resp = app
        .request(Method::GET, &format!("/v1/projects/{}/export", id), None)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/zip");
    assert!(resp.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .contains("my-app.zip"));
    let archive = body_bytes(resp).await;

    let resp = app
        .send(
            Request::builder()
                .method(Method::POST)
                .uri("/v1/projects/import?name=Copy")
                .body(Body::from(archive))
                .unwrap(),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let imported = parse_body(resp).await;
    assert_eq!(imported["name"], "Copy");
    let copy_id = imported["id"].as_str().unwrap();

    for (path, content) in [
        ("index.html", "<html lang=\"en\"></html>"),
        ("src/main.js", "console.info('héllo')"),
    ] {
        let resp = app
            .request(
                Method::GET,
                &format!("/v1/projects/{}/files/{}", copy_id, path),
                None,
            )
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(parse_body(resp).await["content"], content);
    }
}

#[tokio::test]
async fn test_import_uses_default_name() {
    let app = TestApp::new().await.unwrap();

    let mut buffer = Cursor::new(Vec::new());
    {
        let mut writer = zip::ZipWriter::new(&mut buffer);
        writer
            .start_file("README.md", zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"# Imported").unwrap();
        writer.finish().unwrap();
    }

    let resp = app
        .send(
            Request::builder()
                .method(Method::POST)
                .uri("/v1/projects/import")
                .body(Body::from(buffer.into_inner()))
                .unwrap(),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(parse_body(resp).await["name"], "Imported project");
}

#[tokio::test]
async fn test_import_rejects_garbage() {
    let app = TestApp::new().await.unwrap();
    let resp = app
        .send(
            Request::builder()
                .method(Method::POST)
                .uri("/v1/projects/import")
                .body(Body::from("not a zip"))
                .unwrap(),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
