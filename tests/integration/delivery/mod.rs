//! Delivery report integration tests

use axum::http::{header, Method, StatusCode};
use uuid::Uuid;

use crate::common::{body_bytes, parse_body, TestApp};

#[tokio::test]
async fn test_empty_project_report() {
    let app = TestApp::new().await.unwrap();
    let id = app.create_project("Empty").await;

    let resp = app
        .request(Method::GET, &format!("/v1/projects/{}/delivery", id), None)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let report = parse_body(resp).await;

    assert_eq!(report["project_name"], "Empty");
    assert_eq!(report["audit"]["score"], 100);
    assert_eq!(report["audit"]["checks"].as_array().unwrap().len(), 16);
    assert_eq!(report["analysis"]["project_type"], "unknown");
    assert_eq!(report["ready_for_production"], false);
}

#[tokio::test]
async fn test_hardcoded_key_blocks_production() {
    let app = TestApp::new().await.unwrap();
    let id = app.create_project("Leaky").await;
    app.put_file(&id, "index.html", "<html lang=\"en\"><title>x</title></html>")
        .await;
    app.put_file(&id, "src/config.js", "const API_KEY = \"abcdefghij0123456789\";")
        .await;

    let report = parse_body(
        app.request(Method::GET, &format!("/v1/projects/{}/delivery", id), None)
            .await,
    )
    .await;

    let check = report["audit"]["checks"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["id"] == "sec-002")
        .unwrap()
        .clone();
    assert_eq!(check["status"], "fail");
    assert_eq!(check["impact"], "critical");
    assert_eq!(report["ready_for_production"], false);
}

#[tokio::test]
async fn test_nextjs_project_report() {
    let app = TestApp::new().await.unwrap();
    let id = app.create_project("Storefront").await;
    app.put_file(
        &id,
        "package.json",
        r#"{"dependencies": {"next": "14", "react": "18"}, "scripts": {"build": "next build"}}"#,
    )
    .await;
    app.put_file(&id, "app/page.tsx", "export default function Page() { return null; }")
        .await;

    let report = parse_body(
        app.request(Method::GET, &format!("/v1/projects/{}/delivery", id), None)
            .await,
    )
    .await;

    assert_eq!(report["analysis"]["project_type"], "nextjs");
    assert_eq!(report["deployment_guide"]["recommended_platform"], "Vercel");
    assert_eq!(report["deployment_guide"]["output_directory"], ".next");
    assert!(report["maintenance_plan"]["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .any(|t| t["title"] == "Review Next.js releases"));
}

#[tokio::test]
async fn test_download_text_report() {
    let app = TestApp::new().await.unwrap();
    let id = app.create_project("Landing Page").await;
    app.put_file(&id, "index.html", "<html lang=\"en\"></html>").await;

    let resp = app
        .request(
            Method::GET,
            &format!("/v1/projects/{}/delivery/report", id),
            None,
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
    assert!(resp.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .contains("landing-page-delivery-report.txt"));

    let text = String::from_utf8(body_bytes(resp).await).unwrap();
    assert!(text.starts_with("Delivery report: Landing Page"));
}

#[tokio::test]
async fn test_unknown_project_returns_404() {
    let app = TestApp::new().await.unwrap();
    let resp = app
        .request(
            Method::GET,
            &format!("/v1/projects/{}/delivery", Uuid::new_v4()),
            None,
        )
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
