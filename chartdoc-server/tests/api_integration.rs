//! Integration tests for the chart and document endpoints.
//!
//! Requests go through the real router; artifacts land in a temp directory
//! and are fetched back through `/assets`.

mod common;

use std::path::Path;

use common::TestServer;
use serde_json::{json, Value};

const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

async fn post(server: &TestServer, path: &str, body: Value) -> (u16, Value) {
    let resp = reqwest::Client::new()
        .post(server.url(path))
        .json(&body)
        .send()
        .await
        .expect("request");
    let status = resp.status().as_u16();
    let json = resp.json().await.expect("json body");
    (status, json)
}

fn pie_body() -> Value {
    json!({
        "labels": ["Red", "Green", "Blue"],
        "data": [3, 2, 1],
        "title": "Share",
        "width": 300,
        "height": 300
    })
}

// ==========================================================================
// Single charts
// ==========================================================================

#[tokio::test]
async fn test_pie_chart_writes_png() {
    let server = TestServer::start().await;

    let (status, body) = post(&server, "/v1/charts/pie", pie_body()).await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);

    let filename = body["filename"].as_str().expect("filename");
    assert!(filename.starts_with("chart-"));
    assert!(filename.ends_with(".png"));
    assert!(body["imageUrl"]
        .as_str()
        .expect("imageUrl")
        .ends_with(&format!("/assets/reports/{filename}")));

    let bytes = std::fs::read(body["filePath"].as_str().expect("filePath")).expect("file exists");
    assert!(bytes.starts_with(&PNG_MAGIC));

    server.shutdown().await;
}

#[tokio::test]
async fn test_chart_is_served_from_assets() {
    let server = TestServer::start().await;

    let (_, body) = post(&server, "/v1/charts/pie", pie_body()).await;
    let url = body["imageUrl"].as_str().expect("imageUrl");

    let resp = reqwest::get(url).await.expect("fetch artifact");
    assert_eq!(resp.status(), 200);
    let bytes = resp.bytes().await.expect("bytes");
    assert!(bytes.starts_with(&PNG_MAGIC));

    server.shutdown().await;
}

#[tokio::test]
async fn test_bar_and_table_charts_render() {
    let server = TestServer::start().await;

    let (status, _) = post(
        &server,
        "/v1/charts/bar",
        json!({
            "labels": ["Q1", "Q2"],
            "datasets": [{"label": "Revenue", "data": [10, 14]}]
        }),
    )
    .await;
    assert_eq!(status, 200);

    let (status, _) = post(
        &server,
        "/v1/charts/table",
        json!({"headers": ["Name", "Score"], "rows": [{"Name": "a", "Score": 1}]}),
    )
    .await;
    assert_eq!(status, 200);

    server.shutdown().await;
}

#[tokio::test]
async fn test_missing_data_is_bad_request() {
    let server = TestServer::start().await;

    let (status, body) = post(&server, "/v1/charts/pie", json!({"labels": ["a"]})).await;
    assert_eq!(status, 400);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Failed to generate pie chart");
    assert!(body["message"].as_str().expect("message").contains("data"));

    let reports = server.assets_dir().join("reports");
    assert_eq!(std::fs::read_dir(reports).expect("reports dir").count(), 0);

    server.shutdown().await;
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let server = TestServer::start().await;

    let resp = reqwest::Client::new()
        .post(server.url("/v1/charts/linear"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.expect("json body");
    assert_eq!(body["error"], "Failed to generate line chart");

    server.shutdown().await;
}

// ==========================================================================
// Documents
// ==========================================================================

#[tokio::test]
async fn test_pdf_charts_requires_tables() {
    let server = TestServer::start().await;

    let (status, body) = post(&server, "/v1/documents/pdf-charts", json!({"charts": []})).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Failed to generate PDF");
    assert!(body["message"].as_str().expect("message").contains("tables"));

    server.shutdown().await;
}

#[tokio::test]
async fn test_pdf_charts_writes_pdf() {
    let server = TestServer::start().await;

    let (status, body) = post(
        &server,
        "/v1/documents/pdf-charts",
        json!({
            "title": "Quarterly",
            "filename": "quarterly",
            "tables": [{"title": "Totals", "headers": ["Q", "Total"], "rows": [{"Q": "Q1", "Total": 10}]}],
            "charts": [{
                "title": "Trend",
                "type": "line",
                "data": {"labels": ["Q1", "Q2"], "datasets": [{"label": "Total", "data": [10, 12]}]}
            }]
        }),
    )
    .await;
    assert_eq!(status, 200, "{body}");
    assert_eq!(body["success"], true);
    assert_eq!(body["filename"], "quarterly.pdf");
    assert!(body["pdfUrl"]
        .as_str()
        .expect("pdfUrl")
        .ends_with("/assets/documents/quarterly.pdf"));
    assert!(body["timestamp"].as_str().expect("timestamp").ends_with('Z'));

    let path = body["filePath"].as_str().expect("filePath");
    let bytes = std::fs::read(Path::new(path)).expect("file exists");
    assert!(bytes.starts_with(b"%PDF-"));

    server.shutdown().await;
}

#[tokio::test]
async fn test_flexible_report_survives_bad_element() {
    let server = TestServer::start().await;

    let (status, body) = post(
        &server,
        "/v1/documents/flexible-report",
        json!({
            "title": "Mixed",
            "description": "One element cannot be drawn.",
            "charts": [
                {"type": "pie", "title": "Share", "data": [1, 2], "labels": ["a", "b"]},
                {"type": "radar", "title": "Unsupported"},
                {"type": "table", "title": "Rows", "headers": ["A"], "rows": [{"A": 1}]}
            ]
        }),
    )
    .await;
    assert_eq!(status, 200, "{body}");
    let filename = body["filename"].as_str().expect("filename");
    assert!(filename.starts_with("flexible-report-"));
    assert!(filename.ends_with(".pdf"));

    server.shutdown().await;
}

#[tokio::test]
async fn test_invalid_filename_is_rejected() {
    let server = TestServer::start().await;

    let (status, body) = post(
        &server,
        "/v1/documents/flexible-report",
        json!({
            "filename": "../escape",
            "charts": [{"type": "pie", "data": [1], "labels": ["a"]}]
        }),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Failed to generate flexible report");

    let documents = server.assets_dir().join("documents");
    assert_eq!(std::fs::read_dir(documents).expect("documents dir").count(), 0);

    server.shutdown().await;
}

#[tokio::test]
async fn test_empty_document_is_server_error() {
    let server = TestServer::start().await;

    let (status, body) = post(
        &server,
        "/v1/documents/pdf-charts",
        json!({"tables": [], "charts": []}),
    )
    .await;
    assert_eq!(status, 500);
    assert_eq!(body["success"], false);

    server.shutdown().await;
}

// ==========================================================================
// Health
// ==========================================================================

#[tokio::test]
async fn test_health_probes() {
    let server = TestServer::start().await;

    let live = reqwest::get(server.url("/health/live")).await.expect("live");
    assert_eq!(live.status(), 200);

    let ready = reqwest::get(server.url("/health/ready")).await.expect("ready");
    assert_eq!(ready.status(), 200);
    let body: Value = ready.json().await.expect("json body");
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["reports_dir"], true);
    assert_eq!(body["checks"]["documents_dir"], true);

    server.shutdown().await;
}

#[tokio::test]
async fn test_readiness_fails_without_directories() {
    let server = TestServer::start().await;
    std::fs::remove_dir_all(server.assets_dir().join("documents")).expect("remove dir");

    let ready = reqwest::get(server.url("/health")).await.expect("ready");
    assert_eq!(ready.status(), 503);

    server.shutdown().await;
}

#[tokio::test]
async fn test_metrics_absent_without_recorder() {
    let server = TestServer::start().await;

    let resp = reqwest::get(server.url("/metrics")).await.expect("metrics");
    assert_eq!(resp.status(), 404);

    server.shutdown().await;
}
