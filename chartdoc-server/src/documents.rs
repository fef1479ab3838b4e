//! PDF report endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use chartdoc_core::Document;
use chartdoc_renderer::{ComposedDocument, ElementStatus};
use chrono::SecondsFormat;
use serde::Serialize;
use serde_json::Value;

use crate::artifacts::{Artifact, ArtifactStore};
use crate::error::{ApiError, ServiceError};
use crate::validation::{required_array, validate_element_count, validate_pdf_filename};
use crate::{metrics, AppState};

/// Successful document response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponse {
    /// Always `true`.
    pub success: bool,
    /// Public URL of the PDF.
    pub pdf_url: String,
    /// Server-local path of the PDF.
    pub file_path: String,
    /// File name.
    pub filename: String,
    /// Creation time, RFC 3339 with milliseconds in UTC.
    pub timestamp: String,
}

impl From<Artifact> for DocumentResponse {
    fn from(artifact: Artifact) -> Self {
        Self {
            success: true,
            pdf_url: artifact.public_url,
            file_path: artifact.file_path.display().to_string(),
            timestamp: artifact
                .created_at
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            filename: artifact.filename,
        }
    }
}

/// `POST /v1/documents/pdf-charts`
#[tracing::instrument(name = "document_pdf_charts", skip(state, body), fields(endpoint = "pdf-charts"))]
pub async fn pdf_charts(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<DocumentResponse>, ApiError> {
    let result = build_pdf_charts(&state, body).await;
    respond("pdf-charts", "Failed to generate PDF", result)
}

/// `POST /v1/documents/flexible-report`
#[tracing::instrument(
    name = "document_flexible_report",
    skip(state, body),
    fields(endpoint = "flexible-report")
)]
pub async fn flexible_report(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<DocumentResponse>, ApiError> {
    let result = build_flexible_report(&state, body).await;
    respond("flexible-report", "Failed to generate flexible report", result)
}

async fn build_pdf_charts(
    state: &AppState,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Artifact, ServiceError> {
    let Json(body) = body?;
    let tables = required_array(&body, "tables")?;
    let charts = required_array(&body, "charts")?;
    validate_element_count(tables.len() + charts.len())?;
    let filename = output_filename(&body, "report")?;

    let document = Document::from_tables_and_charts(string_field(&body, "title"), tables, charts);
    render_and_store(state, document, &filename).await
}

async fn build_flexible_report(
    state: &AppState,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Artifact, ServiceError> {
    let Json(body) = body?;
    let charts = required_array(&body, "charts")?;
    validate_element_count(charts.len())?;
    let filename = output_filename(&body, "flexible-report")?;

    let document = Document::flexible(
        string_field(&body, "title"),
        string_field(&body, "description"),
        charts,
    );
    render_and_store(state, document, &filename).await
}

fn string_field(body: &Value, key: &str) -> Option<String> {
    body.get(key).and_then(Value::as_str).map(str::to_string)
}

/// The caller's validated filename, or a generated one.
fn output_filename(body: &Value, prefix: &str) -> Result<String, ServiceError> {
    match body.get("filename").and_then(Value::as_str) {
        Some(name) => Ok(validate_pdf_filename(name)?),
        None => Ok(ArtifactStore::generate_unique_filename(prefix, "pdf")),
    }
}

async fn render_and_store(
    state: &AppState,
    document: Document,
    filename: &str,
) -> Result<Artifact, ServiceError> {
    let ComposedDocument { bytes, report } = state.composer.compose(document).await?;
    for outcome in &report.outcomes {
        if outcome.status != ElementStatus::Drawn {
            metrics::record_element_failure(outcome.kind.map_or("unknown", |k| k.as_str()));
        }
    }
    let artifact = state.documents.save(filename, &bytes).await?;
    tracing::info!(
        filename = %artifact.filename,
        pages = report.pages,
        drawn = report.drawn(),
        failed = report.failed(),
        "Document generated"
    );
    Ok(artifact)
}

fn respond(
    endpoint: &str,
    operation: &'static str,
    result: Result<Artifact, ServiceError>,
) -> Result<Json<DocumentResponse>, ApiError> {
    metrics::record_document(endpoint, result.is_ok());
    match result {
        Ok(artifact) => Ok(Json(artifact.into())),
        Err(e) => {
            if e.is_client_error() {
                metrics::record_validation_failure(endpoint);
            }
            Err(ApiError::new(operation, e))
        }
    }
}
