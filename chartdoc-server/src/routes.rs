//! Single-chart endpoints.
//!
//! Each handler normalizes the body, renders one PNG and stores it under
//! `reports/`, answering with the artifact's public URL.

use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use chartdoc_core::{normalize, ElementKind};
use serde::Serialize;
use serde_json::Value;

use crate::artifacts::Artifact;
use crate::error::{ApiError, ServiceError};
use crate::{metrics, AppState};

/// Successful single-chart response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartResponse {
    /// Always `true`.
    pub success: bool,
    /// Public URL of the PNG.
    pub image_url: String,
    /// Server-local path of the PNG.
    pub file_path: String,
    /// File name.
    pub filename: String,
}

impl From<Artifact> for ChartResponse {
    fn from(artifact: Artifact) -> Self {
        Self {
            success: true,
            image_url: artifact.public_url,
            file_path: artifact.file_path.display().to_string(),
            filename: artifact.filename,
        }
    }
}

/// `POST /v1/charts/pie`
#[tracing::instrument(name = "chart_pie", skip(state, body), fields(kind = "pie"))]
pub async fn pie_chart(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ChartResponse>, ApiError> {
    render_chart(&state, ElementKind::Pie, "Failed to generate pie chart", body).await
}

/// `POST /v1/charts/linear`
#[tracing::instrument(name = "chart_line", skip(state, body), fields(kind = "line"))]
pub async fn line_chart(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ChartResponse>, ApiError> {
    render_chart(&state, ElementKind::Line, "Failed to generate line chart", body).await
}

/// `POST /v1/charts/bar`
#[tracing::instrument(name = "chart_bar", skip(state, body), fields(kind = "bar"))]
pub async fn bar_chart(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ChartResponse>, ApiError> {
    render_chart(&state, ElementKind::Bar, "Failed to generate bar chart", body).await
}

/// `POST /v1/charts/table`
#[tracing::instrument(name = "chart_table", skip(state, body), fields(kind = "table"))]
pub async fn table_chart(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ChartResponse>, ApiError> {
    render_chart(&state, ElementKind::Table, "Failed to generate data table", body).await
}

async fn render_chart(
    state: &AppState,
    kind: ElementKind,
    operation: &'static str,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ChartResponse>, ApiError> {
    let started = Instant::now();
    let result = render_and_store(state, kind, body).await;
    let elapsed = started.elapsed().as_secs_f64();
    metrics::record_chart_render(kind.as_str(), result.is_ok(), elapsed);

    match result {
        Ok(artifact) => {
            tracing::info!(filename = %artifact.filename, elapsed_secs = elapsed, "Chart generated");
            Ok(Json(artifact.into()))
        }
        Err(e) => {
            if e.is_client_error() {
                metrics::record_validation_failure(kind.as_str());
            }
            Err(ApiError::new(operation, e))
        }
    }
}

async fn render_and_store(
    state: &AppState,
    kind: ElementKind,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Artifact, ServiceError> {
    let Json(body) = body?;
    let spec = normalize(kind, &body)?;
    let image = state.renderer.render(spec).await?;
    Ok(state.reports.save_unique("chart", "png", &image.png).await?)
}
