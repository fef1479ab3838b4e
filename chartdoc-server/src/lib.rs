//! # chartdoc server library
//!
//! HTTP surface for chart images and PDF reports. Shared by the binary and
//! the integration tests.
//!
//! ```text
//! POST /v1/charts/{pie,linear,bar,table} ──► normalize ──► render ──► reports/
//! POST /v1/documents/pdf-charts          ──┐
//! POST /v1/documents/flexible-report     ──┴► compose ──► documents/
//! GET  /assets/**                        ──► static files
//! ```

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use chartdoc_renderer::{ChartRenderer, DocumentComposer, LayoutConfig};
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

pub mod artifacts;
pub mod config;
pub mod documents;
pub mod error;
pub mod health;
pub mod metrics;
pub mod routes;
pub mod validation;

pub use artifacts::{Artifact, ArtifactError, ArtifactStore};
pub use config::ServerConfig;
pub use error::{ApiError, ServiceError};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration.
    pub config: Arc<ServerConfig>,
    /// Chart images.
    pub reports: ArtifactStore,
    /// PDF reports.
    pub documents: ArtifactStore,
    /// Chart rasterizer.
    pub renderer: ChartRenderer,
    /// PDF composer sharing the rasterizer.
    pub composer: DocumentComposer,
    /// Prometheus handle, when a recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Open both artifact stores (creating and reaping their directories) and
    /// build the renderer.
    ///
    /// # Errors
    ///
    /// Returns an error if an artifact directory cannot be created.
    pub async fn new(config: ServerConfig) -> Result<Self, ArtifactError> {
        let base_url = config.base_url();
        let reports = ArtifactStore::open(
            config.reports_dir(),
            format!("{base_url}/assets/reports"),
            config.max_file_age(),
        )
        .await?;
        let documents = ArtifactStore::open(
            config.documents_dir(),
            format!("{base_url}/assets/documents"),
            config.max_file_age(),
        )
        .await?;

        let renderer = ChartRenderer::new(config.renderer_config());
        let composer = DocumentComposer::new(renderer.clone(), LayoutConfig::default());

        Ok(Self {
            config: Arc::new(config),
            reports,
            documents,
            renderer,
            composer,
            metrics: None,
        })
    }

    /// Expose `handle` at `/metrics`.
    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Both artifact stores.
    pub fn stores(&self) -> Vec<ArtifactStore> {
        vec![self.reports.clone(), self.documents.clone()]
    }
}

/// Build the full router.
pub fn router(state: AppState) -> Router {
    let assets = ServeDir::new(&state.config.assets_dir);
    let body_limit = state.config.max_body_bytes;

    let v1 = Router::new()
        .route("/charts/pie", post(routes::pie_chart))
        .route("/charts/linear", post(routes::line_chart))
        .route("/charts/bar", post(routes::bar_chart))
        .route("/charts/table", post(routes::table_chart))
        .route("/documents/pdf-charts", post(documents::pdf_charts))
        .route("/documents/flexible-report", post(documents::flexible_report));

    Router::new()
        .route("/metrics", get(metrics_handler))
        // Health check endpoints (Kubernetes probes)
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .route("/health", get(health::readiness))
        .nest("/v1", v1)
        .nest_service("/assets", assets)
        .layer(
            ServiceBuilder::new()
                // Request ID for distributed tracing correlation
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                        .on_request(DefaultOnRequest::new().level(Level::INFO))
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}

/// Prometheus metrics endpoint; 404 when no recorder is installed.
#[tracing::instrument(name = "metrics", skip(state))]
async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (axum::http::StatusCode::OK, handle.render()),
        None => (
            axum::http::StatusCode::NOT_FOUND,
            "metrics recorder not installed".to_string(),
        ),
    }
}
