//! Prometheus metrics for chartdoc-server.
//!
//! Recording is a no-op until [`init_metrics`] installs the recorder.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

// Metric names as constants for consistency
const CHART_RENDERS_TOTAL: &str = "chartdoc_chart_renders_total";
const CHART_RENDER_DURATION: &str = "chartdoc_chart_render_duration_seconds";
const DOCUMENTS_TOTAL: &str = "chartdoc_documents_total";
const ELEMENT_FAILURES_TOTAL: &str = "chartdoc_element_failures_total";
const ARTIFACTS_REAPED_TOTAL: &str = "chartdoc_artifacts_reaped_total";
const VALIDATION_FAILURES_TOTAL: &str = "chartdoc_validation_failures_total";

/// Initialize metrics and return the Prometheus handle.
///
/// # Errors
///
/// Returns an error if the Prometheus recorder cannot be installed
/// (e.g., if another recorder is already installed).
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Record a single-chart render.
///
/// # Arguments
///
/// * `kind` - Chart kind (pie, line, bar, table)
/// * `success` - Whether an image was produced
/// * `duration_secs` - Time from request to artifact
pub fn record_chart_render(kind: &str, success: bool, duration_secs: f64) {
    counter!(
        CHART_RENDERS_TOTAL,
        "kind" => kind.to_string(),
        "outcome" => outcome(success)
    )
    .increment(1);
    histogram!(CHART_RENDER_DURATION, "kind" => kind.to_string()).record(duration_secs);
}

/// Record a document request.
///
/// # Arguments
///
/// * `endpoint` - "pdf-charts" or "flexible-report"
/// * `success` - Whether a PDF was produced
pub fn record_document(endpoint: &str, success: bool) {
    counter!(
        DOCUMENTS_TOTAL,
        "endpoint" => endpoint.to_string(),
        "outcome" => outcome(success)
    )
    .increment(1);
}

/// Record an element replaced by a failure notice.
pub fn record_element_failure(kind: &str) {
    counter!(ELEMENT_FAILURES_TOTAL, "kind" => kind.to_string()).increment(1);
}

/// Record files removed by the reaper.
pub fn record_artifacts_reaped(count: usize) {
    counter!(ARTIFACTS_REAPED_TOTAL).increment(count as u64);
}

/// Record a request rejected before rendering.
pub fn record_validation_failure(endpoint: &str) {
    counter!(VALIDATION_FAILURES_TOTAL, "endpoint" => endpoint.to_string()).increment(1);
}

fn outcome(success: bool) -> &'static str {
    if success {
        "success"
    } else {
        "failure"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_chart_render("pie", true, 0.01);
        record_document("pdf-charts", false);
        record_element_failure("bar");
        record_artifacts_reaped(3);
        record_validation_failure("charts/pie");
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(outcome(true), "success");
        assert_eq!(outcome(false), "failure");
    }
}
