//! Health check endpoints for Kubernetes probes.
//!
//! - `/health/live` - Liveness probe (restart if fails)
//! - `/health/ready` - Readiness probe (remove from LB if fails)
//! - `/health` - Same as readiness

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::AppState;

/// Health status response.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    /// Overall status: "healthy" or "unhealthy"
    pub status: &'static str,
    /// Server version
    pub version: &'static str,
    /// Individual component checks
    pub checks: HealthChecks,
}

/// Individual health checks.
#[derive(Debug, Serialize)]
pub struct HealthChecks {
    /// Chart image directory exists
    pub reports_dir: bool,
    /// PDF directory exists
    pub documents_dir: bool,
}

impl HealthChecks {
    fn all_ok(&self) -> bool {
        self.reports_dir && self.documents_dir
    }
}

/// Liveness probe - is the server running?
#[tracing::instrument(name = "liveness_probe")]
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// Readiness probe - can artifacts be written?
///
/// The reaper never removes directories, but an operator might; a missing
/// directory makes every render fail, so the pod is taken out of rotation.
#[tracing::instrument(name = "readiness_probe", skip(state))]
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<HealthStatus>) {
    let checks = HealthChecks {
        reports_dir: state.reports.is_ready(),
        documents_dir: state.documents.is_ready(),
    };
    let all_ok = checks.all_ok();

    let status = HealthStatus {
        status: if all_ok { "healthy" } else { "unhealthy" },
        version: env!("CARGO_PKG_VERSION"),
        checks,
    };

    let code = if all_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (code, Json(status))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_status_serialization() {
        let status = HealthStatus {
            status: "healthy",
            version: "0.2.0",
            checks: HealthChecks {
                reports_dir: true,
                documents_dir: true,
            },
        };

        let json = serde_json::to_string(&status).expect("should serialize");
        assert!(json.contains("healthy"));
        assert!(json.contains("0.2.0"));
        assert!(json.contains("reports_dir"));
        assert!(json.contains("documents_dir"));
    }

    #[test]
    fn test_one_missing_directory_is_unhealthy() {
        let checks = HealthChecks {
            reports_dir: true,
            documents_dir: false,
        };
        assert!(!checks.all_ok());
    }
}
