//! HTTP error responses.
//!
//! Every failure becomes `{success: false, error, message}`: `error` names
//! the operation that failed and `message` is the cause. Input problems map
//! to 400, everything else to 500.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chartdoc_core::ValidationError;
use chartdoc_renderer::{ComposeError, RenderError};
use serde::Serialize;
use thiserror::Error;

use crate::artifacts::ArtifactError;
use crate::validation::RequestError;

/// Anything a handler can fail with.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The body is not valid JSON.
    #[error(transparent)]
    Body(#[from] JsonRejection),
    /// The HTTP layer rejected a field.
    #[error(transparent)]
    Request(#[from] RequestError),
    /// The chart or table configuration is invalid.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Rendering failed.
    #[error(transparent)]
    Render(#[from] RenderError),
    /// Document composition failed.
    #[error(transparent)]
    Compose(#[from] ComposeError),
    /// Writing the artifact failed.
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}

impl ServiceError {
    /// Whether the caller sent something unusable.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Body(_) | Self::Request(_) | Self::Validation(_)
        )
    }

    /// Status code the error maps to.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Always `false`.
    pub success: bool,
    /// The operation that failed.
    pub error: String,
    /// Why it failed.
    pub message: String,
}

/// A failed request, ready to be sent.
#[derive(Debug)]
pub struct ApiError {
    operation: &'static str,
    source: ServiceError,
}

impl ApiError {
    /// Attach the failed operation's name to an error.
    pub fn new(operation: &'static str, source: impl Into<ServiceError>) -> Self {
        Self {
            operation,
            source: source.into(),
        }
    }

    /// Response status.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.source.status()
    }

    /// The underlying error.
    #[must_use]
    pub fn source(&self) -> &ServiceError {
        &self.source
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(operation = self.operation, error = %self.source, "Request failed");
        } else {
            tracing::debug!(operation = self.operation, error = %self.source, "Request rejected");
        }
        let body = ErrorBody {
            success: false,
            error: self.operation.to_string(),
            message: self.source.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err = ApiError::new(
            "Failed to generate pie chart",
            ValidationError::MissingField("data"),
        );
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_render_maps_to_internal_error() {
        let err = ApiError::new(
            "Failed to generate line chart",
            RenderError::Timeout(Duration::from_secs(1)),
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.source().is_client_error());
    }

    #[test]
    fn test_empty_document_is_server_error() {
        let err = ApiError::new("Failed to generate PDF", ComposeError::EmptyDocument);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_body_shape() {
        let body = ErrorBody {
            success: false,
            error: "Failed to generate PDF".into(),
            message: "boom".into(),
        };
        let json = serde_json::to_value(&body).expect("serializes");
        assert_eq!(
            json,
            serde_json::json!({"success": false, "error": "Failed to generate PDF", "message": "boom"})
        );
    }
}
