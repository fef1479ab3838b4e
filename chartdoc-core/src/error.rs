//! Error types for request validation and element resolution.

use thiserror::Error;

/// Result type for normalization.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// A request was rejected before any rendering work started.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is absent or empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Pie `data` and `labels` do not pair up.
    #[error(
        "missing required field: data and labels arrays must have the same length (data={data}, labels={labels})"
    )]
    LengthMismatch {
        /// Number of values supplied.
        data: usize,
        /// Number of labels supplied.
        labels: usize,
    },

    /// Width or height outside the accepted range.
    #[error("dimension out of bounds: {width}x{height} (allowed 1..={max})")]
    DimensionOutOfBounds {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
        /// Largest accepted value for either side.
        max: u32,
    },

    /// Width or height of zero.
    #[error("dimension out of bounds: {width}x{height} (width and height must be positive)")]
    EmptyCanvas {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },

    /// The JSON body does not match the request shape.
    #[error("malformed request: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for ValidationError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}

/// A document element could not be resolved into something drawable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ElementError {
    /// The element declares a kind this service cannot draw.
    #[error("unsupported element kind: {0}")]
    Unsupported(String),

    /// The element has no `type` tag.
    #[error("element has no type")]
    MissingKind,

    /// The element is not a JSON object.
    #[error("element must be a JSON object")]
    NotAnObject,

    /// The element configuration failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
