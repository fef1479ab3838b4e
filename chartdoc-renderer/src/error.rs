//! Renderer error types.

use std::time::Duration;

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while producing chart images or PDF pages.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The generated SVG scene could not be parsed.
    #[error("SVG parsing failed: {0}")]
    Svg(String),

    /// The canvas could not be allocated or drawn.
    #[error("Rasterization failed: {0}")]
    Rasterize(String),

    /// Encoding the finished canvas failed.
    #[error("PNG encoding failed: {0}")]
    Encode(String),

    /// The requested canvas exceeds the configured limit.
    #[error("Canvas {width}x{height} exceeds the {max}px limit")]
    CanvasTooLarge {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
        /// Configured limit for either side.
        max: u32,
    },

    /// The render did not signal completion before the deadline.
    #[error("Render did not complete within {0:?}")]
    Timeout(Duration),

    /// The blocking render task panicked or was cancelled.
    #[error("Render task failed: {0}")]
    Task(String),

    /// Writing the PDF stream failed.
    #[error("PDF generation failed: {0}")]
    Pdf(String),

    /// An image could not be embedded into the page.
    #[error("Failed to embed image: {0}")]
    Image(String),
}
