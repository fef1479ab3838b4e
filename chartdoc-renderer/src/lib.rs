//! # chartdoc renderer
//!
//! Draws normalized chart and table specs as SVG scenes, rasterizes them to
//! PNG, and composes paginated PDF reports.
//!
//! ## Pipeline
//!
//! ```text
//! NormalizedSpec ──► SvgCanvas scene ──► resvg / tiny-skia ──► PNG
//!                                                              │
//! Document ──► DocumentComposer::prepare ──► PreparedElement ──┘
//!                     │
//!                     └─► layout over DocumentSurface ──► PdfSurface ──► PDF bytes
//! ```
//!
//! Chart rasterization is CPU-bound and runs on the blocking pool under an
//! optional deadline. Layout is sequential: each element moves the shared
//! page cursor, so elements are drawn strictly in input order.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod chart;
pub mod compose;
pub mod error;
pub mod options;
pub mod raster;
pub mod surface;
pub mod svg;
mod table;

pub use compose::{
    ComposeError, ComposedDocument, CompositionReport, DocumentComposer, ElementOutcome,
    ElementStatus, LayoutConfig, PreparedElement,
};
pub use error::{RenderError, RenderResult};
pub use options::ChartOptions;
pub use raster::{Rasterizer, RenderedImage};
pub use surface::{DocumentSurface, PageSize, PdfSurface, RecordingSurface};

use std::sync::Arc;
use std::time::{Duration, Instant};

use chartdoc_core::NormalizedSpec;

use crate::svg::SvgCanvas;

/// Configuration for the renderer.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Deadline for one chart render; `None` waits indefinitely.
    pub render_timeout: Option<Duration>,
    /// Largest canvas side, in pixels, the rasterizer accepts.
    pub max_canvas_dimension: u32,
    /// Canvas background color (RGBA).
    pub background: [u8; 4],
    /// Font family written into the SVG scenes.
    pub font_family: String,
    /// Scan the system font directories at startup.
    pub load_system_fonts: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            render_timeout: Some(Duration::from_secs(30)),
            max_canvas_dimension: 4096,
            background: [255, 255, 255, 255], // White
            font_family: "sans-serif".to_string(),
            load_system_fonts: true,
        }
    }
}

/// Renders normalized specs to PNG images.
///
/// Cheap to clone; clones share the font database.
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    config: Arc<RendererConfig>,
    rasterizer: Arc<Rasterizer>,
}

impl ChartRenderer {
    /// Create a renderer, loading fonts as configured.
    #[must_use]
    pub fn new(config: RendererConfig) -> Self {
        let rasterizer = Rasterizer::new(config.load_system_fonts);
        tracing::debug!(fonts = rasterizer.font_count(), "Chart renderer ready");
        Self {
            config: Arc::new(config),
            rasterizer: Arc::new(rasterizer),
        }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Chart options derived for `spec`; tables have none.
    #[must_use]
    pub fn options(spec: &NormalizedSpec) -> Option<ChartOptions> {
        match spec {
            NormalizedSpec::Pie(pie) => Some(ChartOptions::pie(pie)),
            NormalizedSpec::Line(line) => Some(ChartOptions::line(line)),
            NormalizedSpec::Bar(bar) => Some(ChartOptions::bar(bar)),
            NormalizedSpec::Table(_) => None,
        }
    }

    /// Build the SVG scene for `spec`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::CanvasTooLarge`] when either side exceeds the
    /// configured maximum.
    pub fn render_svg(&self, spec: &NormalizedSpec) -> RenderResult<String> {
        let (width, height) = spec.dimensions();
        let max = self.config.max_canvas_dimension;
        if width > max || height > max {
            return Err(RenderError::CanvasTooLarge { width, height, max });
        }

        let mut canvas = SvgCanvas::new(
            width,
            height,
            self.config.background,
            &self.config.font_family,
        );
        match spec {
            NormalizedSpec::Pie(pie) => chart::draw_pie(&mut canvas, pie, &ChartOptions::pie(pie)),
            NormalizedSpec::Line(line) => {
                chart::draw_line(&mut canvas, line, &ChartOptions::line(line));
            }
            NormalizedSpec::Bar(bar) => chart::draw_bar(&mut canvas, bar, &ChartOptions::bar(bar)),
            NormalizedSpec::Table(table) => table::draw(&mut canvas, table),
        }
        Ok(canvas.finish())
    }

    /// Render `spec` to PNG on the current thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the scene is rejected or cannot be rasterized.
    pub fn render_blocking(&self, spec: &NormalizedSpec) -> RenderResult<RenderedImage> {
        let svg = self.render_svg(spec)?;
        self.rasterizer.render_png(&svg)
    }

    /// Render `spec` to PNG on the blocking pool, waiting at most the
    /// configured deadline.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Timeout`] when the deadline passes (the render
    /// itself is left to finish in the background), [`RenderError::Task`]
    /// when the task panics, or the render's own error.
    pub async fn render(&self, spec: NormalizedSpec) -> RenderResult<RenderedImage> {
        let kind = spec.kind();
        let started = Instant::now();
        let renderer = self.clone();
        let task = tokio::task::spawn_blocking(move || renderer.render_blocking(&spec));

        let joined = match self.config.render_timeout {
            Some(limit) => tokio::time::timeout(limit, task)
                .await
                .map_err(|_| RenderError::Timeout(limit))?,
            None => task.await,
        };
        let image = joined.map_err(|e| RenderError::Task(e.to_string()))??;

        tracing::debug!(
            kind = %kind,
            width = image.width,
            height = image.height,
            elapsed_ms = started.elapsed().as_millis(),
            "Rendered chart"
        );
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chartdoc_core::{normalize, ElementKind};
    use serde_json::json;

    fn renderer() -> ChartRenderer {
        ChartRenderer::new(RendererConfig {
            load_system_fonts: false,
            ..RendererConfig::default()
        })
    }

    #[test]
    fn test_default_config() {
        let config = RendererConfig::default();
        assert_eq!(config.render_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.max_canvas_dimension, 4096);
        assert_eq!(config.background, [255; 4]);
    }

    #[test]
    fn test_pie_svg_has_requested_size() {
        let spec = normalize(
            ElementKind::Pie,
            &json!({"data": [1, 2, 3], "labels": ["a", "b", "c"], "width": 300, "height": 200}),
        )
        .expect("valid pie");
        let svg = renderer().render_svg(&spec).expect("svg");
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("width=\"300\""));
        assert!(svg.contains("height=\"200\""));
    }

    #[test]
    fn test_oversized_canvas_rejected() {
        let spec = normalize(
            ElementKind::Line,
            &json!({"labels": ["a"], "datasets": [{"data": [1]}], "width": 5000}),
        )
        .expect("line has no normalizer bound");
        assert!(matches!(
            renderer().render_svg(&spec),
            Err(RenderError::CanvasTooLarge { width: 5000, .. })
        ));
    }

    #[test]
    fn test_options_only_for_charts() {
        let table = normalize(
            ElementKind::Table,
            &json!({"headers": ["A"], "rows": [{"A": 1}]}),
        )
        .expect("valid table");
        assert!(ChartRenderer::options(&table).is_none());

        let bar = normalize(
            ElementKind::Bar,
            &json!({"labels": ["a"], "datasets": [{"data": [1]}]}),
        )
        .expect("valid bar");
        assert!(ChartRenderer::options(&bar).is_some());
    }

    #[tokio::test]
    async fn test_async_render_produces_png() {
        let spec = normalize(
            ElementKind::Bar,
            &json!({"labels": ["a", "b"], "datasets": [{"label": "x", "data": [3, 4]}], "width": 200, "height": 100}),
        )
        .expect("valid bar");
        let image = renderer().render(spec).await.expect("renders");
        assert_eq!((image.width, image.height), (200, 100));
        assert!(image.png.starts_with(&[0x89, b'P', b'N', b'G']));
    }
}
