//! In-memory surface that records draw calls.
//!
//! Lets layout be inspected without parsing a compressed PDF.

use super::{DocumentSurface, Font, PageSize, RectPaint};
use crate::raster::RenderedImage;
use crate::RenderResult;

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    /// A page was started (the first page is implicit).
    NewPage,
    /// A line of text.
    Text {
        /// Page the text is on, starting at 1.
        page: usize,
        /// Content.
        text: String,
        /// Left edge.
        x: f32,
        /// Top of the line box.
        top: f32,
        /// Font.
        font: Font,
    },
    /// A rectangle.
    Rect {
        /// Page the rectangle is on, starting at 1.
        page: usize,
        /// Left edge.
        x: f32,
        /// Top edge.
        top: f32,
        /// Width.
        width: f32,
        /// Height.
        height: f32,
        /// Paint.
        paint: RectPaint,
    },
    /// A placed image.
    Image {
        /// Page the image is on, starting at 1.
        page: usize,
        /// Left edge.
        x: f32,
        /// Top edge.
        top: f32,
        /// Placed width.
        width: f32,
        /// Placed height.
        height: f32,
    },
}

impl SurfaceOp {
    /// Text content, for text ops.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// Surface that keeps every draw call in order.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    size: PageSize,
    pages: usize,
    ops: Vec<SurfaceOp>,
}

impl RecordingSurface {
    /// Empty recording with one page of `size`.
    #[must_use]
    pub fn new(size: PageSize) -> Self {
        Self {
            size,
            pages: 1,
            ops: Vec::new(),
        }
    }

    /// Recorded calls in drawing order.
    #[must_use]
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Text runs in drawing order.
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        self.ops.iter().filter_map(SurfaceOp::text).collect()
    }

    /// Consume the recording.
    #[must_use]
    pub fn into_ops(self) -> Vec<SurfaceOp> {
        self.ops
    }
}

impl DocumentSurface for RecordingSurface {
    fn page_size(&self) -> PageSize {
        self.size
    }

    fn page_count(&self) -> usize {
        self.pages.max(1)
    }

    fn new_page(&mut self) {
        self.pages = self.page_count() + 1;
        self.ops.push(SurfaceOp::NewPage);
    }

    fn draw_text(&mut self, text: &str, x: f32, top: f32, font: Font) {
        self.ops.push(SurfaceOp::Text {
            page: self.page_count(),
            text: text.to_string(),
            x,
            top,
            font,
        });
    }

    fn draw_rect(&mut self, x: f32, top: f32, width: f32, height: f32, paint: RectPaint) {
        self.ops.push(SurfaceOp::Rect {
            page: self.page_count(),
            x,
            top,
            width,
            height,
            paint,
        });
    }

    fn draw_image(
        &mut self,
        _image: &RenderedImage,
        x: f32,
        top: f32,
        width: f32,
        height: f32,
    ) -> RenderResult<()> {
        self.ops.push(SurfaceOp::Image {
            page: self.page_count(),
            x,
            top,
            width,
            height,
        });
        Ok(())
    }
}
