//! Paginated drawing surfaces.
//!
//! The composer lays documents out against [`DocumentSurface`]; the PDF
//! writer and the in-memory recorder both implement it.
//!
//! Coordinates are PDF points (1/72 in) with the origin at the top-left
//! corner of the current page and y growing downwards.

mod font_metrics;
pub mod pdf;
pub mod recording;

pub use font_metrics::text_width;
pub use pdf::PdfSurface;
pub use recording::{RecordingSurface, SurfaceOp};

use chartdoc_core::Rgb;

use crate::raster::RenderedImage;
use crate::RenderResult;

/// Page dimensions in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    /// Width in points.
    pub width: f32,
    /// Height in points.
    pub height: f32,
}

impl PageSize {
    /// US Letter, 8.5 × 11 in.
    pub const LETTER: Self = Self {
        width: 612.0,
        height: 792.0,
    };
}

impl Default for PageSize {
    fn default() -> Self {
        Self::LETTER
    }
}

/// Font used for a text run. Only the two Helvetica weights are available.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Font {
    /// Size in points.
    pub size: f32,
    /// Helvetica-Bold instead of Helvetica.
    pub bold: bool,
    /// Fill color.
    pub color: Rgb,
}

impl Font {
    /// Black Helvetica at `size`.
    #[must_use]
    pub fn regular(size: f32) -> Self {
        Self {
            size,
            bold: false,
            color: Rgb::BLACK,
        }
    }

    /// Black Helvetica-Bold at `size`.
    #[must_use]
    pub fn bold(size: f32) -> Self {
        Self {
            bold: true,
            ..Self::regular(size)
        }
    }

    /// Same font in another color.
    #[must_use]
    pub fn colored(self, color: Rgb) -> Self {
        Self { color, ..self }
    }
}

/// Fill and stroke of a rectangle; `None` leaves that part unpainted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectPaint {
    /// Interior color.
    pub fill: Option<Rgb>,
    /// Outline color, drawn 1pt wide.
    pub stroke: Option<Rgb>,
}

/// A surface the composer can draw pages onto.
pub trait DocumentSurface {
    /// Size of every page.
    fn page_size(&self) -> PageSize;

    /// Pages started so far, including the current one.
    fn page_count(&self) -> usize;

    /// Start a new page; later drawing goes there.
    fn new_page(&mut self);

    /// Draw a single line of text whose line box has its top edge at `top`.
    fn draw_text(&mut self, text: &str, x: f32, top: f32, font: Font);

    /// Draw a rectangle with its top-left corner at (`x`, `top`).
    fn draw_rect(&mut self, x: f32, top: f32, width: f32, height: f32, paint: RectPaint);

    /// Place a raster image scaled to `width` × `height`.
    ///
    /// # Errors
    ///
    /// Returns an error when the image cannot be decoded; nothing is drawn
    /// in that case.
    fn draw_image(
        &mut self,
        image: &RenderedImage,
        x: f32,
        top: f32,
        width: f32,
        height: f32,
    ) -> RenderResult<()>;

    /// Advance width of `text` set in `font`.
    fn text_width(&self, text: &str, font: Font) -> f32 {
        text_width(text, font.size, font.bold)
    }
}
