//! printpdf-backed surface.

use chartdoc_core::Rgb;
use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Pt, Rect,
};

use super::{DocumentSurface, Font, PageSize, RectPaint};
use crate::error::{RenderError, RenderResult};
use crate::raster::RenderedImage;

/// Distance from the top of a line box to the baseline, in em.
const ASCENT: f32 = 0.718;
/// At 72 dpi one image pixel maps to one point.
const IMAGE_DPI: f32 = 72.0;

/// Writes pages into an in-memory PDF document using the standard
/// Helvetica faces.
pub struct PdfSurface {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    size: PageSize,
    pages: usize,
}

impl std::fmt::Debug for PdfSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfSurface")
            .field("size", &self.size)
            .field("pages", &self.pages)
            .finish_non_exhaustive()
    }
}

impl PdfSurface {
    /// Open a document with one empty page.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Pdf`] when the built-in fonts cannot be added.
    pub fn new(title: &str, size: PageSize) -> RenderResult<Self> {
        let (doc, page, layer) =
            PdfDocument::new(title, pt_to_mm(size.width), pt_to_mm(size.height), "Page 1");
        let layer = doc.get_page(page).get_layer(layer);
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            size,
            pages: 1,
        })
    }

    /// Serialize the document.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Pdf`] when the document cannot be written.
    pub fn finish(self) -> RenderResult<Vec<u8>> {
        self.doc
            .save_to_bytes()
            .map_err(|e| RenderError::Pdf(e.to_string()))
    }

    /// PDF y (from the bottom) of a point `top` points below the page top.
    fn flip(&self, top: f32) -> f32 {
        self.size.height - top
    }
}

impl DocumentSurface for PdfSurface {
    fn page_size(&self) -> PageSize {
        self.size
    }

    fn page_count(&self) -> usize {
        self.pages
    }

    fn new_page(&mut self) {
        self.pages += 1;
        let (page, layer) = self.doc.add_page(
            pt_to_mm(self.size.width),
            pt_to_mm(self.size.height),
            format!("Page {}", self.pages),
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
    }

    fn draw_text(&mut self, text: &str, x: f32, top: f32, font: Font) {
        if text.is_empty() {
            return;
        }
        let face = if font.bold { &self.bold } else { &self.regular };
        let baseline = self.flip(top + font.size * ASCENT);
        self.layer.set_fill_color(pdf_color(font.color));
        self.layer
            .use_text(text, font.size, pt_to_mm(x), pt_to_mm(baseline), face);
    }

    fn draw_rect(&mut self, x: f32, top: f32, width: f32, height: f32, paint: RectPaint) {
        let mode = match (paint.fill, paint.stroke) {
            (Some(_), Some(_)) => PaintMode::FillStroke,
            (Some(_), None) => PaintMode::Fill,
            (None, Some(_)) => PaintMode::Stroke,
            (None, None) => return,
        };
        if let Some(fill) = paint.fill {
            self.layer.set_fill_color(pdf_color(fill));
        }
        if let Some(stroke) = paint.stroke {
            self.layer.set_outline_color(pdf_color(stroke));
            self.layer.set_outline_thickness(1.0);
        }
        let rect = Rect::new(
            pt_to_mm(x),
            pt_to_mm(self.flip(top + height)),
            pt_to_mm(x + width),
            pt_to_mm(self.flip(top)),
        )
        .with_mode(mode);
        self.layer.add_rect(rect);
    }

    #[allow(clippy::cast_precision_loss)]
    fn draw_image(
        &mut self,
        image: &RenderedImage,
        x: f32,
        top: f32,
        width: f32,
        height: f32,
    ) -> RenderResult<()> {
        let decoded = printpdf::image_crate::load_from_memory(&image.png)
            .map_err(|e| RenderError::Image(e.to_string()))?;
        // The chart background is opaque; dropping alpha avoids a soft mask.
        let buffer = decoded.to_rgb8();
        let (px_w, px_h) = (buffer.width().max(1) as f32, buffer.height().max(1) as f32);
        let rgb = printpdf::image_crate::DynamicImage::ImageRgb8(buffer);

        let transform = ImageTransform {
            translate_x: Some(pt_to_mm(x)),
            translate_y: Some(pt_to_mm(self.flip(top + height))),
            scale_x: Some(width / px_w),
            scale_y: Some(height / px_h),
            dpi: Some(IMAGE_DPI),
            ..ImageTransform::default()
        };
        Image::from_dynamic_image(&rgb).add_to_layer(self.layer.clone(), transform);
        Ok(())
    }
}

fn pt_to_mm(points: f32) -> Mm {
    Mm::from(Pt(points))
}

fn pdf_color(color: Rgb) -> Color {
    let (r, g, b) = color.to_unit();
    Color::Rgb(printpdf::Rgb::new(r, g, b, None))
}
