//! SVG → PNG rasterization via resvg and tiny-skia.

use std::sync::Arc;

use usvg::fontdb;

use crate::error::{RenderError, RenderResult};

/// Sans-serif families tried in order when mapping the generic `sans-serif`.
const SANS_CANDIDATES: [&str; 6] = [
    "Arial",
    "Helvetica",
    "Liberation Sans",
    "DejaVu Sans",
    "Noto Sans",
    "Roboto",
];

/// PNG bytes plus the pixel size they decode to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    /// Encoded PNG.
    pub png: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl RenderedImage {
    /// Height a placement of `display_width` keeps the aspect ratio at.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn scaled_height(&self, display_width: f32) -> f32 {
        if self.width == 0 {
            return 0.0;
        }
        display_width * self.height as f32 / self.width as f32
    }
}

/// Turns SVG markup into pixels. Holds the font database so that system fonts
/// are scanned once per process rather than once per chart.
#[derive(Debug)]
pub struct Rasterizer {
    fontdb: Arc<fontdb::Database>,
    font_family: String,
}

impl Rasterizer {
    /// Build a rasterizer, optionally loading the system fonts.
    #[must_use]
    pub fn new(load_system_fonts: bool) -> Self {
        let mut db = fontdb::Database::new();
        if load_system_fonts {
            db.load_system_fonts();
        }

        let family = SANS_CANDIDATES
            .iter()
            .find(|name| has_family(&db, name))
            .map(|name| (*name).to_string())
            .or_else(|| {
                db.faces()
                    .next()
                    .and_then(|face| face.families.first())
                    .map(|(name, _)| name.clone())
            });

        match &family {
            Some(name) => {
                db.set_sans_serif_family(name.clone());
                tracing::debug!(family = %name, faces = db.len(), "font database ready");
            }
            None => tracing::warn!("no fonts available, chart text will not be drawn"),
        }

        Self {
            fontdb: Arc::new(db),
            font_family: family.unwrap_or_else(|| "sans-serif".to_string()),
        }
    }

    /// Number of font faces available to text runs.
    #[must_use]
    pub fn font_count(&self) -> usize {
        self.fontdb.len()
    }

    /// Rasterize an SVG document to a pixmap of its declared size.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Svg`] when the markup does not parse and
    /// [`RenderError::Rasterize`] when the pixmap cannot be allocated.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn rasterize(&self, svg: &str) -> RenderResult<tiny_skia::Pixmap> {
        let mut opt = usvg::Options::default();
        opt.fontdb = Arc::clone(&self.fontdb);
        opt.font_family.clone_from(&self.font_family);

        let tree = usvg::Tree::from_str(svg, &opt).map_err(|e| RenderError::Svg(e.to_string()))?;

        let px_w = tree.size().width().ceil() as u32;
        let px_h = tree.size().height().ceil() as u32;

        let mut pixmap = tiny_skia::Pixmap::new(px_w.max(1), px_h.max(1))
            .ok_or_else(|| RenderError::Rasterize(format!("cannot allocate {px_w}x{px_h} pixmap")))?;

        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

        Ok(pixmap)
    }

    /// Rasterize and encode as PNG.
    ///
    /// # Errors
    ///
    /// Propagates [`Self::rasterize`] errors and returns
    /// [`RenderError::Encode`] when encoding fails.
    pub fn render_png(&self, svg: &str) -> RenderResult<RenderedImage> {
        let pixmap = self.rasterize(svg)?;
        let (width, height) = (pixmap.width(), pixmap.height());
        let png = pixmap
            .encode_png()
            .map_err(|e| RenderError::Encode(e.to_string()))?;
        Ok(RenderedImage { png, width, height })
    }
}

fn has_family(db: &fontdb::Database, name: &str) -> bool {
    db.faces()
        .any(|face| face.families.iter().any(|(family, _)| family == name))
}
