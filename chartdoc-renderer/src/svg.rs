//! Minimal SVG scene builder.
//!
//! Charts and tables are drawn as an SVG document which is then rasterized by
//! resvg. Coordinates are canvas pixels with the origin at the top left.

use std::fmt::Write;

use chartdoc_core::Rgb;

/// Horizontal anchor of a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Text starts at `x`.
    Start,
    /// Text is centered on `x`.
    Middle,
    /// Text ends at `x`.
    End,
}

impl Anchor {
    fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

/// Font settings for a text run.
#[derive(Debug, Clone, Copy)]
pub struct TextStyle<'a> {
    /// Font size in pixels.
    pub size: f64,
    /// Fill color.
    pub color: &'a str,
    /// Bold weight.
    pub bold: bool,
    /// Horizontal anchor.
    pub anchor: Anchor,
}

impl<'a> TextStyle<'a> {
    /// Regular text of `size` in `color`, anchored at its start.
    #[must_use]
    pub fn new(size: f64, color: &'a str) -> Self {
        Self {
            size,
            color,
            bold: false,
            anchor: Anchor::Start,
        }
    }

    /// Same style, bold.
    #[must_use]
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Same style with a different anchor.
    #[must_use]
    pub fn anchored(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }
}

/// Accumulates SVG markup for one canvas.
#[derive(Debug)]
pub struct SvgCanvas {
    buf: String,
    width: u32,
    height: u32,
    font_family: String,
}

impl SvgCanvas {
    /// Start a canvas filled with `background` (RGBA).
    #[must_use]
    pub fn new(width: u32, height: u32, background: [u8; 4], font_family: &str) -> Self {
        let mut buf = String::with_capacity(8192);
        let _ = write!(
            buf,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
        );
        let alpha = f32::from(background[3]) / 255.0;
        let _ = write!(
            buf,
            "<rect width=\"100%\" height=\"100%\" fill=\"rgb({},{},{})\" fill-opacity=\"{alpha}\"/>",
            background[0], background[1], background[2],
        );
        Self {
            buf,
            width,
            height,
            font_family: escape_xml(font_family),
        }
    }

    /// Canvas width in pixels.
    #[must_use]
    pub fn width(&self) -> f64 {
        f64::from(self.width)
    }

    /// Canvas height in pixels.
    #[must_use]
    pub fn height(&self) -> f64 {
        f64::from(self.height)
    }

    /// Axis-aligned rectangle. Either paint may be omitted.
    pub fn rect(
        &mut self,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        fill: Option<&str>,
        stroke: Option<(&str, f64)>,
    ) {
        let _ = write!(
            self.buf,
            "<rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{:.2}\" height=\"{:.2}\"{}{}/>",
            w.max(0.0),
            h.max(0.0),
            fill_attrs(fill),
            stroke_attrs(stroke),
        );
    }

    /// Rectangle with corners rounded by `radius`.
    #[allow(clippy::too_many_arguments)]
    pub fn rounded_rect(
        &mut self,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        radius: f64,
        fill: &str,
        stroke: Option<(&str, f64)>,
    ) {
        let r = radius.min(w / 2.0).min(h / 2.0).max(0.0);
        let _ = write!(
            self.buf,
            "<rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{r:.2}\"{}{}/>",
            w.max(0.0),
            h.max(0.0),
            fill_attrs(Some(fill)),
            stroke_attrs(stroke),
        );
    }

    /// Straight line segment.
    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: &str, width: f64) {
        let _ = write!(
            self.buf,
            "<line x1=\"{x1:.2}\" y1=\"{y1:.2}\" x2=\"{x2:.2}\" y2=\"{y2:.2}\"{}/>",
            stroke_attrs(Some((stroke, width))),
        );
    }

    /// Arbitrary path data.
    pub fn path(&mut self, d: &str, fill: Option<&str>, stroke: Option<(&str, f64)>) {
        let _ = write!(
            self.buf,
            "<path d=\"{d}\"{}{} stroke-linejoin=\"round\"/>",
            fill_attrs(fill),
            stroke_attrs(stroke),
        );
    }

    /// Filled circle.
    pub fn circle(&mut self, cx: f64, cy: f64, r: f64, fill: &str, stroke: Option<(&str, f64)>) {
        let _ = write!(
            self.buf,
            "<circle cx=\"{cx:.2}\" cy=\"{cy:.2}\" r=\"{r:.2}\"{}{}/>",
            fill_attrs(Some(fill)),
            stroke_attrs(stroke),
        );
    }

    /// Single-line text with its baseline at `y`.
    pub fn text(&mut self, x: f64, y: f64, content: &str, style: TextStyle<'_>) {
        self.text_rotated(x, y, content, style, 0.0);
    }

    /// Text rotated by `degrees` around its anchor point.
    pub fn text_rotated(
        &mut self,
        x: f64,
        y: f64,
        content: &str,
        style: TextStyle<'_>,
        degrees: f64,
    ) {
        if content.is_empty() {
            return;
        }
        let weight = if style.bold { "bold" } else { "normal" };
        let rotate = if degrees.abs() < f64::EPSILON {
            String::new()
        } else {
            format!(" transform=\"rotate({degrees} {x:.2} {y:.2})\"")
        };
        let _ = write!(
            self.buf,
            "<text x=\"{x:.2}\" y=\"{y:.2}\" font-size=\"{}\" font-weight=\"{weight}\" font-family=\"{}\" text-anchor=\"{}\"{}{rotate}>{}</text>",
            style.size,
            self.font_family,
            style.anchor.as_str(),
            fill_attrs(Some(style.color)),
            escape_xml(content),
        );
    }

    /// Close the document and return the markup.
    #[must_use]
    pub fn finish(mut self) -> String {
        self.buf.push_str("</svg>");
        self.buf
    }
}

/// Rough advance width of `text` at `size` pixels.
///
/// Used only for legend and label placement, never for clipping.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn estimate_text_width(text: &str, size: f64) -> f64 {
    text.chars().count() as f64 * size * 0.55
}

/// Escape special XML characters.
#[must_use]
pub fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// `fill` attributes. Hex colors carrying an alpha byte are split into a
/// solid color plus `fill-opacity`; anything else is passed through as CSS.
fn fill_attrs(color: Option<&str>) -> String {
    match color {
        None => " fill=\"none\"".to_string(),
        Some(color) => paint_attrs("fill", color),
    }
}

fn stroke_attrs(stroke: Option<(&str, f64)>) -> String {
    match stroke {
        Some((color, width)) if width > 0.0 => {
            format!("{} stroke-width=\"{width}\"", paint_attrs("stroke", color))
        }
        _ => String::new(),
    }
}

fn paint_attrs(attr: &str, color: &str) -> String {
    match Rgb::parse_hex(color) {
        Some(rgb) if rgb.a < 255 => format!(
            " {attr}=\"{}\" {attr}-opacity=\"{:.3}\"",
            rgb.to_hex(),
            rgb.opacity()
        ),
        Some(rgb) => format!(" {attr}=\"{}\"", rgb.to_hex()),
        None => format!(" {attr}=\"{}\"", escape_xml(color)),
    }
}
