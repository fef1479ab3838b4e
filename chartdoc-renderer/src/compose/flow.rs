//! Page flow: a vertical cursor over a surface that starts new pages when
//! content would cross the bottom margin.

use chartdoc_core::TitleAlign;

use crate::raster::RenderedImage;
use crate::surface::{DocumentSurface, Font};
use crate::RenderResult;

/// Line advance as a multiple of the font size.
pub const LINE_SPACING: f32 = 1.2;

/// Cursor state for one document render. Owned by a single layout pass.
#[derive(Debug)]
pub struct PageFlow<S> {
    surface: S,
    margin: f32,
    y: f32,
    font_size: f32,
}

impl<S: DocumentSurface> PageFlow<S> {
    /// Start at the top margin of the surface's current page.
    pub fn new(surface: S, margin: f32) -> Self {
        Self {
            surface,
            margin,
            y: margin,
            font_size: 12.0,
        }
    }

    /// The surface being drawn on.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the surface.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Hand the surface back.
    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Current cursor position from the page top.
    pub fn y(&self) -> f32 {
        self.y
    }

    /// Left edge of the content area.
    pub fn left(&self) -> f32 {
        self.margin
    }

    /// Width between the side margins.
    pub fn content_width(&self) -> f32 {
        (self.surface.page_size().width - 2.0 * self.margin).max(1.0)
    }

    fn bottom(&self) -> f32 {
        self.surface.page_size().height - self.margin
    }

    /// Pages used so far.
    pub fn pages(&self) -> usize {
        self.surface.page_count()
    }

    /// Font size `move_down` is measured in.
    pub fn set_font_size(&mut self, size: f32) {
        self.font_size = size;
    }

    /// Move the cursor down by `points`.
    pub fn advance(&mut self, points: f32) {
        self.y += points;
    }

    /// Move the cursor down by `lines` lines of the current font.
    pub fn move_down(&mut self, lines: f32) {
        self.y += lines * LINE_SPACING * self.font_size;
    }

    /// Make room for `height` points, starting a new page when the block
    /// would cross the bottom margin. A block taller than a whole page is
    /// placed at the top of the current page rather than looping.
    ///
    /// Returns whether a page was started.
    pub fn ensure_space(&mut self, height: f32) -> bool {
        if self.y + height > self.bottom() && self.y > self.margin {
            self.surface.new_page();
            self.y = self.margin;
            return true;
        }
        false
    }

    /// Word-wrapped text across the content width.
    pub fn text(&mut self, text: &str, font: Font, align: TitleAlign) {
        self.font_size = font.size;
        let line_height = font.size * LINE_SPACING;
        for line in wrap(&self.surface, text, font, self.content_width()) {
            self.ensure_space(line_height);
            let x = match align {
                TitleAlign::Left => self.left(),
                TitleAlign::Center => {
                    let width = self.surface.text_width(&line, font);
                    self.left() + ((self.content_width() - width) / 2.0).max(0.0)
                }
            };
            self.surface.draw_text(&line, x, self.y, font);
            self.y += line_height;
        }
    }

    /// Place an image centered horizontally at `width` points, capped to the
    /// content width, keeping its aspect ratio.
    ///
    /// # Errors
    ///
    /// Propagates the surface's decode error; the cursor is not moved.
    pub fn image(&mut self, image: &RenderedImage, width: f32) -> RenderResult<()> {
        let width = width.min(self.content_width()).max(1.0);
        let height = image.scaled_height(width);
        self.ensure_space(height);
        let x = self.left() + (self.content_width() - width) / 2.0;
        self.surface.draw_image(image, x, self.y, width, height)?;
        self.y += height;
        Ok(())
    }
}

/// Break `text` into lines no wider than `max_width`. Explicit newlines are
/// kept; a single word wider than the line stands alone.
fn wrap<S: DocumentSurface>(surface: &S, text: &str, font: Font, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if !current.is_empty() && surface.text_width(&candidate, font) > max_width {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            } else {
                current = candidate;
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{PageSize, RecordingSurface, SurfaceOp};

    fn flow() -> PageFlow<RecordingSurface> {
        PageFlow::new(RecordingSurface::new(PageSize::LETTER), 50.0)
    }

    #[test]
    fn test_move_down_uses_current_font() {
        let mut flow = flow();
        flow.text("Title", Font::bold(20.0), TitleAlign::Center);
        assert!((flow.y() - 74.0).abs() < 1e-4);
        flow.move_down(1.0);
        assert!((flow.y() - 98.0).abs() < 1e-4);
    }

    #[test]
    fn test_long_text_wraps() {
        let mut flow = flow();
        let text = "word ".repeat(200);
        flow.text(&text, Font::regular(12.0), TitleAlign::Left);
        let surface = flow.into_surface();
        assert!(surface.texts().len() > 1);
        for line in surface.texts() {
            assert!(surface.text_width(line, Font::regular(12.0)) <= 512.0);
        }
    }

    #[test]
    fn test_centered_text_is_offset() {
        let mut flow = flow();
        flow.text("Hi", Font::regular(12.0), TitleAlign::Center);
        let surface = flow.into_surface();
        let SurfaceOp::Text { x, .. } = &surface.ops()[0] else {
            panic!("expected text");
        };
        assert!(*x > 50.0);
    }

    #[test]
    fn test_overflow_starts_a_new_page() {
        let mut flow = flow();
        flow.advance(700.0);
        assert!(flow.ensure_space(100.0));
        assert_eq!(flow.pages(), 2);
        assert!((flow.y() - 50.0).abs() < f32::EPSILON);
        // Already at the top: an oversized block stays put.
        assert!(!flow.ensure_space(5000.0));
        assert_eq!(flow.pages(), 2);
    }

    #[test]
    fn test_image_capped_to_content_width() {
        let mut flow = flow();
        let image = RenderedImage {
            png: Vec::new(),
            width: 1000,
            height: 500,
        };
        flow.image(&image, 800.0).expect("recorded");
        let surface = flow.into_surface();
        let SurfaceOp::Image { x, width, height, .. } = surface.ops()[0] else {
            panic!("expected image");
        };
        assert!((width - 512.0).abs() < 1e-4);
        assert!((height - 256.0).abs() < 1e-4);
        assert!((x - 50.0).abs() < 1e-4);
    }
}
