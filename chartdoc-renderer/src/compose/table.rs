//! Tables drawn as vector grids straight into the page.

use chartdoc_core::{Rgb, TableSpec};

use super::flow::PageFlow;
use crate::surface::{DocumentSurface, Font, RectPaint};

/// Height of every table row, header included.
pub const ROW_HEIGHT: f32 = 20.0;
/// Gap left under a finished table.
pub const TRAILING_GAP: f32 = 10.0;

struct Grid<'a> {
    left: f32,
    widths: Vec<f32>,
    inset: f32,
    border: Rgb,
    spec: &'a TableSpec,
}

impl Grid<'_> {
    fn draw_row<S: DocumentSurface>(
        &self,
        flow: &mut PageFlow<S>,
        cells: &[String],
        fill: Rgb,
        font: Font,
    ) {
        let top = flow.y();
        let mut x = self.left;
        for (i, width) in self.widths.iter().enumerate() {
            flow.surface_mut().draw_rect(
                x,
                top,
                *width,
                ROW_HEIGHT,
                RectPaint {
                    fill: Some(fill),
                    stroke: Some(self.border),
                },
            );
            if let Some(text) = cells.get(i) {
                let max = (width - 2.0 * self.inset).max(0.0);
                let fitted = fit(flow.surface(), text, font, max);
                let text_top = top + (ROW_HEIGHT - font.size) / 2.0;
                flow.surface_mut()
                    .draw_text(&fitted, x + self.inset, text_top, font);
            }
            x += width;
        }
        flow.advance(ROW_HEIGHT);
    }

    fn draw_header<S: DocumentSurface>(&self, flow: &mut PageFlow<S>) {
        let style = &self.spec.style;
        let font = Font::bold(style.font_size)
            .colored(Rgb::parse_or(&style.header_text_color, Rgb::BLACK));
        let fill = Rgb::parse_or(&style.header_background, Rgb::WHITE);
        self.draw_row(flow, &self.spec.headers, fill, font);
    }
}

/// Draw `spec` at the cursor: header band then alternating rows, with the
/// header repeated at the top of every continuation page. Leaves the cursor
/// [`TRAILING_GAP`] below the last row.
pub fn draw<S: DocumentSurface>(flow: &mut PageFlow<S>, spec: &TableSpec) {
    let style = &spec.style;
    let content_width = flow.content_width();
    let widths = spec.column_widths.clone().unwrap_or_else(|| {
        #[allow(clippy::cast_precision_loss)]
        let even = content_width / spec.headers.len().max(1) as f32;
        vec![even; spec.headers.len()]
    });
    let grid = Grid {
        left: flow.left(),
        widths,
        inset: style.cell_padding,
        border: Rgb::parse_or(&style.border_color, Rgb::BLACK),
        spec,
    };

    flow.ensure_space(ROW_HEIGHT * 2.0);
    grid.draw_header(flow);

    let body = Font::regular(style.font_size).colored(Rgb::parse_or(&style.text_color, Rgb::BLACK));
    let even = Rgb::parse_or(&style.row_background, Rgb::WHITE);
    let odd = Rgb::parse_or(&style.alternate_row_background, Rgb::WHITE);
    for (index, row) in spec.cells().iter().enumerate() {
        if flow.ensure_space(ROW_HEIGHT) {
            grid.draw_header(flow);
        }
        let fill = if index % 2 == 0 { even } else { odd };
        grid.draw_row(flow, row, fill, body);
    }

    flow.set_font_size(style.font_size);
    flow.advance(TRAILING_GAP);
}

/// Shorten `text` with a trailing "..." until it fits `max_width`.
///
/// Glyph widths are additive, so the cut point is found in one pass.
fn fit<S: DocumentSurface>(surface: &S, text: &str, font: Font, max_width: f32) -> String {
    if surface.text_width(text, font) <= max_width {
        return text.to_string();
    }
    let budget = max_width - surface.text_width("...", font);
    if budget < 0.0 {
        return String::new();
    }
    let mut buf = [0u8; 4];
    let mut width = 0.0;
    let mut cut = 0;
    for (index, c) in text.char_indices() {
        width += surface.text_width(c.encode_utf8(&mut buf), font);
        if width > budget {
            break;
        }
        cut = index + c.len_utf8();
    }
    format!("{}...", &text[..cut])
}
