//! Tables rendered to a raster image.

use chartdoc_core::table::ROW_HEIGHT;
use chartdoc_core::TableSpec;

use crate::svg::{Anchor, SvgCanvas, TextStyle};

/// Top of the header band without a title.
const HEADER_TOP: f64 = 10.0;
/// Extra offset of the header band when a title is drawn above it.
const TITLE_OFFSET: f64 = 20.0;
/// Vertical center of the title line.
const TITLE_CENTER: f64 = 20.0;

/// Top edge of the header band.
#[must_use]
pub(crate) fn header_top(spec: &TableSpec) -> f64 {
    if spec.title.is_some() {
        HEADER_TOP + TITLE_OFFSET
    } else {
        HEADER_TOP
    }
}

/// Draw a bordered grid: header band, then rows alternating between the two
/// row backgrounds. Columns share the width between the side margins.
pub(crate) fn draw(canvas: &mut SvgCanvas, spec: &TableSpec) {
    let style = &spec.style;
    let font = f64::from(style.font_size);
    let row_height = f64::from(ROW_HEIGHT);
    let left = f64::from(style.margin_left);
    let table_width = (canvas.width() - left - f64::from(style.margin_right)).max(0.0);
    #[allow(clippy::cast_precision_loss)]
    let column_width = table_width / spec.headers.len().max(1) as f64;
    let border = Some((style.border_color.as_str(), 1.0));

    if let Some(title) = &spec.title {
        canvas.text(
            canvas.width() / 2.0,
            TITLE_CENTER + (font + 4.0) * 0.35,
            title,
            TextStyle::new(font + 4.0, &style.text_color)
                .bold()
                .anchored(Anchor::Middle),
        );
    }

    let top = header_top(spec);
    let header_style = TextStyle::new(font, &style.header_text_color)
        .bold()
        .anchored(Anchor::Middle);
    for (i, header) in spec.headers.iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let x = left + i as f64 * column_width;
        canvas.rect(
            x,
            top,
            column_width,
            row_height,
            Some(&style.header_background),
            border,
        );
        canvas.text(
            x + column_width / 2.0,
            top + row_height / 2.0 + font * 0.35,
            header,
            header_style,
        );
    }

    let cell_style = TextStyle::new(font, &style.text_color)
        .bold()
        .anchored(Anchor::Middle);
    for (row_index, row) in spec.cells().iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let y = top + row_height * (row_index + 1) as f64;
        let background = if row_index % 2 == 0 {
            &style.row_background
        } else {
            &style.alternate_row_background
        };
        for (col, cell) in row.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let x = left + col as f64 * column_width;
            canvas.rect(x, y, column_width, row_height, Some(background), border);
            canvas.text(
                x + column_width / 2.0,
                y + row_height / 2.0 + font * 0.35,
                cell,
                cell_style,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chartdoc_core::{normalize, ElementKind, NormalizedSpec};
    use serde_json::json;

    fn table(raw: &serde_json::Value) -> TableSpec {
        match normalize(ElementKind::Table, raw).expect("valid table") {
            NormalizedSpec::Table(spec) => spec,
            other => panic!("expected table, got {other:?}"),
        }
    }

    fn render(spec: &TableSpec) -> String {
        let mut canvas = SvgCanvas::new(spec.width, spec.height, [255; 4], "sans-serif");
        draw(&mut canvas, spec);
        canvas.finish()
    }

    #[test]
    fn test_title_pushes_header_down() {
        let plain = table(&json!({"headers": ["A"], "rows": [{"A": 1}]}));
        let titled = table(&json!({"headers": ["A"], "rows": [{"A": 1}], "title": "T"}));
        assert!((header_top(&titled) - header_top(&plain) - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rows_alternate_backgrounds() {
        let spec = table(&json!({
            "headers": ["A"],
            "rows": [{"A": 1}, {"A": 2}, {"A": 3}],
            "rowBackground": "#111111",
            "alternateRowBackground": "#222222"
        }));
        let svg = render(&spec);
        assert_eq!(svg.matches("fill=\"#111111\"").count(), 2);
        assert_eq!(svg.matches("fill=\"#222222\"").count(), 1);
    }

    #[test]
    fn test_missing_cells_draw_no_text() {
        let spec = table(&json!({"headers": ["A", "B"], "rows": [{"A": "x"}]}));
        let svg = render(&spec);
        // Two headers plus one non-empty cell.
        assert_eq!(svg.matches("<text").count(), 3);
        // Two header cells plus two body cells, plus the background.
        assert_eq!(svg.matches("<rect").count(), 5);
    }
}
