//! Legend band: a colored box and a label per series or slice.

use chartdoc_core::LegendPosition;

use super::{Area, INK};
use crate::options::LABEL_SIZE;
use crate::svg::{estimate_text_width, SvgCanvas, TextStyle};

const BOX_WIDTH: f64 = 40.0;
const BOX_HEIGHT: f64 = LABEL_SIZE;
const ITEM_GAP: f64 = 10.0;
const LINE_HEIGHT: f64 = LABEL_SIZE + 10.0;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LegendItem {
    label: String,
    fill: String,
    stroke: String,
}

impl LegendItem {
    pub fn new(label: &str, fill: &str, stroke: &str) -> Self {
        Self {
            label: label.to_string(),
            fill: fill.to_string(),
            stroke: stroke.to_string(),
        }
    }

    fn width(&self) -> f64 {
        BOX_WIDTH + 6.0 + estimate_text_width(&self.label, LABEL_SIZE)
    }
}

/// Lay the legend out in its band and return the remaining area.
///
/// Items without a label are skipped; with none left the area is untouched.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn draw(
    canvas: &mut SvgCanvas,
    area: Area,
    items: &[LegendItem],
    position: LegendPosition,
) -> Area {
    let items: Vec<&LegendItem> = items.iter().filter(|i| !i.label.is_empty()).collect();
    if items.is_empty() {
        return area;
    }

    match position {
        LegendPosition::Top | LegendPosition::Bottom => {
            let rows = wrap_rows(&items, area.w);
            let height = rows.len() as f64 * LINE_HEIGHT + ITEM_GAP;
            let (band, rest) = if position == LegendPosition::Top {
                area.split_top(height)
            } else {
                area.split_bottom(height)
            };
            let mut y = if position == LegendPosition::Top {
                band.y
            } else {
                band.y + ITEM_GAP
            };
            for row in rows {
                let row_width: f64 = row.iter().map(|i| i.width()).sum::<f64>()
                    + ITEM_GAP * row.len().saturating_sub(1) as f64;
                let mut x = band.center_x() - row_width / 2.0;
                for item in row {
                    draw_item(canvas, x, y, item);
                    x += item.width() + ITEM_GAP;
                }
                y += LINE_HEIGHT;
            }
            rest
        }
        LegendPosition::Left | LegendPosition::Right => {
            let widest = items.iter().map(|i| i.width()).fold(0.0_f64, f64::max);
            let width = (widest + 2.0 * ITEM_GAP).min(area.w / 2.0);
            let (band, rest) = if position == LegendPosition::Left {
                area.split_left(width)
            } else {
                area.split_right(width)
            };
            let total = items.len() as f64 * LINE_HEIGHT;
            let mut y = band.center_y() - total / 2.0;
            for item in items {
                draw_item(canvas, band.x + ITEM_GAP, y, item);
                y += LINE_HEIGHT;
            }
            rest
        }
    }
}

fn draw_item(canvas: &mut SvgCanvas, x: f64, y: f64, item: &LegendItem) {
    canvas.rect(
        x,
        y,
        BOX_WIDTH,
        BOX_HEIGHT,
        Some(&item.fill),
        Some((&item.stroke, 1.0)),
    );
    canvas.text(
        x + BOX_WIDTH + 6.0,
        y + BOX_HEIGHT * 0.85,
        &item.label,
        TextStyle::new(LABEL_SIZE, INK),
    );
}

/// Greedy line wrapping of legend items into rows no wider than `max_width`.
fn wrap_rows<'a>(items: &[&'a LegendItem], max_width: f64) -> Vec<Vec<&'a LegendItem>> {
    let mut rows: Vec<Vec<&LegendItem>> = Vec::new();
    let mut current: Vec<&LegendItem> = Vec::new();
    let mut used = 0.0;
    for item in items {
        let needed = item.width() + if current.is_empty() { 0.0 } else { ITEM_GAP };
        if !current.is_empty() && used + needed > max_width {
            rows.push(std::mem::take(&mut current));
            used = 0.0;
        }
        used += item.width() + if current.is_empty() { 0.0 } else { ITEM_GAP };
        current.push(item);
    }
    if !current.is_empty() {
        rows.push(current);
    }
    rows
}
