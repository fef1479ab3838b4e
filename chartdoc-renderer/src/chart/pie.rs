//! Pie charts with percentage labels inside each slice.

use std::f64::consts::{FRAC_PI_2, TAU};

use chartdoc_core::PieSpec;

use super::Area;
use crate::options::{slice_label, slice_percentages, ChartOptions};
use crate::svg::{Anchor, SvgCanvas, TextStyle};

const SLICE_BORDER: &str = "#ffffff";
const SLICE_BORDER_WIDTH: f64 = 1.0;
/// Labels sit this far out along the slice's bisector, as a fraction of the
/// radius.
const LABEL_RADIUS: f64 = 0.65;

pub(super) fn draw(canvas: &mut SvgCanvas, area: Area, spec: &PieSpec, options: &ChartOptions) {
    let radius = (area.w.min(area.h) / 2.0).max(1.0);
    let (cx, cy) = (area.center_x(), area.center_y());

    let positive_total: f64 = spec.values.iter().filter(|v| **v > 0.0).sum();
    if positive_total <= 0.0 {
        return;
    }

    let mut angle = -FRAC_PI_2;
    let mut label_anchors = Vec::with_capacity(spec.values.len());
    for (value, color) in spec.values.iter().zip(&spec.colors) {
        let sweep = value.max(0.0) / positive_total * TAU;
        label_anchors.push(angle + sweep / 2.0);
        if sweep > 0.0 {
            draw_slice(canvas, cx, cy, radius, angle, sweep, color);
        }
        angle += sweep;
    }

    let Some(labels) = &options.datalabels else {
        return;
    };
    let percentages = slice_percentages(&spec.values);
    for ((label, pct), (mid, value)) in spec
        .labels
        .iter()
        .zip(percentages)
        .zip(label_anchors.into_iter().zip(&spec.values))
    {
        if *value <= 0.0 {
            continue;
        }
        let x = cx + radius * LABEL_RADIUS * mid.cos();
        let y = cy + radius * LABEL_RADIUS * mid.sin();
        let mut style = TextStyle::new(labels.size, &labels.color).anchored(Anchor::Middle);
        if labels.bold {
            style = style.bold();
        }
        let text = slice_label(label, pct);
        let lines: Vec<&str> = text.lines().collect();
        #[allow(clippy::cast_precision_loss)]
        let first_baseline = y - (lines.len() as f64 - 1.0) * labels.size / 2.0 + labels.size * 0.35;
        for (i, line) in lines.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let baseline = first_baseline + i as f64 * labels.size;
            canvas.text(x, baseline, line, style);
        }
    }
}

fn draw_slice(
    canvas: &mut SvgCanvas,
    cx: f64,
    cy: f64,
    radius: f64,
    start: f64,
    sweep: f64,
    color: &str,
) {
    let stroke = Some((SLICE_BORDER, SLICE_BORDER_WIDTH));
    if sweep >= TAU - 1e-9 {
        canvas.circle(cx, cy, radius, color, stroke);
        return;
    }
    let end = start + sweep;
    let (x1, y1) = (cx + radius * start.cos(), cy + radius * start.sin());
    let (x2, y2) = (cx + radius * end.cos(), cy + radius * end.sin());
    let large_arc = i32::from(sweep > std::f64::consts::PI);
    canvas.path(
        &format!(
            "M{cx:.2},{cy:.2} L{x1:.2},{y1:.2} A{radius:.2},{radius:.2} 0 {large_arc},1 {x2:.2},{y2:.2} Z"
        ),
        Some(color),
        stroke,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use chartdoc_core::{normalize, ElementKind, NormalizedSpec};
    use serde_json::json;

    fn render(raw: &serde_json::Value) -> String {
        let NormalizedSpec::Pie(spec) = normalize(ElementKind::Pie, raw).expect("valid pie") else {
            panic!("expected pie");
        };
        let mut canvas = SvgCanvas::new(spec.width, spec.height, [255; 4], "sans-serif");
        let area = Area {
            x: 0.0,
            y: 0.0,
            w: canvas.width(),
            h: canvas.height(),
        };
        draw(&mut canvas, area, &spec, &ChartOptions::pie(&spec));
        canvas.finish()
    }

    #[test]
    fn test_one_path_and_two_label_lines_per_slice() {
        let svg = render(&json!({"data": [1, 2, 3], "labels": ["a", "b", "c"]}));
        assert_eq!(svg.matches("<path").count(), 3);
        assert!(svg.contains(">16.7%<"));
        assert!(svg.contains(">50.0%<"));
    }

    #[test]
    fn test_single_slice_is_a_full_circle() {
        let svg = render(&json!({"data": [5], "labels": ["all"]}));
        assert!(svg.contains("<circle"));
        assert!(svg.contains(">100.0%<"));
    }

    #[test]
    fn test_zero_slices_are_skipped() {
        let svg = render(&json!({"data": [0, 4], "labels": ["none", "some"]}));
        assert!(!svg.contains(">none<"));
        assert!(svg.contains(">some<"));
    }

    #[test]
    fn test_all_zero_draws_nothing() {
        let svg = render(&json!({"data": [0, 0], "labels": ["a", "b"]}));
        assert!(!svg.contains("<path"));
    }
}
