//! Line charts: one polyline or monotone-ish bezier per dataset.

use std::fmt::Write;

use chartdoc_core::{LineSpec, Series};

use super::cartesian::{draw_axes, Axes, Ticks};
use super::Area;
use crate::options::ChartOptions;
use crate::svg::SvgCanvas;

const POINT_RADIUS: f64 = 3.0;

pub(super) fn draw(canvas: &mut SvgCanvas, area: Area, spec: &LineSpec, options: &ChartOptions) {
    let Some(scales) = &options.scales else {
        return;
    };

    let (lo, hi) = value_range(&spec.datasets, spec.labels.len());
    let ticks = Ticks::covering(lo, hi, scales.y.begin_at_zero);
    let axes = draw_axes(canvas, area, &spec.labels, ticks, scales, false);

    for series in &spec.datasets {
        let points: Vec<(f64, f64)> = series
            .data
            .iter()
            .take(spec.labels.len())
            .enumerate()
            .filter(|(_, v)| v.is_finite())
            .map(|(i, v)| (axes.x_at(i), axes.y_at(*v)))
            .collect();
        draw_series(canvas, &axes, series, &points);
    }
}

fn value_range(datasets: &[Series], categories: usize) -> (f64, f64) {
    datasets
        .iter()
        .flat_map(|s| s.data.iter().take(categories))
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        })
}

fn draw_series(canvas: &mut SvgCanvas, axes: &Axes, series: &Series, points: &[(f64, f64)]) {
    let Some((first, last)) = points.first().zip(points.last()) else {
        return;
    };

    let stroke = curve_path(points, series.tension);

    if series.fill && points.len() > 1 {
        let baseline = axes.baseline();
        let mut area = stroke.clone();
        let _ = write!(
            area,
            " L{:.2},{baseline:.2} L{:.2},{baseline:.2} Z",
            last.0, first.0
        );
        canvas.path(&area, Some(&series.background_color), None);
    }

    canvas.path(
        &stroke,
        None,
        Some((&series.border_color, series.border_width)),
    );

    for (x, y) in points {
        canvas.circle(
            *x,
            *y,
            POINT_RADIUS,
            &series.background_color,
            Some((&series.border_color, 1.0)),
        );
    }
}

/// Path through `points`. With a positive tension each segment is a cubic
/// bezier whose control points follow the neighbouring points.
pub(super) fn curve_path(points: &[(f64, f64)], tension: f64) -> String {
    let mut d = String::new();
    let Some(&(x0, y0)) = points.first() else {
        return d;
    };
    let _ = write!(d, "M{x0:.2},{y0:.2}");

    if tension <= 0.0 || points.len() < 3 {
        for (x, y) in &points[1..] {
            let _ = write!(d, " L{x:.2},{y:.2}");
        }
        return d;
    }

    let controls: Vec<((f64, f64), (f64, f64))> = (0..points.len())
        .map(|i| {
            let current = points[i];
            let previous = if i == 0 { current } else { points[i - 1] };
            let next = points.get(i + 1).copied().unwrap_or(current);
            control_points(previous, current, next, tension)
        })
        .collect();

    for i in 1..points.len() {
        let (_, out) = controls[i - 1];
        let (inc, _) = controls[i];
        let (x, y) = points[i];
        let _ = write!(
            d,
            " C{:.2},{:.2} {:.2},{:.2} {x:.2},{y:.2}",
            out.0, out.1, inc.0, inc.1
        );
    }
    d
}

/// Incoming and outgoing control points for `current`.
fn control_points(
    previous: (f64, f64),
    current: (f64, f64),
    next: (f64, f64),
    tension: f64,
) -> ((f64, f64), (f64, f64)) {
    let d01 = distance(previous, current);
    let d12 = distance(current, next);
    let total = d01 + d12;
    if total <= 0.0 {
        return (current, current);
    }
    let fa = tension * d01 / total;
    let fb = tension * d12 / total;
    let dx = next.0 - previous.0;
    let dy = next.1 - previous.1;
    (
        (current.0 - fa * dx, current.1 - fa * dy),
        (current.0 + fb * dx, current.1 + fb * dy),
    )
}

fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    (b.0 - a.0).hypot(b.1 - a.1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_straight_segments_without_tension() {
        let d = curve_path(&[(0.0, 0.0), (10.0, 5.0), (20.0, 0.0)], 0.0);
        assert_eq!(d, "M0.00,0.00 L10.00,5.00 L20.00,0.00");
    }

    #[test]
    fn test_curves_with_tension() {
        let d = curve_path(&[(0.0, 0.0), (10.0, 5.0), (20.0, 0.0)], 0.4);
        assert_eq!(d.matches(" C").count(), 2);
        assert!(d.ends_with("20.00,0.00"));
    }

    #[test]
    fn test_single_point_path() {
        assert_eq!(curve_path(&[(1.0, 2.0)], 0.1), "M1.00,2.00");
        assert_eq!(curve_path(&[], 0.1), "");
    }

    #[test]
    fn test_range_ignores_points_past_the_labels() {
        let series = Series {
            label: String::new(),
            data: vec![1.0, 5.0, 100.0],
            border_color: "#000000".into(),
            background_color: "#000000".into(),
            border_width: 1.0,
            fill: false,
            tension: 0.0,
            border_radius: 0.0,
            bar_thickness: None,
        };
        assert_eq!(value_range(&[series], 2), (1.0, 5.0));
    }
}
