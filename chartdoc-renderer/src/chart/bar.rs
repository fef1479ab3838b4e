//! Bar charts: grouped or stacked vertical bars.

use chartdoc_core::BarSpec;

use super::cartesian::{draw_axes, Ticks};
use super::Area;
use crate::options::ChartOptions;
use crate::svg::SvgCanvas;

/// Horizontal placement of one dataset's bar inside a category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct BarSlot {
    /// Left edge relative to the category center.
    pub offset: f64,
    /// Bar width.
    pub width: f64,
}

/// Where dataset `index` of `count` sits in a category of `category_width`.
///
/// Stacked categories give every dataset the same slot.
pub(super) fn bar_slot(
    category_width: f64,
    index: usize,
    count: usize,
    options: &ChartOptions,
    stacked: bool,
    thickness: Option<f64>,
) -> BarSlot {
    let used = category_width * options.category_percentage;
    let (slots, position) = if stacked {
        (1, 0)
    } else {
        (count.max(1), index)
    };
    #[allow(clippy::cast_precision_loss)]
    let slot_width = used / slots as f64;
    let width = thickness.unwrap_or(slot_width * options.bar_percentage);
    #[allow(clippy::cast_precision_loss)]
    let slot_left = -used / 2.0 + position as f64 * slot_width;
    BarSlot {
        offset: slot_left + (slot_width - width) / 2.0,
        width,
    }
}

/// Lowest and highest value the axis must show.
fn value_range(spec: &BarSpec, stacked: bool) -> (f64, f64) {
    let categories = spec.labels.len();
    if stacked {
        (0..categories).fold((0.0_f64, 0.0_f64), |(lo, hi), i| {
            let (neg, pos) = spec
                .datasets
                .iter()
                .filter_map(|s| s.data.get(i).copied())
                .filter(|v| v.is_finite())
                .fold((0.0, 0.0), |(n, p), v| {
                    if v < 0.0 {
                        (n + v, p)
                    } else {
                        (n, p + v)
                    }
                });
            (lo.min(neg), hi.max(pos))
        })
    } else {
        spec.datasets
            .iter()
            .flat_map(|s| s.data.iter().take(categories))
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(*v), hi.max(*v))
            })
    }
}

pub(super) fn draw(canvas: &mut SvgCanvas, area: Area, spec: &BarSpec, options: &ChartOptions) {
    let Some(scales) = &options.scales else {
        return;
    };

    let (lo, hi) = value_range(spec, scales.y.stacked);
    // Bars grow from zero; without begin-at-zero the axis still has to reach
    // the bar bases whenever values straddle it.
    let ticks = Ticks::covering(lo, hi, scales.y.begin_at_zero || scales.y.stacked);
    let axes = draw_axes(canvas, area, &spec.labels, ticks, scales, true);
    let count = spec.datasets.len();

    for category in 0..spec.labels.len() {
        let center = axes.x_at(category);
        let mut positive_base = 0.0;
        let mut negative_base = 0.0;

        for (index, series) in spec.datasets.iter().enumerate() {
            let Some(value) = series.data.get(category).copied().filter(|v| v.is_finite()) else {
                continue;
            };
            let slot = bar_slot(
                axes.category_width(),
                index,
                count,
                options,
                scales.x.stacked,
                series.bar_thickness,
            );

            let (start, end) = if scales.y.stacked {
                let base = if value < 0.0 {
                    &mut negative_base
                } else {
                    &mut positive_base
                };
                let start = *base;
                *base += value;
                (start, *base)
            } else {
                (0.0_f64.clamp(ticks.min, ticks.max), value)
            };

            let y_start = axes.y_at(start);
            let y_end = axes.y_at(end);
            let top = y_start.min(y_end);
            let height = (y_start - y_end).abs();
            canvas.rounded_rect(
                center + slot.offset,
                top,
                slot.width,
                height,
                series.border_radius,
                &series.background_color,
                Some((&series.border_color, series.border_width)),
            );
        }
    }
}
