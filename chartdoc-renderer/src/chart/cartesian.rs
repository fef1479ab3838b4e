//! Shared axes for line and bar charts.

use super::{Area, INK};
use crate::options::{ScaleOptions, LABEL_SIZE};
use crate::svg::{estimate_text_width, Anchor, SvgCanvas, TextStyle};

const GRID_COLOR: &str = "#e5e5e5";
const AXIS_COLOR: &str = "#bdbdbd";
const TICK_GAP: f64 = 8.0;
const MAX_TICKS: usize = 8;

/// Value range of the y axis after rounding to nice tick steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Ticks {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Ticks {
    /// Ticks covering `[lo, hi]`, widened to include zero when asked.
    pub fn covering(lo: f64, hi: f64, include_zero: bool) -> Self {
        let (mut lo, mut hi) = if lo.is_finite() && hi.is_finite() {
            (lo, hi)
        } else {
            (0.0, 1.0)
        };
        if include_zero {
            lo = lo.min(0.0);
            hi = hi.max(0.0);
        }
        if (hi - lo).abs() < f64::EPSILON {
            // A flat series still needs a visible range around it.
            if hi.abs() < f64::EPSILON {
                hi = 1.0;
                if !include_zero {
                    lo = -1.0;
                }
            } else {
                let pad = hi.abs() * 0.1;
                lo -= pad;
                hi += pad;
            }
        }
        if !(hi - lo).is_finite() {
            // The span of extreme values overflows; keep the range representable.
            let limit = f64::MAX / 4.0;
            lo = lo.clamp(-limit, limit);
            hi = hi.clamp(-limit, limit);
        }
        #[allow(clippy::cast_precision_loss)]
        let step = nice_number((hi - lo) / (MAX_TICKS - 1) as f64);
        Self {
            min: (lo / step).floor() * step,
            max: (hi / step).ceil() * step,
            step,
        }
    }

    /// Tick positions from `min` to `max`, computed by index so the count is
    /// bounded even when `step` is below the precision of the values.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn values(&self) -> Vec<f64> {
        let intervals = ((self.max - self.min) / self.step).round();
        let count = if intervals.is_finite() && intervals > 0.0 {
            (intervals.min((MAX_TICKS + 2) as f64)) as usize
        } else {
            0
        };
        (0..=count)
            .map(|i| self.min + i as f64 * self.step)
            .collect()
    }
}

/// Smallest of 1, 2, 5 × 10ⁿ not below `raw`.
fn nice_number(raw: f64) -> f64 {
    if raw <= 0.0 || !raw.is_finite() {
        return 1.0;
    }
    let exponent = raw.log10().floor();
    let magnitude = 10f64.powf(exponent);
    let fraction = raw / magnitude;
    let nice = if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Tick label: integers without decimals, fractions trimmed to two places.
pub(crate) fn format_tick(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract().abs() < 1e-9 {
        format!("{rounded:.0}")
    } else {
        let text = format!("{rounded:.2}");
        text.trim_end_matches('0').to_string()
    }
}

/// Resolved mapping from data space to canvas pixels.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Axes {
    pub plot: Area,
    ticks: Ticks,
    categories: usize,
    offset: bool,
}

impl Axes {
    /// Canvas y of `value`.
    pub fn y_at(&self, value: f64) -> f64 {
        let span = self.ticks.max - self.ticks.min;
        if span <= 0.0 {
            return self.plot.bottom();
        }
        self.plot.bottom() - (value - self.ticks.min) / span * self.plot.h
    }

    /// Canvas y of the value baseline: zero clamped into the range.
    pub fn baseline(&self) -> f64 {
        self.y_at(0.0_f64.clamp(self.ticks.min, self.ticks.max))
    }

    /// Width of one category slot.
    #[allow(clippy::cast_precision_loss)]
    pub fn category_width(&self) -> f64 {
        self.plot.w / self.categories.max(1) as f64
    }

    /// Canvas x of category `index`.
    ///
    /// With an offset axis categories sit at slot centers (bars); without, the
    /// first and last categories touch the plot edges (lines).
    #[allow(clippy::cast_precision_loss)]
    pub fn x_at(&self, index: usize) -> f64 {
        if self.offset {
            return self.plot.x + (index as f64 + 0.5) * self.category_width();
        }
        if self.categories <= 1 {
            return self.plot.center_x();
        }
        self.plot.x + index as f64 * self.plot.w / (self.categories - 1) as f64
    }
}

/// Draw grid, ticks and axis titles in `area`; returns the data mapping.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn draw_axes(
    canvas: &mut SvgCanvas,
    area: Area,
    labels: &[String],
    ticks: Ticks,
    scales: &ScaleOptions,
    offset: bool,
) -> Axes {
    let tick_values = ticks.values();
    let tick_labels: Vec<String> = tick_values.iter().copied().map(format_tick).collect();
    let label_width = tick_labels
        .iter()
        .map(|t| estimate_text_width(t, LABEL_SIZE))
        .fold(0.0_f64, f64::max);

    let mut plot = area;
    if scales.y.title.is_some() {
        plot = plot.split_left(LABEL_SIZE + TICK_GAP * 2.0).1;
    }
    plot = plot.split_left(label_width + TICK_GAP).1;
    if scales.x.title.is_some() {
        plot = plot.split_bottom(LABEL_SIZE + TICK_GAP * 2.0).1;
    }
    plot = plot.split_bottom(LABEL_SIZE + TICK_GAP * 2.0).1;
    // Keep room for the last x label to overhang the plot.
    plot.w = (plot.w - LABEL_SIZE).max(0.0);
    plot.y += LABEL_SIZE / 2.0;
    plot.h = (plot.h - LABEL_SIZE / 2.0).max(0.0);

    let axes = Axes {
        plot,
        ticks,
        categories: labels.len(),
        offset,
    };

    for (value, text) in tick_values.iter().zip(&tick_labels) {
        let y = axes.y_at(*value);
        if scales.y.grid {
            canvas.line(plot.x, y, plot.right(), y, GRID_COLOR, 1.0);
        }
        canvas.text(
            plot.x - TICK_GAP,
            y + LABEL_SIZE * 0.35,
            text,
            TextStyle::new(LABEL_SIZE, INK).anchored(Anchor::End),
        );
    }

    for (i, label) in labels.iter().enumerate() {
        let x = axes.x_at(i);
        if scales.x.grid {
            let grid_x = if offset {
                plot.x + axes.category_width() * i as f64
            } else {
                x
            };
            canvas.line(grid_x, plot.y, grid_x, plot.bottom(), GRID_COLOR, 1.0);
        }
        canvas.text(
            x,
            plot.bottom() + TICK_GAP + LABEL_SIZE,
            label,
            TextStyle::new(LABEL_SIZE, INK).anchored(Anchor::Middle),
        );
    }

    canvas.line(plot.x, plot.y, plot.x, plot.bottom(), AXIS_COLOR, 1.0);
    canvas.line(plot.x, plot.bottom(), plot.right(), plot.bottom(), AXIS_COLOR, 1.0);

    if let Some(title) = &scales.x.title {
        canvas.text(
            plot.center_x(),
            area.bottom() - TICK_GAP / 2.0,
            title,
            TextStyle::new(LABEL_SIZE, INK).bold().anchored(Anchor::Middle),
        );
    }
    if let Some(title) = &scales.y.title {
        let x = area.x + LABEL_SIZE;
        let y = plot.center_y();
        canvas.text_rotated(
            x,
            y,
            title,
            TextStyle::new(LABEL_SIZE, INK).bold().anchored(Anchor::Middle),
            -90.0,
        );
    }

    axes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nice_number_steps() {
        assert!((nice_number(0.7) - 1.0).abs() < 1e-9);
        assert!((nice_number(1.5) - 2.0).abs() < 1e-9);
        assert!((nice_number(33.0) - 50.0).abs() < 1e-9);
        assert!((nice_number(70.0) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_ticks_include_zero_when_asked() {
        let ticks = Ticks::covering(12.0, 95.0, true);
        assert!(ticks.min.abs() < 1e-9);
        assert!(ticks.max >= 95.0);

        let ticks = Ticks::covering(112.0, 195.0, false);
        assert!(ticks.min > 0.0 && ticks.min <= 112.0);
    }

    #[test]
    fn test_flat_series_gets_a_range() {
        let ticks = Ticks::covering(0.0, 0.0, true);
        assert!(ticks.max > ticks.min);
        let ticks = Ticks::covering(5.0, 5.0, false);
        assert!(ticks.min < 5.0 && ticks.max > 5.0);
    }

    #[test]
    fn test_extreme_values_give_bounded_ticks() {
        let ticks = Ticks::covering(-1e308, 1e308, true);
        assert!(ticks.min.is_finite() && ticks.max.is_finite());
        assert!(ticks.step.is_finite() && ticks.step > 0.0);
        let values = ticks.values();
        assert!(values.len() >= 2 && values.len() <= MAX_TICKS + 3);
        assert!(values.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_step_below_value_precision_terminates() {
        let ticks = Ticks::covering(1e17, 1e17 + 16.0, false);
        let values = ticks.values();
        assert!(!values.is_empty());
        assert!(values.len() <= MAX_TICKS + 3);

        let degenerate = Ticks {
            min: 1e308,
            max: 1.5e308,
            step: 1.0,
        };
        assert_eq!(degenerate.values().len(), MAX_TICKS + 3);
    }

    #[test]
    fn test_typical_ticks_unchanged() {
        let ticks = Ticks::covering(0.0, 10.0, true);
        assert_eq!(ticks.values(), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
    }

    #[test]
    fn test_tick_format() {
        assert_eq!(format_tick(20.0), "20");
        assert_eq!(format_tick(0.5), "0.5");
        assert_eq!(format_tick(-2.25), "-2.25");
    }

    #[test]
    fn test_category_positions() {
        let plot = Area {
            x: 0.0,
            y: 0.0,
            w: 100.0,
            h: 100.0,
        };
        let ticks = Ticks::covering(0.0, 10.0, true);
        let lines = Axes {
            plot,
            ticks,
            categories: 3,
            offset: false,
        };
        assert!(lines.x_at(0).abs() < 1e-9);
        assert!((lines.x_at(2) - 100.0).abs() < 1e-9);

        let bars = Axes { offset: true, ..lines };
        assert!((bars.x_at(0) - 100.0 / 6.0).abs() < 1e-9);
        assert!((bars.y_at(ticks.min) - 100.0).abs() < 1e-9);
        assert!((bars.baseline() - 100.0).abs() < 1e-9);
    }
}
