//! Chart drawers.
//!
//! Each chart is laid out top-down: title band, legend band, then the plot in
//! whatever area remains.

mod bar;
mod cartesian;
mod legend;
mod line;
mod pie;

use chartdoc_core::{BarSpec, LineSpec, PieSpec};

use crate::options::{ChartOptions, TitleOptions};
use crate::svg::{Anchor, SvgCanvas, TextStyle};

pub(crate) use legend::LegendItem;

/// Outer padding around every chart.
const PADDING: f64 = 10.0;
/// Text color of chart furniture.
pub(crate) const INK: &str = "#666666";

/// An axis-aligned region of the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Area {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Area {
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.w / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.h / 2.0
    }

    /// Shrink by `amount` on every side; never below zero size.
    pub fn inset(&self, amount: f64) -> Self {
        Self {
            x: self.x + amount,
            y: self.y + amount,
            w: (self.w - 2.0 * amount).max(0.0),
            h: (self.h - 2.0 * amount).max(0.0),
        }
    }

    /// Remove a band of `height` from the top; returns (band, rest).
    pub fn split_top(&self, height: f64) -> (Self, Self) {
        let height = height.min(self.h);
        (
            Self { h: height, ..*self },
            Self {
                y: self.y + height,
                h: self.h - height,
                ..*self
            },
        )
    }

    /// Remove a band of `height` from the bottom; returns (band, rest).
    pub fn split_bottom(&self, height: f64) -> (Self, Self) {
        let height = height.min(self.h);
        (
            Self {
                y: self.bottom() - height,
                h: height,
                ..*self
            },
            Self {
                h: self.h - height,
                ..*self
            },
        )
    }

    /// Remove a band of `width` from the left; returns (band, rest).
    pub fn split_left(&self, width: f64) -> (Self, Self) {
        let width = width.min(self.w);
        (
            Self { w: width, ..*self },
            Self {
                x: self.x + width,
                w: self.w - width,
                ..*self
            },
        )
    }

    /// Remove a band of `width` from the right; returns (band, rest).
    pub fn split_right(&self, width: f64) -> (Self, Self) {
        let width = width.min(self.w);
        (
            Self {
                x: self.right() - width,
                w: width,
                ..*self
            },
            Self {
                w: self.w - width,
                ..*self
            },
        )
    }
}

/// Draw a pie chart onto `canvas`.
pub(crate) fn draw_pie(canvas: &mut SvgCanvas, spec: &PieSpec, options: &ChartOptions) {
    let items: Vec<LegendItem> = spec
        .labels
        .iter()
        .zip(&spec.colors)
        .map(|(label, color)| LegendItem::new(label, color, "#ffffff"))
        .collect();
    let plot = frame(canvas, options, &items);
    pie::draw(canvas, plot, spec, options);
}

/// Draw a line chart onto `canvas`.
pub(crate) fn draw_line(canvas: &mut SvgCanvas, spec: &LineSpec, options: &ChartOptions) {
    let items = series_legend(&spec.datasets);
    let plot = frame(canvas, options, &items);
    line::draw(canvas, plot, spec, options);
}

/// Draw a bar chart onto `canvas`.
pub(crate) fn draw_bar(canvas: &mut SvgCanvas, spec: &BarSpec, options: &ChartOptions) {
    let items = series_legend(&spec.datasets);
    let plot = frame(canvas, options, &items);
    bar::draw(canvas, plot, spec, options);
}

fn series_legend(datasets: &[chartdoc_core::Series]) -> Vec<LegendItem> {
    datasets
        .iter()
        .map(|s| LegendItem::new(&s.label, &s.background_color, &s.border_color))
        .collect()
}

/// Draw title and legend; returns the area left for the plot.
fn frame(canvas: &mut SvgCanvas, options: &ChartOptions, legend: &[LegendItem]) -> Area {
    let mut area = Area {
        x: 0.0,
        y: 0.0,
        w: canvas.width(),
        h: canvas.height(),
    }
    .inset(PADDING);

    if let Some(title) = &options.title {
        area = draw_title(canvas, area, title);
    }
    legend::draw(canvas, area, legend, options.legend.position)
}

fn draw_title(canvas: &mut SvgCanvas, area: Area, title: &TitleOptions) -> Area {
    let (band, rest) = area.split_top(title.size + 2.0 * PADDING);
    canvas.text(
        band.center_x(),
        band.y + PADDING + title.size * 0.8,
        &title.text,
        TextStyle::new(title.size, INK).bold().anchored(Anchor::Middle),
    );
    rest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_splits_partition() {
        let area = Area {
            x: 10.0,
            y: 10.0,
            w: 100.0,
            h: 80.0,
        };
        let (top, rest) = area.split_top(20.0);
        assert!((top.h - 20.0).abs() < f64::EPSILON);
        assert!((rest.y - 30.0).abs() < f64::EPSILON);
        assert!((rest.h - 60.0).abs() < f64::EPSILON);

        let (right, rest) = area.split_right(200.0);
        assert!((right.w - 100.0).abs() < f64::EPSILON);
        assert!(rest.w.abs() < f64::EPSILON);
    }
}
