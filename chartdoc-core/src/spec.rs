//! Chart and table request shapes, raw and normalized.
//!
//! `*Request` types mirror the JSON bodies accepted over HTTP: every field is
//! optional so that a missing field is reported by the normalizer rather than
//! by the deserializer. `*Spec` types are the normalized form handed to the
//! renderer: defaults applied, colors derived, invariants checked.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::table::TableRow;

/// Largest accepted pie width or height in pixels.
pub const MAX_PIE_DIMENSION: u32 = 2000;

/// Chart kinds: each determines required fields and rendering options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// Pie chart over a single value series.
    Pie,
    /// Line chart over one or more datasets.
    Line,
    /// Bar chart over one or more datasets.
    Bar,
}

impl ChartKind {
    /// Lowercase name, as used in JSON and metrics labels.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pie => "pie",
            Self::Line => "line",
            Self::Bar => "bar",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pie" => Ok(Self::Pie),
            "line" | "linear" => Ok(Self::Line),
            "bar" => Ok(Self::Bar),
            _ => Err(format!("Unknown chart type: {s}")),
        }
    }
}

/// Where the legend sits relative to the plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendPosition {
    /// Above the plot.
    #[default]
    Top,
    /// Below the plot.
    Bottom,
    /// Left of the plot.
    Left,
    /// Right of the plot.
    Right,
}

// ---------------------------------------------------------------------------
// Raw requests
// ---------------------------------------------------------------------------

/// Body of `POST /v1/charts/pie`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PieChartRequest {
    /// Slice values.
    pub data: Option<Vec<f64>>,
    /// Slice labels (strings or numbers).
    pub labels: Option<Vec<serde_json::Value>>,
    /// Canvas width in pixels.
    pub width: Option<u32>,
    /// Canvas height in pixels.
    pub height: Option<u32>,
    /// Slice colors; empty means palette.
    pub background_color: Option<Vec<String>>,
    /// Chart title.
    pub title: Option<String>,
    /// Legend placement.
    pub legend_position: Option<LegendPosition>,
}

/// One dataset in a line or bar request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatasetRequest {
    /// Legend label.
    pub label: Option<String>,
    /// Values, one per category label.
    pub data: Vec<f64>,
    /// Stroke color.
    pub border_color: Option<String>,
    /// Fill color.
    pub background_color: Option<String>,
    /// Stroke width in pixels.
    pub border_width: Option<f64>,
    /// Fill the area under a line.
    pub fill: Option<bool>,
    /// Bezier curve tension for lines.
    pub tension: Option<f64>,
    /// Corner radius for bars.
    pub border_radius: Option<f64>,
    /// Fixed bar width in pixels.
    pub bar_thickness: Option<f64>,
}

/// Body of `POST /v1/charts/linear` and `POST /v1/charts/bar`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeriesChartRequest {
    /// Data series.
    pub datasets: Option<Vec<DatasetRequest>>,
    /// Category labels (strings or numbers).
    pub labels: Option<Vec<serde_json::Value>>,
    /// Canvas width in pixels.
    pub width: Option<u32>,
    /// Canvas height in pixels.
    pub height: Option<u32>,
    /// Chart title.
    pub title: Option<String>,
    /// X axis title.
    pub x_axis_title: Option<String>,
    /// Y axis title.
    pub y_axis_title: Option<String>,
    /// Legend placement.
    pub legend_position: Option<LegendPosition>,
    /// Draw grid lines on both axes.
    pub show_grid: Option<bool>,
    /// Fraction of the per-dataset slot a bar fills.
    pub bar_percentage: Option<f64>,
    /// Fraction of the category width used by its bars.
    pub category_percentage: Option<f64>,
    /// Bars of one category share the same slot.
    #[serde(rename = "stackedX")]
    pub stacked_x: Option<bool>,
    /// Values of one category accumulate vertically.
    #[serde(rename = "stackedY")]
    pub stacked_y: Option<bool>,
    /// Force the value axis to include zero.
    pub begin_at_zero: Option<bool>,
}

/// Body of `POST /v1/charts/table` and table elements inside documents.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableRequest {
    /// Column names.
    pub headers: Option<Vec<serde_json::Value>>,
    /// Records keyed by header or positional arrays.
    pub rows: Option<Vec<TableRow>>,
    /// Canvas width in pixels.
    pub width: Option<u32>,
    /// Canvas height in pixels.
    pub height: Option<u32>,
    /// Table title.
    pub title: Option<String>,
    /// Inner cell padding.
    pub cell_padding: Option<f32>,
    /// Header band fill.
    #[serde(alias = "headerColor")]
    pub header_background: Option<String>,
    /// Even row fill.
    #[serde(alias = "rowColor")]
    pub row_background: Option<String>,
    /// Odd row fill.
    #[serde(alias = "alternateRowColor")]
    pub alternate_row_background: Option<String>,
    /// Grid line color.
    pub border_color: Option<String>,
    /// Body text color.
    pub text_color: Option<String>,
    /// Header text color.
    pub header_text_color: Option<String>,
    /// Body font size.
    pub font_size: Option<f32>,
    /// Left margin.
    pub margin_left: Option<f32>,
    /// Right margin.
    pub margin_right: Option<f32>,
    /// Bottom margin.
    pub margin_bottom: Option<f32>,
    /// Explicit column widths.
    pub column_widths: Option<Vec<f32>>,
}

// ---------------------------------------------------------------------------
// Normalized specs
// ---------------------------------------------------------------------------

/// A normalized pie chart.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSpec {
    /// Slice values.
    pub values: Vec<f64>,
    /// Slice labels, same length as `values`.
    pub labels: Vec<String>,
    /// Slice colors, same length as `values`.
    pub colors: Vec<String>,
    /// Canvas width.
    pub width: u32,
    /// Canvas height.
    pub height: u32,
    /// Title, `None` when empty.
    pub title: Option<String>,
    /// Legend placement.
    pub legend: LegendPosition,
}

/// One styled data series of a line or bar chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// Legend label.
    pub label: String,
    /// Values.
    pub data: Vec<f64>,
    /// Stroke color.
    pub border_color: String,
    /// Fill color.
    pub background_color: String,
    /// Stroke width.
    pub border_width: f64,
    /// Fill under the line.
    pub fill: bool,
    /// Curve tension.
    pub tension: f64,
    /// Bar corner radius.
    pub border_radius: f64,
    /// Fixed bar width; `None` is flex.
    pub bar_thickness: Option<f64>,
}

/// A normalized line chart.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSpec {
    /// Styled series.
    pub datasets: Vec<Series>,
    /// Category labels.
    pub labels: Vec<String>,
    /// Canvas width.
    pub width: u32,
    /// Canvas height.
    pub height: u32,
    /// Title.
    pub title: Option<String>,
    /// X axis title.
    pub x_axis_title: Option<String>,
    /// Y axis title.
    pub y_axis_title: Option<String>,
    /// Legend placement.
    pub legend: LegendPosition,
    /// Grid lines on both axes.
    pub show_grid: bool,
}

/// A normalized bar chart.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSpec {
    /// Styled series.
    pub datasets: Vec<Series>,
    /// Category labels.
    pub labels: Vec<String>,
    /// Canvas width.
    pub width: u32,
    /// Canvas height.
    pub height: u32,
    /// Title.
    pub title: Option<String>,
    /// X axis title.
    pub x_axis_title: Option<String>,
    /// Y axis title.
    pub y_axis_title: Option<String>,
    /// Legend placement.
    pub legend: LegendPosition,
    /// Grid lines on both axes.
    pub show_grid: bool,
    /// Fraction of a dataset slot filled by its bar.
    pub bar_percentage: f64,
    /// Fraction of a category used by its bars.
    pub category_percentage: f64,
    /// Share one slot per category.
    pub stacked_x: bool,
    /// Accumulate values per category.
    pub stacked_y: bool,
    /// Value axis includes zero.
    pub begin_at_zero: bool,
}

/// Visual style of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableStyle {
    /// Inner cell padding.
    pub cell_padding: f32,
    /// Header band fill.
    pub header_background: String,
    /// Even row fill.
    pub row_background: String,
    /// Odd row fill.
    pub alternate_row_background: String,
    /// Grid line color.
    pub border_color: String,
    /// Body text color.
    pub text_color: String,
    /// Header text color.
    pub header_text_color: String,
    /// Body font size.
    pub font_size: f32,
    /// Left margin.
    pub margin_left: f32,
    /// Right margin.
    pub margin_right: f32,
    /// Bottom margin.
    pub margin_bottom: f32,
}

impl TableStyle {
    /// Defaults for tables rendered to a raster image.
    #[must_use]
    pub fn raster() -> Self {
        Self {
            cell_padding: 10.0,
            header_background: "#f5f5f5".into(),
            row_background: "#ffffff".into(),
            alternate_row_background: "#f9f9f9".into(),
            border_color: "#dddddd".into(),
            text_color: "#333333".into(),
            header_text_color: "#333333".into(),
            font_size: 12.0,
            margin_left: 20.0,
            margin_right: 20.0,
            margin_bottom: 20.0,
        }
    }

    /// Defaults for tables drawn natively into a PDF.
    #[must_use]
    pub fn document() -> Self {
        Self {
            cell_padding: 5.0,
            header_background: "#eeeeee".into(),
            row_background: "#ffffff".into(),
            alternate_row_background: "#f9f9f9".into(),
            border_color: "#000000".into(),
            text_color: "#000000".into(),
            header_text_color: "#000000".into(),
            font_size: 10.0,
            margin_left: 0.0,
            margin_right: 0.0,
            margin_bottom: 0.0,
        }
    }
}

/// A normalized table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSpec {
    /// Column names, never empty.
    pub headers: Vec<String>,
    /// Records.
    pub rows: Vec<TableRow>,
    /// Canvas width (already resolved from the sentinel when rasterized).
    pub width: u32,
    /// Canvas height (already resolved from the sentinel when rasterized).
    pub height: u32,
    /// Title.
    pub title: Option<String>,
    /// Colors, padding and margins.
    pub style: TableStyle,
    /// Explicit column widths; only set when one width per header was supplied.
    pub column_widths: Option<Vec<f32>>,
}

impl TableSpec {
    /// Resolved text for every cell, row-major.
    #[must_use]
    pub fn cells(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                self.headers
                    .iter()
                    .enumerate()
                    .map(|(i, h)| row.cell(h, i))
                    .collect()
            })
            .collect()
    }
}
