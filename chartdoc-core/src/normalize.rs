//! Chart-configuration normalization: defaults, validation, derived styling.
//!
//! Every function here is pure. Input is an untrusted JSON value or request
//! struct; output is a spec the renderer can draw without further checks.

use serde_json::Value;

use crate::element::ElementKind;
use crate::error::{ValidationError, ValidationResult};
use crate::palette::{color_at, with_alpha, FILL_ALPHA};
use crate::spec::{
    BarSpec, DatasetRequest, LineSpec, PieChartRequest, PieSpec, Series, SeriesChartRequest,
    TableRequest, TableSpec, TableStyle, MAX_PIE_DIMENSION,
};
use crate::table::{self, value_text};

const PIE_WIDTH: u32 = 800;
const PIE_HEIGHT: u32 = 800;
const LINE_WIDTH: u32 = 800;
const LINE_HEIGHT: u32 = 600;
const BAR_WIDTH: u32 = 800;
const BAR_HEIGHT: u32 = 500;

/// A chart or table configuration ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedSpec {
    /// Pie chart.
    Pie(PieSpec),
    /// Line chart.
    Line(LineSpec),
    /// Bar chart.
    Bar(BarSpec),
    /// Table.
    Table(TableSpec),
}

impl NormalizedSpec {
    /// Kind of visual this spec draws.
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Pie(_) => ElementKind::Pie,
            Self::Line(_) => ElementKind::Line,
            Self::Bar(_) => ElementKind::Bar,
            Self::Table(_) => ElementKind::Table,
        }
    }

    /// Canvas size in pixels.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Self::Pie(s) => (s.width, s.height),
            Self::Line(s) => (s.width, s.height),
            Self::Bar(s) => (s.width, s.height),
            Self::Table(s) => (s.width, s.height),
        }
    }

    /// Title, if any.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Pie(s) => s.title.as_deref(),
            Self::Line(s) => s.title.as_deref(),
            Self::Bar(s) => s.title.as_deref(),
            Self::Table(s) => s.title.as_deref(),
        }
    }
}

/// Normalize a raw JSON configuration for `kind`.
///
/// Tables normalized here use the raster style and have their canvas size
/// computed from the header and row counts when left at the sentinel.
///
/// # Errors
///
/// Returns [`ValidationError::Malformed`] when the value does not match the
/// request shape, and the per-kind errors of the typed normalizers.
pub fn normalize(kind: ElementKind, raw: &Value) -> ValidationResult<NormalizedSpec> {
    let spec = match kind {
        ElementKind::Pie => NormalizedSpec::Pie(normalize_pie(deserialize(raw)?)?),
        ElementKind::Line => NormalizedSpec::Line(normalize_line(deserialize(raw)?)?),
        ElementKind::Bar => NormalizedSpec::Bar(normalize_bar(deserialize(raw)?)?),
        ElementKind::Table => {
            NormalizedSpec::Table(normalize_table(deserialize(raw)?, TableStyle::raster(), true)?)
        }
    };
    tracing::trace!(kind = %kind, dimensions = ?spec.dimensions(), "normalized spec");
    Ok(spec)
}

fn deserialize<T: serde::de::DeserializeOwned>(raw: &Value) -> ValidationResult<T> {
    T::deserialize(raw).map_err(ValidationError::from)
}

/// Normalize a pie request.
///
/// # Errors
///
/// - [`ValidationError::MissingField`] when `data` or `labels` is absent
/// - [`ValidationError::LengthMismatch`] when their lengths differ
/// - [`ValidationError::DimensionOutOfBounds`] when either side exceeds 2000
pub fn normalize_pie(req: PieChartRequest) -> ValidationResult<PieSpec> {
    let values = req.data.ok_or(ValidationError::MissingField("data"))?;
    let labels = req.labels.ok_or(ValidationError::MissingField("labels"))?;
    if values.len() != labels.len() {
        return Err(ValidationError::LengthMismatch {
            data: values.len(),
            labels: labels.len(),
        });
    }

    let width = req.width.unwrap_or(PIE_WIDTH);
    let height = req.height.unwrap_or(PIE_HEIGHT);
    check_positive(width, height)?;
    if width > MAX_PIE_DIMENSION || height > MAX_PIE_DIMENSION {
        return Err(ValidationError::DimensionOutOfBounds {
            width,
            height,
            max: MAX_PIE_DIMENSION,
        });
    }

    let supplied = req.background_color.unwrap_or_default();
    let colors = (0..values.len())
        .map(|i| supplied.get(i).cloned().unwrap_or_else(|| color_at(i).to_string()))
        .collect();

    Ok(PieSpec {
        values,
        labels: labels.iter().map(value_text).collect(),
        colors,
        width,
        height,
        title: non_empty(req.title),
        legend: req.legend_position.unwrap_or_default(),
    })
}

/// Normalize a line request.
///
/// # Errors
///
/// Returns [`ValidationError::MissingField`] when `datasets` or `labels` is
/// absent or empty.
pub fn normalize_line(req: SeriesChartRequest) -> ValidationResult<LineSpec> {
    let (datasets, labels) = required_series(req.datasets, req.labels)?;
    let width = req.width.unwrap_or(LINE_WIDTH);
    let height = req.height.unwrap_or(LINE_HEIGHT);
    check_positive(width, height)?;

    let datasets = datasets
        .into_iter()
        .enumerate()
        .map(|(i, ds)| {
            let color = color_at(i);
            Series {
                label: ds.label.unwrap_or_default(),
                data: ds.data,
                border_color: ds.border_color.unwrap_or_else(|| color.to_string()),
                background_color: ds
                    .background_color
                    .unwrap_or_else(|| with_alpha(color, FILL_ALPHA)),
                border_width: positive_or(ds.border_width, 2.0),
                fill: ds.fill.unwrap_or(false),
                tension: ds.tension.filter(|t| t.is_finite()).unwrap_or(0.1),
                border_radius: 0.0,
                bar_thickness: None,
            }
        })
        .collect();

    Ok(LineSpec {
        datasets,
        labels,
        width,
        height,
        title: non_empty(req.title),
        x_axis_title: non_empty(req.x_axis_title),
        y_axis_title: non_empty(req.y_axis_title),
        legend: req.legend_position.unwrap_or_default(),
        show_grid: req.show_grid.unwrap_or(true),
    })
}

/// Normalize a bar request.
///
/// # Errors
///
/// Returns [`ValidationError::MissingField`] when `datasets` or `labels` is
/// absent or empty.
pub fn normalize_bar(req: SeriesChartRequest) -> ValidationResult<BarSpec> {
    let (datasets, labels) = required_series(req.datasets, req.labels)?;
    let width = req.width.unwrap_or(BAR_WIDTH);
    let height = req.height.unwrap_or(BAR_HEIGHT);
    check_positive(width, height)?;

    let datasets = datasets
        .into_iter()
        .enumerate()
        .map(|(i, ds)| {
            let color = color_at(i);
            Series {
                label: ds.label.unwrap_or_default(),
                data: ds.data,
                border_color: ds.border_color.unwrap_or_else(|| color.to_string()),
                background_color: ds.background_color.unwrap_or_else(|| color.to_string()),
                border_width: positive_or(ds.border_width, 1.0),
                fill: true,
                tension: 0.0,
                border_radius: ds.border_radius.filter(|r| *r > 0.0).unwrap_or(0.0),
                bar_thickness: ds.bar_thickness.filter(|t| *t > 0.0),
            }
        })
        .collect();

    Ok(BarSpec {
        datasets,
        labels,
        width,
        height,
        title: non_empty(req.title),
        x_axis_title: non_empty(req.x_axis_title),
        y_axis_title: non_empty(req.y_axis_title),
        legend: req.legend_position.unwrap_or_default(),
        show_grid: req.show_grid.unwrap_or(true),
        bar_percentage: fraction_or(req.bar_percentage, 0.8),
        category_percentage: fraction_or(req.category_percentage, 0.9),
        stacked_x: req.stacked_x.unwrap_or(false),
        stacked_y: req.stacked_y.unwrap_or(false),
        begin_at_zero: req.begin_at_zero.unwrap_or(true),
    })
}

/// Normalize a table request against a style preset.
///
/// With `resolve_size`, a width or height left at the sentinel value is
/// replaced by one computed from the header and row counts.
///
/// # Errors
///
/// Returns [`ValidationError::MissingField`] when `headers` or `rows` is
/// absent or empty.
pub fn normalize_table(
    req: TableRequest,
    preset: TableStyle,
    resolve_size: bool,
) -> ValidationResult<TableSpec> {
    let headers: Vec<String> = req
        .headers
        .unwrap_or_default()
        .iter()
        .map(value_text)
        .collect();
    if headers.is_empty() {
        return Err(ValidationError::MissingField("headers"));
    }
    let rows = req.rows.unwrap_or_default();
    if rows.is_empty() {
        return Err(ValidationError::MissingField("rows"));
    }

    let mut width = req.width.unwrap_or(table::WIDTH_SENTINEL);
    let mut height = req.height.unwrap_or(table::HEIGHT_SENTINEL);
    if resolve_size {
        width = table::raster_width(width, headers.len());
        height = table::raster_height(height, rows.len());
    }
    check_positive(width, height)?;

    let style = TableStyle {
        cell_padding: req.cell_padding.unwrap_or(preset.cell_padding),
        header_background: req.header_background.unwrap_or(preset.header_background),
        row_background: req.row_background.unwrap_or(preset.row_background),
        alternate_row_background: req
            .alternate_row_background
            .unwrap_or(preset.alternate_row_background),
        border_color: req.border_color.unwrap_or(preset.border_color),
        text_color: req.text_color.unwrap_or(preset.text_color),
        header_text_color: req.header_text_color.unwrap_or(preset.header_text_color),
        font_size: req.font_size.filter(|s| *s > 0.0).unwrap_or(preset.font_size),
        margin_left: req.margin_left.unwrap_or(preset.margin_left),
        margin_right: req.margin_right.unwrap_or(preset.margin_right),
        margin_bottom: req.margin_bottom.unwrap_or(preset.margin_bottom),
    };

    let column_widths = req
        .column_widths
        .filter(|w| w.len() == headers.len() && w.iter().all(|c| *c > 0.0));

    Ok(TableSpec {
        headers,
        rows,
        width,
        height,
        title: non_empty(req.title),
        style,
        column_widths,
    })
}

fn required_series(
    datasets: Option<Vec<DatasetRequest>>,
    labels: Option<Vec<Value>>,
) -> ValidationResult<(Vec<DatasetRequest>, Vec<String>)> {
    let datasets = datasets
        .filter(|d| !d.is_empty())
        .ok_or(ValidationError::MissingField("datasets"))?;
    let labels = labels
        .filter(|l| !l.is_empty())
        .ok_or(ValidationError::MissingField("labels"))?;
    Ok((datasets, labels.iter().map(value_text).collect()))
}

fn check_positive(width: u32, height: u32) -> ValidationResult<()> {
    if width == 0 || height == 0 {
        return Err(ValidationError::EmptyCanvas { width, height });
    }
    Ok(())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn positive_or(value: Option<f64>, default: f64) -> f64 {
    value.filter(|v| v.is_finite() && *v > 0.0).unwrap_or(default)
}

fn fraction_or(value: Option<f64>, default: f64) -> f64 {
    value
        .filter(|v| v.is_finite() && *v > 0.0 && *v <= 1.0)
        .unwrap_or(default)
}
