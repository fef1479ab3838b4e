//! Kind-specific chart options.
//!
//! A normalized spec says *what* to draw; [`ChartOptions`] says how the chart
//! furniture is arranged: title, legend, axes, slice labels. The drawers in
//! [`crate::chart`] read only these options and the spec's data.

use chartdoc_core::{BarSpec, LegendPosition, LineSpec, PieSpec};

/// Title font size in pixels.
pub const TITLE_SIZE: f64 = 18.0;
/// Legend and tick label font size in pixels.
pub const LABEL_SIZE: f64 = 12.0;
/// Slice label font size in pixels.
pub const DATALABEL_SIZE: f64 = 16.0;

/// Chart title settings.
#[derive(Debug, Clone, PartialEq)]
pub struct TitleOptions {
    /// Text drawn centered above the plot.
    pub text: String,
    /// Font size in pixels.
    pub size: f64,
}

/// Legend settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegendOptions {
    /// Band the legend occupies.
    pub position: LegendPosition,
}

/// One axis of a cartesian chart.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AxisOptions {
    /// Axis title.
    pub title: Option<String>,
    /// Draw grid lines across the plot.
    pub grid: bool,
    /// Datasets share this axis' slot (category axis) or accumulate
    /// (value axis).
    pub stacked: bool,
    /// The value range includes zero.
    pub begin_at_zero: bool,
}

/// Scales of a cartesian chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleOptions {
    /// Category axis.
    pub x: AxisOptions,
    /// Value axis.
    pub y: AxisOptions,
}

/// Which data point a pointer query resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionMode {
    /// The closest point.
    Nearest,
    /// Every point at the same category index.
    Index,
}

/// Pointer interaction carried with the chart description.
///
/// Raster output has no pointer; the settings are kept so a consumer that
/// re-renders the chart interactively gets the same behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionOptions {
    /// Resolution mode for hover.
    pub mode: InteractionMode,
    /// Only the x distance counts.
    pub x_axis_only: bool,
    /// Require the pointer to be over the element.
    pub intersect: bool,
    /// Resolution mode for tooltips.
    pub tooltip: InteractionMode,
}

/// Labels drawn inside pie slices.
#[derive(Debug, Clone, PartialEq)]
pub struct DataLabelOptions {
    /// Text color.
    pub color: String,
    /// Font size in pixels.
    pub size: f64,
    /// Bold text.
    pub bold: bool,
}

/// Resolved options for one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    /// Title, when the spec has one.
    pub title: Option<TitleOptions>,
    /// Legend placement.
    pub legend: LegendOptions,
    /// Axes for line and bar charts.
    pub scales: Option<ScaleOptions>,
    /// Hover and tooltip behavior.
    pub interaction: Option<InteractionOptions>,
    /// Slice labels for pie charts.
    pub datalabels: Option<DataLabelOptions>,
    /// Fraction of a dataset slot a bar fills.
    pub bar_percentage: f64,
    /// Fraction of a category its bars use.
    pub category_percentage: f64,
}

impl ChartOptions {
    fn base(title: Option<&str>, legend: LegendPosition) -> Self {
        Self {
            title: title.map(|text| TitleOptions {
                text: text.to_string(),
                size: TITLE_SIZE,
            }),
            legend: LegendOptions { position: legend },
            scales: None,
            interaction: None,
            datalabels: None,
            bar_percentage: 1.0,
            category_percentage: 1.0,
        }
    }

    /// Pie options: percentage labels inside each slice.
    #[must_use]
    pub fn pie(spec: &PieSpec) -> Self {
        Self {
            datalabels: Some(DataLabelOptions {
                color: "#ffffff".into(),
                size: DATALABEL_SIZE,
                bold: true,
            }),
            ..Self::base(spec.title.as_deref(), spec.legend)
        }
    }

    /// Line options: zero-based value axis, nearest-point interaction.
    #[must_use]
    pub fn line(spec: &LineSpec) -> Self {
        Self {
            scales: Some(ScaleOptions {
                x: AxisOptions {
                    title: spec.x_axis_title.clone(),
                    grid: spec.show_grid,
                    ..AxisOptions::default()
                },
                y: AxisOptions {
                    title: spec.y_axis_title.clone(),
                    grid: spec.show_grid,
                    stacked: false,
                    begin_at_zero: true,
                },
            }),
            interaction: Some(InteractionOptions {
                mode: InteractionMode::Nearest,
                x_axis_only: true,
                intersect: false,
                tooltip: InteractionMode::Index,
            }),
            ..Self::base(spec.title.as_deref(), spec.legend)
        }
    }

    /// Bar options: independent stacking per axis and bar width fractions.
    #[must_use]
    pub fn bar(spec: &BarSpec) -> Self {
        Self {
            scales: Some(ScaleOptions {
                x: AxisOptions {
                    title: spec.x_axis_title.clone(),
                    grid: spec.show_grid,
                    stacked: spec.stacked_x,
                    begin_at_zero: false,
                },
                y: AxisOptions {
                    title: spec.y_axis_title.clone(),
                    grid: spec.show_grid,
                    stacked: spec.stacked_y,
                    begin_at_zero: spec.begin_at_zero,
                },
            }),
            bar_percentage: spec.bar_percentage,
            category_percentage: spec.category_percentage,
            ..Self::base(spec.title.as_deref(), spec.legend)
        }
    }
}

/// Share of `sum(values)` each value represents, in percent.
///
/// All zeros when the sum is not positive.
#[must_use]
pub fn slice_percentages(values: &[f64]) -> Vec<f64> {
    let total: f64 = values.iter().sum();
    if total <= 0.0 || !total.is_finite() {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| v / total * 100.0).collect()
}

/// Slice label text: the label, a line break, then the share to one decimal.
#[must_use]
pub fn slice_label(label: &str, percentage: f64) -> String {
    format!("{label}\n{percentage:.1}%")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chartdoc_core::{normalize, ElementKind, NormalizedSpec};
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_line_interaction_is_nearest_on_x() {
        let NormalizedSpec::Line(spec) = normalize(
            ElementKind::Line,
            &json!({"labels": ["a"], "datasets": [{"data": [1]}], "showGrid": false}),
        )
        .expect("valid") else {
            panic!("expected line");
        };
        let options = ChartOptions::line(&spec);
        let interaction = options.interaction.expect("line has interaction");
        assert_eq!(interaction.mode, InteractionMode::Nearest);
        assert!(interaction.x_axis_only);
        assert!(!interaction.intersect);
        let scales = options.scales.expect("line has scales");
        assert!(!scales.x.grid && !scales.y.grid);
        assert!(scales.y.begin_at_zero);
    }

    #[test]
    fn test_bar_stacking_flags_are_independent() {
        let NormalizedSpec::Bar(spec) = normalize(
            ElementKind::Bar,
            &json!({"labels": ["a"], "datasets": [{"data": [1]}], "stackedY": true}),
        )
        .expect("valid") else {
            panic!("expected bar");
        };
        let scales = ChartOptions::bar(&spec).scales.expect("bar has scales");
        assert!(!scales.x.stacked);
        assert!(scales.y.stacked);
    }

    #[test]
    fn test_pie_labels_formatted_to_one_decimal() {
        let pct = slice_percentages(&[1.0, 2.0]);
        assert_eq!(slice_label("a", pct[0]), "a\n33.3%");
        assert_eq!(slice_label("b", pct[1]), "b\n66.7%");
        assert_eq!(slice_percentages(&[0.0, 0.0]), vec![0.0, 0.0]);
    }

    proptest! {
        #[test]
        fn prop_percentages_sum_to_hundred(values in prop::collection::vec(0.0f64..1.0e6, 1..40)) {
            prop_assume!(values.iter().sum::<f64>() > 0.0);
            let labels: f64 = slice_percentages(&values)
                .iter()
                .map(|p| (p * 10.0).round() / 10.0)
                .sum();
            let tolerance = 0.05 * values.len() as f64 + 1e-9;
            prop_assert!((labels - 100.0).abs() <= tolerance);
        }
    }
}
