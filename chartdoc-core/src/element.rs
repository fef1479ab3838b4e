//! Document elements - the building blocks of composite reports.
//!
//! Elements arrive as loosely-typed JSON. Each one is resolved exactly once,
//! when the [`Document`] is built, into a closed [`DocumentElement`] variant.
//! An element whose kind cannot be resolved is kept in place as a failed
//! [`ElementEntry`] so the composer can report it at its position.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::{ElementError, ValidationError};
use crate::spec::ChartKind;

/// Display width for chart images when the element does not give one.
pub const DEFAULT_DISPLAY_WIDTH: f32 = 400.0;

const EMBEDDED_WIDTH: u64 = 500;
const EMBEDDED_HEIGHT: u64 = 300;

/// Visual kinds a document element can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// Data table.
    Table,
    /// Pie chart.
    Pie,
    /// Line chart.
    Line,
    /// Bar chart.
    Bar,
}

impl ElementKind {
    /// Lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Pie => "pie",
            Self::Line => "line",
            Self::Bar => "bar",
        }
    }

    /// The chart kind, or `None` for tables.
    #[must_use]
    pub fn chart_kind(self) -> Option<ChartKind> {
        match self {
            Self::Table => None,
            Self::Pie => Some(ChartKind::Pie),
            Self::Line => Some(ChartKind::Line),
            Self::Bar => Some(ChartKind::Bar),
        }
    }
}

impl From<ChartKind> for ElementKind {
    fn from(kind: ChartKind) -> Self {
        match kind {
            ChartKind::Pie => Self::Pie,
            ChartKind::Line => Self::Line,
            ChartKind::Bar => Self::Bar,
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementKind {
    type Err = ElementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "table" => Ok(Self::Table),
            "pie" => Ok(Self::Pie),
            "line" => Ok(Self::Line),
            "bar" => Ok(Self::Bar),
            other => Err(ElementError::Unsupported(other.to_string())),
        }
    }
}

/// How an element title is placed above its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleAlign {
    /// Flush with the left margin.
    Left,
    /// Centered across the content width.
    Center,
}

/// A chart embedded in a `pdf-charts` document.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartReference {
    /// Resolved kind.
    pub kind: ElementKind,
    /// Configuration in the single-chart request shape.
    pub config: Value,
    /// The chart came in the single-chart request shape rather than as an
    /// embedded `{type, data: {labels, datasets}}` object.
    pub use_composer_renderer: bool,
    /// Width of the placed image before capping to the content width.
    pub display_width: f32,
}

impl ChartReference {
    /// Resolve a chart entry from a `pdf-charts` request.
    ///
    /// # Errors
    ///
    /// - [`ElementError::NotAnObject`] for non-object values
    /// - [`ElementError::Unsupported`] for unknown kinds, and for tables in the
    ///   embedded form
    /// - [`ElementError::Validation`] when an embedded chart has no `data`
    pub fn from_value(value: &Value) -> Result<Self, ElementError> {
        let object = value.as_object().ok_or(ElementError::NotAnObject)?;
        let flagged = object
            .get("useComposerRenderer")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        match (flagged, object.get("type").and_then(Value::as_str)) {
            (true, Some(tag)) => Ok(Self {
                kind: tag.parse()?,
                config: value.clone(),
                use_composer_renderer: true,
                display_width: number_field(object, "width").unwrap_or(DEFAULT_DISPLAY_WIDTH),
            }),
            (_, tag) => {
                let kind: ElementKind = tag.unwrap_or("line").parse()?;
                if kind == ElementKind::Table {
                    return Err(ElementError::Unsupported("table".into()));
                }
                let config = flatten_embedded(kind, object)?;
                let display_width = number_field(&config_map(&config), "width")
                    .unwrap_or(DEFAULT_DISPLAY_WIDTH);
                Ok(Self {
                    kind,
                    config,
                    use_composer_renderer: false,
                    display_width,
                })
            }
        }
    }
}

/// An element of a `flexible-report` document.
#[derive(Debug, Clone, PartialEq)]
pub struct FlexibleElement {
    /// Resolved kind.
    pub kind: ElementKind,
    /// Configuration in the single-chart request shape.
    pub config: Value,
    /// Requested display width, if any.
    pub display_width: Option<f32>,
}

impl FlexibleElement {
    /// Resolve a flexible element by its `type` tag.
    ///
    /// # Errors
    ///
    /// Returns [`ElementError::MissingKind`] without a tag and
    /// [`ElementError::Unsupported`] for unknown tags.
    pub fn from_value(value: &Value) -> Result<Self, ElementError> {
        let object = value.as_object().ok_or(ElementError::NotAnObject)?;
        let kind = object
            .get("type")
            .and_then(Value::as_str)
            .ok_or(ElementError::MissingKind)?
            .parse()?;
        Ok(Self {
            kind,
            config: value.clone(),
            display_width: number_field(object, "width"),
        })
    }
}

/// Closed set of drawable elements.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentElement {
    /// Table drawn natively into the page.
    Table(Value),
    /// Chart from a `pdf-charts` request.
    Chart(ChartReference),
    /// Element from a `flexible-report` request.
    Flexible(FlexibleElement),
}

impl DocumentElement {
    /// Kind of visual drawn.
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Table(_) => ElementKind::Table,
            Self::Chart(chart) => chart.kind,
            Self::Flexible(element) => element.kind,
        }
    }

    /// Placement of the element title.
    #[must_use]
    pub fn title_align(&self) -> TitleAlign {
        match self {
            Self::Table(_) | Self::Chart(_) => TitleAlign::Left,
            Self::Flexible(_) => TitleAlign::Center,
        }
    }
}

/// One slot of a document, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementEntry {
    /// Element title, used for headings and failure notices.
    pub title: Option<String>,
    /// The resolved element, or why it could not be resolved.
    pub element: Result<DocumentElement, ElementError>,
}

impl ElementEntry {
    fn new(value: &Value, element: Result<DocumentElement, ElementError>) -> Self {
        Self {
            title: value
                .get("title")
                .and_then(Value::as_str)
                .filter(|t| !t.trim().is_empty())
                .map(str::to_string),
            element,
        }
    }

    /// Title for failure notices.
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("untitled")
    }
}

/// An ordered list of elements under a title and optional description.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Heading drawn at the top of the first page.
    pub title: String,
    /// Heading font size in points.
    pub title_size: f32,
    /// Optional line under the heading.
    pub description: Option<String>,
    /// Elements in drawing order.
    pub entries: Vec<ElementEntry>,
}

impl Document {
    /// A `pdf-charts` document: every table, then every chart.
    #[must_use]
    pub fn from_tables_and_charts(title: Option<String>, tables: &[Value], charts: &[Value]) -> Self {
        let tables = tables.iter().map(|value| {
            let element = if value.is_object() {
                Ok(DocumentElement::Table(value.clone()))
            } else {
                Err(ElementError::NotAnObject)
            };
            ElementEntry::new(value, element)
        });
        let charts = charts.iter().map(|value| {
            ElementEntry::new(
                value,
                ChartReference::from_value(value).map(DocumentElement::Chart),
            )
        });

        Self {
            title: title.filter(|t| !t.trim().is_empty()).unwrap_or_else(|| "Report".into()),
            title_size: 20.0,
            description: None,
            entries: tables.chain(charts).collect(),
        }
    }

    /// A `flexible-report` document.
    #[must_use]
    pub fn flexible(title: Option<String>, description: Option<String>, elements: &[Value]) -> Self {
        let entries = elements
            .iter()
            .map(|value| {
                ElementEntry::new(
                    value,
                    FlexibleElement::from_value(value).map(DocumentElement::Flexible),
                )
            })
            .collect();

        Self {
            title: title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| "Full Report".into()),
            title_size: 24.0,
            description: description.filter(|d| !d.trim().is_empty()),
            entries,
        }
    }

    /// No elements were supplied at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Convert `{type, title, data: {labels, datasets}, width, height}` into the
/// single-chart request shape.
fn flatten_embedded(kind: ElementKind, object: &Map<String, Value>) -> Result<Value, ElementError> {
    let data = object
        .get("data")
        .and_then(Value::as_object)
        .ok_or(ValidationError::MissingField("data"))?;
    let labels = data.get("labels").cloned().unwrap_or(Value::Null);
    let datasets = data.get("datasets").cloned().unwrap_or(Value::Null);
    let width = object
        .get("width")
        .and_then(Value::as_u64)
        .unwrap_or(EMBEDDED_WIDTH);
    let height = object
        .get("height")
        .and_then(Value::as_u64)
        .unwrap_or(EMBEDDED_HEIGHT);
    let title = object.get("title").cloned().unwrap_or(Value::Null);

    let flat = if kind == ElementKind::Pie {
        let first = datasets.get(0);
        json!({
            "data": first.and_then(|d| d.get("data")).cloned().unwrap_or(Value::Null),
            "labels": labels,
            "backgroundColor": first
                .and_then(|d| d.get("backgroundColor"))
                .filter(|c| c.is_array())
                .cloned()
                .unwrap_or(Value::Null),
            "width": width,
            "height": height,
            "title": title,
        })
    } else {
        json!({
            "labels": labels,
            "datasets": datasets,
            "width": width,
            "height": height,
            "title": title,
        })
    };
    Ok(flat)
}

fn config_map(value: &Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}

#[allow(clippy::cast_possible_truncation)]
fn number_field(object: &Map<String, Value>, key: &str) -> Option<f32> {
    object
        .get(key)
        .and_then(Value::as_f64)
        .filter(|w| w.is_finite() && *w > 0.0)
        .map(|w| w as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags() {
        assert_eq!("table".parse::<ElementKind>(), Ok(ElementKind::Table));
        assert_eq!(
            "doughnut".parse::<ElementKind>(),
            Err(ElementError::Unsupported("doughnut".into()))
        );
        assert_eq!(ElementKind::Bar.chart_kind(), Some(ChartKind::Bar));
        assert_eq!(ElementKind::Table.chart_kind(), None);
    }

    #[test]
    fn test_composer_renderer_chart_keeps_request_shape() {
        let value = json!({
            "type": "pie",
            "useComposerRenderer": true,
            "data": [1, 2],
            "labels": ["a", "b"],
            "width": 300
        });
        let chart = ChartReference::from_value(&value).expect("resolves");
        assert_eq!(chart.kind, ElementKind::Pie);
        assert!(chart.use_composer_renderer);
        assert_eq!(chart.config, value);
        assert!((chart.display_width - 300.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_embedded_chart_defaults_to_line() {
        let chart = ChartReference::from_value(&json!({
            "title": "Sales",
            "data": {"labels": ["a", "b"], "datasets": [{"data": [1, 2]}]}
        }))
        .expect("resolves");
        assert_eq!(chart.kind, ElementKind::Line);
        assert!(!chart.use_composer_renderer);
        assert_eq!(chart.config["width"], 500);
        assert_eq!(chart.config["height"], 300);
        assert_eq!(chart.config["labels"], json!(["a", "b"]));
        assert!((chart.display_width - 500.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_embedded_pie_uses_first_dataset() {
        let chart = ChartReference::from_value(&json!({
            "type": "pie",
            "data": {
                "labels": ["a", "b"],
                "datasets": [{"data": [3, 4], "backgroundColor": ["#000000", "#ffffff"]}]
            }
        }))
        .expect("resolves");
        assert_eq!(chart.config["data"], json!([3, 4]));
        assert_eq!(chart.config["backgroundColor"], json!(["#000000", "#ffffff"]));
    }

    #[test]
    fn test_embedded_chart_without_data_fails() {
        let err = ChartReference::from_value(&json!({"type": "bar"})).unwrap_err();
        assert_eq!(err, ElementError::Validation(ValidationError::MissingField("data")));
    }

    #[test]
    fn test_flexible_requires_known_type() {
        assert_eq!(
            FlexibleElement::from_value(&json!({"title": "x"})).unwrap_err(),
            ElementError::MissingKind
        );
        assert_eq!(
            FlexibleElement::from_value(&json!({"type": "radar"})).unwrap_err(),
            ElementError::Unsupported("radar".into())
        );
        let table = FlexibleElement::from_value(&json!({"type": "table", "headers": ["A"]}))
            .expect("resolves");
        assert_eq!(table.kind, ElementKind::Table);
        assert_eq!(table.display_width, None);
    }

    #[test]
    fn test_pdf_charts_order_tables_first() {
        let doc = Document::from_tables_and_charts(
            None,
            &[json!({"title": "T1", "headers": ["A"], "rows": [{"A": 1}]})],
            &[
                json!({"title": "C1", "data": {"labels": ["a"], "datasets": [{"data": [1]}]}}),
                json!({"title": "C2", "type": "radar", "useComposerRenderer": true}),
            ],
        );
        assert_eq!(doc.title, "Report");
        assert_eq!(doc.entries.len(), 3);
        assert_eq!(doc.entries[0].title.as_deref(), Some("T1"));
        assert!(matches!(doc.entries[0].element, Ok(DocumentElement::Table(_))));
        assert!(matches!(doc.entries[1].element, Ok(DocumentElement::Chart(_))));
        assert!(doc.entries[2].element.is_err());
    }

    #[test]
    fn test_flexible_document_keeps_failed_entries_in_place() {
        let doc = Document::flexible(
            Some("Quarterly".into()),
            Some(String::new()),
            &[
                json!({"type": "pie", "data": [1], "labels": ["a"]}),
                json!({"type": "radar"}),
                json!({"type": "bar", "title": "Revenue"}),
            ],
        );
        assert_eq!(doc.title, "Quarterly");
        assert_eq!(doc.description, None);
        assert!((doc.title_size - 24.0).abs() < f32::EPSILON);
        assert!(doc.entries[1].element.is_err());
        assert_eq!(doc.entries[1].display_title(), "untitled");
        assert_eq!(doc.entries[2].display_title(), "Revenue");
    }

    #[test]
    fn test_empty_document() {
        assert!(Document::from_tables_and_charts(None, &[], &[]).is_empty());
        assert!(Document::flexible(None, None, &[]).is_empty());
    }
}
