//! Composite PDF reports.
//!
//! Composition runs in two phases:
//!
//! 1. [`DocumentComposer::prepare`] resolves every element in input order:
//!    tables are normalized for native drawing, charts are normalized and
//!    rasterized. A failure becomes [`PreparedElement::Failed`] in place.
//! 2. [`DocumentComposer::layout`] walks the prepared list with a single page
//!    cursor and draws onto a [`DocumentSurface`], turning failures into an
//!    inline notice. Nothing in this phase aborts the document.
//!
//! Only an empty document is rejected outright, before any drawing.

pub mod flow;
pub mod table;

use chartdoc_core::element::DEFAULT_DISPLAY_WIDTH;
use chartdoc_core::spec::TableRequest;
use chartdoc_core::{
    normalize, normalize_table, Document, DocumentElement, ElementError, ElementKind, Rgb,
    TableSpec, TableStyle, TitleAlign, ValidationError,
};
use serde_json::Value;
use thiserror::Error;

use crate::raster::RenderedImage;
use crate::surface::{DocumentSurface, Font, PageSize, PdfSurface};
use crate::{ChartRenderer, RenderError};

pub use flow::PageFlow;

/// Document title gap, in lines.
const AFTER_TITLE: f32 = 1.0;
/// Gap after the description and after every drawn element, in lines.
const AFTER_BLOCK: f32 = 2.0;
/// Gap under an element heading or failure notice, in lines.
const AFTER_HEADING: f32 = 0.5;
const HEADING_SIZE: f32 = 14.0;
const DESCRIPTION_SIZE: f32 = 12.0;
const NOTICE_SIZE: f32 = 12.0;
const NOTICE_COLOR: Rgb = Rgb::new(255, 0, 0);

/// Errors that fail a whole document.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// Neither tables nor charts were supplied.
    #[error("Document has no tables or charts")]
    EmptyDocument,

    /// The PDF could not be produced.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// The layout task panicked.
    #[error("Composition task failed: {0}")]
    Task(String),
}

/// Why a single element could not be prepared.
#[derive(Debug, Error)]
enum ElementFailure {
    #[error(transparent)]
    Element(#[from] ElementError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Page geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Size of every page.
    pub page: PageSize,
    /// Margin on all four sides, in points.
    pub margin: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page: PageSize::LETTER,
            margin: 50.0,
        }
    }
}

/// An element ready to be drawn.
#[derive(Debug, Clone)]
pub enum PreparedElement {
    /// A table drawn as a vector grid.
    Table {
        /// Normalized table; its title becomes the heading.
        spec: TableSpec,
    },
    /// A rasterized chart or table.
    Image {
        /// Heading above the image.
        title: Option<String>,
        /// Kind that was rendered.
        kind: ElementKind,
        /// The rendered picture.
        image: RenderedImage,
        /// Requested placement width before capping to the content width.
        display_width: f32,
        /// Heading placement.
        align: TitleAlign,
    },
    /// An element that could not be prepared.
    Failed {
        /// Title shown in the notice.
        title: String,
        /// Declared kind, when it resolved.
        kind: Option<ElementKind>,
        /// Error text.
        reason: String,
    },
}

impl PreparedElement {
    fn kind(&self) -> Option<ElementKind> {
        match self {
            Self::Table { .. } => Some(ElementKind::Table),
            Self::Image { kind, .. } => Some(*kind),
            Self::Failed { kind, .. } => *kind,
        }
    }

    fn title(&self) -> Option<&str> {
        match self {
            Self::Table { spec } => spec.title.as_deref(),
            Self::Image { title, .. } => title.as_deref(),
            Self::Failed { title, .. } => Some(title),
        }
    }
}

/// Result of drawing one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementStatus {
    /// Drawn in full.
    Drawn,
    /// Replaced by a failure notice.
    Failed(String),
}

/// Per-element record of a layout pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementOutcome {
    /// Position in the document, from 0.
    pub index: usize,
    /// Declared kind, when it resolved.
    pub kind: Option<ElementKind>,
    /// Element title, or `"untitled"`.
    pub title: String,
    /// What happened.
    pub status: ElementStatus,
}

/// Summary of a layout pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompositionReport {
    /// One entry per element, in input order.
    pub outcomes: Vec<ElementOutcome>,
    /// Pages in the finished document.
    pub pages: usize,
}

impl CompositionReport {
    /// Elements drawn in full.
    #[must_use]
    pub fn drawn(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status == ElementStatus::Drawn)
            .count()
    }

    /// Elements replaced by a notice.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.drawn()
    }
}

/// A finished PDF.
#[derive(Debug, Clone)]
pub struct ComposedDocument {
    /// Serialized PDF.
    pub bytes: Vec<u8>,
    /// What was drawn.
    pub report: CompositionReport,
}

/// Lays documents out into PDFs.
#[derive(Debug, Clone)]
pub struct DocumentComposer {
    renderer: ChartRenderer,
    layout: LayoutConfig,
}

impl DocumentComposer {
    /// Create a composer drawing charts with `renderer`.
    #[must_use]
    pub fn new(renderer: ChartRenderer, layout: LayoutConfig) -> Self {
        Self { renderer, layout }
    }

    /// The page geometry.
    #[must_use]
    pub fn layout_config(&self) -> LayoutConfig {
        self.layout
    }

    /// Resolve every element of `document`, in order.
    pub async fn prepare(&self, document: &Document) -> Vec<PreparedElement> {
        let mut prepared = Vec::with_capacity(document.entries.len());
        for entry in &document.entries {
            let result = match &entry.element {
                Ok(element) => self
                    .prepare_element(entry.title.clone(), element)
                    .await
                    .map_err(|e| (Some(element.kind()), e)),
                Err(e) => Err((None, ElementFailure::Element(e.clone()))),
            };
            prepared.push(result.unwrap_or_else(|(kind, e)| PreparedElement::Failed {
                title: entry.display_title().to_string(),
                kind,
                reason: e.to_string(),
            }));
        }
        prepared
    }

    async fn prepare_element(
        &self,
        title: Option<String>,
        element: &DocumentElement,
    ) -> Result<PreparedElement, ElementFailure> {
        match element {
            DocumentElement::Table(config) => Ok(PreparedElement::Table {
                spec: native_table(config)?,
            }),
            DocumentElement::Chart(chart)
                if chart.use_composer_renderer && chart.kind == ElementKind::Table =>
            {
                Ok(PreparedElement::Table {
                    spec: native_table(&chart.config)?,
                })
            }
            DocumentElement::Chart(chart) => {
                let spec = normalize(chart.kind, &chart.config)?;
                Ok(PreparedElement::Image {
                    title,
                    kind: chart.kind,
                    image: self.renderer.render(spec).await?,
                    display_width: chart.display_width,
                    align: element.title_align(),
                })
            }
            DocumentElement::Flexible(flexible) => {
                let spec = normalize(flexible.kind, &flexible.config)?;
                Ok(PreparedElement::Image {
                    title,
                    kind: flexible.kind,
                    image: self.renderer.render(spec).await?,
                    display_width: flexible.display_width.unwrap_or(DEFAULT_DISPLAY_WIDTH),
                    align: element.title_align(),
                })
            }
        }
    }

    /// Draw `document` with its prepared elements onto `surface`.
    ///
    /// Per-element problems, including images the surface refuses, are
    /// drawn as notices and recorded in the report.
    pub fn layout<S: DocumentSurface>(
        &self,
        document: &Document,
        prepared: &[PreparedElement],
        surface: S,
    ) -> (S, CompositionReport) {
        lay_out(self.layout, document, prepared, surface)
    }

    /// Produce the PDF for `document`.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError::EmptyDocument`] when there are no elements,
    /// before anything is rendered, and [`ComposeError::Render`] when the PDF
    /// itself cannot be written.
    pub async fn compose(&self, document: Document) -> Result<ComposedDocument, ComposeError> {
        if document.is_empty() {
            return Err(ComposeError::EmptyDocument);
        }

        let prepared = self.prepare(&document).await;
        let layout = self.layout;
        let (bytes, report) = tokio::task::spawn_blocking(move || {
            let surface = PdfSurface::new(&document.title, layout.page)?;
            let (surface, report) = lay_out(layout, &document, &prepared, surface);
            Ok::<_, RenderError>((surface.finish()?, report))
        })
        .await
        .map_err(|e| ComposeError::Task(e.to_string()))??;

        tracing::info!(
            elements = report.outcomes.len(),
            failed = report.failed(),
            pages = report.pages,
            bytes = bytes.len(),
            "Composed document"
        );
        Ok(ComposedDocument { bytes, report })
    }
}

fn lay_out<S: DocumentSurface>(
    config: LayoutConfig,
    document: &Document,
    prepared: &[PreparedElement],
    surface: S,
) -> (S, CompositionReport) {
    let mut flow = PageFlow::new(surface, config.margin);

    flow.text(
        &document.title,
        Font::bold(document.title_size),
        TitleAlign::Center,
    );
    flow.move_down(AFTER_TITLE);
    if let Some(description) = &document.description {
        flow.text(
            description,
            Font::regular(DESCRIPTION_SIZE),
            TitleAlign::Center,
        );
        flow.move_down(AFTER_BLOCK);
    }

    let mut outcomes = Vec::with_capacity(prepared.len());
    for (index, element) in prepared.iter().enumerate() {
        let status = match draw_element(&mut flow, element) {
            Ok(()) => {
                flow.move_down(AFTER_BLOCK);
                ElementStatus::Drawn
            }
            Err(reason) => {
                tracing::warn!(
                    index,
                    kind = element.kind().map_or("unknown", ElementKind::as_str),
                    reason = %reason,
                    "Element replaced by failure notice"
                );
                let title = element.title().unwrap_or("untitled");
                flow.text(
                    &format!("Failed to render: {title}"),
                    Font::bold(NOTICE_SIZE).colored(NOTICE_COLOR),
                    TitleAlign::Left,
                );
                flow.move_down(AFTER_HEADING);
                ElementStatus::Failed(reason)
            }
        };
        outcomes.push(ElementOutcome {
            index,
            kind: element.kind(),
            title: element.title().unwrap_or("untitled").to_string(),
            status,
        });
    }

    let pages = flow.pages();
    (flow.into_surface(), CompositionReport { outcomes, pages })
}

fn draw_element<S: DocumentSurface>(
    flow: &mut PageFlow<S>,
    element: &PreparedElement,
) -> Result<(), String> {
    match element {
        PreparedElement::Table { spec } => {
            if let Some(title) = &spec.title {
                heading(flow, title, TitleAlign::Left);
            }
            table::draw(flow, spec);
            Ok(())
        }
        PreparedElement::Image {
            title,
            image,
            display_width,
            align,
            ..
        } => {
            if let Some(title) = title {
                heading(flow, title, *align);
            }
            flow.image(image, *display_width).map_err(|e| e.to_string())
        }
        PreparedElement::Failed { reason, .. } => Err(reason.clone()),
    }
}

fn heading<S: DocumentSurface>(flow: &mut PageFlow<S>, title: &str, align: TitleAlign) {
    flow.text(title, Font::bold(HEADING_SIZE), align);
    flow.move_down(AFTER_HEADING);
}

/// Normalize a table for native drawing with the document defaults.
fn native_table(config: &Value) -> Result<TableSpec, ValidationError> {
    let request: TableRequest = serde_json::from_value(config.clone())?;
    normalize_table(request, TableStyle::document(), false)
}
