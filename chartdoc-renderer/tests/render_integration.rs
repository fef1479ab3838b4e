//! End-to-end checks: JSON request → normalized spec → PNG / PDF.

use chartdoc_core::{normalize, Document, ElementKind};
use chartdoc_renderer::surface::SurfaceOp;
use chartdoc_renderer::{
    ChartRenderer, ComposeError, DocumentComposer, ElementStatus, LayoutConfig, PageSize,
    RecordingSurface, RendererConfig,
};
use serde_json::json;

const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

fn renderer() -> ChartRenderer {
    ChartRenderer::new(RendererConfig {
        load_system_fonts: false,
        ..RendererConfig::default()
    })
}

fn composer() -> DocumentComposer {
    DocumentComposer::new(renderer(), LayoutConfig::default())
}

#[tokio::test]
async fn line_chart_renders_png() {
    let spec = normalize(
        ElementKind::Line,
        &json!({
            "labels": ["Mon", "Tue", "Wed", "Thu", "Fri"],
            "datasets": [
                {"label": "Visits", "data": [3, 5, 2, 8, 6]},
                {"label": "Sales", "data": [1, 2, 1, 4, 3], "fill": true}
            ],
            "title": "Week",
            "width": 400,
            "height": 300
        }),
    )
    .expect("valid line chart");

    let image = renderer().render(spec).await.expect("renders");
    assert!(image.png.starts_with(&PNG_MAGIC));
    assert_eq!((image.width, image.height), (400, 300));
}

#[tokio::test]
async fn raster_table_uses_dynamic_size() {
    let spec = normalize(
        ElementKind::Table,
        &json!({"headers": ["A", "B"], "rows": [{"A": 1}, {"A": 2, "B": 3}]}),
    )
    .expect("valid table");

    let image = renderer().render(spec).await.expect("renders");
    assert_eq!((image.width, image.height), (600, 400));
}

#[tokio::test]
async fn failing_element_is_isolated() {
    let document = Document::flexible(
        Some("Mixed".into()),
        None,
        &[
            json!({"type": "bar", "title": "First", "labels": ["a", "b"], "datasets": [{"data": [1, 2]}], "width": 300, "height": 200}),
            json!({"type": "radar", "title": "Second"}),
            json!({"type": "pie", "title": "Third", "data": [1, 1], "labels": ["x", "y"], "width": 200, "height": 200}),
        ],
    );

    let composer = composer();
    let prepared = composer.prepare(&document).await;
    let (surface, report) = composer.layout(
        &document,
        &prepared,
        RecordingSurface::new(PageSize::LETTER),
    );

    assert_eq!(
        surface.texts(),
        vec!["Mixed", "First", "Failed to render: Second", "Third"]
    );
    let images = surface
        .ops()
        .iter()
        .filter(|op| matches!(op, SurfaceOp::Image { .. }))
        .count();
    assert_eq!(images, 2);

    assert_eq!(report.drawn(), 2);
    assert!(matches!(report.outcomes[1].status, ElementStatus::Failed(_)));
    assert_eq!(report.outcomes[1].title, "Second");
    assert_eq!(report.outcomes[1].kind, None);
}

#[tokio::test]
async fn elements_keep_input_order() {
    let document = Document::from_tables_and_charts(
        Some("Order".into()),
        &[json!({"title": "Table One", "headers": ["A"], "rows": [{"A": 1}]})],
        &[json!({
            "title": "Chart One",
            "data": {"labels": ["a", "b"], "datasets": [{"label": "s", "data": [1, 2]}]}
        })],
    );

    let composer = composer();
    let prepared = composer.prepare(&document).await;
    let (surface, report) = composer.layout(
        &document,
        &prepared,
        RecordingSurface::new(PageSize::LETTER),
    );

    let texts = surface.texts();
    let table = texts.iter().position(|t| *t == "Table One").expect("table heading");
    let chart = texts.iter().position(|t| *t == "Chart One").expect("chart heading");
    assert!(table < chart);
    assert_eq!(report.failed(), 0);
}

#[tokio::test]
async fn empty_document_fails_before_drawing() {
    let document = Document::from_tables_and_charts(None, &[], &[]);
    assert!(matches!(
        composer().compose(document).await,
        Err(ComposeError::EmptyDocument)
    ));
}

#[tokio::test]
async fn single_chart_without_tables_composes() {
    let document = Document::from_tables_and_charts(
        None,
        &[],
        &[json!({
            "type": "pie",
            "useComposerRenderer": true,
            "title": "Share",
            "data": [2, 3],
            "labels": ["a", "b"],
            "width": 300,
            "height": 300
        })],
    );

    let composed = composer().compose(document).await.expect("composes");
    assert!(composed.bytes.starts_with(b"%PDF-"));
    assert_eq!(composed.report.drawn(), 1);
    assert_eq!(composed.report.pages, 1);
}

#[tokio::test]
async fn long_documents_paginate() {
    let rows: Vec<_> = (0..120).map(|i| json!({"N": i, "Square": i * i})).collect();
    let document = Document::from_tables_and_charts(
        None,
        &[json!({"title": "Squares", "headers": ["N", "Square"], "rows": rows})],
        &[],
    );

    let composed = composer().compose(document).await.expect("composes");
    assert!(composed.report.pages >= 3);
}
