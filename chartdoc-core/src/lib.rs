//! # chartdoc core
//!
//! Request model for chart images and composite PDF reports.
//!
//! ```text
//! raw JSON ──► normalize(kind, value) ──► NormalizedSpec ──► renderer
//!                 │
//!                 ├─ defaults per kind
//!                 ├─ required fields / dimension bounds
//!                 └─ per-series colors from the palette
//! ```
//!
//! Everything in this crate is pure: no filesystem, no clocks, no rendering.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod color;
pub mod element;
pub mod error;
pub mod normalize;
pub mod palette;
pub mod spec;
pub mod table;

pub use color::Rgb;
pub use element::{
    ChartReference, Document, DocumentElement, ElementEntry, ElementKind, FlexibleElement,
    TitleAlign,
};
pub use error::{ElementError, ValidationError, ValidationResult};
pub use normalize::{normalize, normalize_table, NormalizedSpec};
pub use palette::{default_colors, with_alpha, DEFAULT_PALETTE};
pub use spec::{
    BarSpec, ChartKind, LegendPosition, LineSpec, PieSpec, Series, TableSpec, TableStyle,
    MAX_PIE_DIMENSION,
};
pub use table::TableRow;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
