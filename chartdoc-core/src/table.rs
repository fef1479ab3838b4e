//! Table cell resolution and raster sizing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Width the caller leaves in place to ask for a computed width.
pub const WIDTH_SENTINEL: u32 = 800;
/// Height the caller leaves in place to ask for a computed height.
pub const HEIGHT_SENTINEL: u32 = 600;
/// Fixed raster row height in pixels.
pub const ROW_HEIGHT: u32 = 40;

const COLUMN_WIDTH: u32 = 150;
const MIN_WIDTH: u32 = 600;
const MAX_WIDTH: u32 = 1200;
const MIN_HEIGHT: u32 = 400;
const MAX_HEIGHT: u32 = 2000;
const HEIGHT_PADDING: u32 = 100;

/// One table record: either an object keyed by header or a positional array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableRow(pub Value);

impl TableRow {
    /// Text for the cell under `header` at column `index`.
    ///
    /// Looks the value up by header key first, then by position, and yields an
    /// empty string when neither is present.
    #[must_use]
    pub fn cell(&self, header: &str, index: usize) -> String {
        let keyed = match &self.0 {
            Value::Object(map) => map.get(header).or_else(|| map.get(&index.to_string())),
            Value::Array(items) => items.get(index),
            _ => None,
        };
        keyed.map(value_text).unwrap_or_default()
    }
}

impl From<Value> for TableRow {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Display text for a JSON scalar; `null` is empty.
#[must_use]
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Canvas width for a table, computed when the caller left the sentinel.
#[must_use]
pub fn raster_width(requested: u32, header_count: usize) -> u32 {
    if requested != WIDTH_SENTINEL {
        return requested;
    }
    let columns = u32::try_from(header_count).unwrap_or(u32::MAX);
    columns
        .saturating_mul(COLUMN_WIDTH)
        .clamp(MIN_WIDTH, MAX_WIDTH)
}

/// Canvas height for a table, computed when the caller left the sentinel.
#[must_use]
pub fn raster_height(requested: u32, row_count: usize) -> u32 {
    if requested != HEIGHT_SENTINEL {
        return requested;
    }
    let rows = u32::try_from(row_count).unwrap_or(u32::MAX);
    rows.saturating_mul(ROW_HEIGHT)
        .saturating_add(HEIGHT_PADDING)
        .clamp(MIN_HEIGHT, MAX_HEIGHT)
}
