//! Layout engine for column widths, sticky rows and virtualized ranges.
//!
//! This module handles:
//! - Distributing the container width across flexible columns
//! - Pre-computing row positions from a measurement oracle
//! - Resolving sticky-row docking areas and offsets
//! - Selecting the row/column indices to render for a viewport
//! - Generation-keyed memoization of all of the above

mod cache;
mod column_sizer;
mod offsets;
mod range;
mod sticky;
mod viewport;

pub use cache::{Generation, LayoutCache, Memo, RowKey, StickyKey, WidthKey};
pub use column_sizer::size_columns;
pub use offsets::{MeasuredRows, Offsets, RowMeasurements, UniformRowHeight, DEFAULT_ROW_HEIGHT};
pub use range::{extract_columns, extract_rows, ScrollWindow, VirtualRange};
pub use sticky::{resolve_hints, resolve_sticky_rows};
pub use viewport::{StickyWidths, Viewport};

use serde::Serialize;

use crate::config::GridConfig;
use crate::types::{Column, StickyRowDescriptor};

/// Layout columns: the gutter (when enabled) followed by the data columns.
pub fn layout_columns(config: &GridConfig, data_columns: &[Column]) -> Vec<Column> {
    let mut columns = Vec::with_capacity(data_columns.len() + 1);
    if config.gutter {
        columns.push(Column::gutter(config.gutter_width));
    }
    columns.extend(data_columns.iter().cloned());
    columns
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridLayout {
    /// Width of every layout column (gutter included)
    pub widths: Vec<f64>,
    /// Docking descriptors of all sticky rows
    pub sticky_rows: Vec<StickyRowDescriptor>,
    /// Row indices to render, in render order
    pub rows: Vec<usize>,
    /// Layout column indices to render, ascending
    pub cols: Vec<usize>,
    /// Total content height of the data rows
    pub content_height: f64,
    /// Total content width of the layout columns
    pub content_width: f64,
}
