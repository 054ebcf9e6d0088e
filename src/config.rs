//! Grid-wide configuration.
//!
//! Hosts usually build this from JSON (`GridConfig::from_json`); every field
//! has a default so partial documents are fine.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Configuration for layout, virtualization and editing behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridConfig {
    /// Estimated height of a data row in pixels, used for unmeasured rows
    pub row_height: f64,
    /// Height of the header row in pixels (0 hides it)
    pub header_row_height: f64,
    /// Whether the leading gutter (row number) column is shown
    pub gutter: bool,
    /// Width of the gutter column in pixels
    pub gutter_width: f64,
    /// Extra rows rendered above and below the visible range
    pub overscan_rows: usize,
    /// Extra columns rendered left and right of the visible range
    pub overscan_cols: usize,
    /// Forbid creating or deleting rows
    pub locked_rows: bool,
    /// Append a row when committing an edit on the last row
    pub auto_add_row: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            row_height: 40.0,
            header_row_height: 40.0,
            gutter: true,
            gutter_width: 40.0,
            overscan_rows: 10,
            overscan_cols: 1,
            locked_rows: false,
            auto_add_row: false,
        }
    }
}

impl GridConfig {
    /// Parse a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
