//! Structured error types for sheetgrid.
//!
//! Bad clipboard data never surfaces here; only host programming mistakes
//! and configuration failures do.

/// All errors that can occur in the grid engine.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// A setter received a value of the wrong shape (host programming defect).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration could not be decoded.
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

#[cfg(target_arch = "wasm32")]
impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
