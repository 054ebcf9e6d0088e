//! sheetgrid - spreadsheet grid engine for the web
//!
//! The computational core of a virtualized, editable data grid:
//! - Flexible column widths with sticky left/right columns
//! - Multi-level sticky rows with docking areas
//! - Viewport range extraction for virtualized rendering
//! - Keyboard selection and edit-session state machine
//! - Clipboard text/HTML codec and row operation planning
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { SelectionController, size_columns } from 'sheetgrid';
//! await init();
//! const widths = size_columns(container.clientWidth, columns);
//! const selection = new SelectionController(columns.length, rows.length);
//! const effects = selection.key_event(event);
//! ```

pub mod clipboard;
pub mod config;
pub mod editor;
pub mod error;
pub mod layout;
pub mod selection;
pub mod types;

use wasm_bindgen::prelude::*;

pub use config::GridConfig;
pub use editor::{DataGrid, RowAdapter};
pub use error::GridError;
pub use types::*;

use layout::{Offsets, ScrollWindow, VirtualRange};
use selection::{GridContext, InputEvent, SelectionState};

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Distribute `container_width` across columns.
///
/// `columns` is an array of `{basis, grow, shrink, minWidth, maxWidth}`
/// objects; a missing width gives every column its `minWidth`.
///
/// # Errors
/// Returns an error if `columns` is not an array of column descriptors.
#[wasm_bindgen]
pub fn size_columns(container_width: Option<f64>, columns: JsValue) -> Result<Vec<f64>, JsValue> {
    let columns: Vec<ColumnWidth> = serde_wasm_bindgen::from_value(columns)?;
    Ok(layout::size_columns(container_width, &columns))
}

/// Resolve sticky-row descriptors from per-row stickiness shorthands and row
/// heights.
///
/// # Errors
/// Returns an error if `hints` is not an array.
#[wasm_bindgen]
pub fn sticky_rows(hints: JsValue, row_heights: Vec<f64>) -> Result<JsValue, JsValue> {
    let hints: Vec<Stickiness> = serde_wasm_bindgen::from_value(hints)?;
    let resolved: Vec<_> = hints.iter().map(Stickiness::resolve).collect();
    let rows = Offsets::from_sizes(row_heights);
    serde_wasm_bindgen::to_value(&layout::resolve_sticky_rows(&resolved, &rows)).map_err(js_error)
}

/// Row indices to render for a virtualizer range, including docked sticky rows.
///
/// # Errors
/// Returns an error if `range` or `sticky` have the wrong shape.
#[wasm_bindgen]
pub fn render_rows(range: JsValue, sticky: JsValue, scroll_top: f64, height: f64) -> Result<JsValue, JsValue> {
    let range: VirtualRange = serde_wasm_bindgen::from_value(range)?;
    let sticky: Vec<StickyRowDescriptor> = serde_wasm_bindgen::from_value(sticky)?;
    let window = ScrollWindow {
        top: scroll_top,
        height,
    };
    serde_wasm_bindgen::to_value(&layout::extract_rows(&range, &sticky, window)).map_err(js_error)
}

/// Column indices to render for a virtualizer range.
///
/// # Errors
/// Returns an error if `range` has the wrong shape.
#[wasm_bindgen]
pub fn render_columns(range: JsValue, sticky_left: usize, sticky_right: usize) -> Result<JsValue, JsValue> {
    let range: VirtualRange = serde_wasm_bindgen::from_value(range)?;
    serde_wasm_bindgen::to_value(&layout::extract_columns(&range, sticky_left, sticky_right)).map_err(js_error)
}

/// Parse clipboard contents (HTML preferred) into a `string[][]`.
///
/// # Errors
/// Only fails if the result cannot be converted to a JS value.
#[wasm_bindgen]
pub fn parse_clipboard(html: Option<String>, text: Option<String>) -> Result<JsValue, JsValue> {
    let rows = clipboard::parse(&clipboard::ClipboardPayload { html, text });
    serde_wasm_bindgen::to_value(&rows).map_err(js_error)
}

/// Serialize a `string[][]` into `{text, html}`.
///
/// # Errors
/// Returns an error if `rows` is not an array of string arrays.
#[wasm_bindgen]
pub fn serialize_clipboard(rows: JsValue) -> Result<JsValue, JsValue> {
    let rows: Vec<Vec<String>> = serde_wasm_bindgen::from_value(rows)?;
    serde_wasm_bindgen::to_value(&clipboard::serialize(&rows)).map_err(js_error)
}

/// Read the cells carried by a DOM `paste` event.
///
/// # Errors
/// Only fails if the result cannot be converted to a JS value.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn read_clipboard_event(event: &web_sys::ClipboardEvent) -> Result<JsValue, JsValue> {
    use clipboard::ClipboardPort;

    let rows = clipboard::DataTransferClipboard::from_event(event)
        .map(|mut port| clipboard::parse(&port.read()))
        .unwrap_or_default();
    serde_wasm_bindgen::to_value(&rows).map_err(js_error)
}

/// Put `rows` on the clipboard of a DOM `copy`/`cut` event.
///
/// # Errors
/// Returns an error if `rows` is not an array of string arrays.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn write_clipboard_event(event: &web_sys::ClipboardEvent, rows: JsValue) -> Result<(), JsValue> {
    use clipboard::ClipboardPort;

    let rows: Vec<Vec<String>> = serde_wasm_bindgen::from_value(rows)?;
    if let Some(mut port) = clipboard::DataTransferClipboard::from_event(event) {
        let encoded = clipboard::serialize(&rows);
        port.write(&encoded.html, &encoded.text);
        event.prevent_default();
    }
    Ok(())
}

/// Keyboard and pointer selection for a JS-rendered grid.
///
/// Every event method returns the list of effects the host must carry out.
#[wasm_bindgen]
pub struct SelectionController {
    state: SelectionState,
    col_count: usize,
    row_count: usize,
    config: GridConfig,
    disabled_columns: Vec<u32>,
}

#[wasm_bindgen]
impl SelectionController {
    /// Create a controller for a grid of `col_count` x `row_count` cells.
    ///
    /// # Errors
    /// Returns an error if `config` is not a valid configuration object.
    #[wasm_bindgen(constructor)]
    pub fn new(col_count: usize, row_count: usize, config: JsValue) -> Result<SelectionController, JsValue> {
        #[cfg(target_arch = "wasm32")]
        console_error_panic_hook::set_once();

        let config = if config.is_undefined() || config.is_null() {
            GridConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        Ok(SelectionController {
            state: SelectionState::default(),
            col_count,
            row_count,
            config,
            disabled_columns: Vec::new(),
        })
    }

    /// Update the grid size after rows or columns changed.
    pub fn resize(&mut self, col_count: usize, row_count: usize) {
        self.col_count = col_count;
        self.row_count = row_count;
        let clamp = |cell: Option<Cell>| cell.and_then(|c| c.clamped(col_count, row_count));
        self.state.active = clamp(self.state.active);
        self.state.anchor = clamp(self.state.anchor);
    }

    /// Columns whose cells are read-only.
    pub fn set_disabled_columns(&mut self, columns: Vec<u32>) {
        self.disabled_columns = columns;
    }

    /// Handle a key press given the fields of a `KeyboardEvent`.
    ///
    /// # Errors
    /// Only fails if the effects cannot be converted to JS values.
    pub fn key_down(&mut self, key: &str, shift: bool, ctrl: bool, alt: bool, meta: bool) -> Result<JsValue, JsValue> {
        match InputEvent::from_dom_key(key, shift, ctrl, alt, meta) {
            Some(event) => self.run(&event),
            None => Ok(js_sys::Array::new().into()),
        }
    }

    /// Handle any serialized `InputEvent` (`{type: "pointerDown", cell, extend}`, ...).
    ///
    /// # Errors
    /// Returns an error if `event` is not a valid input event.
    pub fn dispatch(&mut self, event: JsValue) -> Result<JsValue, JsValue> {
        let event: InputEvent = serde_wasm_bindgen::from_value(event)?;
        self.run(&event)
    }

    /// Current `{active, anchor, editing, editBuffer}` state.
    ///
    /// # Errors
    /// Only fails if the state cannot be converted to a JS value.
    pub fn state(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.state).map_err(js_error)
    }

    /// Normalized `{min, max}` selection, or `null`.
    ///
    /// # Errors
    /// Only fails if the selection cannot be converted to a JS value.
    pub fn selection(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.state.selection()).map_err(js_error)
    }

    pub fn is_selected(&self, col: usize, row: usize) -> bool {
        self.state.is_selected(Cell::new(col, row))
    }

    /// Set the active cell from `{col, row}`, or clear it with `null`.
    ///
    /// # Errors
    /// Returns an error for non-object values or non-numeric coordinates.
    pub fn set_active_cell(&mut self, value: JsValue) -> Result<(), JsValue> {
        let value: serde_json::Value = serde_wasm_bindgen::from_value(value)?;
        let ctx = GridContext::new(self.col_count, self.row_count);
        self.state = selection::set_active_cell(&value, &ctx).map_err(js_error)?;
        Ok(())
    }

    /// Set the selection from `{min, max}`, or clear it with `null`.
    ///
    /// # Errors
    /// Returns an error for non-object values or non-numeric coordinates.
    pub fn set_selection(&mut self, value: JsValue) -> Result<(), JsValue> {
        let value: serde_json::Value = serde_wasm_bindgen::from_value(value)?;
        let ctx = GridContext::new(self.col_count, self.row_count);
        self.state = selection::set_selection(&value, &ctx).map_err(js_error)?;
        Ok(())
    }

    /// Forget the active cell, selection and any open edit.
    pub fn reset(&mut self) {
        self.state = SelectionState::default();
    }
}

impl SelectionController {
    fn run(&mut self, event: &InputEvent) -> Result<JsValue, JsValue> {
        let disabled_columns = &self.disabled_columns;
        let disabled = |cell: Cell| {
            u32::try_from(cell.col).is_ok_and(|col| disabled_columns.contains(&col))
        };
        let ctx = GridContext::new(self.col_count, self.row_count)
            .with_locked_rows(self.config.locked_rows)
            .with_auto_add_row(self.config.auto_add_row)
            .with_disabled(&disabled);
        let transition = selection::transition(&self.state, event, &ctx);
        self.state = transition.state;
        serde_wasm_bindgen::to_value(&transition.effects).map_err(js_error)
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl SelectionController {
    /// Handle a DOM `keydown` event.
    ///
    /// # Errors
    /// Only fails if the effects cannot be converted to JS values.
    pub fn key_event(&mut self, event: &web_sys::KeyboardEvent) -> Result<JsValue, JsValue> {
        self.key_down(
            &event.key(),
            event.shift_key(),
            event.ctrl_key(),
            event.alt_key(),
            event.meta_key(),
        )
    }
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
