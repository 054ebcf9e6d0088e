//! Imperative setters for hosts that drive the selection from outside.
//!
//! Values arrive JSON-shaped (from JavaScript or a config file). A wrong
//! shape is a host programming error and fails with
//! [`GridError::InvalidArgument`]; well-typed but out-of-range coordinates
//! are clamped.

use serde_json::{Map, Value};

use super::engine::{GridContext, SelectionState};
use crate::error::{GridError, Result};
use crate::types::{Cell, Selection};

fn as_object<'v>(value: &'v Value, what: &str) -> Result<&'v Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| GridError::InvalidArgument(format!("{what} must be an object or null, got {value}")))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn coordinate(object: &Map<String, Value>, key: &str) -> Result<usize> {
    let number = object
        .get(key)
        .and_then(Value::as_f64)
        .filter(|n| n.is_finite())
        .ok_or_else(|| GridError::InvalidArgument(format!("`{key}` must be a number")))?;
    // Saturating float-to-int cast; negatives floor to 0.
    Ok(number.floor().max(0.0) as usize)
}

fn parse_cell(value: &Value, ctx: &GridContext<'_>) -> Result<Option<Cell>> {
    let object = as_object(value, "cell")?;
    let cell = Cell::new(coordinate(object, "col")?, coordinate(object, "row")?);
    Ok(ctx.clamp(cell))
}

/// State with the active cell set (or with `null`, cleared).
///
/// Any anchor and open edit are dropped.
pub fn set_active_cell(value: &Value, ctx: &GridContext<'_>) -> Result<SelectionState> {
    let active = match value {
        Value::Null => None,
        other => parse_cell(other, ctx)?,
    };
    Ok(SelectionState {
        active,
        anchor: None,
        editing: false,
        edit_buffer: None,
    })
}

/// State with the selection set from a `{min, max}` object (or cleared by `null`).
///
/// The active cell lands on `min` and the anchor on `max`.
pub fn set_selection(value: &Value, ctx: &GridContext<'_>) -> Result<SelectionState> {
    if value.is_null() {
        return Ok(SelectionState::default());
    }

    let object = as_object(value, "selection")?;
    let corner = |key: &str| -> Result<Option<Cell>> {
        let inner = object
            .get(key)
            .ok_or_else(|| GridError::InvalidArgument(format!("selection is missing `{key}`")))?;
        parse_cell(inner, ctx)
    };
    let (min, max) = (corner("min")?, corner("max")?);

    let (active, anchor) = match (min, max) {
        (Some(a), Some(b)) => {
            let normalized = Selection::from_corners(a, b);
            (Some(normalized.min), Some(normalized.max))
        }
        _ => (None, None),
    };
    Ok(SelectionState {
        active,
        anchor,
        editing: false,
        edit_buffer: None,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_active_cell_floors_and_clamps() {
        let ctx = GridContext::new(3, 5);
        let state = set_active_cell(&json!({"col": 1.7, "row": 99}), &ctx).unwrap();
        assert_eq!(state.active, Some(Cell::new(1, 4)));

        let state = set_active_cell(&json!({"col": -4, "row": 0}), &ctx).unwrap();
        assert_eq!(state.active, Some(Cell::new(0, 0)));
    }

    #[test]
    fn test_null_clears() {
        let ctx = GridContext::new(3, 3);
        let cleared = set_selection(&Value::Null, &ctx).unwrap();
        assert_eq!(cleared, SelectionState::default());
        let cleared = set_active_cell(&Value::Null, &ctx).unwrap();
        assert_eq!(cleared.active, None);
    }

    #[test]
    fn test_set_selection_normalizes() {
        let ctx = GridContext::new(5, 5);
        let state = set_selection(
            &json!({"min": {"col": 3, "row": 0}, "max": {"col": 1, "row": 2}}),
            &ctx,
        )
        .unwrap();
        assert_eq!(state.active, Some(Cell::new(1, 0)));
        assert_eq!(state.anchor, Some(Cell::new(3, 2)));
    }

    #[test]
    fn test_invalid_shapes_rejected() {
        let ctx = GridContext::new(3, 3);
        for bad in [json!(5), json!("A1"), json!([0, 0]), json!({"col": "1", "row": 0}), json!({"col": 1})] {
            let err = set_active_cell(&bad, &ctx).unwrap_err();
            assert!(matches!(err, GridError::InvalidArgument(_)), "{bad}");
        }
        let err = set_selection(&json!({"min": {"col": 0, "row": 0}}), &ctx).unwrap_err();
        assert!(matches!(err, GridError::InvalidArgument(_)));
    }

    #[test]
    fn test_empty_grid_yields_no_cell() {
        let ctx = GridContext::new(0, 0);
        let state = set_active_cell(&json!({"col": 0, "row": 0}), &ctx).unwrap();
        assert_eq!(state.active, None);
    }
}
