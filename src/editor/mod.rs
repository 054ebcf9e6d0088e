//! Editable grid session.
//!
//! `DataGrid` owns a snapshot of the host's rows and applies selection
//! effects to it:
//! - Committing editor values and clearing cells
//! - Fill-down, copy, cut and paste through a [`ClipboardPort`]
//! - Inserting, duplicating and deleting rows
//!
//! Every mutation is reported once through the `on_change` callback together
//! with the [`RowOperation`]s describing it.
//!
//! [`ClipboardPort`]: crate::clipboard::ClipboardPort
//! [`RowOperation`]: crate::types::RowOperation

mod grid;
mod planner;

pub use grid::{ChangeCallback, DataGrid, StickinessFn};
pub use planner::{
    plan_delete, plan_duplicate, plan_insert, plan_insert_after, plan_paste, plan_update, summarize,
    PastePlan,
};

/// Host hooks for reading and producing row values.
///
/// `col` is a data column index (the gutter is not counted). Rows are
/// treated as immutable values: writers return a new row.
pub trait RowAdapter<R> {
    /// A blank row for insertion and paste overflow.
    fn create_row(&self) -> R;

    /// Display text of a cell, used for copy and fill-down.
    fn copy_value(&self, row: &R, col: usize) -> String;

    /// The row with `value` written into column `col`.
    fn paste_value(&self, row: &R, col: usize, value: &str) -> R;

    /// The row with column `col` cleared.
    fn delete_value(&self, row: &R, col: usize) -> R {
        self.paste_value(row, col, "")
    }

    /// A copy of `row` for duplication.
    fn duplicate_row(&self, row: &R) -> R
    where
        R: Clone,
    {
        row.clone()
    }
}
