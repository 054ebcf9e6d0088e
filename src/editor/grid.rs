use std::ops::Range;

use serde_json::Value;

use super::planner::{plan_delete, plan_duplicate, plan_insert, plan_paste, plan_update, summarize};
use super::RowAdapter;
use crate::clipboard::{parse as parse_clipboard, serialize as serialize_clipboard, ClipboardPort};
use crate::config::GridConfig;
use crate::error::Result;
use crate::layout::{
    extract_columns, extract_rows, layout_columns, resolve_hints, resolve_sticky_rows, size_columns, Generation,
    GridLayout, LayoutCache, MeasuredRows, Offsets, RowKey, RowMeasurements, StickyKey, StickyWidths, Viewport, WidthKey,
};
use crate::selection::{self, Effect, GridContext, InputEvent, SelectionState};
use crate::types::{sticky_counts, Cell, Column, ColumnWidth, RowOperation, Selection, Stickiness};

/// Host callback receiving the new rows and the operations of one transaction.
pub type ChangeCallback<R> = Box<dyn FnMut(&[R], &[RowOperation])>;

/// Per-row stickiness callback: `(row, row_index) -> hint`.
pub type StickinessFn<R> = Box<dyn Fn(&R, usize) -> Stickiness>;

fn cell_disabled(columns: &[Column], cell: Cell) -> bool {
    columns
        .get(cell.col)
        .is_some_and(|column| column.disabled.is_disabled(cell.row))
}

/// An editable, virtualized grid over host rows of type `R`.
pub struct DataGrid<R, A> {
    rows: Vec<R>,
    columns: Vec<Column>,
    config: GridConfig,
    adapter: A,
    selection: SelectionState,
    stickiness: Option<StickinessFn<R>>,
    on_change: Option<ChangeCallback<R>>,
    /// Heights reported through `record_row_height`, estimated at `config.row_height`
    row_heights: MeasuredRows,
    columns_generation: Generation,
    data_generation: Generation,
    stickiness_generation: Generation,
    measurements_generation: Generation,
    cache: LayoutCache,
}

impl<R: Clone, A: RowAdapter<R>> DataGrid<R, A> {
    pub fn new(rows: Vec<R>, columns: Vec<Column>, adapter: A) -> Self {
        Self {
            rows,
            columns,
            config: GridConfig::default(),
            adapter,
            selection: SelectionState::default(),
            stickiness: None,
            on_change: None,
            row_heights: MeasuredRows::new(GridConfig::default().row_height),
            columns_generation: Generation::new(),
            data_generation: Generation::new(),
            stickiness_generation: Generation::new(),
            measurements_generation: Generation::new(),
            cache: LayoutCache::new(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: GridConfig) -> Self {
        self.set_config(config);
        self
    }

    /// Register the host mutation callback.
    pub fn on_change(&mut self, callback: impl FnMut(&[R], &[RowOperation]) + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    /// Register the row stickiness callback.
    pub fn set_stickiness(&mut self, stickiness: impl Fn(&R, usize) -> Stickiness + 'static) {
        self.stickiness = Some(Box::new(stickiness));
        self.stickiness_generation.bump();
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn cache(&self) -> &LayoutCache {
        &self.cache
    }

    /// Replace the row snapshot (host-driven, so `on_change` is not called).
    pub fn set_rows(&mut self, rows: Vec<R>) {
        self.rows = rows;
        self.data_generation.bump();
        self.clamp_selection();
    }

    pub fn set_columns(&mut self, columns: Vec<Column>) {
        self.columns = columns;
        self.columns_generation.bump();
        self.clamp_selection();
    }

    pub fn set_config(&mut self, config: GridConfig) {
        if config.row_height.to_bits() != self.row_heights.estimate.to_bits() {
            self.row_heights.estimate = config.row_height;
            self.measurements_generation.bump();
        }
        self.config = config;
        // Gutter settings change the layout columns.
        self.columns_generation.bump();
    }

    /// Tell the grid that the measurement oracle learned new row heights.
    pub fn measurements_changed(&mut self) {
        self.measurements_generation.bump();
    }

    /// Record a rendered row height for `measured_layout`.
    pub fn record_row_height(&mut self, index: usize, height: f64) {
        if self.row_heights.measured_height(index).map(f64::to_bits) != Some(height.to_bits()) {
            self.row_heights.record(index, height);
            self.measurements_generation.bump();
        }
    }

    /// Drop the active cell, selection and any open edit.
    pub fn reset_focus(&mut self) {
        self.selection = SelectionState::default();
    }

    pub fn is_cell_disabled(&self, cell: Cell) -> bool {
        cell_disabled(&self.columns, cell)
    }

    fn context<'a>(&self) -> GridContext<'a> {
        GridContext::new(self.columns.len(), self.rows.len())
            .with_locked_rows(self.config.locked_rows)
            .with_auto_add_row(self.config.auto_add_row)
    }

    /// Set the active cell from a `{col, row}` value, or clear it with `null`.
    pub fn set_active_cell(&mut self, value: &Value) -> Result<()> {
        self.selection = selection::set_active_cell(value, &self.context())?;
        Ok(())
    }

    /// Set the selection from a `{min, max}` value, or clear it with `null`.
    pub fn set_selection(&mut self, value: &Value) -> Result<()> {
        self.selection = selection::set_selection(value, &self.context())?;
        Ok(())
    }

    fn clamp_selection(&mut self) {
        let (cols, rows) = (self.columns.len(), self.rows.len());
        let state = &mut self.selection;
        state.active = state.active.and_then(|cell| cell.clamped(cols, rows));
        state.anchor = state.anchor.and_then(|cell| cell.clamped(cols, rows));
        if state.active.is_none() {
            *state = SelectionState::default();
        }
    }

    /// Run one input event through the selection engine and apply its
    /// effects. Effects the host must act on (scrolling, opening or closing
    /// the cell editor, leaving the grid) are returned.
    pub fn handle(&mut self, event: &InputEvent, clipboard: &mut dyn ClipboardPort) -> Vec<Effect> {
        let transition = {
            let columns = &self.columns;
            let disabled = |cell: Cell| cell_disabled(columns, cell);
            let ctx = self.context().with_disabled(&disabled);
            selection::transition(&self.selection, event, &ctx)
        };
        self.selection = transition.state;

        let mut host_effects = Vec::new();
        for effect in transition.effects {
            match effect {
                Effect::Commit { cell, value } => self.commit(cell, &value),
                Effect::InsertRowAfter { row } => self.insert_rows_after(row, 1),
                Effect::DeleteSelection { selection } => self.clear_cells(selection),
                Effect::DuplicateRows { rows } => self.duplicate_rows(rows),
                Effect::Copy { selection } => self.copy(selection, clipboard),
                Effect::Cut { selection } => self.cut(selection, clipboard),
                Effect::Paste { selection } => self.paste(selection, clipboard),
                other => host_effects.push(other),
            }
        }
        host_effects
    }

    fn emit(&mut self, operations: &[RowOperation], action: &str) {
        if operations.is_empty() {
            return;
        }
        self.data_generation.bump();
        log::debug!("{action}: {:?} over {} rows", summarize(operations), self.rows.len());
        if let Some(callback) = self.on_change.as_mut() {
            callback(self.rows.as_slice(), operations);
        }
    }

    /// Rewrite one cell through the adapter. Disabled and out-of-range
    /// cells are left alone.
    fn write_cell(&mut self, cell: Cell, write: impl FnOnce(&A, &R) -> R) -> bool {
        if cell.col >= self.columns.len() || cell_disabled(&self.columns, cell) {
            return false;
        }
        let Some(row) = self.rows.get_mut(cell.row) else {
            return false;
        };
        *row = write(&self.adapter, row);
        true
    }

    /// Write `value` into every writable cell of `selection`, returning the
    /// rows that changed.
    fn fill_rect(&mut self, selection: Selection, value: &str) -> Vec<usize> {
        let mut touched = Vec::new();
        for row in selection.rows() {
            let mut changed = false;
            for col in selection.cols() {
                changed |= self.write_cell(Cell::new(col, row), |adapter, r| adapter.paste_value(r, col, value));
            }
            if changed {
                touched.push(row);
            }
        }
        touched
    }

    /// Commit an editor value.
    pub fn commit(&mut self, cell: Cell, value: &str) {
        if self.write_cell(cell, |adapter, row| adapter.paste_value(row, cell.col, value)) {
            self.emit(&plan_update([cell.row]), "commit");
        }
    }

    /// Clear every writable cell of `selection`.
    pub fn clear_cells(&mut self, selection: Selection) {
        let mut touched = Vec::new();
        for row in selection.rows() {
            let mut changed = false;
            for col in selection.cols() {
                changed |= self.write_cell(Cell::new(col, row), |adapter, r| adapter.delete_value(r, col));
            }
            if changed {
                touched.push(row);
            }
        }
        self.emit(&plan_update(touched), "clear");
    }

    /// Copy the first row of `selection` into the rows below it.
    pub fn fill_down(&mut self, selection: Selection) {
        let Some(source) = self.rows.get(selection.min.row) else {
            return;
        };
        let values: Vec<(usize, String)> = selection
            .cols()
            .filter(|col| *col < self.columns.len())
            .map(|col| (col, self.adapter.copy_value(source, col)))
            .collect();

        let mut touched = Vec::new();
        for row in selection.rows().skip(1) {
            let mut changed = false;
            for (col, value) in &values {
                changed |= self.write_cell(Cell::new(*col, row), |adapter, r| adapter.paste_value(r, *col, value));
            }
            if changed {
                touched.push(row);
            }
        }
        self.emit(&plan_update(touched), "fill down");
    }

    /// Cell text of `selection`, clipped to existing rows and columns.
    pub fn selected_values(&self, selection: Selection) -> Vec<Vec<String>> {
        let cols = selection.min.col..selection.cols().end.min(self.columns.len());
        selection
            .rows()
            .filter_map(|row| self.rows.get(row))
            .map(|row| cols.clone().map(|col| self.adapter.copy_value(row, col)).collect())
            .collect()
    }

    /// Write `selection` to the clipboard as both text and HTML.
    pub fn copy(&self, selection: Selection, clipboard: &mut dyn ClipboardPort) {
        let values = self.selected_values(selection);
        if values.is_empty() {
            return;
        }
        let encoded = serialize_clipboard(&values);
        clipboard.write(&encoded.html, &encoded.text);
    }

    pub fn cut(&mut self, selection: Selection, clipboard: &mut dyn ClipboardPort) {
        self.copy(selection, clipboard);
        self.clear_cells(selection);
    }

    /// Paste the clipboard at `selection`.
    ///
    /// A single value pasted into a multi-cell selection fills it. Anything
    /// else is anchored at the selection's min cell, truncated at the last
    /// column, and overflows into new rows unless rows are locked. The
    /// written area becomes the new selection.
    pub fn paste(&mut self, selection: Selection, clipboard: &mut dyn ClipboardPort) {
        let values = parse_clipboard(&clipboard.read());
        if values.is_empty() || self.columns.is_empty() {
            log::debug!("nothing to paste");
            return;
        }

        if !selection.is_single_cell() {
            if let [row] = values.as_slice() {
                if let [value] = row.as_slice() {
                    let touched = self.fill_rect(selection, value);
                    self.emit(&plan_update(touched), "paste fill");
                    return;
                }
            }
        }

        let last_col = self.columns.len() - 1;
        let start = Cell::new(selection.min.col.min(last_col), selection.min.row.min(self.rows.len()));
        let plan = plan_paste(start.row, values.len(), self.rows.len(), self.config.locked_rows);

        for _ in 0..plan.appended {
            let row = self.adapter.create_row();
            self.rows.push(row);
        }

        let mut max_col = start.col;
        for (row, row_values) in plan.written.clone().zip(&values) {
            for (offset, value) in row_values.iter().enumerate() {
                let col = start.col + offset;
                if col > last_col {
                    break;
                }
                max_col = max_col.max(col);
                self.write_cell(Cell::new(col, row), |adapter, r| adapter.paste_value(r, col, value));
            }
        }

        if !plan.written.is_empty() {
            self.selection = SelectionState {
                active: Some(start),
                anchor: Some(Cell::new(max_col, plan.written.end - 1)),
                editing: false,
                edit_buffer: None,
            };
        }
        self.emit(&plan.operations, "paste");
    }

    /// Insert `count` blank rows at index `at` (clamped to the row count).
    pub fn insert_rows(&mut self, at: usize, count: usize) {
        if self.config.locked_rows || count == 0 {
            return;
        }
        let at = at.min(self.rows.len());
        let blank: Vec<R> = (0..count).map(|_| self.adapter.create_row()).collect();
        self.rows.splice(at..at, blank);
        self.emit(&plan_insert(at, count), "insert");
    }

    pub fn insert_rows_after(&mut self, row: usize, count: usize) {
        self.insert_rows(row.saturating_add(1), count);
    }

    /// Duplicate `rows` in ascending order, directly after the last of them.
    pub fn duplicate_rows(&mut self, rows: Range<usize>) {
        if self.config.locked_rows {
            return;
        }
        let end = rows.end.min(self.rows.len());
        let start = rows.start.min(end);
        let copies: Vec<R> = self
            .rows
            .get(start..end)
            .unwrap_or_default()
            .iter()
            .map(|row| self.adapter.duplicate_row(row))
            .collect();
        self.rows.splice(end..end, copies);
        self.emit(&plan_duplicate(start..end), "duplicate");
    }

    /// Delete rows by index. Resets the selection.
    pub fn delete_rows(&mut self, indices: &[usize]) {
        if self.config.locked_rows {
            return;
        }
        let valid: Vec<usize> = indices.iter().copied().filter(|i| *i < self.rows.len()).collect();
        let operations = plan_delete(&valid);
        if operations.is_empty() {
            return;
        }
        for op in &operations {
            self.rows.drain(op.from_row_index..op.to_row_index).for_each(drop);
        }
        self.selection = SelectionState::default();
        self.emit(&operations, "delete");
    }

    /// Compute (or fetch from cache) everything needed to render one frame.
    pub fn layout(&mut self, viewport: &Viewport, measurements: &dyn RowMeasurements) -> GridLayout {
        self.compute_layout(viewport, Some(measurements))
    }

    /// Like `layout`, using heights from `record_row_height` and
    /// `config.row_height` for rows never measured.
    ///
    /// Both share one row cache, so a host should stick to one of the two.
    pub fn measured_layout(&mut self, viewport: &Viewport) -> GridLayout {
        self.compute_layout(viewport, None)
    }

    fn compute_layout(&mut self, viewport: &Viewport, measurements: Option<&dyn RowMeasurements>) -> GridLayout {
        let own_heights = &self.row_heights;
        let measurements: &dyn RowMeasurements = match measurements {
            Some(measurements) => measurements,
            None => own_heights,
        };
        let columns = layout_columns(&self.config, &self.columns);
        let container = (viewport.width > 0.0).then_some(viewport.width);

        let widths = self
            .cache
            .widths
            .get_or_compute(WidthKey::new(self.columns_generation, container), || {
                let constraints: Vec<ColumnWidth> = columns.iter().map(|c| c.width).collect();
                size_columns(container, &constraints)
            });

        let rows = &self.rows;
        let row_key = RowKey {
            data: self.data_generation,
            measurements: self.measurements_generation,
        };
        let row_offsets = self
            .cache
            .rows
            .get_or_compute(row_key, || Offsets::for_rows(rows.len(), measurements));

        let stickiness = self.stickiness.as_ref();
        let sticky_key = StickyKey {
            rows: row_key,
            stickiness: self.stickiness_generation,
        };
        let sticky = self.cache.sticky.get_or_compute(sticky_key, || match stickiness {
            Some(hint_for) => {
                let hints = resolve_hints(rows.len(), |index| {
                    rows.get(index)
                        .map_or_else(Stickiness::default, |row| hint_for(row, index))
                });
                resolve_sticky_rows(&hints, row_offsets)
            }
            None => Vec::new(),
        });

        let col_offsets = Offsets::from_sizes(widths.iter().copied());
        let (sticky_left, sticky_right) = sticky_counts(&columns);
        let header = self.config.header_row_height;
        let row_range = viewport.visible_rows(row_offsets, header, self.config.overscan_rows);
        let col_range = viewport.visible_cols(
            &col_offsets,
            StickyWidths::measure(&col_offsets, sticky_left, sticky_right),
            self.config.overscan_cols,
        );

        GridLayout {
            widths: widths.clone(),
            sticky_rows: sticky.clone(),
            rows: extract_rows(&row_range, sticky, viewport.window(header)),
            cols: extract_columns(&col_range, sticky_left, sticky_right),
            content_height: row_offsets.total(),
            content_width: col_offsets.total(),
        }
    }

    /// Scroll position that brings `cell` into view, or `None` if it is
    /// already visible.
    pub fn scroll_target(
        &mut self,
        cell: Cell,
        viewport: &Viewport,
        measurements: &dyn RowMeasurements,
    ) -> Option<(f64, f64)> {
        let layout = self.layout(viewport, measurements);
        let rows = self.cache.rows.peek()?;
        let cols = Offsets::from_sizes(layout.widths.iter().copied());
        let (sticky_left, sticky_right) = sticky_counts(&layout_columns(&self.config, &self.columns));
        let layout_col = cell.col + usize::from(self.config.gutter);
        viewport.scroll_into_view(
            cell.row,
            layout_col,
            rows,
            &cols,
            StickyWidths::measure(&cols, sticky_left, sticky_right),
            sticky_left,
            sticky_right,
            self.config.header_row_height,
        )
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::clipboard::{ClipboardPayload, MemoryClipboard};
    use crate::layout::UniformRowHeight;
    use crate::selection::{Key, Modifiers};
    use crate::types::{Disabled, StickyHint};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Strings(usize);

    impl RowAdapter<Vec<String>> for Strings {
        fn create_row(&self) -> Vec<String> {
            vec![String::new(); self.0]
        }

        fn copy_value(&self, row: &Vec<String>, col: usize) -> String {
            row.get(col).cloned().unwrap_or_default()
        }

        fn paste_value(&self, row: &Vec<String>, col: usize, value: &str) -> Vec<String> {
            let mut row = row.clone();
            row[col] = value.to_string();
            row
        }
    }

    type Log = Rc<RefCell<Vec<Vec<RowOperation>>>>;

    fn grid(data: &[&[&str]]) -> (DataGrid<Vec<String>, Strings>, Log) {
        let width = data.first().map_or(2, |r| r.len());
        let rows = data
            .iter()
            .map(|r| r.iter().map(|c| (*c).to_string()).collect())
            .collect();
        let columns = (0..width).map(|i| Column::new(format!("c{i}"))).collect();
        let mut grid = DataGrid::new(rows, columns, Strings(width));
        let log: Log = Rc::default();
        let sink = Rc::clone(&log);
        grid.on_change(move |_, ops| sink.borrow_mut().push(ops.to_vec()));
        (grid, log)
    }

    fn values(grid: &DataGrid<Vec<String>, Strings>) -> Vec<Vec<String>> {
        grid.rows().to_vec()
    }

    #[test]
    fn test_edit_through_keyboard() {
        let (mut grid, log) = grid(&[&["a", "b"], &["c", "d"]]);
        let mut clipboard = MemoryClipboard::new();
        grid.set_active_cell(&serde_json::json!({"col": 1, "row": 0})).unwrap();

        grid.handle(&InputEvent::key(Key::Enter), &mut clipboard);
        grid.handle(&InputEvent::EditorInput { value: "B".into() }, &mut clipboard);
        let effects = grid.handle(&InputEvent::key(Key::Enter), &mut clipboard);

        assert_eq!(values(&grid)[0], vec!["a", "B"]);
        assert_eq!(log.borrow().as_slice(), &[vec![RowOperation::update(0, 1)]]);
        assert_eq!(grid.selection().active, Some(Cell::new(1, 1)));
        assert_eq!(effects, vec![Effect::ScrollIntoView { cell: Cell::new(1, 1) }]);
    }

    #[test]
    fn test_paste_overflow_creates_rows() {
        let (mut grid, log) = grid(&[&["x", "y"]]);
        let mut clipboard = MemoryClipboard::with_text("1\t2\n3\t4\n5\t6");
        grid.paste(Selection::single(Cell::new(0, 0)), &mut clipboard);

        assert_eq!(values(&grid), vec![vec!["1", "2"], vec!["3", "4"], vec!["5", "6"]]);
        assert_eq!(
            log.borrow().as_slice(),
            &[vec![RowOperation::update(0, 1), RowOperation::create(1, 3)]]
        );
        assert_eq!(
            grid.selection().selection(),
            Some(Selection::from_corners(Cell::new(0, 0), Cell::new(1, 2)))
        );
    }

    #[test]
    fn test_paste_locked_rows_truncates_and_clips_columns() {
        let (mut grid, log) = grid(&[&["a", "b"], &["c", "d"]]);
        grid.set_config(GridConfig {
            locked_rows: true,
            ..GridConfig::default()
        });
        let mut clipboard = MemoryClipboard::with_text("1\t2\t3\n4\t5\t6\n7\t8\t9");
        grid.paste(Selection::single(Cell::new(1, 1)), &mut clipboard);

        assert_eq!(values(&grid), vec![vec!["a", "b"], vec!["c", "1"]]);
        assert_eq!(log.borrow().as_slice(), &[vec![RowOperation::update(1, 2)]]);
    }

    #[test]
    fn test_single_value_fills_selection() {
        let (mut grid, log) = grid(&[&["a", "b"], &["c", "d"], &["e", "f"]]);
        let mut clipboard = MemoryClipboard::with_text("z\n");
        grid.paste(Selection::from_corners(Cell::new(0, 1), Cell::new(1, 2)), &mut clipboard);

        assert_eq!(values(&grid), vec![vec!["a", "b"], vec!["z", "z"], vec!["z", "z"]]);
        assert_eq!(log.borrow().as_slice(), &[vec![RowOperation::update(1, 3)]]);
    }

    #[test]
    fn test_disabled_cells_are_skipped() {
        let (mut grid, _) = grid(&[&["a", "b"], &["c", "d"]]);
        let mut columns = grid.columns().to_vec();
        columns[1] = columns[1].clone().with_disabled(Disabled::when(|row| row == 0));
        grid.set_columns(columns);

        let mut clipboard = MemoryClipboard::with_text("1\t2\n3\t4");
        grid.paste(Selection::single(Cell::new(0, 0)), &mut clipboard);
        assert_eq!(values(&grid), vec![vec!["1", "b"], vec!["3", "4"]]);
    }

    #[test]
    fn test_empty_clipboard_is_noop() {
        let (mut grid, log) = grid(&[&["a"]]);
        grid.paste(Selection::single(Cell::new(0, 0)), &mut MemoryClipboard::new());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_copy_and_cut() {
        let (mut grid, log) = grid(&[&["a", "b"], &["c", "d"]]);
        let mut clipboard = MemoryClipboard::new();
        let all = Selection::from_corners(Cell::new(0, 0), Cell::new(1, 1));

        grid.copy(all, &mut clipboard);
        assert_eq!(clipboard.contents.text.as_deref(), Some("a\tb\nc\td"));
        assert!(clipboard.contents.html.as_deref().unwrap().starts_with("<table>"));

        grid.cut(Selection::single(Cell::new(0, 1)), &mut clipboard);
        assert_eq!(clipboard.contents.text.as_deref(), Some("c"));
        assert_eq!(values(&grid)[1], vec!["", "d"]);
        assert_eq!(log.borrow().last().unwrap(), &vec![RowOperation::update(1, 2)]);
    }

    #[test]
    fn test_keyboard_copy_paste_round_trip() {
        let (mut grid, _) = grid(&[&["a", "b"], &["", ""]]);
        let mut clipboard = MemoryClipboard::new();
        grid.set_selection(&serde_json::json!({"min": {"col": 0, "row": 0}, "max": {"col": 1, "row": 0}}))
            .unwrap();
        grid.handle(&InputEvent::Copy, &mut clipboard);
        grid.set_active_cell(&serde_json::json!({"col": 0, "row": 1})).unwrap();
        grid.handle(&InputEvent::Paste, &mut clipboard);
        assert_eq!(values(&grid)[1], vec!["a", "b"]);
    }

    #[test]
    fn test_fill_down() {
        let (mut grid, log) = grid(&[&["a", "b"], &["c", "d"], &["e", "f"]]);
        grid.fill_down(Selection::from_corners(Cell::new(0, 0), Cell::new(0, 2)));
        assert_eq!(values(&grid), vec![vec!["a", "b"], vec!["a", "d"], vec!["a", "f"]]);
        assert_eq!(log.borrow().as_slice(), &[vec![RowOperation::update(1, 3)]]);
    }

    #[test]
    fn test_ctrl_d_duplicates_rows() {
        let (mut grid, log) = grid(&[&["a"], &["b"], &["c"]]);
        let mut clipboard = MemoryClipboard::new();
        grid.set_active_cell(&serde_json::json!({"col": 0, "row": 1})).unwrap();
        grid.handle(&InputEvent::key_with(Key::Char('d'), Modifiers::CTRL), &mut clipboard);

        assert_eq!(values(&grid), vec![vec!["a"], vec!["b"], vec!["b"], vec!["c"]]);
        assert_eq!(log.borrow().as_slice(), &[vec![RowOperation::create(2, 3)]]);
        assert_eq!(grid.selection().active, Some(Cell::new(0, 2)));
    }

    #[test]
    fn test_delete_rows_resets_selection() {
        let (mut grid, log) = grid(&[&["0"], &["1"], &["2"], &["3"], &["4"]]);
        grid.set_active_cell(&serde_json::json!({"col": 0, "row": 3})).unwrap();
        grid.delete_rows(&[4, 0, 1]);

        assert_eq!(values(&grid), vec![vec!["2"], vec!["3"]]);
        assert_eq!(
            log.borrow().as_slice(),
            &[vec![RowOperation::delete(4, 5), RowOperation::delete(0, 2)]]
        );
        assert_eq!(grid.selection(), &SelectionState::default());
    }

    #[test]
    fn test_insert_and_duplicate() {
        let (mut grid, log) = grid(&[&["a"], &["b"], &["c"]]);
        grid.duplicate_rows(0..2);
        assert_eq!(values(&grid), vec![vec!["a"], vec!["b"], vec!["a"], vec!["b"], vec!["c"]]);
        grid.insert_rows_after(4, 1);
        assert_eq!(grid.rows().len(), 6);
        assert_eq!(
            log.borrow().as_slice(),
            &[vec![RowOperation::create(2, 4)], vec![RowOperation::create(5, 6)]]
        );
    }

    #[test]
    fn test_locked_rows_block_structure_changes() {
        let (mut grid, log) = grid(&[&["a"], &["b"]]);
        grid.set_config(GridConfig {
            locked_rows: true,
            ..GridConfig::default()
        });
        grid.insert_rows(0, 2);
        grid.duplicate_rows(0..1);
        grid.delete_rows(&[0]);
        assert_eq!(grid.rows().len(), 2);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_enter_on_last_row_auto_adds() {
        let (mut grid, log) = grid(&[&["a"]]);
        grid.set_config(GridConfig {
            auto_add_row: true,
            ..GridConfig::default()
        });
        let mut clipboard = MemoryClipboard::new();
        grid.set_active_cell(&serde_json::json!({"col": 0, "row": 0})).unwrap();
        grid.handle(&InputEvent::key(Key::Char('q')), &mut clipboard);
        grid.handle(&InputEvent::key(Key::Enter), &mut clipboard);

        assert_eq!(values(&grid), vec![vec!["q"], vec![""]]);
        assert_eq!(grid.selection().active, Some(Cell::new(0, 1)));
        assert_eq!(
            log.borrow().as_slice(),
            &[vec![RowOperation::update(0, 1)], vec![RowOperation::create(1, 2)]]
        );
    }

    #[test]
    fn test_layout_is_memoized_by_generation() {
        let data: Vec<Vec<&str>> = (0..100).map(|_| vec!["v", "w"]).collect();
        let refs: Vec<&[&str]> = data.iter().map(Vec::as_slice).collect();
        let (mut grid, _) = grid(&refs);
        let viewport = Viewport::new(240.0, 440.0);
        let heights = UniformRowHeight(40.0);

        let first = grid.layout(&viewport, &heights);
        // Gutter 40 + two flexible columns sharing 200.
        assert_eq!(first.widths, vec![40.0, 100.0, 100.0]);
        assert_eq!(first.content_height, 4000.0);
        assert_eq!(first.cols, vec![0, 1, 2]);
        assert_eq!(first.rows.first(), Some(&0));

        let second = grid.layout(&viewport, &heights);
        assert_eq!(first, second);
        assert_eq!(grid.cache().widths.misses(), 1);
        assert_eq!(grid.cache().rows.misses(), 1);

        grid.set_rows(grid.rows()[..10].to_vec());
        let third = grid.layout(&viewport, &heights);
        assert_eq!(third.content_height, 400.0);
        assert_eq!(grid.cache().rows.misses(), 2);
        assert_eq!(grid.cache().widths.misses(), 1);
    }

    #[test]
    fn test_measured_layout_uses_configured_row_height() {
        let data: Vec<Vec<&str>> = (0..10).map(|_| vec!["v"]).collect();
        let refs: Vec<&[&str]> = data.iter().map(Vec::as_slice).collect();
        let (mut grid, _) = grid(&refs);
        let viewport = Viewport::new(300.0, 240.0);

        assert_eq!(grid.measured_layout(&viewport).content_height, 400.0);

        grid.set_config(GridConfig::from_json(r#"{"rowHeight":24}"#).unwrap());
        assert_eq!(grid.measured_layout(&viewport).content_height, 240.0);

        grid.record_row_height(3, 100.0);
        assert_eq!(grid.measured_layout(&viewport).content_height, 316.0);

        // Recording the same height again keeps the cached rows.
        let misses = grid.cache().rows.misses();
        grid.record_row_height(3, 100.0);
        grid.measured_layout(&viewport);
        assert_eq!(grid.cache().rows.misses(), misses);
    }

    #[test]
    fn test_layout_keeps_docked_sticky_rows() {
        let data: Vec<Vec<&str>> = (0..100).map(|_| vec!["v"]).collect();
        let refs: Vec<&[&str]> = data.iter().map(Vec::as_slice).collect();
        let (mut grid, _) = grid(&refs);
        grid.set_stickiness(|_, index| {
            if index == 0 {
                Stickiness::from(StickyHint::top(1))
            } else {
                Stickiness::default()
            }
        });

        let mut viewport = Viewport::new(300.0, 240.0);
        viewport.scroll_y = 2000.0;
        let layout = grid.layout(&viewport, &UniformRowHeight(40.0));
        assert_eq!(layout.sticky_rows.len(), 1);
        assert_eq!(layout.rows.first(), Some(&0));
        assert!(layout.rows.contains(&50));
    }

    #[test]
    fn test_html_paste_preferred() {
        let (mut grid, _) = grid(&[&["", ""]]);
        let mut clipboard = MemoryClipboard {
            contents: ClipboardPayload {
                html: Some("<table><tr><td>h1</td><td>h2</td></tr></table>".into()),
                text: Some("t1\tt2".into()),
            },
        };
        grid.paste(Selection::single(Cell::new(0, 0)), &mut clipboard);
        assert_eq!(values(&grid), vec![vec!["h1", "h2"]]);
    }
}
