//! Tests for editing sessions through `DataGrid`
//!
//! These drive a grid over a host row type the way a UI does: input events in,
//! row snapshots and `RowOperation`s out through the change callback.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::json;
use sheetgrid::clipboard::{ClipboardPayload, MemoryClipboard};
use sheetgrid::layout::{UniformRowHeight, Viewport};
use sheetgrid::selection::{Effect, InputEvent, Key, Modifiers};
use sheetgrid::{
    Cell, Column, DataGrid, Disabled, GridConfig, GridError, RowAdapter, RowOperation, Selection,
    Stickiness,
};

// ================================================================
// Test helpers
// ================================================================

#[derive(Debug, Clone, Default, PartialEq)]
struct Product {
    name: String,
    qty: u32,
    section: bool,
}

impl Product {
    fn new(name: &str, qty: u32) -> Self {
        Self {
            name: name.to_string(),
            qty,
            section: false,
        }
    }
}

/// Column 0 is the name, column 1 the quantity. Unparseable quantities
/// become 0.
struct Products;

impl RowAdapter<Product> for Products {
    fn create_row(&self) -> Product {
        Product::default()
    }

    fn copy_value(&self, row: &Product, col: usize) -> String {
        match col {
            0 => row.name.clone(),
            _ => row.qty.to_string(),
        }
    }

    fn paste_value(&self, row: &Product, col: usize, value: &str) -> Product {
        let mut row = row.clone();
        match col {
            0 => row.name = value.to_string(),
            _ => row.qty = value.trim().parse().unwrap_or(0),
        }
        row
    }
}

type Changes = Rc<RefCell<Vec<(usize, Vec<RowOperation>)>>>;

fn grid(products: Vec<Product>, config: GridConfig) -> (DataGrid<Product, Products>, Changes) {
    let columns = vec![Column::new("name"), Column::new("qty")];
    let mut grid = DataGrid::new(products, columns, Products).with_config(config);
    let changes: Changes = Rc::default();
    let sink = Rc::clone(&changes);
    grid.on_change(move |rows, ops| sink.borrow_mut().push((rows.len(), ops.to_vec())));
    (grid, changes)
}

fn inventory() -> Vec<Product> {
    vec![
        Product::new("apples", 3),
        Product::new("pears", 5),
        Product::new("plums", 0),
    ]
}

fn names(grid: &DataGrid<Product, Products>) -> Vec<&str> {
    grid.rows().iter().map(|p| p.name.as_str()).collect()
}

// ================================================================
// Editing
// ================================================================

#[test]
fn test_typed_quantity_is_committed() {
    let (mut grid, changes) = grid(inventory(), GridConfig::default());
    let mut clipboard = MemoryClipboard::new();

    grid.set_active_cell(&json!({"col": 1, "row": 2})).unwrap();
    grid.handle(&InputEvent::key(Key::Char('9')), &mut clipboard);
    grid.handle(&InputEvent::EditorInput { value: "12".into() }, &mut clipboard);
    let effects = grid.handle(&InputEvent::key(Key::Enter), &mut clipboard);

    assert_eq!(grid.rows()[2].qty, 12);
    assert_eq!(*changes.borrow(), vec![(3, vec![RowOperation::update(2, 3)])]);
    // Last row and no auto-add: focus stays and nothing scrolls.
    assert!(effects.is_empty());
    assert_eq!(grid.selection().active, Some(Cell::new(1, 2)));
}

#[test]
fn test_auto_add_row_from_json_config() {
    let config = GridConfig::from_json(r#"{"autoAddRow": true, "gutter": false}"#).unwrap();
    let (mut grid, changes) = grid(inventory(), config);
    let mut clipboard = MemoryClipboard::new();

    grid.set_active_cell(&json!({"col": 0, "row": 2})).unwrap();
    grid.handle(&InputEvent::key(Key::Char('k')), &mut clipboard);
    grid.handle(&InputEvent::EditorInput { value: "kiwis".into() }, &mut clipboard);
    grid.handle(&InputEvent::key(Key::Enter), &mut clipboard);

    assert_eq!(names(&grid), vec!["apples", "pears", "kiwis", ""]);
    assert_eq!(grid.selection().active, Some(Cell::new(0, 3)));
    assert_eq!(
        *changes.borrow(),
        vec![
            (3, vec![RowOperation::update(2, 3)]),
            (4, vec![RowOperation::create(3, 4)]),
        ]
    );
}

#[test]
fn test_invalid_setter_values_are_rejected() {
    let (mut grid, _) = grid(inventory(), GridConfig::default());
    let err = grid.set_active_cell(&json!("B2")).unwrap_err();
    assert!(matches!(err, GridError::InvalidArgument(_)));
    assert_eq!(grid.selection().active, None);

    grid.set_selection(&json!({"min": {"col": 5, "row": 9}, "max": {"col": 0, "row": 1}}))
        .unwrap();
    assert_eq!(
        grid.selection().selection(),
        Some(Selection::from_corners(Cell::new(0, 1), Cell::new(1, 2)))
    );
}

// ================================================================
// Clipboard
// ================================================================

#[test]
fn test_paste_spreadsheet_block_appends_rows() {
    let (mut grid, changes) = grid(inventory(), GridConfig::default());
    let mut clipboard = MemoryClipboard::with_text("figs\t7\r\ndates\t2\r\nlimes\t11\r\n");

    grid.set_active_cell(&json!({"col": 0, "row": 1})).unwrap();
    grid.handle(&InputEvent::Paste, &mut clipboard);

    assert_eq!(names(&grid), vec!["apples", "figs", "dates", "limes"]);
    assert_eq!(grid.rows()[3].qty, 11);
    assert_eq!(
        *changes.borrow(),
        vec![(4, vec![RowOperation::update(1, 3), RowOperation::create(3, 4)])]
    );
    assert_eq!(
        grid.selection().selection(),
        Some(Selection::from_corners(Cell::new(0, 1), Cell::new(1, 3)))
    );
}

#[test]
fn test_paste_with_locked_rows_is_truncated() {
    let config = GridConfig {
        locked_rows: true,
        ..GridConfig::default()
    };
    let (mut grid, changes) = grid(inventory(), config);
    let mut clipboard = MemoryClipboard::with_text("a\nb\nc\nd");

    grid.set_active_cell(&json!({"col": 0, "row": 2})).unwrap();
    grid.handle(&InputEvent::Paste, &mut clipboard);

    assert_eq!(names(&grid), vec!["apples", "pears", "a"]);
    assert_eq!(*changes.borrow(), vec![(3, vec![RowOperation::update(2, 3)])]);
}

#[test]
fn test_copy_then_paste_html_elsewhere() {
    let (mut grid, _) = grid(inventory(), GridConfig::default());
    let mut clipboard = MemoryClipboard::new();

    grid.set_selection(&json!({"min": {"col": 0, "row": 0}, "max": {"col": 1, "row": 1}}))
        .unwrap();
    grid.handle(&InputEvent::Copy, &mut clipboard);
    assert_eq!(clipboard.contents.text.as_deref(), Some("apples\t3\npears\t5"));

    // Only the HTML flavour survives a trip through another app.
    clipboard.contents = ClipboardPayload::html(clipboard.contents.html.clone().unwrap());
    grid.set_active_cell(&json!({"col": 0, "row": 2})).unwrap();
    grid.handle(&InputEvent::Paste, &mut clipboard);

    assert_eq!(names(&grid), vec!["apples", "pears", "apples", "pears"]);
    assert_eq!(grid.rows()[3].qty, 5);
}

#[test]
fn test_cut_clears_and_skips_disabled_column() {
    let columns = vec![
        Column::new("name").with_disabled(Disabled::Always),
        Column::new("qty"),
    ];
    let mut grid = DataGrid::new(inventory(), columns, Products);
    let mut clipboard = MemoryClipboard::new();

    grid.set_selection(&json!({"min": {"col": 0, "row": 0}, "max": {"col": 1, "row": 0}}))
        .unwrap();
    grid.handle(&InputEvent::Cut, &mut clipboard);

    assert_eq!(clipboard.contents.text.as_deref(), Some("apples\t3"));
    assert_eq!(grid.rows()[0], Product::new("apples", 0));
}

#[test]
fn test_fill_down_copies_first_row() {
    let (mut grid, changes) = grid(inventory(), GridConfig::default());

    grid.fill_down(Selection::from_corners(Cell::new(1, 0), Cell::new(1, 2)));

    let qty: Vec<u32> = grid.rows().iter().map(|p| p.qty).collect();
    assert_eq!(qty, vec![3, 3, 3]);
    assert_eq!(*changes.borrow(), vec![(3, vec![RowOperation::update(1, 3)])]);
}

#[test]
fn test_ctrl_d_duplicates_selected_rows() {
    let (mut grid, changes) = grid(inventory(), GridConfig::default());
    let mut clipboard = MemoryClipboard::new();

    grid.set_selection(&json!({"min": {"col": 0, "row": 0}, "max": {"col": 1, "row": 1}}))
        .unwrap();
    grid.handle(&InputEvent::key_with(Key::Char('d'), Modifiers::CTRL), &mut clipboard);

    assert_eq!(names(&grid), vec!["apples", "pears", "apples", "pears", "plums"]);
    assert_eq!(*changes.borrow(), vec![(5, vec![RowOperation::create(2, 4)])]);
    assert_eq!(
        grid.selection().selection(),
        Some(Selection::from_corners(Cell::new(0, 2), Cell::new(1, 3)))
    );
}

#[test]
fn test_ctrl_d_with_locked_rows_is_ignored() {
    let config = GridConfig {
        locked_rows: true,
        ..GridConfig::default()
    };
    let (mut grid, changes) = grid(inventory(), config);
    let mut clipboard = MemoryClipboard::new();

    grid.set_active_cell(&json!({"col": 0, "row": 0})).unwrap();
    grid.handle(&InputEvent::key_with(Key::Char('d'), Modifiers::CTRL), &mut clipboard);
    assert_eq!(grid.rows().len(), 3);
    assert!(changes.borrow().is_empty());
}

// ================================================================
// Row operations
// ================================================================

#[test]
fn test_row_operations_sequence() {
    let (mut grid, changes) = grid(inventory(), GridConfig::default());

    grid.duplicate_rows(0..2);
    assert_eq!(names(&grid), vec!["apples", "pears", "apples", "pears", "plums"]);

    grid.delete_rows(&[4, 0, 1]);
    assert_eq!(names(&grid), vec!["apples", "pears"]);

    grid.insert_rows_after(0, 2);
    assert_eq!(names(&grid), vec!["apples", "", "", "pears"]);

    assert_eq!(
        *changes.borrow(),
        vec![
            (5, vec![RowOperation::create(2, 4)]),
            (2, vec![RowOperation::delete(4, 5), RowOperation::delete(0, 2)]),
            (4, vec![RowOperation::create(1, 3)]),
        ]
    );
}

#[test]
fn test_shift_enter_inserts_row_below() {
    let (mut grid, changes) = grid(inventory(), GridConfig::default());
    let mut clipboard = MemoryClipboard::new();

    grid.set_active_cell(&json!({"col": 0, "row": 0})).unwrap();
    grid.handle(&InputEvent::key_with(Key::Enter, Modifiers::SHIFT), &mut clipboard);

    assert_eq!(names(&grid), vec!["apples", "", "pears", "plums"]);
    assert_eq!(*changes.borrow(), vec![(4, vec![RowOperation::create(1, 2)])]);
}

// ================================================================
// Layout
// ================================================================

#[test]
fn test_layout_with_section_headers() {
    let mut products: Vec<Product> = (0..100).map(|i| Product::new(&format!("item {i}"), i)).collect();
    for i in (0..100).step_by(25) {
        products[i].section = true;
    }
    let config = GridConfig {
        overscan_rows: 0,
        ..GridConfig::default()
    };
    let (mut grid, _) = grid(products, config);
    grid.set_stickiness(|row: &Product, _| Stickiness::from(row.section));

    let mut viewport = Viewport::new(400.0, 240.0);
    viewport.scroll_y = 30.0 * 40.0;
    let layout = grid.layout(&viewport, &UniformRowHeight(40.0));

    assert_eq!(layout.widths, vec![40.0, 180.0, 180.0]);
    assert_eq!(layout.sticky_rows.len(), 4);
    assert_eq!(layout.content_height, 4000.0);
    // The header of section 25..50 is docked above the visible band.
    assert_eq!(layout.rows.first(), Some(&25));
    assert!(layout.rows.contains(&30));
    assert_eq!(layout.cols, vec![0, 1, 2]);
}

#[test]
fn test_scroll_target_for_offscreen_cell() {
    let (mut grid, _) = grid(
        (0..20).map(|i| Product::new("x", i)).collect(),
        GridConfig::default(),
    );
    let viewport = Viewport::new(400.0, 200.0);
    let rows = UniformRowHeight(40.0);

    assert_eq!(grid.scroll_target(Cell::new(0, 0), &viewport, &rows), None);
    assert_eq!(
        grid.scroll_target(Cell::new(0, 10), &viewport, &rows),
        Some((0.0, 280.0))
    );
}

#[test]
fn test_keyboard_navigation_reports_scroll() {
    let (mut grid, _) = grid(inventory(), GridConfig::default());
    let mut clipboard = MemoryClipboard::new();

    grid.set_active_cell(&json!({"col": 0, "row": 0})).unwrap();
    let effects = grid.handle(&InputEvent::key(Key::Arrow(sheetgrid::Direction::Down)), &mut clipboard);
    assert_eq!(
        effects,
        vec![Effect::ScrollIntoView {
            cell: Cell::new(0, 1)
        }]
    );
}
