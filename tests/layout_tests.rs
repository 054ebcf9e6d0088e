//! Tests for column sizing, sticky-row docking and render range extraction
//!
//! These exercise the layout functions through the public API the way a
//! renderer drives them each frame: size the columns, resolve the sticky rows,
//! then pick the row and column indices to render.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use sheetgrid::layout::{
    extract_columns, extract_rows, resolve_hints, resolve_sticky_rows, size_columns, Offsets,
    ScrollWindow, VirtualRange,
};
use sheetgrid::{ColumnWidth, Stickiness, StickyHint, StickyPosition};
use test_case::test_case;

fn flex(basis: f64, grow: f64, shrink: f64, min_width: f64, max_width: Option<f64>) -> ColumnWidth {
    ColumnWidth {
        basis,
        grow,
        shrink,
        min_width,
        max_width,
    }
}

fn close(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-9, "{actual:?} vs {expected:?}");
    }
}

fn range(start: usize, end: usize, overscan: usize, count: usize) -> VirtualRange {
    VirtualRange {
        start_index: start,
        end_index: end,
        overscan,
        count,
    }
}

// ============================================================================
// Column sizing
// ============================================================================

#[test]
fn test_grow_proportional_to_factor() {
    let columns = [flex(0.0, 1.0, 1.0, 50.0, None), flex(0.0, 2.0, 1.0, 50.0, None)];
    close(&size_columns(Some(300.0), &columns), &[100.0, 200.0]);
}

#[test]
fn test_unmeasured_container_uses_min_widths() {
    let columns = [flex(120.0, 1.0, 1.0, 60.0, None), flex(0.0, 3.0, 1.0, 80.0, Some(90.0))];
    close(&size_columns(None, &columns), &[60.0, 80.0]);
}

#[test]
fn test_max_width_freezes_and_redistributes() {
    let columns = [flex(0.0, 1.0, 1.0, 0.0, Some(50.0)), flex(0.0, 1.0, 1.0, 0.0, None)];
    close(&size_columns(Some(300.0), &columns), &[50.0, 250.0]);
}

#[test]
fn test_shrink_respects_min_width() {
    let columns = [flex(200.0, 0.0, 1.0, 180.0, None), flex(200.0, 0.0, 1.0, 0.0, None)];
    close(&size_columns(Some(300.0), &columns), &[180.0, 120.0]);
}

#[test]
fn test_rigid_columns_keep_basis() {
    let columns = [ColumnWidth::fixed(40.0), flex(100.0, 0.0, 0.0, 10.0, None)];
    close(&size_columns(Some(1000.0), &columns), &[40.0, 100.0]);
}

#[test]
fn test_exact_fit_is_untouched() {
    let columns = [flex(100.0, 1.0, 1.0, 0.0, None), flex(200.0, 1.0, 1.0, 0.0, None)];
    close(&size_columns(Some(300.0), &columns), &[100.0, 200.0]);
}

#[test]
fn test_no_columns() {
    assert!(size_columns(Some(500.0), &[]).is_empty());
}

#[test]
fn test_column_width_from_json_defaults() {
    let columns: Vec<ColumnWidth> =
        serde_json::from_str(r#"[{"grow": 1}, {"grow": 3, "minWidth": 10}]"#).unwrap();
    close(&size_columns(Some(400.0), &columns), &[100.0, 300.0]);
}

// ============================================================================
// Sticky rows
// ============================================================================

#[test]
fn test_nested_level_ends_at_next_outer_row() {
    let hints = [Some(StickyHint::top(1)), Some(StickyHint::top(2)), Some(StickyHint::top(1))];
    let rows = Offsets::from_sizes([10.0, 10.0, 10.0, 10.0, 10.0]);
    let sticky = resolve_sticky_rows(&hints, &rows);

    assert_eq!(sticky.len(), 3);

    // Row 0 holds the top slot until row 2 replaces it.
    assert_eq!(sticky[0].index, 0);
    assert_eq!(sticky[0].area_top, 0.0);
    assert_eq!(sticky[0].area_bottom, 20.0);
    assert_eq!(sticky[0].sticky_offset, 0.0);

    // Row 1 docks beneath row 0 and its area ends at row 2's top.
    assert_eq!(sticky[1].area_top, 10.0);
    assert_eq!(sticky[1].area_bottom, 20.0);
    assert_eq!(sticky[1].sticky_offset, 10.0);
    assert!(sticky[1].area_bottom <= sticky[2].area_top);

    // Row 2 reopens level 1 after row 1's area ends.
    assert_eq!(sticky[2].area_top, 20.0);
    assert_eq!(sticky[2].area_bottom, 50.0);
    assert_eq!(sticky[2].sticky_offset, 0.0);
}

#[test]
fn test_bottom_rows_dock_from_the_end() {
    let hints = [None, Some(StickyHint::bottom(1)), None, Some(StickyHint::bottom(1))];
    let rows = Offsets::from_sizes([10.0; 4]);
    let sticky = resolve_sticky_rows(&hints, &rows);

    assert_eq!(sticky.len(), 2);
    assert!(sticky.iter().all(|d| d.position == StickyPosition::Bottom));

    let last = sticky.iter().find(|d| d.index == 3).unwrap();
    assert_eq!(last.area_bottom, 40.0);
    assert_eq!(last.area_top, 20.0);
    assert_eq!(last.sticky_offset, 0.0);

    let first = sticky.iter().find(|d| d.index == 1).unwrap();
    assert_eq!(first.area_bottom, 20.0);
    assert_eq!(first.area_top, 0.0);
}

#[test]
fn test_hints_from_callback_shorthands() {
    let hints = resolve_hints(5, |row| match row {
        0 => Stickiness::Flag(true),
        2 => Stickiness::Level(2),
        4 => Stickiness::Side("bottom".into()),
        _ => Stickiness::default(),
    });
    assert_eq!(
        hints,
        vec![
            Some(StickyHint::top(1)),
            None,
            Some(StickyHint::top(2)),
            None,
            Some(StickyHint::bottom(1)),
        ]
    );
}

#[test]
fn test_hints_beyond_measured_rows_are_ignored() {
    let hints = [Some(StickyHint::top(1)), None, Some(StickyHint::top(1))];
    let rows = Offsets::from_sizes([10.0, 10.0]);
    let sticky = resolve_sticky_rows(&hints, &rows);
    assert_eq!(sticky.len(), 1);
    assert_eq!(sticky[0].area_bottom, 20.0);
}

// ============================================================================
// Range extraction
// ============================================================================

#[test]
fn test_columns_with_sticky_edges() {
    assert_eq!(extract_columns(&range(4, 6, 0, 10), 1, 1), vec![0, 4, 5, 6, 9]);
}

#[test_case(range(0, 3, 0, 10), 2, 0, vec![0, 1, 2, 3] ; "band overlaps sticky prefix")]
#[test_case(range(5, 9, 2, 10), 0, 3, vec![3, 4, 5, 6, 7, 8, 9] ; "band overlaps sticky suffix")]
#[test_case(range(0, 0, 0, 3), 5, 5, vec![0, 1, 2] ; "sticky counts clamped")]
#[test_case(range(0, 0, 0, 0), 1, 1, vec![] ; "no columns")]
fn test_column_extraction(range: VirtualRange, left: usize, right: usize, expected: Vec<usize>) {
    assert_eq!(extract_columns(&range, left, right), expected);
}

#[test]
fn test_docked_header_rendered_above_band() {
    let hints: Vec<_> = (0..100)
        .map(|i| (i % 20 == 0).then(|| StickyHint::top(1)))
        .collect();
    let rows = Offsets::from_sizes(std::iter::repeat(10.0).take(100));
    let sticky = resolve_sticky_rows(&hints, &rows);

    // Scrolled to row 25: the header of section 20..40 is docked.
    let window = ScrollWindow {
        top: 250.0,
        height: 100.0,
    };
    let rendered = extract_rows(&range(25, 34, 1, 100), &sticky, window);
    assert_eq!(rendered.first(), Some(&20));
    assert_eq!(&rendered[1..], (24..=35).collect::<Vec<_>>().as_slice());
}

#[test]
fn test_header_inside_band_not_duplicated() {
    let hints = [Some(StickyHint::top(1)), None, None];
    let rows = Offsets::from_sizes([10.0; 3]);
    let sticky = resolve_sticky_rows(&hints, &rows);
    let window = ScrollWindow {
        top: 0.0,
        height: 30.0,
    };
    assert_eq!(extract_rows(&range(0, 2, 0, 3), &sticky, window), vec![0, 1, 2]);
}

#[test]
fn test_empty_grid_renders_nothing() {
    let window = ScrollWindow {
        top: 0.0,
        height: 100.0,
    };
    assert!(extract_rows(&range(0, 0, 3, 0), &[], window).is_empty());
}
