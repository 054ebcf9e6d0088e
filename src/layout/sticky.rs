//! Sticky-row docking computation.
//!
//! Each side is resolved with one pass over the rows (top rows forward,
//! bottom rows backward) that keeps a stack of currently open sticky rows.
//! Levels nest like headings and strictly increase from the bottom of the stack
//! to its top: a new row of level `L` closes every open row of level `>= L` at
//! its own natural edge, then docks below the outer rows that remain.

use super::offsets::Offsets;
use crate::types::{Stickiness, StickyHint, StickyPosition, StickyRowDescriptor};

#[derive(Debug, Clone, Copy)]
struct OpenRow {
    /// Position of the row's descriptor in the output vector
    slot: usize,
    level: u32,
    /// Height of this row plus every row docked before it
    cumulative: f64,
}

/// Evaluate a row-stickiness callback for every row.
pub fn resolve_hints<F>(row_count: usize, stickiness: F) -> Vec<Option<StickyHint>>
where
    F: Fn(usize) -> Stickiness,
{
    (0..row_count).map(|row| stickiness(row).resolve()).collect()
}

/// Compute docking descriptors for all sticky rows, ordered by row index.
///
/// `hints[i]` is the resolved stickiness of row `i`; `rows` are the row
/// positions built from the measurement oracle. Rows beyond `rows.len()` are
/// ignored.
pub fn resolve_sticky_rows(hints: &[Option<StickyHint>], rows: &Offsets) -> Vec<StickyRowDescriptor> {
    let count = hints.len().min(rows.len());
    let hints = hints.get(..count).unwrap_or_default();

    let mut out = Vec::new();
    resolve_top(hints, rows, &mut out);
    resolve_bottom(hints, rows, &mut out);
    out.sort_by_key(|d| d.index);

    log::debug!("resolved {} sticky rows over {count} rows", out.len());
    out
}

fn resolve_top(hints: &[Option<StickyHint>], rows: &Offsets, out: &mut Vec<StickyRowDescriptor>) {
    let mut stack: Vec<OpenRow> = Vec::new();

    for (index, hint) in hints.iter().enumerate() {
        let Some(hint) = hint.filter(|h| h.position == StickyPosition::Top && h.level >= 1) else {
            continue;
        };
        let natural_top = rows.start(index);

        while let Some(open) = stack.last().copied() {
            if open.level < hint.level {
                break;
            }
            if let Some(closed) = out.get_mut(open.slot) {
                closed.area_bottom = natural_top;
            }
            stack.pop();
        }

        let sticky_offset = stack.last().map_or(0.0, |open| open.cumulative);
        out.push(StickyRowDescriptor {
            index,
            position: StickyPosition::Top,
            level: hint.level,
            area_top: natural_top,
            area_bottom: rows.total(),
            sticky_offset,
        });
        stack.push(OpenRow {
            slot: out.len() - 1,
            level: hint.level,
            cumulative: sticky_offset + rows.size(index),
        });
    }
}

fn resolve_bottom(
    hints: &[Option<StickyHint>],
    rows: &Offsets,
    out: &mut Vec<StickyRowDescriptor>,
) {
    let mut stack: Vec<OpenRow> = Vec::new();

    for (index, hint) in hints.iter().enumerate().rev() {
        let Some(hint) = hint.filter(|h| h.position == StickyPosition::Bottom && h.level >= 1)
        else {
            continue;
        };
        let natural_bottom = rows.end(index);

        while let Some(open) = stack.last().copied() {
            if open.level < hint.level {
                break;
            }
            if let Some(closed) = out.get_mut(open.slot) {
                closed.area_top = natural_bottom;
            }
            stack.pop();
        }

        let sticky_offset = stack.last().map_or(0.0, |open| open.cumulative);
        out.push(StickyRowDescriptor {
            index,
            position: StickyPosition::Bottom,
            level: hint.level,
            area_top: 0.0,
            area_bottom: natural_bottom,
            sticky_offset,
        });
        stack.push(OpenRow {
            slot: out.len() - 1,
            level: hint.level,
            cumulative: sticky_offset + rows.size(index),
        });
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
    use crate::layout::UniformRowHeight;

    fn rows(n: usize) -> Offsets {
        Offsets::for_rows(n, &UniformRowHeight(40.0))
    }

    #[test]
    fn test_inner_level_closes_at_next_outer_row() {
        let hints = vec![
            Some(StickyHint::top(1)),
            Some(StickyHint::top(2)),
            Some(StickyHint::top(1)),
            None,
            None,
        ];
        let sticky = resolve_sticky_rows(&hints, &rows(5));
        assert_eq!(sticky.len(), 3);

        // Row 0 stays docked over its nested row until row 2 replaces it.
        assert_eq!(sticky[0].area_top, 0.0);
        assert_eq!(sticky[0].area_bottom, 80.0);
        assert_eq!(sticky[0].sticky_offset, 0.0);

        // Row 1 docks under row 0 and ends where row 2 starts.
        assert_eq!(sticky[1].area_top, 40.0);
        assert_eq!(sticky[1].area_bottom, 80.0);
        assert_eq!(sticky[1].sticky_offset, 40.0);
        assert!(sticky[1].area_bottom <= sticky[2].area_top);

        // Row 2 reopens level 1 at the top slot.
        assert_eq!(sticky[2].level, 1);
        assert_eq!(sticky[2].area_top, 80.0);
        assert_eq!(sticky[2].area_bottom, 200.0);
        assert_eq!(sticky[2].sticky_offset, 0.0);
    }

    #[test]
    fn test_equal_levels_replace_each_other() {
        let hints = vec![Some(StickyHint::top(1)), None, Some(StickyHint::top(1)), None];
        let sticky = resolve_sticky_rows(&hints, &rows(4));
        assert_eq!(sticky[0].area_bottom, 80.0);
        assert_eq!(sticky[1].area_top, 80.0);
        assert_eq!(sticky[1].area_bottom, 160.0);
        assert_eq!(sticky[1].sticky_offset, 0.0);
    }

    #[test]
    fn test_stack_offsets_accumulate() {
        let hints = vec![
            Some(StickyHint::top(1)),
            Some(StickyHint::top(2)),
            Some(StickyHint::top(3)),
        ];
        let sticky = resolve_sticky_rows(&hints, &rows(3));
        let offsets: Vec<f64> = sticky.iter().map(|d| d.sticky_offset).collect();
        assert_eq!(offsets, vec![0.0, 40.0, 80.0]);
        assert!(sticky.iter().all(|d| d.area_bottom == 120.0));
    }

    #[test]
    fn test_outer_level_closes_every_nested_row() {
        let hints = vec![
            Some(StickyHint::top(3)),
            Some(StickyHint::top(2)),
            Some(StickyHint::top(1)),
        ];
        let sticky = resolve_sticky_rows(&hints, &rows(3));
        let areas: Vec<(f64, f64, f64)> = sticky
            .iter()
            .map(|d| (d.area_top, d.area_bottom, d.sticky_offset))
            .collect();
        assert_eq!(
            areas,
            vec![(0.0, 40.0, 0.0), (40.0, 80.0, 0.0), (80.0, 120.0, 0.0)]
        );
    }

    #[test]
    fn test_bottom_pass_mirrors() {
        let hints = vec![
            None,
            Some(StickyHint::bottom(1)),
            None,
            Some(StickyHint::bottom(2)),
            Some(StickyHint::bottom(1)),
        ];
        let sticky = resolve_sticky_rows(&hints, &rows(5));
        assert_eq!(sticky.len(), 3);

        // Row 4 opens level 1 from the end and is replaced by row 1.
        let row4 = sticky.iter().find(|d| d.index == 4).unwrap();
        assert_eq!(row4.area_bottom, 200.0);
        assert_eq!(row4.area_top, 80.0);
        assert_eq!(row4.sticky_offset, 0.0);

        // Row 3 nests above row 4 and closes at the same edge.
        let row3 = sticky.iter().find(|d| d.index == 3).unwrap();
        assert_eq!(row3.area_top, 80.0);
        assert_eq!(row3.area_bottom, 160.0);
        assert_eq!(row3.sticky_offset, 40.0);

        let row1 = sticky.iter().find(|d| d.index == 1).unwrap();
        assert_eq!(row1.area_top, 0.0);
        assert_eq!(row1.area_bottom, 80.0);
        assert_eq!(row1.sticky_offset, 0.0);
    }

    #[test]
    fn test_mixed_sides_are_independent() {
        let hints = vec![Some(StickyHint::top(1)), None, Some(StickyHint::bottom(1))];
        let sticky = resolve_sticky_rows(&hints, &rows(3));
        assert_eq!(sticky[0].position, StickyPosition::Top);
        assert_eq!(sticky[0].area_bottom, 120.0);
        assert_eq!(sticky[1].position, StickyPosition::Bottom);
        assert_eq!(sticky[1].area_top, 0.0);
    }

    #[test]
    fn test_resolve_hints_from_callback() {
        let hints = resolve_hints(4, |row| match row {
            0 => Stickiness::from(true),
            3 => Stickiness::Side("bottom".into()),
            _ => Stickiness::default(),
        });
        assert_eq!(hints[0], Some(StickyHint::top(1)));
        assert_eq!(hints[1], None);
        assert_eq!(hints[3], Some(StickyHint::bottom(1)));
    }

    #[test]
    fn test_hints_longer_than_rows_are_ignored() {
        let hints = vec![Some(StickyHint::top(1)); 10];
        let sticky = resolve_sticky_rows(&hints, &rows(2));
        assert_eq!(sticky.len(), 2);
    }
}
