//! Index selection for virtualized rendering.
//!
//! Both extractors are pure: given the same inputs they return the same
//! ascending index lists.

use serde::{Deserialize, Serialize};

use crate::types::{StickyPosition, StickyRowDescriptor};

/// Visible index range reported by the virtualizer (inclusive bounds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualRange {
    pub start_index: usize,
    pub end_index: usize,
    pub overscan: usize,
    pub count: usize,
}

impl VirtualRange {
    /// The contiguous overscanned band, clamped to `[0, count)`.
    ///
    /// Returns `None` when there is nothing to render.
    pub fn band(&self) -> Option<(usize, usize)> {
        if self.count == 0 {
            return None;
        }
        let last = self.count - 1;
        let start = self.start_index.min(last).saturating_sub(self.overscan);
        let end = self
            .end_index
            .max(self.start_index)
            .saturating_add(self.overscan)
            .min(last);
        Some((start, end))
    }
}

/// Vertical window of the scroll container in content coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollWindow {
    /// Content y at the top edge of the data area
    pub top: f64,
    /// Height of the data area (excluding the header row)
    pub height: f64,
}

impl ScrollWindow {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Rows to render: docked sticky rows above the band, the band itself, then
/// docked sticky rows below it.
pub fn extract_rows(
    range: &VirtualRange,
    sticky: &[StickyRowDescriptor],
    window: ScrollWindow,
) -> Vec<usize> {
    let Some((start, end)) = range.band() else {
        return Vec::new();
    };

    let mut above: Vec<usize> = Vec::new();
    let mut below: Vec<usize> = Vec::new();

    for row in sticky.iter().filter(|d| d.index < range.count) {
        match row.position {
            StickyPosition::Top if row.index < start => {
                let slot = window.top + row.sticky_offset;
                if row.area_top <= slot && row.area_bottom > slot {
                    above.push(row.index);
                }
            }
            StickyPosition::Bottom if row.index > end => {
                let slot = window.bottom() - row.sticky_offset;
                if row.area_bottom >= slot && row.area_top < slot {
                    below.push(row.index);
                }
            }
            _ => {}
        }
    }

    above.sort_unstable();
    above.dedup();
    below.sort_unstable();
    below.dedup();

    let mut out = Vec::with_capacity(above.len() + (end - start + 1) + below.len());
    out.extend(above);
    out.extend(start..=end);
    out.extend(below);

    log::trace!("row range {start}..={end} -> {} rows", out.len());
    out
}

/// Columns to render: the sticky-left prefix, the overscanned band, and the
/// sticky-right suffix, deduplicated and ascending.
///
/// Sticky counts larger than the column count are clamped.
pub fn extract_columns(range: &VirtualRange, sticky_left: usize, sticky_right: usize) -> Vec<usize> {
    let count = range.count;
    let left = sticky_left.min(count);
    let right = sticky_right.min(count - left);

    let mut out: Vec<usize> = (0..left).collect();
    if let Some((start, end)) = range.band() {
        out.extend((start..=end).filter(|i| *i >= left));
    }
    out.extend(count - right..count);

    out.sort_unstable();
    out.dedup();
    out
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
    use crate::layout::{resolve_sticky_rows, Offsets, UniformRowHeight};
    use crate::types::StickyHint;

    fn range(start: usize, end: usize, overscan: usize, count: usize) -> VirtualRange {
        VirtualRange {
            start_index: start,
            end_index: end,
            overscan,
            count,
        }
    }

    #[test]
    fn test_columns_with_sticky_runs() {
        let cols = extract_columns(&range(4, 6, 0, 10), 1, 1);
        assert_eq!(cols, vec![0, 4, 5, 6, 9]);
    }

    #[test]
    fn test_columns_band_overlapping_sticky() {
        let cols = extract_columns(&range(0, 3, 1, 5), 1, 1);
        assert_eq!(cols, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_columns_clamp_oversized_sticky_counts() {
        let cols = extract_columns(&range(0, 1, 0, 3), 5, 5);
        assert_eq!(cols, vec![0, 1, 2]);
        assert!(extract_columns(&range(0, 0, 0, 0), 1, 1).is_empty());
    }

    #[test]
    fn test_rows_band_with_overscan() {
        let rows = extract_rows(
            &range(10, 14, 2, 100),
            &[],
            ScrollWindow {
                top: 400.0,
                height: 200.0,
            },
        );
        assert_eq!(rows, (8..=16).collect::<Vec<_>>());
    }

    #[test]
    fn test_rows_band_clamped_to_count() {
        let rows = extract_rows(
            &range(8, 12, 3, 10),
            &[],
            ScrollWindow {
                top: 0.0,
                height: 100.0,
            },
        );
        assert_eq!(rows, (5..=9).collect::<Vec<_>>());
    }

    #[test]
    fn test_rows_include_docked_sticky() {
        // Rows 0 and 50 are top-sticky level 1; row 99 is bottom-sticky.
        let mut hints = vec![None; 100];
        hints[0] = Some(StickyHint::top(1));
        hints[50] = Some(StickyHint::top(1));
        hints[99] = Some(StickyHint::bottom(1));
        let offsets = Offsets::for_rows(100, &UniformRowHeight(20.0));
        let sticky = resolve_sticky_rows(&hints, &offsets);

        // Scrolled to row 20: row 0 is docked (its area runs to row 50).
        let rows = extract_rows(
            &range(20, 29, 0, 100),
            &sticky,
            ScrollWindow {
                top: 400.0,
                height: 200.0,
            },
        );
        assert_eq!(rows.first(), Some(&0));
        assert_eq!(rows.last(), Some(&99));
        assert_eq!(rows.len(), 12);

        // Scrolled past row 50: row 0 is no longer docked, row 50 is.
        let rows = extract_rows(
            &range(60, 69, 0, 100),
            &sticky,
            ScrollWindow {
                top: 1200.0,
                height: 200.0,
            },
        );
        assert_eq!(rows.first(), Some(&50));
        assert!(!rows.contains(&0));
    }

    #[test]
    fn test_sticky_inside_band_not_duplicated() {
        let mut hints = vec![None; 10];
        hints[2] = Some(StickyHint::top(1));
        let offsets = Offsets::for_rows(10, &UniformRowHeight(20.0));
        let sticky = resolve_sticky_rows(&hints, &offsets);
        let rows = extract_rows(
            &range(0, 4, 0, 10),
            &sticky,
            ScrollWindow {
                top: 0.0,
                height: 100.0,
            },
        );
        assert_eq!(rows, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_extractors_idempotent() {
        let r = range(3, 7, 2, 20);
        assert_eq!(extract_columns(&r, 2, 1), extract_columns(&r, 2, 1));
        let window = ScrollWindow {
            top: 60.0,
            height: 100.0,
        };
        assert_eq!(extract_rows(&r, &[], window), extract_rows(&r, &[], window));
    }
}
