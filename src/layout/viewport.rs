//! Viewport state for scrolling the grid.
//!
//! Coordinates: rows are measured from the top of the first data row (the
//! header row sits above it), columns from the left edge of column 0 (the
//! gutter when present). Sticky-left and sticky-right columns cover the edges
//! of the viewport, so the scrollable band is what lies between them.

use serde::{Deserialize, Serialize};

use super::offsets::Offsets;
use super::range::{ScrollWindow, VirtualRange};

/// Scroll position and size of the grid's scroll container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    /// Horizontal scroll position in content coordinates
    pub scroll_x: f64,
    /// Vertical scroll position in content coordinates
    pub scroll_y: f64,
    /// Viewport width in pixels
    pub width: f64,
    /// Viewport height in pixels (including the header row)
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// Horizontal extent of the sticky column runs, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StickyWidths {
    pub left: f64,
    pub right: f64,
}

impl StickyWidths {
    /// Measure the sticky-left prefix and sticky-right suffix.
    pub fn measure(cols: &Offsets, sticky_left: usize, sticky_right: usize) -> Self {
        let count = cols.len();
        let left = sticky_left.min(count);
        let right = sticky_right.min(count - left);
        Self {
            left: cols.start(left),
            right: cols.total() - cols.start(count - right),
        }
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            scroll_x: 0.0,
            scroll_y: 0.0,
            width,
            height,
        }
    }

    /// Vertical window of the data area below a header of `header_height`.
    pub fn window(&self, header_height: f64) -> ScrollWindow {
        ScrollWindow {
            top: self.scroll_y,
            height: (self.height - header_height).max(0.0),
        }
    }

    /// Visible row range (inclusive) for the current scroll position.
    pub fn visible_rows(&self, rows: &Offsets, header_height: f64, overscan: usize) -> VirtualRange {
        let window = self.window(header_height);
        let start = rows.index_at(window.top).unwrap_or(0);
        let end = rows.index_at(window.bottom()).unwrap_or(0);
        VirtualRange {
            start_index: start,
            end_index: end.max(start),
            overscan,
            count: rows.len(),
        }
    }

    /// Visible column range (inclusive) between the sticky runs.
    pub fn visible_cols(&self, cols: &Offsets, sticky: StickyWidths, overscan: usize) -> VirtualRange {
        let left_edge = self.scroll_x + sticky.left;
        let right_edge = self.scroll_x + (self.width - sticky.right).max(sticky.left);
        let start = cols.index_at(left_edge).unwrap_or(0);
        let end = cols.index_at(right_edge).unwrap_or(0);
        VirtualRange {
            start_index: start,
            end_index: end.max(start),
            overscan,
            count: cols.len(),
        }
    }

    /// Clamp the scroll position to the scrollable content.
    pub fn clamp_scroll(&mut self, rows: &Offsets, cols: &Offsets, header_height: f64) {
        let max_y = (rows.total() - (self.height - header_height)).max(0.0);
        let max_x = (cols.total() - self.width).max(0.0);
        self.scroll_y = self.scroll_y.clamp(0.0, max_y);
        self.scroll_x = self.scroll_x.clamp(0.0, max_x);
    }

    /// Scroll by delta amounts
    pub fn scroll_by(&mut self, delta_x: f64, delta_y: f64, rows: &Offsets, cols: &Offsets, header_height: f64) {
        self.scroll_x += delta_x;
        self.scroll_y += delta_y;
        self.clamp_scroll(rows, cols, header_height);
    }

    /// Resize the viewport
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Minimal scroll position that brings row `row` and layout column `col`
    /// fully into view, or `None` if it is already visible.
    ///
    /// Sticky columns never require horizontal scrolling.
    #[allow(clippy::too_many_arguments)]
    pub fn scroll_into_view(
        &self,
        row: usize,
        col: usize,
        rows: &Offsets,
        cols: &Offsets,
        sticky: StickyWidths,
        sticky_left: usize,
        sticky_right: usize,
        header_height: f64,
    ) -> Option<(f64, f64)> {
        let mut x = self.scroll_x;
        let mut y = self.scroll_y;

        let data_height = (self.height - header_height).max(0.0);
        let top = rows.start(row);
        let bottom = rows.end(row);
        if top < y {
            y = top;
        } else if bottom > y + data_height {
            y = (bottom - data_height).min(top);
        }

        let scrollable = col >= sticky_left && col < cols.len().saturating_sub(sticky_right);
        if scrollable {
            let left = cols.start(col) - sticky.left;
            let right = cols.end(col) + sticky.right - self.width;
            if left < x {
                x = left;
            } else if right > x {
                x = right.min(left);
            }
        }

        let moved = (x - self.scroll_x).abs() > f64::EPSILON || (y - self.scroll_y).abs() > f64::EPSILON;
        moved.then_some((x.max(0.0), y.max(0.0)))
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

    fn uniform(n: usize, size: f64) -> Offsets {
        Offsets::from_sizes(std::iter::repeat(size).take(n))
    }

    #[test]
    fn test_visible_rows_at_scroll_zero() {
        let rows = uniform(100, 20.0);
        let viewport = Viewport::new(800.0, 640.0);
        let range = viewport.visible_rows(&rows, 40.0, 0);
        assert_eq!(range.start_index, 0);
        assert_eq!(range.end_index, 30);
        assert_eq!(range.count, 100);
    }

    #[test]
    fn test_visible_rows_scrolled() {
        let rows = uniform(100, 20.0);
        let mut viewport = Viewport::new(800.0, 240.0);
        viewport.scroll_y = 410.0;
        let range = viewport.visible_rows(&rows, 40.0, 3);
        assert_eq!(range.start_index, 20);
        assert_eq!(range.end_index, 30);
        assert_eq!(range.overscan, 3);
    }

    #[test]
    fn test_visible_cols_skip_sticky_runs() {
        // Gutter 40px then 20 columns of 100px.
        let cols = Offsets::from_sizes(std::iter::once(40.0).chain(std::iter::repeat(100.0).take(20)));
        let sticky = StickyWidths::measure(&cols, 1, 0);
        assert_eq!(sticky.left, 40.0);
        assert_eq!(sticky.right, 0.0);

        let mut viewport = Viewport::new(440.0, 300.0);
        viewport.scroll_x = 300.0;
        let range = viewport.visible_cols(&cols, sticky, 0);
        // Content x 340..740 is columns 4..=7, plus the boundary column.
        assert_eq!(range.start_index, 4);
        assert_eq!(range.end_index, 8);
    }

    #[test]
    fn test_clamp_scroll() {
        let rows = uniform(10, 20.0);
        let cols = uniform(5, 100.0);
        let mut viewport = Viewport::new(300.0, 140.0);
        viewport.scroll_by(1000.0, 1000.0, &rows, &cols, 40.0);
        assert_eq!(viewport.scroll_y, 100.0);
        assert_eq!(viewport.scroll_x, 200.0);
        viewport.scroll_by(-5000.0, -5000.0, &rows, &cols, 40.0);
        assert_eq!((viewport.scroll_x, viewport.scroll_y), (0.0, 0.0));
    }

    #[test]
    fn test_scroll_into_view() {
        let rows = uniform(100, 20.0);
        let cols = Offsets::from_sizes(std::iter::once(40.0).chain(std::iter::repeat(100.0).take(20)));
        let sticky = StickyWidths::measure(&cols, 1, 0);
        let viewport = Viewport::new(440.0, 240.0);

        // Already visible.
        assert_eq!(
            viewport.scroll_into_view(2, 1, &rows, &cols, sticky, 1, 0, 40.0),
            None
        );

        // Row 20 lies below the 200px data area.
        let (x, y) = viewport
            .scroll_into_view(20, 1, &rows, &cols, sticky, 1, 0, 40.0)
            .unwrap();
        assert_eq!(x, 0.0);
        assert_eq!(y, 220.0);

        // Column 10 lies right of the viewport.
        let (x, _) = viewport
            .scroll_into_view(0, 10, &rows, &cols, sticky, 1, 0, 40.0)
            .unwrap();
        assert_eq!(x, 1040.0 - 440.0);

        // The sticky gutter never scrolls.
        assert_eq!(
            viewport.scroll_into_view(0, 0, &rows, &cols, sticky, 1, 0, 40.0),
            None
        );
    }
}
