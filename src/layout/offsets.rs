//! Prefix sums over row heights and column widths.
//!
//! Positions are computed once per structural change, enabling O(log n)
//! lookups for hit testing and visible-range computation.

use std::collections::HashMap;

/// Default estimated row height in pixels when the host supplies none.
pub const DEFAULT_ROW_HEIGHT: f64 = 40.0;

/// Read-only oracle over a (possibly partially populated) row-height cache.
///
/// Rows that have not been measured yet fall back to the estimate; they must
/// never cause a fault.
pub trait RowMeasurements {
    /// Measured height of row `index`, if known.
    fn measured_height(&self, index: usize) -> Option<f64>;

    /// Height used for rows that have not been measured.
    fn estimated_height(&self) -> f64;

    fn height(&self, index: usize) -> f64 {
        self.measured_height(index)
            .filter(|h| h.is_finite() && *h >= 0.0)
            .unwrap_or_else(|| self.estimated_height())
    }
}

/// Every row has the same height.
#[derive(Debug, Clone, Copy)]
pub struct UniformRowHeight(pub f64);

impl RowMeasurements for UniformRowHeight {
    fn measured_height(&self, _index: usize) -> Option<f64> {
        Some(self.0)
    }

    fn estimated_height(&self) -> f64 {
        self.0
    }
}

/// Sparse measurements keyed by row index, with an estimate for the rest.
#[derive(Debug, Clone)]
pub struct MeasuredRows {
    pub heights: HashMap<usize, f64>,
    pub estimate: f64,
}

impl MeasuredRows {
    pub fn new(estimate: f64) -> Self {
        Self {
            heights: HashMap::new(),
            estimate,
        }
    }

    pub fn record(&mut self, index: usize, height: f64) {
        self.heights.insert(index, height);
    }
}

impl Default for MeasuredRows {
    fn default() -> Self {
        Self::new(DEFAULT_ROW_HEIGHT)
    }
}

impl RowMeasurements for MeasuredRows {
    fn measured_height(&self, index: usize) -> Option<f64> {
        self.heights.get(&index).copied()
    }

    fn estimated_height(&self) -> f64 {
        self.estimate
    }
}

/// Cumulative positions (`positions[i]` = leading edge of item `i`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Offsets {
    positions: Vec<f64>,
}

impl Offsets {
    /// Build from item sizes.
    pub fn from_sizes(sizes: impl IntoIterator<Item = f64>) -> Self {
        let mut positions = vec![0.0];
        let mut acc = 0.0;
        for size in sizes {
            acc += size;
            positions.push(acc);
        }
        Self { positions }
    }

    /// Build row positions for `row_count` rows from a measurement oracle.
    pub fn for_rows(row_count: usize, measurements: &dyn RowMeasurements) -> Self {
        Self::from_sizes((0..row_count).map(|i| measurements.height(i)))
    }

    pub fn len(&self) -> usize {
        self.positions.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Leading edge of item `index` (clamped to the total for out-of-range indices).
    pub fn start(&self, index: usize) -> f64 {
        self.positions
            .get(index)
            .copied()
            .unwrap_or_else(|| self.total())
    }

    /// Trailing edge of item `index`.
    pub fn end(&self, index: usize) -> f64 {
        self.start(index.saturating_add(1))
    }

    pub fn size(&self, index: usize) -> f64 {
        self.end(index) - self.start(index)
    }

    pub fn total(&self) -> f64 {
        self.positions.last().copied().unwrap_or(0.0)
    }

    /// Find the item containing position `pos` (binary search).
    ///
    /// Positions before the first item map to 0, past the end to the last item.
    pub fn index_at(&self, pos: f64) -> Option<usize> {
        let len = self.len();
        if len == 0 {
            return None;
        }
        let after = self.positions.partition_point(|p| *p <= pos);
        Some(after.saturating_sub(1).min(len - 1))
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

    #[test]
    fn test_uniform_rows() {
        let offsets = Offsets::for_rows(10, &UniformRowHeight(20.0));
        assert_eq!(offsets.len(), 10);
        assert_eq!(offsets.total(), 200.0);
        assert_eq!(offsets.start(3), 60.0);
        assert_eq!(offsets.end(3), 80.0);
        assert_eq!(offsets.size(9), 20.0);
    }

    #[test]
    fn test_partial_measurements_use_estimate() {
        let mut rows = MeasuredRows::new(30.0);
        rows.record(1, 100.0);
        rows.record(2, f64::NAN);
        let offsets = Offsets::for_rows(4, &rows);
        assert_eq!(offsets.start(1), 30.0);
        assert_eq!(offsets.start(2), 130.0);
        assert_eq!(offsets.total(), 190.0);
    }

    #[test]
    fn test_index_at() {
        let offsets = Offsets::from_sizes([20.0, 20.0, 20.0]);
        assert_eq!(offsets.index_at(-5.0), Some(0));
        assert_eq!(offsets.index_at(0.0), Some(0));
        assert_eq!(offsets.index_at(19.9), Some(0));
        assert_eq!(offsets.index_at(20.0), Some(1));
        assert_eq!(offsets.index_at(59.0), Some(2));
        assert_eq!(offsets.index_at(500.0), Some(2));
        assert_eq!(Offsets::from_sizes(Vec::<f64>::new()).index_at(0.0), None);
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        let offsets = Offsets::from_sizes([10.0, 10.0]);
        assert_eq!(offsets.start(7), 20.0);
        assert_eq!(offsets.size(7), 0.0);
    }
}
