//! Generation-keyed memoization for layout outputs.
//!
//! Each structural input (columns, data, stickiness callback, measurements)
//! carries a [`Generation`] that the owner bumps on every logical change.
//! A [`Memo`] holds exactly one entry and recomputes only when its key
//! changes; results are replaced wholesale, never patched.

use super::offsets::Offsets;
use crate::types::StickyRowDescriptor;

/// Version stamp of a structural input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Generation(u64);

impl Generation {
    pub const fn new() -> Self {
        Self(0)
    }

    /// Advance to the next generation.
    pub fn bump(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }
}

/// A single-entry cache keyed by `K`.
#[derive(Debug, Clone)]
pub struct Memo<K: PartialEq, V> {
    entry: Option<(K, V)>,
    hits: u64,
    misses: u64,
}

impl<K: PartialEq, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self {
            entry: None,
            hits: 0,
            misses: 0,
        }
    }
}

impl<K: PartialEq, V> Memo<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `key`, computing it if the key changed.
    pub fn get_or_compute(&mut self, key: K, compute: impl FnOnce() -> V) -> &V {
        let fresh = matches!(&self.entry, Some((cached, _)) if *cached == key);
        if fresh {
            self.hits += 1;
        } else {
            self.misses += 1;
            self.entry = None;
        }
        let (_, value) = self.entry.get_or_insert_with(|| (key, compute()));
        value
    }

    /// The cached value, if any, regardless of key.
    pub fn peek(&self) -> Option<&V> {
        self.entry.as_ref().map(|(_, v)| v)
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

/// Key for column widths: the column set plus the container width.
///
/// The width is keyed by its bit pattern so the key stays `Eq`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidthKey {
    pub columns: Generation,
    pub container_width: Option<u64>,
}

impl WidthKey {
    pub fn new(columns: Generation, container_width: Option<f64>) -> Self {
        Self {
            columns,
            container_width: container_width.map(f64::to_bits),
        }
    }
}

/// Key for row positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowKey {
    pub data: Generation,
    pub measurements: Generation,
}

/// Key for sticky descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StickyKey {
    pub rows: RowKey,
    pub stickiness: Generation,
}

/// Memoized layout outputs of one grid.
#[derive(Debug, Clone, Default)]
pub struct LayoutCache {
    pub widths: Memo<WidthKey, Vec<f64>>,
    pub rows: Memo<RowKey, Offsets>,
    pub sticky: Memo<StickyKey, Vec<StickyRowDescriptor>>,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::default()
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
    use std::cell::Cell;

    #[test]
    fn test_memo_recomputes_only_on_key_change() {
        let calls = Cell::new(0);
        let mut memo: Memo<WidthKey, Vec<f64>> = Memo::new();
        let mut columns = Generation::new();

        let compute = || {
            calls.set(calls.get() + 1);
            vec![1.0, 2.0]
        };

        memo.get_or_compute(WidthKey::new(columns, Some(300.0)), compute);
        memo.get_or_compute(WidthKey::new(columns, Some(300.0)), compute);
        assert_eq!(calls.get(), 1);
        assert_eq!(memo.hits(), 1);

        memo.get_or_compute(WidthKey::new(columns, Some(301.0)), compute);
        assert_eq!(calls.get(), 2);

        columns.bump();
        let value = memo.get_or_compute(WidthKey::new(columns, Some(301.0)), compute);
        assert_eq!(value, &vec![1.0, 2.0]);
        assert_eq!(calls.get(), 3);
        assert_eq!(memo.misses(), 3);
    }

    #[test]
    fn test_invalidate() {
        let mut memo: Memo<u8, u8> = Memo::new();
        memo.get_or_compute(1, || 7);
        assert_eq!(memo.peek(), Some(&7));
        memo.invalidate();
        assert_eq!(memo.peek(), None);
    }

    #[test]
    fn test_generation_bump() {
        let start = Generation::new();
        let mut generation = start;
        generation.bump();
        assert_ne!(generation, start);
        assert!(generation > start);
    }
}
