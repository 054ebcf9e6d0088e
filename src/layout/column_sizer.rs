//! Flexbox-style column width distribution.
//!
//! Columns start at their `basis` and the free space (positive or negative) is
//! handed out proportionally to the grow or shrink factors. Items that hit
//! their min/max bound are frozen and the remainder is redistributed among the
//! others until no bound is violated.

use crate::types::ColumnWidth;

#[derive(Debug, Clone, Copy)]
struct FlexItem {
    size: f64,
    factor: f64,
    frozen: bool,
    violation: f64,
}

/// Compute column widths for a container.
///
/// With an unknown container width (`None`, before the first layout pass)
/// every column gets its `min_width`.
pub fn size_columns(container_width: Option<f64>, columns: &[ColumnWidth]) -> Vec<f64> {
    let Some(container_width) = container_width else {
        return columns.iter().map(|c| c.min_width).collect();
    };

    // Inflexible items freeze at their clamped basis up front.
    let clamped_total: f64 = columns.iter().map(|c| c.clamp(c.basis)).sum();
    let growing = clamped_total < container_width;
    let shrinking = clamped_total > container_width;

    let mut items: Vec<FlexItem> = columns
        .iter()
        .map(|c| {
            let clamped = c.clamp(c.basis);
            let factor = if growing {
                c.grow
            } else if shrinking {
                c.shrink
            } else {
                0.0
            };
            let frozen = factor <= 0.0
                || (growing && c.basis > clamped)
                || (shrinking && c.basis < clamped);
            FlexItem {
                size: if frozen { clamped } else { c.basis },
                factor,
                frozen,
                violation: 0.0,
            }
        })
        .collect();

    let mut available = container_width - items.iter().map(|i| i.size).sum::<f64>();
    let mut rounds = 0usize;

    while items.iter().any(|i| !i.frozen) {
        rounds += 1;
        let total_factor: f64 = items.iter().filter(|i| !i.frozen).map(|i| i.factor).sum();
        if total_factor <= 0.0 {
            break;
        }

        let mut total_violation = 0.0;
        for (item, constraints) in items.iter_mut().zip(columns) {
            if item.frozen {
                item.violation = 0.0;
                continue;
            }
            let target = item.size + available * item.factor / total_factor;
            let clamped = constraints.clamp(target);
            item.violation = clamped - target;
            item.size = clamped;
            total_violation += item.violation;
        }

        if total_violation > 0.0 {
            for item in items.iter_mut().filter(|i| i.violation > 0.0) {
                item.frozen = true;
            }
        } else if total_violation < 0.0 {
            for item in items.iter_mut().filter(|i| i.violation < 0.0) {
                item.frozen = true;
            }
        } else {
            break;
        }

        available = container_width - items.iter().map(|i| i.size).sum::<f64>();
    }

    let widths: Vec<f64> = items.iter().map(|i| i.size).collect();

    log::trace!(
        "sized {} columns into {container_width}px in {rounds} round(s)",
        widths.len()
    );
    widths
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

    fn flex(basis: f64, grow: f64, shrink: f64, min: f64, max: Option<f64>) -> ColumnWidth {
        ColumnWidth {
            basis,
            grow,
            shrink,
            min_width: min,
            max_width: max,
        }
    }

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-6, "expected {expected:?}, got {actual:?}");
        }
    }

    #[test]
    fn test_grow_proportionally() {
        let cols = [
            flex(0.0, 1.0, 1.0, 50.0, None),
            flex(0.0, 2.0, 1.0, 50.0, None),
        ];
        assert_close(&size_columns(Some(300.0), &cols), &[100.0, 200.0]);
    }

    #[test]
    fn test_unknown_width_uses_min() {
        let cols = [
            flex(100.0, 1.0, 1.0, 30.0, None),
            flex(0.0, 2.0, 1.0, 70.0, Some(90.0)),
        ];
        assert_eq!(size_columns(None, &cols), vec![30.0, 70.0]);
    }

    #[test]
    fn test_max_width_freezes_and_redistributes() {
        let cols = [
            flex(0.0, 1.0, 1.0, 0.0, Some(50.0)),
            flex(0.0, 1.0, 1.0, 0.0, None),
        ];
        let widths = size_columns(Some(300.0), &cols);
        assert_close(&widths, &[50.0, 250.0]);
    }

    #[test]
    fn test_shrink_respects_min_width() {
        let cols = [
            flex(200.0, 1.0, 1.0, 180.0, None),
            flex(200.0, 1.0, 1.0, 50.0, None),
        ];
        // 100px deficit: first column can only give up 20px.
        let widths = size_columns(Some(300.0), &cols);
        assert_close(&widths, &[180.0, 120.0]);
    }

    #[test]
    fn test_exact_fit_keeps_basis() {
        let cols = [
            flex(100.0, 1.0, 1.0, 0.0, None),
            flex(200.0, 1.0, 1.0, 0.0, None),
        ];
        assert_close(&size_columns(Some(300.0), &cols), &[100.0, 200.0]);
    }

    #[test]
    fn test_fixed_column_never_flexes() {
        let cols = [
            ColumnWidth::fixed(40.0),
            flex(0.0, 1.0, 1.0, 100.0, None),
        ];
        assert_close(&size_columns(Some(500.0), &cols), &[40.0, 460.0]);
    }

    #[test]
    fn test_overconstrained_stays_within_bounds() {
        let cols = [
            flex(0.0, 1.0, 1.0, 200.0, None),
            flex(0.0, 1.0, 1.0, 200.0, None),
        ];
        let widths = size_columns(Some(300.0), &cols);
        assert!(widths.iter().all(|w| *w >= 200.0));
    }

    #[test]
    fn test_sum_matches_container_for_mixed_constraints() {
        let cols = [
            flex(40.0, 0.0, 0.0, 40.0, Some(40.0)),
            flex(120.0, 1.0, 1.0, 80.0, Some(150.0)),
            flex(0.0, 3.0, 1.0, 60.0, None),
            flex(50.0, 1.0, 2.0, 50.0, Some(400.0)),
            flex(0.0, 0.0, 0.0, 50.0, None),
        ];
        for container in [280.0, 450.0, 777.5, 1500.0] {
            let widths = size_columns(Some(container), &cols);
            let total: f64 = widths.iter().sum();
            assert!((total - container).abs() < 1e-6, "{container}: {widths:?}");
            for (w, c) in widths.iter().zip(&cols) {
                assert!(*w >= c.min_width - 1e-9);
                assert!(*w <= c.max_width.unwrap_or(f64::INFINITY) + 1e-9);
            }
        }
    }

    #[test]
    fn test_inflexible_column_held_at_min_width() {
        let cols = [
            flex(0.0, 0.0, 0.0, 50.0, None),
            flex(0.0, 1.0, 1.0, 0.0, None),
        ];
        assert_close(&size_columns(Some(300.0), &cols), &[50.0, 250.0]);
    }

    #[test]
    fn test_inflexible_column_held_at_max_width() {
        let cols = [
            flex(300.0, 0.0, 0.0, 0.0, Some(100.0)),
            flex(100.0, 1.0, 1.0, 0.0, None),
        ];
        // Clamped total is 200, so the second column grows into the rest.
        assert_close(&size_columns(Some(400.0), &cols), &[100.0, 300.0]);
    }

    #[test]
    fn test_idempotent() {
        let cols = [
            flex(10.0, 1.0, 1.0, 20.0, Some(90.0)),
            flex(0.0, 2.0, 1.0, 50.0, None),
        ];
        assert_eq!(size_columns(Some(321.0), &cols), size_columns(Some(321.0), &cols));
    }
}
