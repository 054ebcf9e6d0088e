//! Row operation planning.
//!
//! Every mutating transaction is described to the host as a list of
//! half-open [`RowOperation`]s in application order. Planners never emit
//! an empty range.

use std::ops::Range;

use crate::types::{DiffSummary, OperationKind, RowOperation};

fn push_nonempty(ops: &mut Vec<RowOperation>, op: RowOperation) {
    if !op.is_empty() {
        ops.push(op);
    }
}

/// `count` new rows inserted at index `at`.
pub fn plan_insert(at: usize, count: usize) -> Vec<RowOperation> {
    let mut ops = Vec::new();
    push_nonempty(&mut ops, RowOperation::create(at, at + count));
    ops
}

/// `count` new rows inserted after row `row`.
pub fn plan_insert_after(row: usize, count: usize) -> Vec<RowOperation> {
    plan_insert(row + 1, count)
}

/// Rows `rows` duplicated in order, directly after the last source row.
pub fn plan_duplicate(rows: Range<usize>) -> Vec<RowOperation> {
    plan_insert(rows.end, rows.len())
}

/// Deleted row indices, coalesced into ranges and ordered highest first so
/// that applying them in sequence never shifts a pending range.
pub fn plan_delete(indices: &[usize]) -> Vec<RowOperation> {
    let mut sorted = indices.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut ranges: Vec<Range<usize>> = Vec::new();
    for index in sorted {
        match ranges.last_mut() {
            Some(last) if last.end == index => last.end += 1,
            _ => ranges.push(index..index + 1),
        }
    }

    ranges
        .into_iter()
        .rev()
        .map(|r| RowOperation::delete(r.start, r.end))
        .collect()
}

/// In-place edit of the given rows: one `UPDATE` spanning min..=max.
pub fn plan_update(rows: impl IntoIterator<Item = usize>) -> Vec<RowOperation> {
    let mut span: Option<(usize, usize)> = None;
    for row in rows {
        span = Some(match span {
            Some((min, max)) => (min.min(row), max.max(row)),
            None => (row, row),
        });
    }
    span.map(|(min, max)| vec![RowOperation::update(min, max + 1)])
        .unwrap_or_default()
}

/// How a paste of `pasted_rows` rows starting at `start` lands in a grid of
/// `row_count` rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PastePlan {
    pub operations: Vec<RowOperation>,
    /// Rows the pasted values are written to
    pub written: Range<usize>,
    /// Number of rows to append before writing
    pub appended: usize,
}

/// Plan a paste. Overflowing rows are appended unless rows are locked, in
/// which case the paste is truncated at the last existing row.
pub fn plan_paste(start: usize, pasted_rows: usize, row_count: usize, locked_rows: bool) -> PastePlan {
    let wanted_end = start.saturating_add(pasted_rows);
    let end = if locked_rows {
        wanted_end.min(row_count)
    } else {
        wanted_end
    };
    let start = start.min(end);
    let existing_end = end.min(row_count).max(start);

    let mut operations = Vec::new();
    push_nonempty(&mut operations, RowOperation::update(start, existing_end));
    push_nonempty(&mut operations, RowOperation::create(existing_end, end));

    PastePlan {
        operations,
        written: start..end,
        appended: end - existing_end,
    }
}

/// Row counts per operation kind.
pub fn summarize(ops: &[RowOperation]) -> DiffSummary {
    ops.iter().fold(DiffSummary::default(), |mut summary, op| {
        match op.kind {
            OperationKind::Create => summary.created += op.len(),
            OperationKind::Update => summary.updated += op.len(),
            OperationKind::Delete => summary.deleted += op.len(),
        }
        summary
    })
}
