use serde::{Deserialize, Serialize};

/// Kind of structural row change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperationKind {
    Create,
    Update,
    Delete,
}

/// One row mutation over the half-open range `from_row_index..to_row_index`.
///
/// Operations are listed in application order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowOperation {
    #[serde(rename = "type")]
    pub kind: OperationKind,
    pub from_row_index: usize,
    pub to_row_index: usize,
}

impl RowOperation {
    pub const fn create(from: usize, to: usize) -> Self {
        Self {
            kind: OperationKind::Create,
            from_row_index: from,
            to_row_index: to,
        }
    }

    pub const fn update(from: usize, to: usize) -> Self {
        Self {
            kind: OperationKind::Update,
            from_row_index: from,
            to_row_index: to,
        }
    }

    pub const fn delete(from: usize, to: usize) -> Self {
        Self {
            kind: OperationKind::Delete,
            from_row_index: from,
            to_row_index: to,
        }
    }

    pub fn len(&self) -> usize {
        self.to_row_index.saturating_sub(self.from_row_index)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Row counts per operation kind, surfaced to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DiffSummary {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_string(&RowOperation::update(0, 1)).unwrap();
        assert_eq!(json, r#"{"type":"UPDATE","fromRowIndex":0,"toRowIndex":1}"#);
    }
}
