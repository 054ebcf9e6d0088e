use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Which edge (if any) a column is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StickySide {
    Left,
    Right,
    #[default]
    None,
}

/// Flex constraints used by the column sizer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnWidth {
    pub basis: f64,
    pub grow: f64,
    pub shrink: f64,
    pub min_width: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_width: Option<f64>,
}

impl Default for ColumnWidth {
    fn default() -> Self {
        Self {
            basis: 0.0,
            grow: 1.0,
            shrink: 1.0,
            min_width: 100.0,
            max_width: None,
        }
    }
}

impl ColumnWidth {
    /// A rigid width that neither grows nor shrinks.
    pub fn fixed(width: f64) -> Self {
        Self {
            basis: width,
            grow: 0.0,
            shrink: 0.0,
            min_width: width,
            max_width: Some(width),
        }
    }

    /// Clamp a candidate width into `[min_width, max_width]`.
    pub fn clamp(&self, width: f64) -> f64 {
        let upper = self.max_width.unwrap_or(f64::INFINITY).max(self.min_width);
        width.max(self.min_width).min(upper)
    }
}

/// Read-only state of a column, either fixed or evaluated per row index.
#[derive(Clone, Default)]
pub enum Disabled {
    #[default]
    Never,
    Always,
    When(Arc<dyn Fn(usize) -> bool + Send + Sync>),
}

impl Disabled {
    pub fn when(predicate: impl Fn(usize) -> bool + Send + Sync + 'static) -> Self {
        Self::When(Arc::new(predicate))
    }

    pub fn is_disabled(&self, row: usize) -> bool {
        match self {
            Disabled::Never => false,
            Disabled::Always => true,
            Disabled::When(predicate) => predicate(row),
        }
    }
}

impl From<bool> for Disabled {
    fn from(value: bool) -> Self {
        if value {
            Disabled::Always
        } else {
            Disabled::Never
        }
    }
}

impl fmt::Debug for Disabled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Disabled::Never => f.write_str("Never"),
            Disabled::Always => f.write_str("Always"),
            Disabled::When(_) => f.write_str("When(..)"),
        }
    }
}

impl<'de> Deserialize<'de> for Disabled {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        bool::deserialize(deserializer).map(Disabled::from)
    }
}

impl Serialize for Disabled {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Per-row predicates cannot cross the wire; they serialize as `false`.
        serializer.serialize_bool(matches!(self, Disabled::Always))
    }
}

/// A column descriptor as supplied by the host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Column {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub sticky: StickySide,
    #[serde(flatten)]
    pub width: ColumnWidth,
    pub disabled: Disabled,
}

impl Column {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_width(mut self, width: ColumnWidth) -> Self {
        self.width = width;
        self
    }

    #[must_use]
    pub fn with_sticky(mut self, sticky: StickySide) -> Self {
        self.sticky = sticky;
        self
    }

    #[must_use]
    pub fn with_disabled(mut self, disabled: Disabled) -> Self {
        self.disabled = disabled;
        self
    }

    /// The leading row-number column.
    pub fn gutter(width: f64) -> Self {
        Self {
            id: Some("__gutter".to_string()),
            title: None,
            sticky: StickySide::Left,
            width: ColumnWidth::fixed(width),
            disabled: Disabled::Always,
        }
    }
}

/// Count the contiguous sticky-left prefix and sticky-right suffix.
///
/// Non-contiguous sticky flags are ignored; the two runs never overlap.
pub fn sticky_counts(columns: &[Column]) -> (usize, usize) {
    let left = columns
        .iter()
        .take_while(|c| c.sticky == StickySide::Left)
        .count();
    let right = columns
        .iter()
        .rev()
        .take(columns.len() - left)
        .take_while(|c| c.sticky == StickySide::Right)
        .count();
    (left, right)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_defaults() {
        let col: Column = serde_json::from_str(r#"{"id":"name","minWidth":80}"#).unwrap();
        assert_eq!(col.id.as_deref(), Some("name"));
        assert_eq!(col.sticky, StickySide::None);
        assert_eq!(col.width.min_width, 80.0);
        assert_eq!(col.width.grow, 1.0);
        assert!(!col.disabled.is_disabled(0));
    }

    #[test]
    fn test_deserialize_disabled_and_sticky() {
        let col: Column =
            serde_json::from_str(r#"{"sticky":"right","disabled":true,"maxWidth":200}"#).unwrap();
        assert_eq!(col.sticky, StickySide::Right);
        assert!(col.disabled.is_disabled(3));
        assert_eq!(col.width.max_width, Some(200.0));
    }

    #[test]
    fn test_disabled_predicate() {
        let disabled = Disabled::when(|row| row % 2 == 0);
        assert!(disabled.is_disabled(0));
        assert!(!disabled.is_disabled(1));
    }

    #[test]
    fn test_sticky_counts() {
        let cols = vec![
            Column::gutter(40.0),
            Column::new("a"),
            Column::new("b").with_sticky(StickySide::Left),
            Column::new("c").with_sticky(StickySide::Right),
        ];
        assert_eq!(sticky_counts(&cols), (1, 1));

        let all_left = vec![Column::gutter(40.0), Column::gutter(40.0)];
        assert_eq!(sticky_counts(&all_left), (2, 0));
    }

    #[test]
    fn test_clamp_with_inverted_bounds() {
        let width = ColumnWidth {
            min_width: 100.0,
            max_width: Some(50.0),
            ..ColumnWidth::default()
        };
        assert_eq!(width.clamp(10.0), 100.0);
        assert_eq!(width.clamp(500.0), 100.0);
    }
}
