use serde::{Deserialize, Serialize};

/// Edge a sticky row docks against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StickyPosition {
    Top,
    Bottom,
}

/// Resolved stickiness of a single row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StickyHint {
    pub position: StickyPosition,
    pub level: u32,
}

impl StickyHint {
    pub fn top(level: u32) -> Self {
        Self {
            position: StickyPosition::Top,
            level,
        }
    }

    pub fn bottom(level: u32) -> Self {
        Self {
            position: StickyPosition::Bottom,
            level,
        }
    }
}

/// Shorthand accepted from the host's row-stickiness callback.
///
/// - `false` → not sticky, `true` → top level 1
/// - `n` → top level `n` (`n >= 1`)
/// - `"top"` / `"bottom"` → level 1 on that side
/// - `{ "position": ..., "level": ... }` → full form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Stickiness {
    Flag(bool),
    Level(i64),
    Side(String),
    Full(StickyHint),
}

impl Default for Stickiness {
    fn default() -> Self {
        Stickiness::Flag(false)
    }
}

impl Stickiness {
    /// Resolve the shorthand; anything unrecognized means "not sticky".
    pub fn resolve(&self) -> Option<StickyHint> {
        match self {
            Stickiness::Flag(true) => Some(StickyHint::top(1)),
            Stickiness::Flag(false) => None,
            Stickiness::Level(n) => u32::try_from(*n)
                .ok()
                .filter(|level| *level >= 1)
                .map(StickyHint::top),
            Stickiness::Side(side) => match side.as_str() {
                "top" => Some(StickyHint::top(1)),
                "bottom" => Some(StickyHint::bottom(1)),
                _ => None,
            },
            Stickiness::Full(hint) if hint.level >= 1 => Some(*hint),
            Stickiness::Full(_) => None,
        }
    }
}

impl From<bool> for Stickiness {
    fn from(value: bool) -> Self {
        Stickiness::Flag(value)
    }
}

impl From<StickyHint> for Stickiness {
    fn from(value: StickyHint) -> Self {
        Stickiness::Full(value)
    }
}

/// Docking information for one sticky row.
///
/// `area_top..area_bottom` is the unscrolled content-coordinate span in which
/// the row may float; `sticky_offset` is the pinned distance from its edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StickyRowDescriptor {
    pub index: usize,
    pub position: StickyPosition,
    pub level: u32,
    pub area_top: f64,
    pub area_bottom: f64,
    pub sticky_offset: f64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("true", Some(StickyHint::top(1)) ; "bool true")]
    #[test_case("false", None ; "bool false")]
    #[test_case("3", Some(StickyHint::top(3)) ; "level")]
    #[test_case("0", None ; "level zero")]
    #[test_case("-2", None ; "negative level")]
    #[test_case(r#""bottom""#, Some(StickyHint::bottom(1)) ; "side bottom")]
    #[test_case(r#""middle""#, None ; "unknown side")]
    #[test_case(r#"{"position":"bottom","level":2}"#, Some(StickyHint::bottom(2)) ; "full form")]
    fn test_resolve_shorthand(json: &str, expected: Option<StickyHint>) {
        let stickiness: Stickiness = serde_json::from_str(json).unwrap();
        assert_eq!(stickiness.resolve(), expected);
    }
}
