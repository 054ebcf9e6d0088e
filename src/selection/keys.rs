//! Input events consumed by the selection state machine.
//!
//! Hosts translate DOM `KeyboardEvent`s with [`InputEvent::from_dom_key`];
//! pointer and editor events are constructed directly.

use serde::{Deserialize, Serialize};

use crate::types::{Cell, Direction};

/// A key the grid reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Key {
    Arrow(Direction),
    Tab,
    Enter,
    Escape,
    Backspace,
    Delete,
    /// A printable character
    Char(char),
}

impl Key {
    /// Parse a DOM `KeyboardEvent.key` value.
    ///
    /// Returns `None` for keys the grid ignores (function keys, modifiers
    /// pressed on their own, IME composition keys, ...).
    pub fn from_dom(name: &str) -> Option<Self> {
        let key = match name {
            "ArrowUp" | "Up" => Key::Arrow(Direction::Up),
            "ArrowDown" | "Down" => Key::Arrow(Direction::Down),
            "ArrowLeft" | "Left" => Key::Arrow(Direction::Left),
            "ArrowRight" | "Right" => Key::Arrow(Direction::Right),
            "Tab" => Key::Tab,
            "Enter" => Key::Enter,
            "Escape" | "Esc" => Key::Escape,
            "Backspace" => Key::Backspace,
            "Delete" | "Del" => Key::Delete,
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if !c.is_control() => Key::Char(c),
                    _ => return None,
                }
            }
        };
        Some(key)
    }
}

/// Modifier state of a key press. `ctrl` is set for Ctrl or Cmd.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
    };
    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
    };
    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
        alt: false,
    };
    pub const CTRL_SHIFT: Self = Self {
        shift: true,
        ctrl: true,
        alt: false,
    };
}

/// Everything that can drive a selection transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InputEvent {
    Key {
        key: Key,
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// Pointer pressed on a cell; `extend` when Shift is held
    PointerDown {
        cell: Cell,
        #[serde(default)]
        extend: bool,
    },
    DoubleClick {
        cell: Cell,
    },
    /// The cell editor's value changed
    EditorInput {
        value: String,
    },
    /// The cell editor lost focus
    CommitEdit,
    Copy,
    Cut,
    Paste,
}

impl InputEvent {
    pub fn key(key: Key) -> Self {
        Self::Key {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn key_with(key: Key, modifiers: Modifiers) -> Self {
        Self::Key { key, modifiers }
    }

    /// Build a key event from the fields of a DOM `KeyboardEvent`.
    pub fn from_dom_key(key: &str, shift: bool, ctrl: bool, alt: bool, meta: bool) -> Option<Self> {
        Key::from_dom(key).map(|key| Self::Key {
            key,
            modifiers: Modifiers {
                shift,
                ctrl: ctrl || meta,
                alt,
            },
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("ArrowUp", Some(Key::Arrow(Direction::Up)))]
    #[test_case("ArrowRight", Some(Key::Arrow(Direction::Right)))]
    #[test_case("Tab", Some(Key::Tab))]
    #[test_case("Esc", Some(Key::Escape))]
    #[test_case("a", Some(Key::Char('a')))]
    #[test_case("é", Some(Key::Char('é')))]
    #[test_case("Shift", None)]
    #[test_case("F5", None)]
    #[test_case("", None)]
    fn test_dom_key_names(name: &str, expected: Option<Key>) {
        assert_eq!(Key::from_dom(name), expected);
    }

    #[test]
    fn test_meta_counts_as_ctrl() {
        let event = InputEvent::from_dom_key("a", false, false, false, true).unwrap();
        assert_eq!(event, InputEvent::key_with(Key::Char('a'), Modifiers::CTRL));
    }

    #[test]
    fn test_event_json_shape() {
        let event: InputEvent =
            serde_json::from_str(r#"{"type":"pointerDown","cell":{"col":1,"row":2}}"#).unwrap();
        assert_eq!(
            event,
            InputEvent::PointerDown {
                cell: Cell::new(1, 2),
                extend: false
            }
        );
    }
}
