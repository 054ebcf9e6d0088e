//! Active cell, anchor and edit-session state machine.
//!
//! [`transition`] is pure: it takes the current state, one input event and
//! the grid's shape, and returns the next state plus the side effects the
//! owner must carry out (committing a value, inserting a row, scrolling).

use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::keys::{InputEvent, Key, Modifiers};
use crate::types::{Cell, Direction, Selection};

/// Selection and edit-session state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SelectionState {
    pub active: Option<Cell>,
    pub anchor: Option<Cell>,
    /// Whether the active cell's editor is open
    pub editing: bool,
    /// Pending editor value; `None` until the user changes something
    pub edit_buffer: Option<String>,
}

impl SelectionState {
    pub fn at(cell: Cell) -> Self {
        Self {
            active: Some(cell),
            ..Self::default()
        }
    }

    /// The normalized rectangle between active and anchor cell.
    ///
    /// `None` unless both are set.
    pub fn selection(&self) -> Option<Selection> {
        match (self.active, self.anchor) {
            (Some(active), Some(anchor)) => Some(Selection::from_corners(active, anchor)),
            _ => None,
        }
    }

    /// The cells an operation acts on: the selection, or else the active cell.
    pub fn target(&self) -> Option<Selection> {
        self.selection().or_else(|| self.active.map(Selection::single))
    }

    /// Highlight test for `cell`.
    pub fn is_selected(&self, cell: Cell) -> bool {
        self.selection().is_some_and(|s| s.contains(cell))
    }
}

/// Shape and policy of the grid a transition runs against.
#[derive(Clone, Copy)]
pub struct GridContext<'a> {
    pub col_count: usize,
    pub row_count: usize,
    pub locked_rows: bool,
    pub auto_add_row: bool,
    disabled: Option<&'a dyn Fn(Cell) -> bool>,
}

impl std::fmt::Debug for GridContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridContext")
            .field("col_count", &self.col_count)
            .field("row_count", &self.row_count)
            .field("locked_rows", &self.locked_rows)
            .field("auto_add_row", &self.auto_add_row)
            .finish_non_exhaustive()
    }
}

impl<'a> GridContext<'a> {
    pub fn new(col_count: usize, row_count: usize) -> Self {
        Self {
            col_count,
            row_count,
            locked_rows: false,
            auto_add_row: false,
            disabled: None,
        }
    }

    pub fn with_locked_rows(mut self, locked: bool) -> Self {
        self.locked_rows = locked;
        self
    }

    pub fn with_auto_add_row(mut self, auto_add_row: bool) -> Self {
        self.auto_add_row = auto_add_row;
        self
    }

    pub fn with_disabled(mut self, disabled: &'a dyn Fn(Cell) -> bool) -> Self {
        self.disabled = Some(disabled);
        self
    }

    pub fn is_disabled(&self, cell: Cell) -> bool {
        self.disabled.is_some_and(|disabled| disabled(cell))
    }

    pub fn clamp(&self, cell: Cell) -> Option<Cell> {
        cell.clamped(self.col_count, self.row_count)
    }

    fn last_cell(&self) -> Option<Cell> {
        self.clamp(Cell::new(usize::MAX, usize::MAX))
    }
}

/// Which way focus leaves the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExitDirection {
    Forward,
    Backward,
}

/// A side effect requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Effect {
    /// Write the editor value into the cell
    Commit { cell: Cell, value: String },
    /// Discard the open editor
    CancelEdit { cell: Cell },
    /// Open the editor; `initial` replaces the cell value when set
    BeginEdit { cell: Cell, initial: Option<String> },
    ScrollIntoView { cell: Cell },
    /// Focus left the grid; the host moves it along its tab order
    ExitGrid { direction: ExitDirection },
    InsertRowAfter { row: usize },
    DeleteSelection { selection: Selection },
    /// Insert copies of `rows` directly after them
    DuplicateRows { rows: Range<usize> },
    Copy { selection: Selection },
    Cut { selection: Selection },
    /// Paste anchored at the selection's min cell
    Paste { selection: Selection },
}

/// Result of a transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub state: SelectionState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn unchanged(state: &SelectionState) -> Self {
        Self {
            state: state.clone(),
            effects: Vec::new(),
        }
    }
}

/// Close an open editor, emitting a commit if the buffer changed.
fn finish_edit(state: &mut SelectionState, effects: &mut Vec<Effect>) {
    if !state.editing {
        return;
    }
    state.editing = false;
    if let (Some(cell), Some(value)) = (state.active, state.edit_buffer.take()) {
        effects.push(Effect::Commit { cell, value });
    }
}

fn begin_edit(state: &mut SelectionState, effects: &mut Vec<Effect>, cell: Cell, initial: Option<String>) {
    state.editing = true;
    state.edit_buffer.clone_from(&initial);
    effects.push(Effect::BeginEdit { cell, initial });
}

/// Compute the next state and effects for `event`.
pub fn transition(state: &SelectionState, event: &InputEvent, ctx: &GridContext<'_>) -> Transition {
    match event {
        InputEvent::Key { key, modifiers } => on_key(state, *key, *modifiers, ctx),
        InputEvent::PointerDown { cell, extend } => on_pointer_down(state, *cell, *extend, ctx),
        InputEvent::DoubleClick { cell } => on_double_click(state, *cell, ctx),
        InputEvent::EditorInput { value } => {
            let mut next = state.clone();
            if next.editing {
                next.edit_buffer = Some(value.clone());
            }
            Transition {
                state: next,
                effects: Vec::new(),
            }
        }
        InputEvent::CommitEdit => {
            let mut next = state.clone();
            let mut effects = Vec::new();
            finish_edit(&mut next, &mut effects);
            Transition { state: next, effects }
        }
        InputEvent::Copy | InputEvent::Cut | InputEvent::Paste => {
            // The open editor owns clipboard events while editing.
            match state.target().filter(|_| !state.editing) {
                Some(selection) => {
                    let effect = match event {
                        InputEvent::Copy => Effect::Copy { selection },
                        InputEvent::Cut => Effect::Cut { selection },
                        _ => Effect::Paste { selection },
                    };
                    Transition {
                        state: state.clone(),
                        effects: vec![effect],
                    }
                }
                None => Transition::unchanged(state),
            }
        }
    }
}

fn on_key(state: &SelectionState, key: Key, modifiers: Modifiers, ctx: &GridContext<'_>) -> Transition {
    let mut next = state.clone();
    let mut effects = Vec::new();

    match key {
        Key::Arrow(direction) => {
            let Some(active) = state.active.filter(|_| !state.editing) else {
                return Transition::unchanged(state);
            };
            move_with_arrow(&mut next, &mut effects, active, direction, modifiers, ctx);
        }
        Key::Tab => {
            let Some(active) = state.active else {
                return Transition::unchanged(state);
            };
            finish_edit(&mut next, &mut effects);
            next.anchor = None;
            match tab_target(active, modifiers.shift, ctx) {
                Some(cell) => {
                    next.active = Some(cell);
                    effects.push(Effect::ScrollIntoView { cell });
                }
                None => {
                    next.active = None;
                    let direction = if modifiers.shift {
                        ExitDirection::Backward
                    } else {
                        ExitDirection::Forward
                    };
                    effects.push(Effect::ExitGrid { direction });
                }
            }
        }
        Key::Enter => {
            let Some(active) = state.active else {
                return Transition::unchanged(state);
            };
            if state.editing {
                finish_edit(&mut next, &mut effects);
                enter_move_down(&mut next, &mut effects, active, ctx);
            } else if modifiers.shift {
                if !ctx.locked_rows {
                    effects.push(Effect::InsertRowAfter { row: active.row });
                }
            } else if !ctx.is_disabled(active) {
                begin_edit(&mut next, &mut effects, active, None);
            }
        }
        Key::Escape => {
            if state.editing {
                next.editing = false;
                next.edit_buffer = None;
                if let Some(cell) = state.active {
                    effects.push(Effect::CancelEdit { cell });
                }
            } else if state.anchor.is_some() {
                next.anchor = None;
            } else {
                next.active = None;
            }
        }
        Key::Backspace | Key::Delete => {
            if let Some(selection) = state.target().filter(|_| !state.editing) {
                effects.push(Effect::DeleteSelection { selection });
            }
        }
        Key::Char(c) if modifiers.ctrl => {
            if state.editing {
                return Transition::unchanged(state);
            }
            match c.to_ascii_lowercase() {
                'a' => {
                    if let Some(last) = ctx.last_cell() {
                        next.anchor = Some(Cell::new(0, 0));
                        next.active = Some(last);
                    }
                }
                'd' if !ctx.locked_rows => {
                    if let Some(selection) = state.target() {
                        let rows = selection.min.row..selection.max.row + 1;
                        let shift = rows.len();
                        // The copies take over the selection.
                        next.active = state.active.map(|c| Cell::new(c.col, c.row + shift));
                        next.anchor = state.anchor.map(|c| Cell::new(c.col, c.row + shift));
                        effects.push(Effect::DuplicateRows { rows });
                    }
                }
                _ => {}
            }
        }
        Key::Char(c) => {
            let Some(active) = state.active.filter(|_| !state.editing) else {
                return Transition::unchanged(state);
            };
            if modifiers.alt || ctx.is_disabled(active) {
                return Transition::unchanged(state);
            }
            next.anchor = None;
            begin_edit(&mut next, &mut effects, active, Some(c.to_string()));
        }
    }

    Transition { state: next, effects }
}

fn move_with_arrow(
    next: &mut SelectionState,
    effects: &mut Vec<Effect>,
    active: Cell,
    direction: Direction,
    modifiers: Modifiers,
    ctx: &GridContext<'_>,
) {
    let (cols, rows) = (ctx.col_count, ctx.row_count);
    if modifiers.shift {
        let from = next.anchor.unwrap_or(active);
        let anchor = if modifiers.ctrl {
            direction.jump(from, cols, rows)
        } else {
            direction.step(from, cols, rows)
        };
        next.anchor = Some(anchor);
        effects.push(Effect::ScrollIntoView { cell: anchor });
    } else {
        let cell = if modifiers.ctrl {
            direction.jump(active, cols, rows)
        } else {
            direction.step(active, cols, rows)
        };
        next.active = Some(cell);
        next.anchor = None;
        effects.push(Effect::ScrollIntoView { cell });
    }
}

/// Next cell in reading order, or `None` when Tab leaves the grid.
fn tab_target(active: Cell, backward: bool, ctx: &GridContext<'_>) -> Option<Cell> {
    let active = ctx.clamp(active)?;
    let last_col = ctx.col_count - 1;
    if backward {
        if active.col > 0 {
            Some(Cell::new(active.col - 1, active.row))
        } else if active.row > 0 {
            Some(Cell::new(last_col, active.row - 1))
        } else {
            None
        }
    } else if active.col < last_col {
        Some(Cell::new(active.col + 1, active.row))
    } else if active.row + 1 < ctx.row_count {
        Some(Cell::new(0, active.row + 1))
    } else {
        None
    }
}

fn enter_move_down(next: &mut SelectionState, effects: &mut Vec<Effect>, active: Cell, ctx: &GridContext<'_>) {
    next.anchor = None;
    if active.row + 1 < ctx.row_count {
        let cell = Cell::new(active.col, active.row + 1);
        next.active = Some(cell);
        effects.push(Effect::ScrollIntoView { cell });
    } else if !ctx.locked_rows && ctx.auto_add_row {
        let cell = Cell::new(active.col, active.row + 1);
        effects.push(Effect::InsertRowAfter { row: active.row });
        next.active = Some(cell);
        effects.push(Effect::ScrollIntoView { cell });
    }
}

fn on_pointer_down(state: &SelectionState, cell: Cell, extend: bool, ctx: &GridContext<'_>) -> Transition {
    let Some(cell) = ctx.clamp(cell) else {
        return Transition::unchanged(state);
    };
    if state.editing && state.active == Some(cell) && !extend {
        return Transition::unchanged(state);
    }

    let mut next = state.clone();
    let mut effects = Vec::new();
    finish_edit(&mut next, &mut effects);

    match (extend, state.active) {
        (true, Some(_)) => next.anchor = Some(cell),
        _ => {
            next.active = Some(cell);
            next.anchor = None;
        }
    }
    Transition { state: next, effects }
}

fn on_double_click(state: &SelectionState, cell: Cell, ctx: &GridContext<'_>) -> Transition {
    let Some(cell) = ctx.clamp(cell) else {
        return Transition::unchanged(state);
    };
    if state.editing && state.active == Some(cell) {
        return Transition::unchanged(state);
    }

    let mut next = state.clone();
    let mut effects = Vec::new();
    finish_edit(&mut next, &mut effects);
    next.active = Some(cell);
    next.anchor = None;
    if !ctx.is_disabled(cell) {
        begin_edit(&mut next, &mut effects, cell, None);
    }
    Transition { state: next, effects }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;

    fn press(state: &SelectionState, key: Key, modifiers: Modifiers, ctx: &GridContext<'_>) -> Transition {
        transition(state, &InputEvent::key_with(key, modifiers), ctx)
    }

    #[test]
    fn test_shift_arrow_then_arrow_collapses() {
        let ctx = GridContext::new(3, 3);
        let start = SelectionState::at(Cell::new(0, 0));

        let t = press(&start, Key::Arrow(Direction::Down), Modifiers::SHIFT, &ctx);
        assert_eq!(t.state.active, Some(Cell::new(0, 0)));
        assert_eq!(t.state.anchor, Some(Cell::new(0, 1)));
        assert_eq!(
            t.state.selection(),
            Some(Selection::from_corners(Cell::new(0, 0), Cell::new(0, 1)))
        );

        let t = press(&t.state, Key::Arrow(Direction::Down), Modifiers::NONE, &ctx);
        assert_eq!(t.state.active, Some(Cell::new(0, 1)));
        assert_eq!(t.state.anchor, None);
        assert_eq!(t.effects, vec![Effect::ScrollIntoView { cell: Cell::new(0, 1) }]);
    }

    #[test]
    fn test_arrow_without_active_is_noop() {
        let ctx = GridContext::new(3, 3);
        let t = press(&SelectionState::default(), Key::Arrow(Direction::Up), Modifiers::NONE, &ctx);
        assert_eq!(t.state, SelectionState::default());
        assert!(t.effects.is_empty());
    }

    #[test]
    fn test_ctrl_arrow_jumps() {
        let ctx = GridContext::new(5, 20);
        let t = press(&SelectionState::at(Cell::new(2, 3)), Key::Arrow(Direction::Down), Modifiers::CTRL, &ctx);
        assert_eq!(t.state.active, Some(Cell::new(2, 19)));

        let t = press(
            &SelectionState::at(Cell::new(2, 3)),
            Key::Arrow(Direction::Right),
            Modifiers::CTRL_SHIFT,
            &ctx,
        );
        assert_eq!(t.state.active, Some(Cell::new(2, 3)));
        assert_eq!(t.state.anchor, Some(Cell::new(4, 3)));
    }

    #[test]
    fn test_tab_wraps_and_exits() {
        let ctx = GridContext::new(2, 2);
        let t = press(&SelectionState::at(Cell::new(1, 0)), Key::Tab, Modifiers::NONE, &ctx);
        assert_eq!(t.state.active, Some(Cell::new(0, 1)));

        let t = press(&SelectionState::at(Cell::new(1, 1)), Key::Tab, Modifiers::NONE, &ctx);
        assert_eq!(t.state.active, None);
        assert_eq!(
            t.effects,
            vec![Effect::ExitGrid {
                direction: ExitDirection::Forward
            }]
        );

        let t = press(&SelectionState::at(Cell::new(0, 1)), Key::Tab, Modifiers::SHIFT, &ctx);
        assert_eq!(t.state.active, Some(Cell::new(1, 0)));

        let t = press(&SelectionState::at(Cell::new(0, 0)), Key::Tab, Modifiers::SHIFT, &ctx);
        assert_eq!(t.state.active, None);
    }

    #[test]
    fn test_enter_edit_commit_cycle() {
        let ctx = GridContext::new(2, 3);
        let t = press(&SelectionState::at(Cell::new(1, 0)), Key::Enter, Modifiers::NONE, &ctx);
        assert!(t.state.editing);
        assert_eq!(
            t.effects,
            vec![Effect::BeginEdit {
                cell: Cell::new(1, 0),
                initial: None
            }]
        );

        let t = transition(&t.state, &InputEvent::EditorInput { value: "42".into() }, &ctx);
        let t = press(&t.state, Key::Enter, Modifiers::NONE, &ctx);
        assert!(!t.state.editing);
        assert_eq!(t.state.active, Some(Cell::new(1, 1)));
        assert_eq!(
            t.effects[0],
            Effect::Commit {
                cell: Cell::new(1, 0),
                value: "42".into()
            }
        );
    }

    #[test]
    fn test_enter_on_last_row() {
        let mut state = SelectionState::at(Cell::new(0, 1));
        state.editing = true;
        state.edit_buffer = Some("x".into());

        let stay = press(&state, Key::Enter, Modifiers::NONE, &GridContext::new(1, 2));
        assert_eq!(stay.state.active, Some(Cell::new(0, 1)));

        let grow_ctx = GridContext::new(1, 2).with_auto_add_row(true);
        let grow = press(&state, Key::Enter, Modifiers::NONE, &grow_ctx);
        assert_eq!(grow.state.active, Some(Cell::new(0, 2)));
        assert!(grow.effects.contains(&Effect::InsertRowAfter { row: 1 }));

        let locked_ctx = GridContext::new(1, 2).with_auto_add_row(true).with_locked_rows(true);
        let locked = press(&state, Key::Enter, Modifiers::NONE, &locked_ctx);
        assert_eq!(locked.state.active, Some(Cell::new(0, 1)));
        assert!(!locked.effects.iter().any(|e| matches!(e, Effect::InsertRowAfter { .. })));
    }

    #[test]
    fn test_escape_ladder() {
        let ctx = GridContext::new(3, 3);
        let mut state = SelectionState::at(Cell::new(1, 1));
        state.anchor = Some(Cell::new(2, 2));
        state.editing = true;
        state.edit_buffer = Some("draft".into());

        let t = press(&state, Key::Escape, Modifiers::NONE, &ctx);
        assert!(!t.state.editing);
        assert_eq!(t.state.edit_buffer, None);
        assert_eq!(t.state.anchor, Some(Cell::new(2, 2)));

        let t = press(&t.state, Key::Escape, Modifiers::NONE, &ctx);
        assert_eq!(t.state.anchor, None);
        assert_eq!(t.state.active, Some(Cell::new(1, 1)));

        let t = press(&t.state, Key::Escape, Modifiers::NONE, &ctx);
        assert_eq!(t.state.active, None);
    }

    #[test]
    fn test_select_all() {
        let ctx = GridContext::new(4, 10);
        let t = press(&SelectionState::at(Cell::new(1, 1)), Key::Char('a'), Modifiers::CTRL, &ctx);
        assert_eq!(t.state.anchor, Some(Cell::new(0, 0)));
        assert_eq!(t.state.active, Some(Cell::new(3, 9)));
        assert!(t.state.is_selected(Cell::new(2, 5)));
    }

    #[test]
    fn test_disabled_cell_never_edits() {
        let disabled = |cell: Cell| cell.col == 0;
        let ctx = GridContext::new(2, 2).with_disabled(&disabled);
        let state = SelectionState::at(Cell::new(0, 0));

        let t = press(&state, Key::Enter, Modifiers::NONE, &ctx);
        assert!(!t.state.editing);
        let t = press(&state, Key::Char('x'), Modifiers::NONE, &ctx);
        assert!(!t.state.editing);

        // Still navigable.
        let t = press(&state, Key::Arrow(Direction::Down), Modifiers::NONE, &ctx);
        assert_eq!(t.state.active, Some(Cell::new(0, 1)));
    }

    #[test]
    fn test_typing_starts_edit_with_character() {
        let ctx = GridContext::new(2, 2);
        let t = press(&SelectionState::at(Cell::new(1, 1)), Key::Char('7'), Modifiers::NONE, &ctx);
        assert!(t.state.editing);
        assert_eq!(t.state.edit_buffer.as_deref(), Some("7"));
    }

    #[test]
    fn test_pointer_commits_previous_edit() {
        let ctx = GridContext::new(3, 3);
        let mut state = SelectionState::at(Cell::new(0, 0));
        state.editing = true;
        state.edit_buffer = Some("v".into());

        let t = transition(
            &state,
            &InputEvent::PointerDown {
                cell: Cell::new(2, 2),
                extend: false,
            },
            &ctx,
        );
        assert_eq!(t.state.active, Some(Cell::new(2, 2)));
        assert!(!t.state.editing);
        assert_eq!(
            t.effects,
            vec![Effect::Commit {
                cell: Cell::new(0, 0),
                value: "v".into()
            }]
        );
    }

    #[test]
    fn test_pointer_extend_and_clamp() {
        let ctx = GridContext::new(3, 3);
        let t = transition(
            &SelectionState::at(Cell::new(0, 0)),
            &InputEvent::PointerDown {
                cell: Cell::new(10, 10),
                extend: true,
            },
            &ctx,
        );
        assert_eq!(t.state.anchor, Some(Cell::new(2, 2)));
        assert_eq!(t.state.active, Some(Cell::new(0, 0)));
    }

    #[test]
    fn test_delete_and_clipboard_effects() {
        let ctx = GridContext::new(3, 3);
        let mut state = SelectionState::at(Cell::new(0, 0));
        state.anchor = Some(Cell::new(1, 2));
        let selection = state.selection().unwrap();

        let t = press(&state, Key::Delete, Modifiers::NONE, &ctx);
        assert_eq!(t.effects, vec![Effect::DeleteSelection { selection }]);
        let t = transition(&state, &InputEvent::Copy, &ctx);
        assert_eq!(t.effects, vec![Effect::Copy { selection }]);

        let mut editing = state.clone();
        editing.editing = true;
        assert!(transition(&editing, &InputEvent::Paste, &ctx).effects.is_empty());
    }

    #[test]
    fn test_ctrl_d_duplicates_selected_rows() {
        let ctx = GridContext::new(3, 4);
        let mut state = SelectionState::at(Cell::new(2, 1));
        state.anchor = Some(Cell::new(0, 0));

        let t = press(&state, Key::Char('d'), Modifiers::CTRL, &ctx);
        assert_eq!(t.effects, vec![Effect::DuplicateRows { rows: 0..2 }]);
        assert_eq!(t.state.active, Some(Cell::new(2, 3)));
        assert_eq!(t.state.anchor, Some(Cell::new(0, 2)));

        let locked = GridContext::new(3, 4).with_locked_rows(true);
        let t = press(&state, Key::Char('d'), Modifiers::CTRL, &locked);
        assert!(t.effects.is_empty());
        assert_eq!(t.state, state);
    }

    #[test]
    fn test_shift_enter_requests_insert() {
        let ctx = GridContext::new(2, 2);
        let t = press(&SelectionState::at(Cell::new(0, 1)), Key::Enter, Modifiers::SHIFT, &ctx);
        assert_eq!(t.effects, vec![Effect::InsertRowAfter { row: 1 }]);

        let locked = GridContext::new(2, 2).with_locked_rows(true);
        let t = press(&SelectionState::at(Cell::new(0, 1)), Key::Enter, Modifiers::SHIFT, &locked);
        assert!(t.effects.is_empty());
    }
}
