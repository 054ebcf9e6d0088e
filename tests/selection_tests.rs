//! Tests for keyboard and pointer selection driven as event sequences
//!
//! Each test replays a short user interaction through `transition` and checks
//! the resulting state and the effects the grid owner would carry out.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use sheetgrid::selection::{
    transition, Effect, ExitDirection, GridContext, InputEvent, Key, Modifiers, SelectionState,
};
use sheetgrid::{Cell, Direction, Selection};

/// Apply `events` in order, collecting every effect.
fn replay(ctx: &GridContext<'_>, start: SelectionState, events: &[InputEvent]) -> (SelectionState, Vec<Effect>) {
    events.iter().fold((start, Vec::new()), |(state, mut effects), event| {
        let next = transition(&state, event, ctx);
        effects.extend(next.effects);
        (next.state, effects)
    })
}

fn arrow(direction: Direction) -> InputEvent {
    InputEvent::key(Key::Arrow(direction))
}

fn click(col: usize, row: usize) -> InputEvent {
    InputEvent::PointerDown {
        cell: Cell::new(col, row),
        extend: false,
    }
}

#[test]
fn test_type_then_enter_commits_and_moves_down() {
    let ctx = GridContext::new(3, 3);
    let (state, effects) = replay(
        &ctx,
        SelectionState::default(),
        &[
            click(1, 0),
            InputEvent::key(Key::Char('4')),
            InputEvent::EditorInput { value: "42".into() },
            InputEvent::key(Key::Enter),
        ],
    );

    assert_eq!(state.active, Some(Cell::new(1, 1)));
    assert!(!state.editing);
    assert_eq!(
        effects,
        vec![
            Effect::BeginEdit {
                cell: Cell::new(1, 0),
                initial: Some("4".into()),
            },
            Effect::Commit {
                cell: Cell::new(1, 0),
                value: "42".into(),
            },
            Effect::ScrollIntoView {
                cell: Cell::new(1, 1),
            },
        ]
    );
}

#[test]
fn test_escape_discards_edit() {
    let ctx = GridContext::new(2, 2);
    let (state, effects) = replay(
        &ctx,
        SelectionState::at(Cell::new(0, 0)),
        &[
            InputEvent::key(Key::Enter),
            InputEvent::EditorInput { value: "draft".into() },
            InputEvent::key(Key::Escape),
        ],
    );
    assert_eq!(state, SelectionState::at(Cell::new(0, 0)));
    assert!(!effects.iter().any(|e| matches!(e, Effect::Commit { .. })));
    assert_eq!(
        effects.last(),
        Some(&Effect::CancelEdit {
            cell: Cell::new(0, 0)
        })
    );
}

#[test]
fn test_opening_and_closing_editor_without_input_commits_nothing() {
    let ctx = GridContext::new(2, 2);
    let (_, effects) = replay(
        &ctx,
        SelectionState::at(Cell::new(1, 1)),
        &[InputEvent::key(Key::Enter), InputEvent::CommitEdit],
    );
    assert_eq!(effects.len(), 1);
    assert!(matches!(effects[0], Effect::BeginEdit { initial: None, .. }));
}

#[test]
fn test_shift_arrows_extend_from_anchor() {
    let ctx = GridContext::new(5, 5);
    let (state, _) = replay(
        &ctx,
        SelectionState::at(Cell::new(1, 1)),
        &[
            InputEvent::key_with(Key::Arrow(Direction::Right), Modifiers::SHIFT),
            InputEvent::key_with(Key::Arrow(Direction::Down), Modifiers::SHIFT),
            InputEvent::key_with(Key::Arrow(Direction::Down), Modifiers::CTRL_SHIFT),
        ],
    );
    assert_eq!(state.active, Some(Cell::new(1, 1)));
    assert_eq!(
        state.selection(),
        Some(Selection::from_corners(Cell::new(1, 1), Cell::new(2, 4)))
    );
    assert!(state.is_selected(Cell::new(2, 3)));
    assert!(!state.is_selected(Cell::new(3, 3)));

    // A plain arrow collapses the range.
    let (state, _) = replay(&ctx, state, &[arrow(Direction::Left)]);
    assert_eq!(state.active, Some(Cell::new(0, 1)));
    assert_eq!(state.anchor, None);
}

#[test]
fn test_arrows_clamp_at_edges() {
    let ctx = GridContext::new(2, 2);
    let (state, effects) = replay(
        &ctx,
        SelectionState::at(Cell::new(0, 0)),
        &[arrow(Direction::Up), arrow(Direction::Left)],
    );
    assert_eq!(state.active, Some(Cell::new(0, 0)));
    assert!(effects
        .iter()
        .all(|e| *e == Effect::ScrollIntoView { cell: Cell::new(0, 0) }));
}

#[test]
fn test_tab_walks_reading_order_and_exits() {
    let ctx = GridContext::new(2, 2);
    let tab = InputEvent::key(Key::Tab);
    let (state, effects) = replay(
        &ctx,
        SelectionState::at(Cell::new(0, 0)),
        &[tab.clone(), tab.clone(), tab.clone(), tab],
    );
    assert_eq!(state.active, None);
    assert_eq!(
        effects.last(),
        Some(&Effect::ExitGrid {
            direction: ExitDirection::Forward
        })
    );

    let back = InputEvent::key_with(Key::Tab, Modifiers::SHIFT);
    let (state, effects) = replay(&ctx, SelectionState::at(Cell::new(0, 1)), &[back.clone(), back.clone(), back]);
    assert_eq!(state.active, None);
    assert_eq!(
        effects,
        vec![
            Effect::ScrollIntoView {
                cell: Cell::new(1, 0)
            },
            Effect::ScrollIntoView {
                cell: Cell::new(0, 0)
            },
            Effect::ExitGrid {
                direction: ExitDirection::Backward
            },
        ]
    );
}

#[test]
fn test_tab_while_editing_commits_first() {
    let ctx = GridContext::new(3, 1);
    let (state, effects) = replay(
        &ctx,
        SelectionState::at(Cell::new(0, 0)),
        &[
            InputEvent::key(Key::Char('x')),
            InputEvent::key(Key::Tab),
        ],
    );
    assert_eq!(state.active, Some(Cell::new(1, 0)));
    assert_eq!(
        effects[1],
        Effect::Commit {
            cell: Cell::new(0, 0),
            value: "x".into()
        }
    );
}

#[test]
fn test_disabled_cell_cannot_be_edited() {
    let disabled = |cell: Cell| cell.col == 0;
    let ctx = GridContext::new(2, 2).with_disabled(&disabled);
    let (state, effects) = replay(
        &ctx,
        SelectionState::default(),
        &[
            InputEvent::DoubleClick {
                cell: Cell::new(0, 1),
            },
            InputEvent::key(Key::Char('a')),
            InputEvent::key(Key::Enter),
        ],
    );
    assert_eq!(state.active, Some(Cell::new(0, 1)));
    assert!(!state.editing);
    assert!(effects.is_empty());
}

#[test]
fn test_shift_click_extends_and_clipboard_targets_range() {
    let ctx = GridContext::new(4, 4);
    let (state, effects) = replay(
        &ctx,
        SelectionState::default(),
        &[
            click(3, 3),
            InputEvent::PointerDown {
                cell: Cell::new(1, 2),
                extend: true,
            },
            InputEvent::Copy,
        ],
    );
    let selection = Selection::from_corners(Cell::new(1, 2), Cell::new(3, 3));
    assert_eq!(state.selection(), Some(selection));
    assert_eq!(effects, vec![Effect::Copy { selection }]);
}

#[test]
fn test_ctrl_a_then_delete() {
    let ctx = GridContext::new(3, 4);
    let (state, effects) = replay(
        &ctx,
        SelectionState::at(Cell::new(1, 1)),
        &[
            InputEvent::key_with(Key::Char('a'), Modifiers::CTRL),
            InputEvent::key(Key::Delete),
        ],
    );
    let everything = Selection::from_corners(Cell::new(0, 0), Cell::new(2, 3));
    assert_eq!(state.selection(), Some(everything));
    assert_eq!(
        effects,
        vec![Effect::DeleteSelection {
            selection: everything
        }]
    );
}

#[test]
fn test_enter_on_last_row() {
    let start = SelectionState::at(Cell::new(0, 1));
    let events = [InputEvent::key(Key::Char('z')), InputEvent::key(Key::Enter)];

    // Without auto-add the active cell stays put.
    let (state, effects) = replay(&GridContext::new(1, 2), start.clone(), &events);
    assert_eq!(state.active, Some(Cell::new(0, 1)));
    assert!(!effects.iter().any(|e| matches!(e, Effect::InsertRowAfter { .. })));

    let ctx = GridContext::new(1, 2).with_auto_add_row(true);
    let (state, effects) = replay(&ctx, start.clone(), &events);
    assert_eq!(state.active, Some(Cell::new(0, 2)));
    assert!(effects.contains(&Effect::InsertRowAfter { row: 1 }));

    // Locked rows win over auto-add.
    let ctx = GridContext::new(1, 2)
        .with_auto_add_row(true)
        .with_locked_rows(true);
    let (state, effects) = replay(&ctx, start, &events);
    assert_eq!(state.active, Some(Cell::new(0, 1)));
    assert!(!effects.iter().any(|e| matches!(e, Effect::InsertRowAfter { .. })));
}

#[test]
fn test_events_from_json() {
    let events: Vec<InputEvent> = serde_json::from_str(
        r#"[
            {"type": "pointerDown", "cell": {"col": 1, "row": 0}},
            {"type": "doubleClick", "cell": {"col": 1, "row": 0}},
            {"type": "editorInput", "value": "hi"},
            {"type": "commitEdit"}
        ]"#,
    )
    .unwrap();
    let (_, effects) = replay(&GridContext::new(2, 2), SelectionState::default(), &events);

    let json = serde_json::to_value(&effects).unwrap();
    assert_eq!(json[1]["type"], "commit");
    assert_eq!(json[1]["value"], "hi");
}

#[test]
fn test_empty_grid_ignores_pointer() {
    let ctx = GridContext::new(0, 0);
    let (state, effects) = replay(&ctx, SelectionState::default(), &[click(0, 0)]);
    assert_eq!(state, SelectionState::default());
    assert!(effects.is_empty());
}
