//! Active cell / selection state machine and keyboard semantics.

mod engine;
mod keys;
mod setters;

pub use engine::{transition, Effect, ExitDirection, GridContext, SelectionState, Transition};
pub use keys::{InputEvent, Key, Modifiers};
pub use setters::{set_active_cell, set_selection};
