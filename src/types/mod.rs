//! Data types shared by the grid engine.

mod cell;
mod column;
mod operation;
mod selection;
mod sticky;

pub use cell::*;
pub use column::*;
pub use operation::*;
pub use selection::*;
pub use sticky::*;
