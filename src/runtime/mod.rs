//! Runtime (event dispatch, redraw, cleanup).

pub mod center;
pub mod event;

pub use center::{CenterRuntime, DISCONNECT_EXIT_CODE, INTERRUPT_EXIT_CODE};
pub use event::{coalesce, Event};
