//! Core primitives (line storage, output commands, terminal interface).

pub mod line_store;
pub mod output;
pub mod terminal;
