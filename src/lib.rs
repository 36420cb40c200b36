//! Show text centered in the terminal and keep it centered across resizes.
//!
//! Invariant: single output gate: only `core::output::OutputGate::flush(..)` writes to the
//! terminal.
//!
//! # Public API Overview
//! - Load input into a [`LineStore`] (via [`InputSource`] or any `BufRead`).
//! - Drive a [`CenterRuntime`] over any [`Terminal`]: `start`, then feed it [`Event`]s.
//! - [`render_centered`] builds a single frame without touching a terminal.
//! - On Unix, [`install_signal_events`] turns SIGWINCH/SIGINT into [`Event`]s.

pub mod config;
pub mod error;
pub mod logging;

pub mod core;
pub mod platform;
pub mod render;
pub mod runtime;

pub use crate::config::EnvConfig;
pub use crate::error::CenterError;

/// Line storage.
pub use crate::core::line_store::{LineStore, LoadError, MAX_LINE_LEN};
/// Output commands and terminal interface.
pub use crate::core::output::{OutputGate, TerminalCmd};
pub use crate::core::terminal::{Terminal, TerminalSize};

/// Frame construction and centering arithmetic.
pub use crate::render::layout::{field_width, leading_spaces, vertical_padding};
pub use crate::render::render_centered;

/// Runtime and events.
pub use crate::runtime::{
    CenterRuntime, Event, DISCONNECT_EXIT_CODE, INTERRUPT_EXIT_CODE,
};

/// Process-backed terminal, input provider, and signal bridge.
pub use crate::platform::{InputSource, ProcessTerminal};
#[cfg(unix)]
pub use crate::platform::{install_panic_hook, install_signal_events, HookTerminal, SignalHookGuard};
