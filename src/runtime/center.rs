//! Center runtime.
//!
//! Owns the loaded lines, the terminal, and the output gate. Events are dispatched one at a
//! time on the caller's thread, so a redraw and the interrupt cleanup never overlap.

use std::ops::ControlFlow;
use std::sync::mpsc::Receiver;

use crate::core::line_store::LineStore;
use crate::core::output::{OutputGate, TerminalCmd};
use crate::core::terminal::Terminal;
use crate::error::CenterError;
use crate::render::render_centered;
use crate::runtime::event::{next_coalesced, Event};

/// Exit status after an interrupt. Failure, matching the historical behavior of the tool.
pub const INTERRUPT_EXIT_CODE: i32 = libc::EXIT_FAILURE;

/// Exit status when the event source goes away without an interrupt.
pub const DISCONNECT_EXIT_CODE: i32 = libc::EXIT_SUCCESS;

pub struct CenterRuntime<T: Terminal> {
    terminal: T,
    output: OutputGate,
    store: Option<LineStore>,
    cursor_hidden: bool,
    stopped: bool,
}

impl<T: Terminal> CenterRuntime<T> {
    pub fn new(terminal: T, store: LineStore) -> Self {
        Self {
            terminal,
            output: OutputGate::new(),
            store: Some(store),
            cursor_hidden: false,
            stopped: false,
        }
    }

    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut T {
        &mut self.terminal
    }

    /// Loaded lines; `None` once cleanup has released them.
    pub fn store(&self) -> Option<&LineStore> {
        self.store.as_ref()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Hide the cursor and draw the first frame.
    pub fn start(&mut self) -> Result<(), CenterError> {
        self.output.push(TerminalCmd::HideCursor);
        self.cursor_hidden = true;
        self.redraw()
    }

    /// Query the terminal size and draw every line centered. No-op after cleanup.
    pub fn redraw(&mut self) -> Result<(), CenterError> {
        let Some(store) = self.store.as_ref() else {
            return Ok(());
        };

        let size = self.terminal.size().map_err(CenterError::TerminalSize)?;
        tracing::debug!(
            rows = size.rows,
            cols = size.cols,
            lines = store.len(),
            "redraw"
        );
        self.output.extend(render_centered(store, size));
        self.flush_output()
    }

    /// Dispatch one event. `Break` carries the exit status once the runtime has stopped.
    pub fn handle_event(&mut self, event: Event) -> Result<ControlFlow<i32>, CenterError> {
        match event {
            Event::Resize { rows, cols } => {
                tracing::debug!(rows, cols, "resize notification");
                self.redraw()?;
                Ok(ControlFlow::Continue(()))
            }
            Event::Interrupt => {
                tracing::info!("interrupt received");
                self.cleanup_and_exit().map(ControlFlow::Break)
            }
        }
    }

    /// Restore the cursor and release the line store, returning the status the process
    /// should exit with. Safe to call more than once.
    pub fn cleanup_and_exit(&mut self) -> Result<i32, CenterError> {
        self.stopped = true;
        self.store = None;
        self.restore_cursor()?;
        Ok(INTERRUPT_EXIT_CODE)
    }

    /// Dispatch events until an interrupt arrives or every sender is dropped.
    ///
    /// Resizes already queued behind the current one are folded into a single redraw.
    pub fn run(&mut self, events: &Receiver<Event>) -> Result<i32, CenterError> {
        while let Some(event) = next_coalesced(events) {
            if let ControlFlow::Break(code) = self.handle_event(event)? {
                return Ok(code);
            }
        }

        tracing::info!("event source closed");
        self.cleanup_and_exit()?;
        Ok(DISCONNECT_EXIT_CODE)
    }

    fn restore_cursor(&mut self) -> Result<(), CenterError> {
        if !self.cursor_hidden {
            return Ok(());
        }
        // A half-queued frame is dropped; the cursor must come back regardless.
        self.output.clear();
        self.output.push(TerminalCmd::ShowCursor);
        self.cursor_hidden = false;
        self.flush_output()
    }

    fn flush_output(&mut self) -> Result<(), CenterError> {
        self.output
            .flush(&mut self.terminal)
            .map_err(CenterError::Write)
    }
}

impl<T: Terminal> Drop for CenterRuntime<T> {
    fn drop(&mut self) {
        if !self.cursor_hidden {
            return;
        }

        // Best-effort cleanup: never panic in Drop (especially during unwind).
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _ = self.restore_cursor();
        }));
    }
}
