//! Terminal trait and dimension snapshot.

use std::io;

/// Rows and columns reported by the environment at the moment of the query.
///
/// Never cached across redraws: the terminal may have changed size in between.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TerminalSize {
    pub rows: u16,
    pub cols: u16,
}

impl TerminalSize {
    pub fn new(rows: u16, cols: u16) -> Self {
        Self { rows, cols }
    }
}

/// Minimal terminal interface used by the render loop.
pub trait Terminal {
    /// Write raw bytes (content and control sequences) to the terminal.
    fn write(&mut self, data: &[u8]) -> io::Result<()>;

    /// Query the current dimensions.
    fn size(&self) -> io::Result<TerminalSize>;
}
