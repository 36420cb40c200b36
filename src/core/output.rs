//! Typed terminal output commands and a single output gate.
//!
//! Invariant: all terminal writes must flow through `OutputGate::flush(..)`.

use std::io;

use crate::core::terminal::Terminal;

pub const CLEAR_SCREEN_HOME: &[u8] = b"\x1b[2J\x1b[H";
pub const HIDE_CURSOR: &[u8] = b"\x1b[?25l";
pub const SHOW_CURSOR: &[u8] = b"\x1b[?25h";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalCmd {
    /// Raw bytes to be written to the terminal.
    Bytes(Vec<u8>),
    /// Static raw bytes to be written to the terminal.
    BytesStatic(&'static [u8]),

    /// Clear the screen and move the cursor to the origin.
    ClearScreen,

    /// Cursor visibility.
    HideCursor,
    ShowCursor,
}

impl TerminalCmd {
    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(data.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            TerminalCmd::Bytes(data) => data,
            TerminalCmd::BytesStatic(data) => data,
            TerminalCmd::ClearScreen => CLEAR_SCREEN_HOME,
            TerminalCmd::HideCursor => HIDE_CURSOR,
            TerminalCmd::ShowCursor => SHOW_CURSOR,
        }
    }
}

/// Concatenate commands into the exact byte stream `OutputGate::flush` would write.
pub fn encode(cmds: &[TerminalCmd]) -> Vec<u8> {
    let mut out = Vec::with_capacity(cmds.iter().map(|cmd| cmd.as_bytes().len()).sum());
    for cmd in cmds {
        out.extend_from_slice(cmd.as_bytes());
    }
    out
}

#[derive(Debug, Default)]
pub struct OutputGate {
    cmds: Vec<TerminalCmd>,
}

impl OutputGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cmd: TerminalCmd) {
        self.cmds.push(cmd);
    }

    pub fn extend<I>(&mut self, cmds: I)
    where
        I: IntoIterator<Item = TerminalCmd>,
    {
        self.cmds.extend(cmds);
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    pub fn clear(&mut self) {
        self.cmds = Vec::new();
    }

    /// Flush buffered commands to the terminal as one write.
    ///
    /// This is the single write gate: `Terminal::write(..)` must not be called
    /// from anywhere else. The queue and its buffer are released even if the write fails.
    pub fn flush<T: Terminal + ?Sized>(&mut self, term: &mut T) -> io::Result<()> {
        let cmds = std::mem::take(&mut self.cmds);
        if cmds.is_empty() {
            return Ok(());
        }
        term.write(&encode(&cmds))
    }
}
