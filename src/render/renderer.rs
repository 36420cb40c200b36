//! Full-frame centered renderer.

use crate::core::line_store::LineStore;
use crate::core::output::TerminalCmd;
use crate::core::terminal::TerminalSize;
use crate::render::layout::{leading_spaces, vertical_padding};

/// Build one complete frame: clear, vertical padding, then every line horizontally centered.
///
/// Output depends only on `store` and `size`, so repeating a render with the same inputs
/// yields byte-identical commands.
pub fn render_centered(store: &LineStore, size: TerminalSize) -> Vec<TerminalCmd> {
    let rows = size.rows as usize;
    let cols = size.cols as usize;

    let mut cmds = Vec::with_capacity(2);
    cmds.push(TerminalCmd::ClearScreen);

    if store.is_empty() {
        return cmds;
    }

    let mut body = vec![b'\n'; vertical_padding(rows, store.len())];
    for (idx, line) in store.iter().enumerate() {
        if idx > 0 {
            body.push(b'\n');
        }
        body.resize(body.len() + leading_spaces(cols, line.len()), b' ');
        body.extend_from_slice(line);
    }
    cmds.push(TerminalCmd::Bytes(body));
    cmds
}
