//! Centering arithmetic. Widths are byte lengths.

/// Blank lines emitted above the block. Zero when the block does not fit.
pub fn vertical_padding(rows: usize, line_count: usize) -> usize {
    rows.saturating_sub(line_count) / 2
}

/// Right-justification field width that centers a line of `len` bytes in `cols` columns.
pub fn field_width(cols: usize, len: usize) -> usize {
    cols.saturating_add(len) / 2
}

/// Spaces printed before a line of `len` bytes.
///
/// Equals `(cols - len) / 2` when the line fits. A line wider than the terminal overflows
/// its field and gets no padding, like a printf `%*s` that never truncates.
pub fn leading_spaces(cols: usize, len: usize) -> usize {
    field_width(cols, len).saturating_sub(len)
}
