//! In-memory line store.
//!
//! Invariants:
//! - records keep input order
//! - each record is an independently owned byte buffer sized to its content, without its
//!   line terminator
//! - the backing sequence only grows while loading and is never mutated afterwards

use std::collections::TryReserveError;
use std::io::{self, BufRead};

use thiserror::Error;

/// Upper bound on the bytes kept for a single record. Longer lines are truncated.
pub const MAX_LINE_LEN: usize = 4096;

/// Initial capacity of the record sequence before the first growth step.
pub const INITIAL_CAPACITY: usize = 1;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("read failed")]
    Io(#[from] io::Error),
    #[error("allocation failed")]
    Allocation(#[from] TryReserveError),
}

#[derive(Debug)]
pub struct LineStore {
    lines: Vec<Box<[u8]>>,
}

impl LineStore {
    pub fn new() -> Self {
        Self {
            lines: Vec::with_capacity(INITIAL_CAPACITY),
        }
    }

    /// Read every record from `reader` until end-of-stream.
    ///
    /// A final record without a trailing newline is still kept.
    pub fn load<R: BufRead>(reader: R) -> Result<Self, LoadError> {
        Self::load_with_limit(reader, MAX_LINE_LEN)
    }

    pub(crate) fn load_with_limit<R: BufRead>(
        mut reader: R,
        max_len: usize,
    ) -> Result<Self, LoadError> {
        let mut store = Self::new();
        let mut record = Vec::new();

        loop {
            record.clear();
            let truncated = read_record(&mut reader, &mut record, max_len)?;
            if record.is_empty() && !truncated {
                break;
            }
            let content = strip_terminator(&record);
            store.push(&content[..content.len().min(max_len)])?;
        }

        tracing::debug!(
            lines = store.len(),
            capacity = store.capacity(),
            "line store loaded"
        );
        Ok(store)
    }

    fn push(&mut self, content: &[u8]) -> Result<(), TryReserveError> {
        if self.lines.len() == self.lines.capacity() {
            self.lines.try_reserve(1)?;
        }

        let mut owned = Vec::new();
        owned.try_reserve_exact(content.len())?;
        owned.extend_from_slice(content);
        self.lines.push(owned.into_boxed_slice());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.lines.capacity()
    }

    pub fn get(&self, index: usize) -> Option<&[u8]> {
        self.lines.get(index).map(|line| &line[..])
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &[u8]> + '_ {
        self.lines.iter().map(|line| &line[..])
    }

    /// Lossy UTF-8 view of every record, mostly useful in tests and logs.
    pub fn lines(&self) -> Vec<String> {
        self.iter()
            .map(|line| String::from_utf8_lossy(line).into_owned())
            .collect()
    }
}

impl Default for LineStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Read one newline-terminated record into `out`, keeping at most `max_len + 1` bytes so a
/// record of exactly `max_len` content bytes keeps its newline.
///
/// Bytes past the limit are consumed up to and including the next newline and dropped.
/// Returns whether anything was dropped, so a truncated record that happens to leave
/// `out` empty (`max_len == 0`) is not mistaken for end-of-stream.
fn read_record<R: BufRead>(
    reader: &mut R,
    out: &mut Vec<u8>,
    max_len: usize,
) -> io::Result<bool> {
    let mut truncated = false;

    loop {
        let available = match reader.fill_buf() {
            Ok(buf) => buf,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        };
        if available.is_empty() {
            return Ok(truncated);
        }

        let (chunk, done) = match available.iter().position(|&byte| byte == b'\n') {
            Some(idx) => (&available[..=idx], true),
            None => (available, false),
        };

        let room = (max_len + 1).saturating_sub(out.len());
        if chunk.len() > room {
            out.extend_from_slice(&chunk[..room]);
            truncated = true;
        } else {
            out.extend_from_slice(chunk);
        }

        let consumed = chunk.len();
        reader.consume(consumed);
        if done {
            return Ok(truncated);
        }
    }
}

fn strip_terminator(record: &[u8]) -> &[u8] {
    let Some(content) = record.strip_suffix(b"\n") else {
        return record;
    };
    content.strip_suffix(b"\r").unwrap_or(content)
}

#[cfg(test)]
mod tests {
    use super::{strip_terminator, LineStore, MAX_LINE_LEN};
    use std::io::{self, BufRead, BufReader, Read};

    fn load(input: &str) -> LineStore {
        LineStore::load(input.as_bytes()).expect("load from slice")
    }

    #[test]
    fn keeps_records_in_order_without_terminators() {
        let store = load("a\nbb\nccc\n");
        assert_eq!(store.len(), 3);
        assert_eq!(store.lines(), vec!["a", "bb", "ccc"]);
    }

    #[test]
    fn empty_stream_yields_empty_store() {
        let store = load("");
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert!(store.capacity() >= 1);
    }

    #[test]
    fn final_record_without_newline_is_kept() {
        let store = load("first\nsecond");
        assert_eq!(store.lines(), vec!["first", "second"]);
    }

    #[test]
    fn blank_lines_are_records() {
        let store = load("\n\nx\n\n");
        assert_eq!(store.lines(), vec!["", "", "x", ""]);
    }

    #[test]
    fn crlf_terminator_is_stripped() {
        let store = load("one\r\ntwo\r\n");
        assert_eq!(store.lines(), vec!["one", "two"]);
        assert_eq!(strip_terminator(b"lone\r"), b"lone\r");
    }

    #[test]
    fn non_utf8_bytes_are_stored_verbatim() {
        let store = LineStore::load(&b"\xff\xfe\n"[..]).expect("load bytes");
        assert_eq!(store.get(0), Some(&b"\xff\xfe"[..]));
    }

    #[test]
    fn records_own_exactly_their_content() {
        let store = load("abc\nde\n");
        let first = store.get(0).expect("first record");
        let second = store.get(1).expect("second record");
        assert_eq!(first, b"abc");
        assert_eq!(second, b"de");
        assert_ne!(first.as_ptr(), second.as_ptr());
    }

    #[test]
    fn long_line_is_truncated_and_next_record_starts_after_newline() {
        let store = LineStore::load_with_limit("abcdefgh\nxy\n".as_bytes(), 3).expect("load");
        assert_eq!(store.lines(), vec!["abc", "xy"]);
    }

    #[test]
    fn long_final_line_without_newline_is_truncated() {
        let store = LineStore::load_with_limit("abcd".as_bytes(), 3).expect("load");
        assert_eq!(store.lines(), vec!["abc"]);
    }

    #[test]
    fn line_exactly_at_limit_is_not_truncated() {
        let line = "x".repeat(MAX_LINE_LEN);
        let input = format!("{line}\nnext\n");
        let store = load(&input);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(0).map(<[u8]>::len), Some(MAX_LINE_LEN));
        assert_eq!(store.get(1), Some(&b"next"[..]));
    }

    #[test]
    fn truncation_across_small_reader_chunks() {
        let input = format!("{}\nend", "y".repeat(MAX_LINE_LEN * 3));
        let reader = BufReader::with_capacity(7, input.as_bytes());
        let store = LineStore::load(reader).expect("load chunked");
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(0).map(<[u8]>::len), Some(MAX_LINE_LEN));
        assert_eq!(store.get(1), Some(&b"end"[..]));
    }

    #[test]
    fn capacity_grows_to_hold_every_record() {
        let input: String = (0..1000).map(|i| format!("line {i}\n")).collect();
        let store = load(&input);
        assert_eq!(store.len(), 1000);
        assert!(store.capacity() >= store.len());
        assert_eq!(store.get(999), Some(&b"line 999"[..]));
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("disk on fire"))
        }
    }

    #[test]
    fn read_error_is_reported() {
        let reader: Box<dyn BufRead> = Box::new(BufReader::new(FailingReader));
        let err = LineStore::load(reader).expect_err("read must fail");
        assert!(matches!(err, super::LoadError::Io(_)));
    }
}
