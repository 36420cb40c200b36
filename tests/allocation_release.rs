//! Interrupt cleanup must leave no line-store allocation behind.
//!
//! Allocations are counted per thread so the harness's own threads don't disturb the tally.

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;
use std::io;
use std::ops::ControlFlow;

use centerline::{CenterRuntime, Event, LineStore, Terminal, TerminalSize};

struct CountingAlloc;

thread_local! {
    static LIVE_BYTES: Cell<isize> = const { Cell::new(0) };
}

fn track(delta: isize) {
    let _ = LIVE_BYTES.try_with(|live| live.set(live.get() + delta));
}

fn live_bytes() -> isize {
    LIVE_BYTES.with(Cell::get)
}

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            track(layout.size() as isize);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        track(-(layout.size() as isize));
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = System.realloc(ptr, layout, new_size);
        if !new_ptr.is_null() {
            track(new_size as isize - layout.size() as isize);
        }
        new_ptr
    }
}

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

/// Terminal writing into a buffer reserved up front, so output never allocates.
struct FixedTerminal {
    buf: Vec<u8>,
    size: TerminalSize,
}

impl FixedTerminal {
    fn new(rows: u16, cols: u16) -> Self {
        Self {
            buf: Vec::with_capacity(1 << 16),
            size: TerminalSize::new(rows, cols),
        }
    }
}

impl Terminal for FixedTerminal {
    fn write(&mut self, data: &[u8]) -> io::Result<()> {
        if self.buf.len() + data.len() > self.buf.capacity() {
            return Err(io::Error::other("fixed terminal buffer full"));
        }
        self.buf.extend_from_slice(data);
        Ok(())
    }

    fn size(&self) -> io::Result<TerminalSize> {
        Ok(self.size)
    }
}

/// Load, draw, resize, interrupt. Returns live bytes (after load, after cleanup) relative
/// to the moment before loading, plus the terminal output.
fn session(input: &[u8]) -> (isize, isize, Vec<u8>) {
    let terminal = FixedTerminal::new(12, 40);

    let before = live_bytes();
    let store = LineStore::load(input).expect("load");
    let loaded = live_bytes() - before;

    let mut runtime = CenterRuntime::new(terminal, store);
    runtime.start().expect("start");
    runtime
        .handle_event(Event::Resize { rows: 12, cols: 40 })
        .expect("resize");
    let flow = runtime.handle_event(Event::Interrupt).expect("interrupt");
    assert!(matches!(flow, ControlFlow::Break(_)));
    let after_cleanup = live_bytes() - before;

    let output = runtime.terminal().buf.clone();
    (loaded, after_cleanup, output)
}

#[test]
fn interrupt_releases_every_line_store_allocation() {
    // Warm-up: first use of logging callsites and other lazies may allocate once.
    let _ = session(b"warm\nup\n");

    let input: Vec<u8> = (0..500)
        .flat_map(|i| format!("record number {i}\n").into_bytes())
        .collect();
    let (loaded, after_cleanup, output) = session(&input);

    assert!(loaded > 0, "loading must allocate");
    assert_eq!(after_cleanup, 0, "outstanding bytes after cleanup");
    assert!(output.ends_with(b"\x1b[?25h"), "cursor restored last");
}
