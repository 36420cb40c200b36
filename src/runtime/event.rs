//! Typed runtime events.

use std::sync::mpsc::Receiver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// The terminal window changed size. Dimensions are those observed when the signal
    /// arrived; the redraw queries again.
    Resize { rows: u16, cols: u16 },
    /// The user asked the program to stop.
    Interrupt,
}

/// Collapse a batch of queued events into the single one worth dispatching.
///
/// An interrupt anywhere in the batch wins; otherwise the latest resize.
pub fn coalesce<I>(events: I) -> Option<Event>
where
    I: IntoIterator<Item = Event>,
{
    let mut latest = None;
    for event in events {
        if event == Event::Interrupt {
            return Some(Event::Interrupt);
        }
        latest = Some(event);
    }
    latest
}

/// Block for the next event, then fold in whatever else is already queued.
///
/// Returns `None` once every sender is gone.
pub fn next_coalesced(events: &Receiver<Event>) -> Option<Event> {
    let first = events.recv().ok()?;
    coalesce(std::iter::once(first).chain(events.try_iter()))
}
