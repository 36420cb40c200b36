//! Signal-to-event bridge and crash cleanup hooks.
//!
//! Signals are received on a dedicated `signal-hook` thread and forwarded as typed
//! [`Event`]s over a channel; no application code runs in signal-handler context.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::core::output::SHOW_CURSOR;
use crate::core::terminal::TerminalSize;
use crate::error::CenterError;
use crate::runtime::event::Event;

use libc::{self, c_int};
use signal_hook::iterator::Signals;

/// Stops the signal thread on drop.
pub struct SignalHookGuard {
    handle: signal_hook::iterator::Handle,
    thread: Option<JoinHandle<()>>,
}

impl Drop for SignalHookGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

fn signal_to_event<P>(signal: c_int, probe: &P) -> Option<Event>
where
    P: Fn() -> io::Result<TerminalSize>,
{
    match signal {
        libc::SIGWINCH => {
            // The runtime re-queries before drawing; a failed probe surfaces there.
            let size = probe().unwrap_or_else(|err| {
                tracing::warn!(error = %err, "size probe failed after SIGWINCH");
                TerminalSize::default()
            });
            Some(Event::Resize {
                rows: size.rows,
                cols: size.cols,
            })
        }
        libc::SIGINT => Some(Event::Interrupt),
        _ => None,
    }
}

/// Forward SIGWINCH as [`Event::Resize`] and SIGINT as [`Event::Interrupt`] to `sender`.
///
/// `probe` reads the terminal size when a resize arrives.
pub fn install_signal_events<P>(
    sender: Sender<Event>,
    probe: P,
) -> Result<SignalHookGuard, CenterError>
where
    P: Fn() -> io::Result<TerminalSize> + Send + 'static,
{
    let mut signals =
        Signals::new([libc::SIGWINCH, libc::SIGINT]).map_err(CenterError::SignalRegistration)?;
    let handle = signals.handle();

    let thread = thread::Builder::new()
        .name("centerline-signals".to_string())
        .spawn(move || {
            for signal in signals.forever() {
                let Some(event) = signal_to_event(signal, &probe) else {
                    continue;
                };
                tracing::debug!(?event, "signal received");
                if sender.send(event).is_err() {
                    break;
                }
            }
        })
        .map_err(CenterError::SignalRegistration)?;

    Ok(SignalHookGuard {
        handle,
        thread: Some(thread),
    })
}

fn run_cleanup_once<F>(cleanup: &F, ran: &AtomicBool)
where
    F: Fn() + ?Sized,
{
    if !ran.swap(true, Ordering::SeqCst) {
        cleanup();
    }
}

/// Install a panic hook that runs `cleanup` once, then delegates to the previous hook.
pub fn install_panic_hook<F>(cleanup: F)
where
    F: Fn() + Send + Sync + 'static,
{
    let ran = Arc::new(AtomicBool::new(false));
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        run_cleanup_once(&cleanup, &ran);
        previous(info);
    }));
}

/// Minimal terminal writer for panic cleanup.
///
/// Best-effort: never panics, never blocks, writes to the controlling TTY.
pub struct HookTerminal {
    fd: c_int,
}

impl HookTerminal {
    pub fn new() -> Self {
        let flags = libc::O_WRONLY | libc::O_NONBLOCK | libc::O_NOCTTY | libc::O_CLOEXEC;
        let fd = unsafe { libc::open(c"/dev/tty".as_ptr(), flags) };
        Self { fd }
    }

    pub fn write_best_effort(&self, data: &[u8]) {
        if self.fd < 0 || data.is_empty() {
            return;
        }

        let mut written = 0;
        while written < data.len() {
            let remaining = &data[written..];
            let result = unsafe {
                libc::write(
                    self.fd,
                    remaining.as_ptr() as *const libc::c_void,
                    remaining.len(),
                )
            };
            if result > 0 {
                written = written.saturating_add(result as usize);
                continue;
            }
            if result < 0 && io::Error::last_os_error().kind() == io::ErrorKind::Interrupted {
                continue;
            }
            break;
        }
    }

    /// Make the cursor visible again.
    pub fn restore_cursor(&self) {
        self.write_best_effort(SHOW_CURSOR);
    }
}

impl Default for HookTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for HookTerminal {
    fn drop(&mut self) {
        if self.fd >= 0 {
            unsafe {
                libc::close(self.fd);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{mpsc, Arc, Mutex, OnceLock};
    use std::time::Duration;

    use super::{install_panic_hook, install_signal_events, run_cleanup_once, signal_to_event};
    use crate::core::terminal::TerminalSize;
    use crate::runtime::event::Event;

    fn signal_test_lock() -> std::sync::MutexGuard<'static, ()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    #[test]
    fn sigwinch_maps_to_resize_with_probed_size() {
        let probe = || -> io::Result<TerminalSize> { Ok(TerminalSize::new(40, 120)) };
        let event = signal_to_event(libc::SIGWINCH, &probe);
        assert_eq!(event, Some(Event::Resize { rows: 40, cols: 120 }));
    }

    #[test]
    fn failed_probe_still_reports_resize() {
        let probe = || -> io::Result<TerminalSize> { Err(io::Error::other("no tty")) };
        let event = signal_to_event(libc::SIGWINCH, &probe);
        assert_eq!(event, Some(Event::Resize { rows: 0, cols: 0 }));
    }

    #[test]
    fn sigint_maps_to_interrupt() {
        let probe = || -> io::Result<TerminalSize> { unreachable!("no probe for SIGINT") };
        assert_eq!(signal_to_event(libc::SIGINT, &probe), Some(Event::Interrupt));
        assert_eq!(signal_to_event(libc::SIGUSR1, &probe), None);
    }

    #[test]
    fn raised_sigwinch_is_forwarded_as_event() {
        let _lock = signal_test_lock();
        let (tx, rx) = mpsc::channel();
        let guard = install_signal_events(tx, || Ok(TerminalSize::new(9, 33)))
            .expect("install signal events");

        unsafe {
            libc::raise(libc::SIGWINCH);
        }

        let event = rx
            .recv_timeout(Duration::from_secs(5))
            .expect("resize event");
        assert_eq!(event, Event::Resize { rows: 9, cols: 33 });
        drop(guard);
    }

    #[test]
    fn cleanup_runs_once() {
        let count = AtomicUsize::new(0);
        let ran = AtomicBool::new(false);
        let cleanup = || {
            count.fetch_add(1, Ordering::SeqCst);
        };
        run_cleanup_once(&cleanup, &ran);
        run_cleanup_once(&cleanup, &ran);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn panic_hook_runs_cleanup_once() {
        let _lock = signal_test_lock();
        let original = std::panic::take_hook();
        // Quiet base hook so the panic below doesn't print.
        std::panic::set_hook(Box::new(|_| {}));

        let cleaned = Arc::new(AtomicUsize::new(0));
        install_panic_hook({
            let cleaned = Arc::clone(&cleaned);
            move || {
                cleaned.fetch_add(1, Ordering::SeqCst);
            }
        });

        let _ = std::panic::catch_unwind(|| {
            panic!("boom");
        });
        let _ = std::panic::catch_unwind(|| {
            panic!("boom again");
        });

        std::panic::set_hook(original);
        assert_eq!(cleaned.load(Ordering::SeqCst), 1);
    }
}
