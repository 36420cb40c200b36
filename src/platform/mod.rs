//! Platform-specific terminal integrations.

pub mod input;
pub mod process_terminal;
#[cfg(unix)]
pub mod signals;

pub use input::InputSource;
pub use process_terminal::ProcessTerminal;
#[cfg(unix)]
pub use signals::{install_panic_hook, install_signal_events, HookTerminal, SignalHookGuard};
