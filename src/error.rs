//! Fatal error taxonomy.
//!
//! Every variant is unrecoverable: the binary reports it on stderr as a single line and
//! exits non-zero.

use std::collections::TryReserveError;
use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CenterError {
    #[error("failed to allocate memory")]
    Allocation(#[from] TryReserveError),

    #[error("failed to open '{path}'")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to read '{path}'")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to close '{path}'")]
    Close {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to get terminal size")]
    TerminalSize(#[source] io::Error),

    #[error("failed to install signal handler")]
    SignalRegistration(#[source] io::Error),

    #[error("failed to write to terminal")]
    Write(#[source] io::Error),

    #[error("failed to open log file '{path}'")]
    Logging {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl CenterError {
    /// One-line diagnostic: the failed operation followed by the OS reason, if any.
    pub fn diagnostic(&self) -> String {
        match std::error::Error::source(self) {
            Some(source) => format!("{self}: {source}"),
            None => self.to_string(),
        }
    }
}
