//! Input stream provider: a named file, or stdin when no path is given.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use crate::core::line_store::{LineStore, LoadError};
use crate::error::CenterError;

const STDIN_NAME: &str = "<stdin>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl InputSource {
    pub fn from_arg(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => Self::File(path),
            None => Self::Stdin,
        }
    }

    /// Name used in diagnostics.
    pub fn name(&self) -> String {
        match self {
            Self::Stdin => STDIN_NAME.to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }

    /// Open the stream, load every line, and close it again.
    pub fn load(&self) -> Result<LineStore, CenterError> {
        let store = match self {
            Self::Stdin => {
                LineStore::load(io::stdin().lock()).map_err(|err| self.load_error(err))?
            }
            Self::File(path) => {
                let file = File::open(path).map_err(|source| CenterError::Open {
                    path: self.name(),
                    source,
                })?;
                let mut reader = BufReader::new(file);
                let store = LineStore::load(&mut reader).map_err(|err| self.load_error(err))?;
                close_file(reader.into_inner()).map_err(|source| CenterError::Close {
                    path: self.name(),
                    source,
                })?;
                store
            }
        };

        tracing::info!(source = %self.name(), lines = store.len(), "input loaded");
        Ok(store)
    }

    fn load_error(&self, err: LoadError) -> CenterError {
        match err {
            LoadError::Io(source) => CenterError::Read {
                path: self.name(),
                source,
            },
            LoadError::Allocation(err) => CenterError::Allocation(err),
        }
    }
}

/// Close explicitly so a failing `close(2)` is reported instead of ignored on drop.
fn close_file(file: File) -> io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::fd::IntoRawFd;

        let fd = file.into_raw_fd();
        if unsafe { libc::close(fd) } == -1 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
    #[cfg(not(unix))]
    {
        drop(file);
        Ok(())
    }
}
