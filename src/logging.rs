//! Diagnostic logging.
//!
//! Stdout carries the rendered frame and stderr the fatal diagnostic, so log records only
//! ever go to the file named by `CENTERLINE_LOG`.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing::Level;

use crate::config::EnvConfig;
use crate::error::CenterError;

/// Install the global file subscriber if a log path is configured.
///
/// Returns whether a subscriber was installed by this call.
pub fn init(config: &EnvConfig) -> Result<bool, CenterError> {
    let Some(path) = config.log_path.as_ref() else {
        return Ok(false);
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| CenterError::Logging {
            path: path.display().to_string(),
            source,
        })?;

    let installed = tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_max_level(parse_level(&config.log_level))
        .with_target(false)
        .try_init()
        .is_ok();
    Ok(installed)
}

/// Level by name (`error`..`trace`, case-insensitive), falling back to `info`.
pub fn parse_level(name: &str) -> Level {
    name.trim().parse().unwrap_or(Level::INFO)
}
