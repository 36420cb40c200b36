//! Environment configuration.

use std::env;
use std::path::PathBuf;

pub const LOG_ENV: &str = "CENTERLINE_LOG";
pub const LOG_LEVEL_ENV: &str = "CENTERLINE_LOG_LEVEL";
pub const WRITE_LOG_ENV: &str = "CENTERLINE_WRITE_LOG";

const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone)]
pub struct EnvConfig {
    /// Diagnostic log file. Logging is off without it.
    pub log_path: Option<PathBuf>,
    pub log_level: String,
    /// File receiving a copy of every byte written to the terminal.
    pub write_log: Option<PathBuf>,
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self {
            log_path: env_string_opt(LOG_ENV).map(PathBuf::from),
            log_level: env_string_opt(LOG_LEVEL_ENV)
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            write_log: env_string_opt(WRITE_LOG_ENV).map(PathBuf::from),
        }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            log_path: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            write_log: None,
        }
    }
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}
