//! Process-wide log sink.
//!
//! Installs a `tracing-subscriber` fmt layer that appends plain-text,
//! timestamped lines to a log file. Called once by each binary at startup;
//! library code only emits `tracing` events.

use std::fs::{File, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;
use tracing::Subscriber;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("cannot open log file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("global logger already installed: {0}")]
    AlreadyInstalled(String),
}

/// Build the level filter: `RUST_LOG` wins over the configured level.
pub fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Create the log directory if absent and open the log file for appending.
pub fn open_log_file(config: &LoggingConfig) -> Result<(PathBuf, File), LoggingError> {
    std::fs::create_dir_all(&config.dir).map_err(|source| LoggingError::Io {
        path: config.dir.clone(),
        source,
    })?;

    let path = config.path();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|source| LoggingError::Io {
            path: path.clone(),
            source,
        })?;
    Ok((path, file))
}

/// Plain-text, timestamped subscriber writing one line per event to `file`.
pub fn file_subscriber(default_level: &str, file: File) -> impl Subscriber + Send + Sync {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_level))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .finish()
}

/// Route `tracing` output to the configured log file for the whole process.
///
/// Returns the path of the file being appended to.
pub fn init_file_logging(config: &LoggingConfig) -> Result<PathBuf, LoggingError> {
    let (path, file) = open_log_file(config)?;
    tracing::subscriber::set_global_default(file_subscriber(&config.level, file))
        .map_err(|e| LoggingError::AlreadyInstalled(e.to_string()))?;
    Ok(path)
}
