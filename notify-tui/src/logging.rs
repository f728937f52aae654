//! File-backed tracing setup. The terminal belongs to the UI, so log lines
//! go to `log_path` instead of stderr.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to open log file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to install tracing subscriber: {0}")]
    Init(String),
}

/// Install the global subscriber. `RUST_LOG` overrides the `info` default.
pub fn init(path: &Path) -> Result<(), LoggingError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))
}
