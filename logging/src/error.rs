use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the `sole_logging` library.
#[derive(Debug, Error)]
pub enum LogError {
  #[error("Logger is not initialized; call set_log_file() first")]
  NotConfigured,

  #[error("Invalid file path {path:?}: {source}")]
  Open {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Failed to write log record: {0}")]
  Write(#[from] std::io::Error),

  #[error("Unknown log level: {0}")]
  UnknownLevel(String),
}

/// A specialized `Result` type for `sole_logging` operations.
pub type Result<T, E = LogError> = std::result::Result<T, E>;
