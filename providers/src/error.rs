use thiserror::Error;

/// The main error type for the `sole` crate.
#[derive(Debug, Error)]
pub enum Error {
  #[error("Invalid caller count: {0}")]
  InvalidCallerCount(String),

  #[error("Failed to spawn caller thread: {0}")]
  Spawn(#[source] std::io::Error),

  #[error("Caller thread panicked: {0}")]
  CallerPanicked(String),

  #[error("Unknown strategy selection: {0}")]
  UnknownStrategy(u32),
}

/// A specialized `Result` type for `sole` operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
