use thiserror::Error;

/// The main error type for the `sole_config` crate.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("Cannot convert '{key}' = {value:?} to {type_name}: {reason}")]
  Conversion {
    key: String,
    value: String,
    type_name: &'static str,
    reason: String,
  },
}

/// A specialized `Result` type for `sole_config` operations.
pub type Result<T, E = ConfigError> = std::result::Result<T, E>;
