use crate::error::{ConfigError, Result};
use dashmap::DashMap;
use once_cell::sync::Lazy;
use sole::{DoubleChecked, InstanceProvider};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

// The one and only configuration store, built on its first access.
static INSTANCE: Lazy<DoubleChecked<ConfigurationManager>> =
  Lazy::new(|| DoubleChecked::new(ConfigurationManager::new));

/// String-keyed, string-valued configuration with typed accessors.
///
/// All operations take `&self` and are safe to call from any thread.
pub struct ConfigurationManager {
  properties: DashMap<String, String>,
}

impl ConfigurationManager {
  fn new() -> Self {
    tracing::debug!("configuration store created");
    Self {
      properties: DashMap::new(),
    }
  }

  /// The process-wide store.
  pub fn instance() -> Arc<Self> {
    INSTANCE.obtain()
  }

  /// Releases the process-wide store. Handles obtained earlier stay usable
  /// but are no longer shared with new callers; the store is freed with the
  /// last of them.
  pub fn reset_instance() {
    INSTANCE.reset();
  }

  pub fn get_configuration(&self, key: &str) -> Option<String> {
    self.properties.get(key).map(|value| value.clone())
  }

  /// Reads `key` and parses it as `T`.
  ///
  /// Returns `Ok(None)` when the key is absent and an error when the stored
  /// text does not parse.
  pub fn get_configuration_as<T>(&self, key: &str) -> Result<Option<T>>
  where
    T: FromStr,
    T::Err: fmt::Display,
  {
    let Some(value) = self.get_configuration(key) else {
      return Ok(None);
    };
    value
      .parse::<T>()
      .map(Some)
      .map_err(|e| ConfigError::Conversion {
        key: key.to_owned(),
        reason: e.to_string(),
        value,
        type_name: std::any::type_name::<T>(),
      })
  }

  pub fn set_configuration(&self, key: impl Into<String>, value: impl ToString) {
    let key = key.into();
    tracing::trace!(key = %key, "configuration set");
    self.properties.insert(key, value.to_string());
  }

  /// Sets `key` to `value`, or removes it when `value` is `None`.
  pub fn set_configuration_opt<V: ToString>(&self, key: impl Into<String>, value: Option<V>) {
    let key = key.into();
    match value {
      Some(value) => self.set_configuration(key, value),
      None => {
        self.remove_configuration(&key);
      }
    }
  }

  /// Removes `key`, returning the value it held.
  pub fn remove_configuration(&self, key: &str) -> Option<String> {
    self.properties.remove(key).map(|(_, value)| value)
  }

  pub fn contains(&self, key: &str) -> bool {
    self.properties.contains_key(key)
  }

  pub fn len(&self) -> usize {
    self.properties.len()
  }

  pub fn is_empty(&self) -> bool {
    self.properties.is_empty()
  }

  /// A sorted snapshot of the current keys.
  pub fn keys(&self) -> Vec<String> {
    let mut keys: Vec<String> = self
      .properties
      .iter()
      .map(|entry| entry.key().clone())
      .collect();
    keys.sort();
    keys
  }

  pub fn clear(&self) {
    tracing::debug!(entries = self.properties.len(), "configuration cleared");
    self.properties.clear();
  }
}

impl fmt::Debug for ConfigurationManager {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ConfigurationManager")
      .field("entries", &self.properties.len())
      .finish()
  }
}
