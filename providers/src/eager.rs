//! The eager provider: the instance exists before the provider does.

use crate::core::{InstanceProvider, Strategy};
use std::fmt;
use std::sync::Arc;

/// Holds an instance that was built when the provider was constructed.
///
/// There is no check-then-act window, so no lock is needed: `obtain` is a
/// reference-count increment.
pub struct Eager<T> {
  instance: Arc<T>,
}

impl<T> Eager<T> {
  /// Wraps an already constructed instance.
  pub fn new(instance: T) -> Self {
    Self {
      instance: Arc::new(instance),
    }
  }

  /// Runs `factory` right now and keeps the result.
  pub fn from_factory(factory: impl FnOnce() -> T) -> Self {
    let provider = Self::new(factory());
    tracing::info!(
      identity = %crate::Identity::of(&provider.instance),
      "eager instance created"
    );
    provider
  }
}

impl<T: Send + Sync> InstanceProvider for Eager<T> {
  type Instance = T;

  fn obtain(&self) -> Arc<T> {
    Arc::clone(&self.instance)
  }

  fn strategy(&self) -> Strategy {
    Strategy::Eager
  }
}

impl<T: fmt::Debug> fmt::Debug for Eager<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Eager")
      .field("instance", &self.instance)
      .finish()
  }
}
