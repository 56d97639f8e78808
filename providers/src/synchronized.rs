//! The fully locked lazy provider.

use crate::core::{
  current_thread_name, ConstructionGuard, Factory, InstanceProvider, ProviderState, StateCell,
  Strategy,
};
use crate::Identity;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Lazily constructs on first access, serializing every call through a lock.
///
/// Correctness is total: the check and the construction happen under the
/// same lock, so at most one construction occurs. The price is that every
/// call, including the ones after the instance exists, pays for the lock.
pub struct Synchronized<T> {
  instance: Mutex<Option<Arc<T>>>,
  state: StateCell,
  factory: Factory<T>,
}

impl<T> Synchronized<T> {
  /// Creates a provider that will build its instance with `factory`.
  pub fn new(factory: impl Fn() -> T + Send + Sync + 'static) -> Self {
    Self {
      instance: Mutex::new(None),
      state: StateCell::new(),
      factory: Box::new(factory),
    }
  }

  /// Current lifecycle state. Readable without taking the lock.
  pub fn state(&self) -> ProviderState {
    self.state.load()
  }

  /// Drops the provider's reference and returns it to `Uninitialized`.
  ///
  /// Callers that already hold the old instance keep it.
  pub fn reset(&self) {
    let mut instance = self.instance.lock();
    *instance = None;
    self.state.store(ProviderState::Uninitialized);
  }
}

impl<T: Send + Sync> InstanceProvider for Synchronized<T> {
  type Instance = T;

  fn obtain(&self) -> Arc<T> {
    let mut slot = self.instance.lock();
    if let Some(instance) = slot.as_ref() {
      return Arc::clone(instance);
    }

    tracing::info!(thread = %current_thread_name(), "entering critical section");
    let construction = ConstructionGuard::enter(&self.state);
    let instance = Arc::new((self.factory)());
    *slot = Some(Arc::clone(&instance));
    construction.complete();
    tracing::info!(identity = %Identity::of(&instance), "instance created");
    instance
  }

  fn strategy(&self) -> Strategy {
    Strategy::Synchronized
  }
}

impl<T> fmt::Debug for Synchronized<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Synchronized")
      .field("state", &self.state())
      .finish_non_exhaustive()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::panic::{catch_unwind, AssertUnwindSafe};
  use std::sync::atomic::{AtomicBool, Ordering};

  #[test]
  fn state_moves_from_uninitialized_to_ready() {
    let provider = Synchronized::new(|| 5_i32);
    assert_eq!(provider.state(), ProviderState::Uninitialized);

    let a = provider.obtain();
    assert_eq!(provider.state(), ProviderState::Ready);
    assert!(Arc::ptr_eq(&a, &provider.obtain()));

    provider.reset();
    assert_eq!(provider.state(), ProviderState::Uninitialized);
    assert!(!Arc::ptr_eq(&a, &provider.obtain()));
  }

  #[test]
  fn panicking_factory_releases_the_lock() {
    let fail = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&fail);
    let provider = Synchronized::new(move || {
      if flag.load(Ordering::SeqCst) {
        panic!("cannot connect");
      }
      "connected"
    });

    let first = catch_unwind(AssertUnwindSafe(|| provider.obtain()));
    assert!(first.is_err());
    assert_eq!(provider.state(), ProviderState::Uninitialized);

    fail.store(false, Ordering::SeqCst);
    assert_eq!(*provider.obtain(), "connected");
    assert_eq!(provider.state(), ProviderState::Ready);
  }
}
