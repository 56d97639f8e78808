//! The double-checked locking provider.
//!
//! 1. Load the slot without the lock. If an instance is there, return it.
//! 2. Otherwise take the lock and load again: another caller may have
//!    finished construction between our first load and the lock.
//! 3. Construct only if the slot is still empty, then publish.
//!
//! Step 1 is only sound because publication goes through an atomic pointer:
//! the slot is stored with `Release` after the instance is fully built and
//! loaded with `Acquire` on the fast path. A plain field read there could see
//! a non-null pointer to memory whose initialization is not yet visible.
//! `ArcSwapOption` gives exactly that pairing, and frees a replaced instance
//! as soon as its last reader lets go of it.

use crate::core::{
  current_thread_name, ConstructionGuard, Factory, InstanceProvider, ProviderState, StateCell,
  Strategy,
};
use crate::Identity;
use arc_swap::ArcSwapOption;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Lazily constructs on first access; the lock is taken only while the
/// instance does not exist yet.
pub struct DoubleChecked<T> {
  slot: ArcSwapOption<T>,
  lock: Mutex<()>,
  state: StateCell,
  factory: Factory<T>,
}

impl<T> DoubleChecked<T> {
  /// Creates a provider that will build its instance with `factory`.
  pub fn new(factory: impl Fn() -> T + Send + Sync + 'static) -> Self {
    Self {
      slot: ArcSwapOption::empty(),
      lock: Mutex::new(()),
      state: StateCell::new(),
      factory: Box::new(factory),
    }
  }

  /// Current lifecycle state. Readable without taking the lock.
  pub fn state(&self) -> ProviderState {
    self.state.load()
  }

  /// Returns the instance only if it has already been published.
  pub fn get(&self) -> Option<Arc<T>> {
    self.slot.load_full()
  }

  /// Empties the slot and returns to `Uninitialized`.
  ///
  /// The provider's reference to the old instance is released. Callers that
  /// still hold it keep it alive; otherwise it is dropped here.
  pub fn reset(&self) {
    let _lock = self.lock.lock();
    self.slot.store(None);
    self.state.store(ProviderState::Uninitialized);
  }
}

impl<T: Send + Sync> InstanceProvider for DoubleChecked<T> {
  type Instance = T;

  fn obtain(&self) -> Arc<T> {
    // First check, no lock. Acquire pairs with the Release in `store`.
    if let Some(instance) = self.slot.load_full() {
      return instance;
    }

    let _lock = self.lock.lock();
    // Second check, under the lock.
    if let Some(instance) = self.slot.load_full() {
      return instance;
    }

    tracing::info!(thread = %current_thread_name(), "entering critical section");
    let construction = ConstructionGuard::enter(&self.state);
    let instance = Arc::new((self.factory)());
    self.slot.store(Some(Arc::clone(&instance)));
    construction.complete();
    tracing::info!(identity = %Identity::of(&instance), "instance created");
    instance
  }

  fn strategy(&self) -> Strategy {
    Strategy::DoubleChecked
  }
}

impl<T> fmt::Debug for DoubleChecked<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("DoubleChecked")
      .field("state", &self.state())
      .finish_non_exhaustive()
  }
}
