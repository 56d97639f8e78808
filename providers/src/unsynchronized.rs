//! The basic, uncoordinated provider.
//!
//! In absence of a lock, two callers can interleave so that both see an empty
//! slot, both construct, and both store. Each walks away with a different
//! instance. This provider keeps that behavior on purpose: it is the
//! reference point the other strategies are compared against.
//!
//! The slot is still published atomically. A plain shared field would turn the
//! logical race into a data race, which Rust does not allow. What survives is
//! exactly the check-then-act window: no lock, no compare-and-swap.
//! An overwritten instance is freed once the caller that built it lets go.

use crate::core::{Factory, InstanceProvider, Strategy};
use arc_swap::ArcSwapOption;
use std::fmt;
use std::sync::Arc;

/// Lazily constructs on first access with no coordination between callers.
///
/// NOT race free: concurrent callers may observe distinct instances.
pub struct Unsynchronized<T> {
  slot: ArcSwapOption<T>,
  factory: Factory<T>,
}

impl<T> Unsynchronized<T> {
  /// Creates a provider that will build its instance with `factory`.
  pub fn new(factory: impl Fn() -> T + Send + Sync + 'static) -> Self {
    Self {
      slot: ArcSwapOption::empty(),
      factory: Box::new(factory),
    }
  }

  /// Whether an instance is currently stored.
  pub fn is_initialized(&self) -> bool {
    self.slot.load().is_some()
  }

  /// Forgets the stored instance. The next `obtain` constructs a new one.
  pub fn reset(&self) {
    self.slot.store(None);
  }
}

impl<T: Send + Sync> InstanceProvider for Unsynchronized<T> {
  type Instance = T;

  fn obtain(&self) -> Arc<T> {
    if let Some(instance) = self.slot.load_full() {
      return instance;
    }
    // Race window: other callers can pass the check above before the store
    // below lands, and the last store wins.
    let instance = Arc::new((self.factory)());
    tracing::debug!(
      thread = %crate::core::current_thread_name(),
      identity = %crate::Identity::of(&instance),
      "unsynchronized provider constructed an instance"
    );
    self.slot.store(Some(Arc::clone(&instance)));
    instance
  }

  fn strategy(&self) -> Strategy {
    Strategy::Unsynchronized
  }
}

impl<T> fmt::Debug for Unsynchronized<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Unsynchronized")
      .field("initialized", &self.is_initialized())
      .finish_non_exhaustive()
  }
}
