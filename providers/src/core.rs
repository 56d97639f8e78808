//! Core types shared by every provider: the provider trait, strategies,
//! instance identity and the construction state machine.

use crate::error::Error;
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// A boxed factory, stored the same way for every lazy provider.
pub(crate) type Factory<T> = Box<dyn Fn() -> T + Send + Sync>;

/// Something that hands out a shared instance.
pub trait InstanceProvider: Send + Sync {
  /// The type of the shared instance.
  type Instance;

  /// Returns the shared instance, constructing it first if the strategy requires.
  fn obtain(&self) -> Arc<Self::Instance>;

  /// The concurrency strategy this provider implements.
  fn strategy(&self) -> Strategy;
}

/// The four ways of producing a single shared instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
  /// Check-then-act with no coordination. Races are possible.
  Unsynchronized,
  /// Built before any caller can reach the provider.
  Eager,
  /// Every call goes through the provider's lock.
  Synchronized,
  /// Unlocked fast path, then lock and re-check.
  DoubleChecked,
}

impl Strategy {
  /// All strategies, in menu order.
  pub const ALL: [Strategy; 4] = [
    Strategy::Unsynchronized,
    Strategy::Eager,
    Strategy::Synchronized,
    Strategy::DoubleChecked,
  ];

  /// The number this strategy is selected with in the demo menu.
  pub fn menu_number(self) -> u32 {
    match self {
      Strategy::Unsynchronized => 1,
      Strategy::Eager => 2,
      Strategy::Synchronized => 3,
      Strategy::DoubleChecked => 4,
    }
  }

  /// Short human label, as shown in the menu.
  pub fn label(self) -> &'static str {
    match self {
      Strategy::Unsynchronized => "Basic",
      Strategy::Eager => "Eager Loading",
      Strategy::Synchronized => "Lazy Initialization",
      Strategy::DoubleChecked => "Double Checked Locking",
    }
  }

  /// Line printed before a demo run.
  pub fn banner(self) -> &'static str {
    match self {
      Strategy::Unsynchronized => "Executing Basic Singleton Implementation...",
      Strategy::Eager => "Executing Eager Loading Implementation...",
      Strategy::Synchronized => "Executing Lazy Initialization implementation using a lock...",
      Strategy::DoubleChecked => "Executing double check locking Implementation...",
    }
  }

  /// Whether every caller is guaranteed to observe the same instance.
  pub fn is_race_free(self) -> bool {
    !matches!(self, Strategy::Unsynchronized)
  }
}

impl fmt::Display for Strategy {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

impl TryFrom<u32> for Strategy {
  type Error = Error;

  fn try_from(value: u32) -> Result<Self, Self::Error> {
    Strategy::ALL
      .into_iter()
      .find(|strategy| strategy.menu_number() == value)
      .ok_or(Error::UnknownStrategy(value))
  }
}

/// Reference identity of a shared instance: the address of its allocation.
///
/// Two handles are the same instance exactly when their identities are equal,
/// regardless of whether the values compare equal.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity(usize);

impl Identity {
  /// The identity of the instance behind `instance`.
  pub fn of<T: ?Sized>(instance: &Arc<T>) -> Self {
    Self(Arc::as_ptr(instance) as *const () as usize)
  }

  /// The identity of a value that lives at its final address.
  pub fn of_ref<T>(value: &T) -> Self {
    Self(value as *const T as usize)
  }
}

impl fmt::Display for Identity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:x}", self.0)
  }
}

impl fmt::Debug for Identity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Identity({:#x})", self.0)
  }
}

/// Where a lazy provider is in its construct-once lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ProviderState {
  /// Nothing built yet, or reset since.
  Uninitialized = 0,
  /// A caller holds the lock and is running the factory.
  Constructing = 1,
  /// The instance is published.
  Ready = 2,
}

/// Lock-free readable holder for a [`ProviderState`]. Written only under the
/// owning provider's lock.
#[derive(Debug)]
pub(crate) struct StateCell(AtomicU8);

impl StateCell {
  pub(crate) const fn new() -> Self {
    Self(AtomicU8::new(ProviderState::Uninitialized as u8))
  }

  pub(crate) fn load(&self) -> ProviderState {
    match self.0.load(Ordering::Acquire) {
      1 => ProviderState::Constructing,
      2 => ProviderState::Ready,
      _ => ProviderState::Uninitialized,
    }
  }

  pub(crate) fn store(&self, state: ProviderState) {
    self.0.store(state as u8, Ordering::Release);
  }
}

/// An RAII guard around one run of a factory.
///
/// Entering moves the state to `Constructing`. If the factory unwinds before
/// [`ConstructionGuard::complete`] is called, dropping the guard puts the
/// state back to `Uninitialized` so the next caller can try again.
pub(crate) struct ConstructionGuard<'a> {
  state: &'a StateCell,
  completed: bool,
}

impl<'a> ConstructionGuard<'a> {
  pub(crate) fn enter(state: &'a StateCell) -> Self {
    state.store(ProviderState::Constructing);
    Self {
      state,
      completed: false,
    }
  }

  pub(crate) fn complete(mut self) {
    self.completed = true;
    self.state.store(ProviderState::Ready);
  }
}

impl Drop for ConstructionGuard<'_> {
  fn drop(&mut self) {
    if !self.completed {
      tracing::warn!("factory unwound before publishing; provider returns to uninitialized");
      self.state.store(ProviderState::Uninitialized);
    }
  }
}

/// Name of the calling thread, for log events.
pub(crate) fn current_thread_name() -> String {
  let thread = std::thread::current();
  match thread.name() {
    Some(name) => name.to_owned(),
    None => format!("{:?}", thread.id()),
  }
}
