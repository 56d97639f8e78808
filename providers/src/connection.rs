//! The demo resource handle and its process-wide providers.

use crate::core::{InstanceProvider, Strategy};
use crate::{DoubleChecked, Eager, Synchronized, Unsynchronized};
use once_cell::sync::Lazy;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SERIAL: AtomicU64 = AtomicU64::new(0);

/// An opaque database connection handle. Only its identity matters.
#[derive(Debug)]
pub struct DbConnection {
  serial: u64,
}

impl DbConnection {
  /// Opens a new connection. Every call yields a distinct serial number.
  pub fn open() -> Self {
    let serial = NEXT_SERIAL.fetch_add(1, Ordering::Relaxed);
    tracing::debug!(serial, "opening DbConnection");
    Self { serial }
  }

  /// Process-unique, monotonically assigned serial number.
  pub fn serial(&self) -> u64 {
    self.serial
  }
}

/// Renders as `DbConnection@<address>`. The address is the instance's
/// [`Identity`](crate::Identity) once it lives behind an `Arc`.
impl fmt::Display for DbConnection {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "DbConnection@{}", crate::Identity::of_ref(self))
  }
}

// One provider per strategy, each owned by this module for the whole process.
static UNSYNCHRONIZED: Lazy<Unsynchronized<DbConnection>> =
  Lazy::new(|| Unsynchronized::new(DbConnection::open));
static EAGER: Lazy<Eager<DbConnection>> = Lazy::new(|| Eager::from_factory(DbConnection::open));
static SYNCHRONIZED: Lazy<Synchronized<DbConnection>> =
  Lazy::new(|| Synchronized::new(DbConnection::open));
static DOUBLE_CHECKED: Lazy<DoubleChecked<DbConnection>> =
  Lazy::new(|| DoubleChecked::new(DbConnection::open));

/// Builds the eager connection. Call once at startup, before any caller
/// thread exists; [`provider`] also forces it.
pub fn init() {
  Lazy::force(&EAGER);
}

/// The process-wide connection provider for `strategy`.
pub fn provider(strategy: Strategy) -> &'static dyn InstanceProvider<Instance = DbConnection> {
  match strategy {
    Strategy::Unsynchronized => &*UNSYNCHRONIZED,
    Strategy::Eager => &*EAGER,
    Strategy::Synchronized => &*SYNCHRONIZED,
    Strategy::DoubleChecked => &*DOUBLE_CHECKED,
  }
}

/// Returns every lazy connection provider to its uninitialized state.
///
/// Intended for tests. The eager connection is not affected.
pub fn reset_lazy() {
  UNSYNCHRONIZED.reset();
  SYNCHRONIZED.reset();
  DOUBLE_CHECKED.reset();
}
