//! # Sole
//!
//! Four ways of handing out exactly one shared instance of a resource to
//! concurrent callers, side by side.
//!
//! ## Core Concepts
//!
//! - **Provider**: anything implementing [`InstanceProvider`]. Its single
//!   operation, `obtain`, returns the shared instance as an `Arc<T>`.
//! - **Identity**: instances are compared by reference, see [`Identity`].
//! - **Strategies**:
//!   - [`Unsynchronized`]: check-then-act with no lock. Concurrent callers
//!     may each build their own instance. Kept racy on purpose.
//!   - [`Eager`]: built before anyone can ask for it.
//!   - [`Synchronized`]: every call goes through a lock.
//!   - [`DoubleChecked`]: unlocked fast path, lock and re-check on a miss.
//!     The fast path relies on acquire/release publication of the instance.
//! - **Driver**: [`driver::run`] spawns a batch of callers against one
//!   provider and reports what each of them saw.
//!
//! ## Quick Start
//!
//! ```
//! use sole::{DoubleChecked, Identity, InstanceProvider};
//!
//! struct Connection;
//!
//! let provider = DoubleChecked::new(|| Connection);
//!
//! let a = provider.obtain();
//! let b = provider.obtain();
//! assert_eq!(Identity::of(&a), Identity::of(&b));
//! ```

pub mod connection;
mod core;
pub mod driver;
mod double_checked;
mod eager;
pub mod error;
mod synchronized;
mod unsynchronized;

pub use crate::core::{Identity, InstanceProvider, ProviderState, Strategy};
pub use double_checked::DoubleChecked;
pub use eager::Eager;
pub use error::{Error, Result};
pub use synchronized::Synchronized;
pub use unsynchronized::Unsynchronized;
