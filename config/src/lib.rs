//! `sole_config` - a process-wide configuration store.
//!
//! There is exactly one [`ConfigurationManager`] per process. It is built on
//! first use by a [`sole::DoubleChecked`] provider and can be dropped with
//! [`ConfigurationManager::reset_instance`], after which the next
//! [`ConfigurationManager::instance`] call starts from an empty store.
//!
//! ```
//! use sole_config::ConfigurationManager;
//!
//! let config = ConfigurationManager::instance();
//! config.set_configuration("pool.size", 8);
//! assert_eq!(config.get_configuration_as::<u32>("pool.size").unwrap(), Some(8));
//! ```

pub mod error;
mod manager;

pub use error::{ConfigError, Result};
pub use manager::ConfigurationManager;
