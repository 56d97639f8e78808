//! `sole_logging` - a process-wide logger that appends to a file.
//!
//! There is exactly one [`Logger`] per process, built on first use by a
//! [`sole::DoubleChecked`] provider. It does nothing useful until it has an
//! output file:
//!
//! ```no_run
//! use sole_logging::{LogLevel, Logger};
//!
//! let logger = Logger::instance();
//! logger.set_log_file("app.log")?;
//! logger.log(LogLevel::Info, "service started")?;
//! logger.flush()?;
//! # Ok::<(), sole_logging::LogError>(())
//! ```

pub mod error;
mod logger;
pub mod model;

pub use error::{LogError, Result};
pub use logger::Logger;
pub use model::{LogLevel, LogRecord};
