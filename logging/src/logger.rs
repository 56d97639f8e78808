use crate::error::{LogError, Result};
use crate::model::{LogLevel, LogRecord};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use sole::{DoubleChecked, InstanceProvider};
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

// The one and only logger, built on its first access.
static INSTANCE: Lazy<DoubleChecked<Logger>> = Lazy::new(|| DoubleChecked::new(Logger::new));

#[derive(Default)]
struct Sink {
  path: Option<PathBuf>,
  writer: Option<BufWriter<File>>,
}

/// A logger that appends formatted records to a single file.
///
/// The logger starts without a target. Until [`Logger::set_log_file`]
/// succeeds, every [`Logger::log`] call fails with
/// [`LogError::NotConfigured`].
pub struct Logger {
  sink: Mutex<Sink>,
}

impl Logger {
  fn new() -> Self {
    Self {
      sink: Mutex::new(Sink::default()),
    }
  }

  /// The process-wide logger.
  pub fn instance() -> Arc<Self> {
    INSTANCE.obtain()
  }

  /// Releases the process-wide logger. It is flushed and closed as soon as
  /// no handle to it remains. The next `instance` call starts with no target
  /// configured.
  pub fn reset_instance() {
    INSTANCE.reset();
  }

  /// Appends one record. Records are buffered until [`Logger::flush`] or
  /// [`Logger::close`].
  pub fn log(&self, level: LogLevel, message: impl Into<String>) -> Result<()> {
    let mut sink = self.sink.lock();
    let writer = sink.writer.as_mut().ok_or(LogError::NotConfigured)?;
    let record = LogRecord::now(level, message);
    writeln!(writer, "{}", record)?;
    Ok(())
  }

  /// Points the logger at `path`, opened in append mode and created if
  /// missing. Any previous target is flushed and closed first.
  ///
  /// On failure a diagnostic is printed and the logger is left without a
  /// target.
  pub fn set_log_file(&self, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref().to_path_buf();
    let mut sink = self.sink.lock();
    Self::close_sink(&mut sink);

    match OpenOptions::new().create(true).append(true).open(&path) {
      Ok(file) => {
        tracing::debug!(path = ?path, "log file opened");
        sink.writer = Some(BufWriter::new(file));
        sink.path = Some(path);
        Ok(())
      }
      Err(source) => {
        eprintln!("[sole_logging:ERROR] Invalid file path {:?}: {}", path, source);
        tracing::error!(path = ?path, error = %source, "failed to open log file");
        sink.path = None;
        Err(LogError::Open { path, source })
      }
    }
  }

  /// The current target, if one has been set successfully.
  pub fn log_file(&self) -> Option<PathBuf> {
    self.sink.lock().path.clone()
  }

  /// Whether `log` would currently succeed.
  pub fn is_configured(&self) -> bool {
    self.sink.lock().writer.is_some()
  }

  /// Writes buffered records to the file. A no-op without a target.
  pub fn flush(&self) -> Result<()> {
    if let Some(writer) = self.sink.lock().writer.as_mut() {
      writer.flush()?;
    }
    Ok(())
  }

  /// Flushes and closes the target. `log` fails again until a new target is
  /// set; `log_file` keeps reporting the last path.
  pub fn close(&self) {
    Self::close_sink(&mut self.sink.lock());
  }

  fn close_sink(sink: &mut Sink) {
    if let Some(mut writer) = sink.writer.take() {
      if let Err(e) = writer.flush() {
        tracing::warn!(error = %e, "failed to flush log file while closing");
      }
    }
  }
}

impl Drop for Logger {
  fn drop(&mut self) {
    Self::close_sink(self.sink.get_mut());
  }
}

impl fmt::Debug for Logger {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let sink = self.sink.lock();
    f.debug_struct("Logger")
      .field("path", &sink.path)
      .field("configured", &sink.writer.is_some())
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;
  use std::fs;

  #[test]
  fn fresh_logger_rejects_records() {
    let logger = Logger::new();
    assert!(!logger.is_configured());
    assert!(matches!(logger.log(LogLevel::Info, "x"), Err(LogError::NotConfigured)));
    assert!(logger.flush().is_ok());
  }

  #[test]
  fn close_keeps_path_but_disables_logging() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    let logger = Logger::new();

    logger.set_log_file(&path).unwrap();
    logger.log(LogLevel::Debug, "one").unwrap();
    logger.close();

    assert_eq!(logger.log_file(), Some(path.clone()));
    assert!(matches!(logger.log(LogLevel::Debug, "two"), Err(LogError::NotConfigured)));
    let written = fs::read_to_string(&path).unwrap();
    assert_eq!(written.lines().count(), 1);
    assert!(written.ends_with("LogLevel: DEBUG Message: one\n"));
  }

  #[test]
  fn dropping_the_logger_flushes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("drop.log");
    {
      let logger = Logger::new();
      logger.set_log_file(&path).unwrap();
      logger.log(LogLevel::Error, "on the way out").unwrap();
    }
    assert!(fs::read_to_string(&path).unwrap().contains("on the way out"));
  }
}
