use crate::error::LogError;
use chrono::{Local, NaiveDateTime};
use std::fmt;
use std::str::FromStr;

/// Severity attached to each record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LogLevel {
  Trace,
  Debug,
  Info,
  Warn,
  Error,
  Fatal,
  Off,
}

impl LogLevel {
  pub const ALL: [LogLevel; 7] = [
    LogLevel::Trace,
    LogLevel::Debug,
    LogLevel::Info,
    LogLevel::Warn,
    LogLevel::Error,
    LogLevel::Fatal,
    LogLevel::Off,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      LogLevel::Trace => "TRACE",
      LogLevel::Debug => "DEBUG",
      LogLevel::Info => "INFO",
      LogLevel::Warn => "WARN",
      LogLevel::Error => "ERROR",
      LogLevel::Fatal => "FATAL",
      LogLevel::Off => "OFF",
    }
  }
}

impl fmt::Display for LogLevel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for LogLevel {
  type Err = LogError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let wanted = s.trim();
    LogLevel::ALL
      .into_iter()
      .find(|level| level.as_str().eq_ignore_ascii_case(wanted))
      .ok_or_else(|| LogError::UnknownLevel(s.to_string()))
  }
}

/// One line of the log file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
  /// Local wall-clock time the record was created.
  pub timestamp: NaiveDateTime,
  pub level: LogLevel,
  pub message: String,
}

impl LogRecord {
  /// Creates a record stamped with the current local time.
  pub fn now<S: Into<String>>(level: LogLevel, message: S) -> Self {
    Self::new(Local::now().naive_local(), level, message)
  }

  pub fn new<S: Into<String>>(timestamp: NaiveDateTime, level: LogLevel, message: S) -> Self {
    LogRecord {
      timestamp,
      level,
      message: message.into(),
    }
  }
}

/// `DateTime: <ISO-8601 local time> LogLevel: <LEVEL> Message: <message>`
impl fmt::Display for LogRecord {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "DateTime: {} LogLevel: {} Message: {}",
      self.timestamp.format("%Y-%m-%dT%H:%M:%S%.f"),
      self.level,
      self.message
    )
  }
}
