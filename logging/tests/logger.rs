use pretty_assertions::assert_eq;
use serial_test::serial;
use sole::Identity;
use sole_logging::{LogError, LogLevel, Logger};
use std::fs;
use std::sync::Arc;
use std::thread;

// All tests share the process-wide logger; each one resets it first.

fn fresh_logger() -> Arc<Logger> {
  Logger::reset_instance();
  Logger::instance()
}

#[test]
#[serial]
fn test_log_before_target_fails_every_time() {
  let logger = fresh_logger();
  for level in LogLevel::ALL {
    let result = logger.log(level, "nobody will read this");
    assert!(matches!(result, Err(LogError::NotConfigured)), "level = {}", level);
  }
  assert_eq!(logger.log_file(), None);
}

#[test]
#[serial]
fn test_records_are_appended_in_line_format() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("service.log");
  fs::write(&path, "existing line\n").unwrap();

  let logger = fresh_logger();
  logger.set_log_file(&path).unwrap();
  logger.log(LogLevel::Info, "started").unwrap();
  logger.log(LogLevel::Fatal, "stopped").unwrap();
  logger.flush().unwrap();

  let contents = fs::read_to_string(&path).unwrap();
  let lines: Vec<&str> = contents.lines().collect();
  assert_eq!(lines.len(), 3);
  assert_eq!(lines[0], "existing line");
  assert!(lines[1].starts_with("DateTime: "));
  assert!(lines[1].ends_with(" LogLevel: INFO Message: started"));
  assert!(lines[2].ends_with(" LogLevel: FATAL Message: stopped"));
  assert_eq!(logger.log_file(), Some(path));
}

#[test]
#[serial]
fn test_open_failure_leaves_logger_unconfigured() {
  let dir = tempfile::tempdir().unwrap();
  let good = dir.path().join("good.log");
  let bad = dir.path().join("missing-dir").join("bad.log");

  let logger = fresh_logger();
  logger.set_log_file(&good).unwrap();
  assert!(logger.is_configured());

  let result = logger.set_log_file(&bad);
  match result {
    Err(LogError::Open { path, .. }) => assert_eq!(path, bad),
    other => panic!("expected an open error, got {:?}", other),
  }
  assert!(!logger.is_configured());
  assert_eq!(logger.log_file(), None);
  assert!(matches!(logger.log(LogLevel::Warn, "lost"), Err(LogError::NotConfigured)));

  // Reconfiguring with a usable path recovers.
  logger.set_log_file(&good).unwrap();
  logger.log(LogLevel::Warn, "recovered").unwrap();
  logger.flush().unwrap();
  assert!(fs::read_to_string(&good).unwrap().contains("Message: recovered"));
}

#[test]
#[serial]
fn test_reset_yields_a_new_logger() {
  let dir = tempfile::tempdir().unwrap();
  let before = fresh_logger();
  before.set_log_file(dir.path().join("a.log")).unwrap();

  Logger::reset_instance();
  let after = Logger::instance();

  assert_ne!(Identity::of(&before), Identity::of(&after));
  assert!(!after.is_configured());
  assert!(before.is_configured());
}

#[test]
#[serial]
fn test_reset_flushes_records_once_the_last_handle_is_gone() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("reset.log");

  let logger = fresh_logger();
  logger.set_log_file(&path).unwrap();
  logger.log(LogLevel::Info, "buffered record").unwrap();
  drop(logger);

  Logger::reset_instance();

  let contents = fs::read_to_string(&path).unwrap();
  assert!(contents.ends_with("LogLevel: INFO Message: buffered record\n"), "{:?}", contents);
}

#[test]
#[serial]
fn test_reset_leaves_old_handle_as_sole_owner() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("held.log");

  let before = fresh_logger();
  before.set_log_file(&path).unwrap();
  Logger::reset_instance();

  assert_eq!(Arc::strong_count(&before), 1);
  before.log(LogLevel::Warn, "still writable").unwrap();
  drop(before);
  assert!(fs::read_to_string(&path).unwrap().contains("Message: still writable"));
}

#[test]
#[serial]
fn test_threads_share_one_logger_and_one_file() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("threads.log");
  let logger = fresh_logger();
  logger.set_log_file(&path).unwrap();

  let identities: Vec<Identity> = thread::scope(|s| {
    let handles: Vec<_> = (0..6)
      .map(|t| {
        s.spawn(move || {
          let logger = Logger::instance();
          for i in 0..5 {
            logger.log(LogLevel::Debug, format!("t{} m{}", t, i)).unwrap();
          }
          Identity::of(&logger)
        })
      })
      .collect();
    handles.into_iter().map(|h| h.join().unwrap()).collect()
  });

  logger.flush().unwrap();
  assert!(identities.iter().all(|id| *id == Identity::of(&logger)));
  assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 30);
}
