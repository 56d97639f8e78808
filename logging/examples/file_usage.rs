// examples/file_usage.rs

use sole_logging::{LogLevel, Logger};
use std::thread;

fn main() -> sole_logging::Result<()> {
  let path = std::env::temp_dir().join("sole_logging.example.log");

  // 1. Logging before a target is set is an error, not a silent no-op.
  let logger = Logger::instance();
  if let Err(e) = logger.log(LogLevel::Info, "too early") {
    println!("Expected failure: {}", e);
  }

  // 2. Configure the target once; every thread shares the same logger.
  logger.set_log_file(&path)?;

  let handles: Vec<_> = (0..4)
    .map(|thread_id| {
      thread::spawn(move || {
        let logger = Logger::instance();
        for i in 1..=3 {
          logger
            .log(LogLevel::Info, format!("Thread {} | message #{}", thread_id, i))
            .expect("logger is configured");
        }
      })
    })
    .collect();
  for handle in handles {
    handle.join().expect("logging thread panicked");
  }

  logger.flush()?;
  logger.close();
  println!("Wrote records to {}", path.display());
  Ok(())
}
