use sole::connection;
use sole::driver::DriverConfig;
use std::io;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_thread_names(true)
    .with_writer(io::stderr)
    .init();
}

fn main() {
  init_tracing();

  // The eager connection exists before any caller thread can ask for it.
  connection::init();

  let config = DriverConfig::from_env().unwrap_or_else(|e| {
    tracing::warn!(error = %e, "ignoring caller count override");
    DriverConfig::default()
  });

  let stdin = io::stdin();
  let stdout = io::stdout();
  if let Err(e) = sole_cli::run(&mut stdin.lock(), &mut stdout.lock(), config) {
    println!("{}", e);
  }
}
