use sole::{driver, DoubleChecked, Eager, InstanceProvider, Synchronized, Unsynchronized};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

// A resource that announces itself and takes a moment to build.
struct RequestTracker {
  id: usize,
}

impl std::fmt::Display for RequestTracker {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "RequestTracker#{}", self.id)
  }
}

// A global, thread-safe counter to generate unique IDs.
static ID_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn build_tracker() -> RequestTracker {
  let id = ID_COUNTER.fetch_add(1, Ordering::SeqCst);
  println!("Creating RequestTracker {}...", id);
  thread::sleep(Duration::from_millis(10));
  RequestTracker { id }
}

fn report<P>(provider: &P)
where
  P: InstanceProvider<Instance = RequestTracker>,
{
  println!("--- {} ---", provider.strategy());
  let sightings = driver::run(provider, 8).expect("driver run failed");
  for sighting in &sightings {
    println!("{}", sighting);
  }
  println!(
    "{} distinct instance(s) across {} callers\n",
    driver::distinct(&sightings),
    sightings.len()
  );
}

fn main() {
  report(&Unsynchronized::new(build_tracker));
  report(&Eager::from_factory(build_tracker));
  report(&Synchronized::new(build_tracker));
  report(&DoubleChecked::new(build_tracker));
}
