//! Runs a batch of concurrent callers against one provider and records which
//! instance each of them received.

use crate::core::InstanceProvider;
use crate::error::{Error, Result};
use crate::Identity;
use parking_lot::{Mutex, RwLock};
use std::any::Any;
use std::collections::HashSet;
use std::env;
use std::fmt;
use std::thread;

/// Number of callers when nothing else is configured.
pub const DEFAULT_CALLERS: usize = 10;

/// Environment variable that overrides the caller count.
pub const CALLERS_ENV: &str = "SOLE_CALLERS";

/// Settings for a driver run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
  pub callers: usize,
}

impl Default for DriverConfig {
  fn default() -> Self {
    Self {
      callers: DEFAULT_CALLERS,
    }
  }
}

impl DriverConfig {
  /// Reads `SOLE_CALLERS`, falling back to the default when it is unset.
  pub fn from_env() -> Result<Self> {
    match env::var(CALLERS_ENV) {
      Ok(raw) => Self::parse(&raw),
      Err(env::VarError::NotPresent) => Ok(Self::default()),
      Err(e) => Err(Error::InvalidCallerCount(format!("{}: {}", CALLERS_ENV, e))),
    }
  }

  /// Parses a caller count. Zero is rejected.
  pub fn parse(raw: &str) -> Result<Self> {
    let callers = raw
      .trim()
      .parse::<usize>()
      .map_err(|e| Error::InvalidCallerCount(format!("{:?}: {}", raw, e)))?;
    validate(callers)?;
    Ok(Self { callers })
  }
}

fn validate(callers: usize) -> Result<()> {
  if callers == 0 {
    return Err(Error::InvalidCallerCount(
      "at least one caller is required".to_string(),
    ));
  }
  Ok(())
}

/// What one caller saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sighting {
  /// Name of the caller thread.
  pub caller: String,
  /// Identity of the instance the caller received.
  pub identity: Identity,
  /// The instance's `Display` rendering.
  pub label: String,
}

impl fmt::Display for Sighting {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} ::: {}", self.label, self.caller)
  }
}

/// Spawns `callers` threads named `Thread-0`, `Thread-1`, ... that each call
/// [`InstanceProvider::obtain`] once.
///
/// All callers are held at a start gate until every thread has been spawned,
/// then released together. Sightings are returned in completion order.
pub fn run<P>(provider: &P, callers: usize) -> Result<Vec<Sighting>>
where
  P: InstanceProvider + ?Sized,
  P::Instance: fmt::Display + Send + Sync + 'static,
{
  validate(callers)?;

  // Instances are held until every caller has finished, so a freed address
  // cannot be handed to a later instance and merge two identities.
  let sightings = Mutex::new(Vec::with_capacity(callers));
  let gate = RwLock::new(());

  thread::scope(|scope| -> Result<()> {
    // Callers block on a read lock until the write lock is dropped. An early
    // return below drops it too, so spawned callers never wait forever.
    let closed = gate.write();
    let mut handles = Vec::with_capacity(callers);

    for index in 0..callers {
      let caller = format!("Thread-{}", index);
      let gate = &gate;
      let sightings = &sightings;
      let handle = thread::Builder::new()
        .name(caller.clone())
        .spawn_scoped(scope, move || {
          drop(gate.read());
          let instance = provider.obtain();
          let sighting = Sighting {
            caller,
            identity: Identity::of(&instance),
            label: instance.to_string(),
          };
          sightings.lock().push((sighting, instance));
        })
        .map_err(Error::Spawn)?;
      handles.push(handle);
    }

    tracing::debug!(callers, strategy = %provider.strategy(), "releasing callers");
    drop(closed);

    // Join every caller before reporting, so no panic goes unobserved.
    let mut outcome = Ok(());
    for handle in handles {
      if let Err(payload) = handle.join() {
        if outcome.is_ok() {
          outcome = Err(Error::CallerPanicked(panic_message(payload.as_ref())));
        }
      }
    }
    outcome
  })?;

  Ok(
    sightings
      .into_inner()
      .into_iter()
      .map(|(sighting, _instance)| sighting)
      .collect(),
  )
}

/// Number of distinct instances across `sightings`.
pub fn distinct(sightings: &[Sighting]) -> usize {
  sightings
    .iter()
    .map(|s| s.identity)
    .collect::<HashSet<_>>()
    .len()
}

/// Convenience for callers that only care about identities.
pub fn identities<P>(provider: &P, callers: usize) -> Result<HashSet<Identity>>
where
  P: InstanceProvider + ?Sized,
  P::Instance: fmt::Display + Send + Sync + 'static,
{
  Ok(run(provider, callers)?.into_iter().map(|s| s.identity).collect())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
  if let Some(message) = payload.downcast_ref::<&str>() {
    (*message).to_string()
  } else if let Some(message) = payload.downcast_ref::<String>() {
    message.clone()
  } else {
    "non-string panic payload".to_string()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;
  use std::sync::Arc;

  #[test]
  fn parse_accepts_positive_counts() {
    assert_eq!(DriverConfig::parse(" 25 ").unwrap().callers, 25);
    assert_eq!(DriverConfig::default().callers, DEFAULT_CALLERS);
  }

  #[test]
  fn parse_rejects_zero_and_garbage() {
    assert!(matches!(DriverConfig::parse("0"), Err(Error::InvalidCallerCount(_))));
    assert!(matches!(DriverConfig::parse("ten"), Err(Error::InvalidCallerCount(_))));
    assert!(matches!(DriverConfig::parse("-3"), Err(Error::InvalidCallerCount(_))));
  }

  #[test]
  fn sighting_renders_identity_then_caller() {
    let instance = Arc::new(String::from("DbConnection@1f"));
    let sighting = Sighting {
      caller: "Thread-3".to_string(),
      identity: Identity::of(&instance),
      label: instance.to_string(),
    };
    assert_eq!(sighting.to_string(), "DbConnection@1f ::: Thread-3");
  }

  #[test]
  fn panic_payloads_are_rendered() {
    assert_eq!(panic_message(&"boom"), "boom");
    assert_eq!(panic_message(&String::from("bang")), "bang");
    assert_eq!(panic_message(&5_u8), "non-string panic payload");
  }
}
