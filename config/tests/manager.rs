use pretty_assertions::assert_eq;
use serial_test::serial;
use sole::Identity;
use sole_config::ConfigurationManager;
use std::sync::Arc;
use std::thread;

// Every test here touches the process-wide store, so they are serialized and
// reset the instance first.

#[test]
#[serial]
fn test_set_then_get_round_trips() {
  ConfigurationManager::reset_instance();
  let config = ConfigurationManager::instance();

  config.set_configuration("k", "v");
  assert_eq!(config.get_configuration("k").as_deref(), Some("v"));

  config.remove_configuration("k");
  assert_eq!(config.get_configuration("k"), None);
}

#[test]
#[serial]
fn test_instance_is_shared_between_threads() {
  ConfigurationManager::reset_instance();
  let identities: Vec<Identity> = thread::scope(|s| {
    let handles: Vec<_> = (0..8)
      .map(|i| {
        s.spawn(move || {
          let config = ConfigurationManager::instance();
          config.set_configuration(format!("worker.{}", i), i);
          Identity::of(&config)
        })
      })
      .collect();
    handles.into_iter().map(|h| h.join().unwrap()).collect()
  });

  assert!(identities.windows(2).all(|w| w[0] == w[1]));
  assert_eq!(ConfigurationManager::instance().len(), 8);
}

#[test]
#[serial]
fn test_reset_yields_a_fresh_store() {
  ConfigurationManager::reset_instance();
  let before = ConfigurationManager::instance();
  before.set_configuration("db.url", "postgres://localhost/app");

  ConfigurationManager::reset_instance();
  let after = ConfigurationManager::instance();

  assert!(!Arc::ptr_eq(&before, &after));
  assert!(after.is_empty());
  // The old handle still works for whoever holds it.
  assert_eq!(
    before.get_configuration("db.url").as_deref(),
    Some("postgres://localhost/app")
  );
}

#[test]
#[serial]
fn test_reset_releases_the_old_store() {
  ConfigurationManager::reset_instance();
  let before = ConfigurationManager::instance();
  assert_eq!(Arc::strong_count(&before), 2);

  ConfigurationManager::reset_instance();

  assert_eq!(Arc::strong_count(&before), 1);
  let weak = Arc::downgrade(&before);
  drop(before);
  assert!(weak.upgrade().is_none());
}

#[test]
#[serial]
fn test_clear_removes_everything() {
  ConfigurationManager::reset_instance();
  let config = ConfigurationManager::instance();
  config.set_configuration("a", 1);
  config.set_configuration("b", 2);

  config.clear();

  assert!(config.is_empty());
  assert_eq!(config.keys(), Vec::<String>::new());
}
