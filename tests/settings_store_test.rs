//! Settings Store Integration Tests
//!
//! Covers the store lifecycle end to end:
//! - Lazy load and first-run default seeding
//! - Typed get/set with default fallback and coercion leniency
//! - Dirty-flag-gated saves and atomic file replacement
//! - Reset-to-defaults semantics
//! - Concurrent access

mod common;

use common::TestFixture;
use greenhouse_core::{defaults, Error};
use serde_json::json;
use std::sync::Arc;
use std::thread;

// =============================================================================
// Lazy Load and Defaults
// =============================================================================

#[test]
fn test_missing_file_loads_builtin_defaults() {
    let fixture = TestFixture::new();

    fixture.store.load().unwrap();

    let interval: u32 = fixture
        .store
        .get(defaults::REFRESH_INTERVAL_SECONDS, 0)
        .unwrap();
    assert_eq!(interval, 60);
    assert!(fixture.store.is_loaded());
    assert!(!fixture.store.is_dirty());
}

#[test]
fn test_first_get_triggers_load() {
    let fixture = TestFixture::new();
    assert!(!fixture.store.is_loaded());

    let enabled: bool = fixture
        .store
        .get(defaults::ENABLE_NOTIFICATIONS, false)
        .unwrap();

    assert!(enabled);
    assert!(fixture.store.is_loaded());
}

#[test]
fn test_blank_file_treated_as_first_run() {
    let fixture = TestFixture::new();
    fixture.write_config("  \n\t ");

    fixture.store.load().unwrap();

    let interval: u32 = fixture
        .store
        .get(defaults::REFRESH_INTERVAL_SECONDS, 0)
        .unwrap();
    assert_eq!(interval, 60);
}

#[test]
fn test_partial_file_falls_back_per_key() {
    let fixture = TestFixture::new();
    fixture.write_config(r#"{"EnableNotifications": false}"#);

    fixture.store.load().unwrap();

    let enabled: bool = fixture
        .store
        .get(defaults::ENABLE_NOTIFICATIONS, true)
        .unwrap();
    assert!(!enabled);

    // Absent key resolves to the caller-supplied default
    let email: String = fixture
        .store
        .get(defaults::NOTIFICATION_EMAIL, "x@example.com".to_string())
        .unwrap();
    assert_eq!(email, "x@example.com");
}

// =============================================================================
// Typed Get/Set
// =============================================================================

#[test]
fn test_set_then_get_round_trip_without_save() {
    let fixture = TestFixture::new();

    fixture
        .store
        .set(defaults::NOTIFICATION_EMAIL, "a@b.com".to_string())
        .unwrap();
    fixture
        .store
        .set(defaults::REFRESH_INTERVAL_SECONDS, 30u32)
        .unwrap();

    let email: String = fixture
        .store
        .get(defaults::NOTIFICATION_EMAIL, String::new())
        .unwrap();
    let interval: u32 = fixture
        .store
        .get(defaults::REFRESH_INTERVAL_SECONDS, 0)
        .unwrap();

    assert_eq!(email, "a@b.com");
    assert_eq!(interval, 30);
    assert!(fixture.store.is_dirty());
}

#[test]
fn test_never_set_key_returns_default() {
    let fixture = TestFixture::new();

    let value: i64 = fixture.store.get("SomeUnknownKey", 42).unwrap();
    assert_eq!(value, 42);
}

#[test]
fn test_coercion_failure_returns_default_not_error() {
    let fixture = TestFixture::new();
    fixture.write_config(r#"{"RefreshIntervalSeconds": "not-a-number"}"#);
    fixture.store.load().unwrap();

    let interval: u32 = fixture
        .store
        .get(defaults::REFRESH_INTERVAL_SECONDS, 15)
        .unwrap();
    assert_eq!(interval, 15);
}

#[test]
fn test_negative_value_fails_unsigned_coercion() {
    let fixture = TestFixture::new();
    fixture.write_config(r#"{"RefreshIntervalSeconds": -5}"#);
    fixture.store.load().unwrap();

    let interval: u32 = fixture
        .store
        .get(defaults::REFRESH_INTERVAL_SECONDS, 60)
        .unwrap();
    assert_eq!(interval, 60);
}

#[test]
fn test_numeric_string_coerces_to_integer() {
    let fixture = TestFixture::new();
    fixture.write_config(r#"{"RefreshIntervalSeconds": "120"}"#);
    fixture.store.load().unwrap();

    let interval: u32 = fixture
        .store
        .get(defaults::REFRESH_INTERVAL_SECONDS, 0)
        .unwrap();
    assert_eq!(interval, 120);
}

#[test]
fn test_empty_key_is_invalid() {
    let fixture = TestFixture::new();

    assert!(matches!(
        fixture.store.get("", 0i64).unwrap_err(),
        Error::InvalidKey
    ));
    assert!(matches!(
        fixture.store.get("   ", 0i64).unwrap_err(),
        Error::InvalidKey
    ));
    assert!(matches!(
        fixture.store.set("", 1i64).unwrap_err(),
        Error::InvalidKey
    ));
}

#[test]
fn test_has_is_a_pure_lookup() {
    let fixture = TestFixture::new();

    // No load has happened yet, so nothing is present
    assert!(!fixture.store.has(defaults::REFRESH_INTERVAL_SECONDS));
    assert!(!fixture.store.is_loaded());

    fixture.store.load().unwrap();
    assert!(fixture.store.has(defaults::REFRESH_INTERVAL_SECONDS));
    assert!(!fixture.store.has(""));
    assert!(!fixture.store.has("SomeUnknownKey"));
}

// =============================================================================
// Remove
// =============================================================================

#[test]
fn test_remove_missing_key_is_not_an_error_and_stays_clean() {
    let fixture = TestFixture::new();
    fixture.store.load().unwrap();

    assert!(!fixture.store.remove("NoSuchKey").unwrap());
    assert!(!fixture.store.is_dirty());

    assert!(!fixture.store.remove("").unwrap());
    assert!(!fixture.store.is_dirty());
}

#[test]
fn test_remove_present_key_marks_dirty() {
    let fixture = TestFixture::new();
    fixture.store.load().unwrap();

    assert!(fixture.store.remove(defaults::NOTIFICATION_EMAIL).unwrap());
    assert!(fixture.store.is_dirty());
    assert!(!fixture.store.has(defaults::NOTIFICATION_EMAIL));
}

// =============================================================================
// Save
// =============================================================================

#[test]
fn test_save_when_clean_writes_nothing() {
    let fixture = TestFixture::new();
    fixture.write_config(r#"{"NotificationEmail": "a@b.com"}"#);
    fixture.store.load().unwrap();

    // Remove the file; a clean save must not recreate it
    std::fs::remove_file(fixture.config_path()).unwrap();
    fixture.store.save().unwrap();
    assert!(!fixture.config_path().exists());
}

#[test]
fn test_save_clears_dirty_and_persists() {
    let fixture = TestFixture::new();

    fixture
        .store
        .set(defaults::NOTIFICATION_EMAIL, "a@b.com".to_string())
        .unwrap();
    assert!(fixture.store.is_dirty());

    fixture.store.save().unwrap();
    assert!(!fixture.store.is_dirty());

    // A fresh store sees the persisted value
    let fresh = fixture.fresh_store();
    fresh.load().unwrap();
    let email: String = fresh
        .get(defaults::NOTIFICATION_EMAIL, String::new())
        .unwrap();
    assert_eq!(email, "a@b.com");
}

#[test]
fn test_failed_save_keeps_dirty_for_retry() {
    let fixture = TestFixture::new();

    fixture
        .store
        .set(defaults::NOTIFICATION_EMAIL, "a@b.com".to_string())
        .unwrap();

    // Make the target path unwritable: a directory squats on the filename
    std::fs::create_dir(fixture.config_path()).unwrap();

    let result = fixture.store.save();
    assert!(matches!(result.unwrap_err(), Error::FileWrite { .. }));
    assert!(fixture.store.is_dirty());

    // Free the path and retry
    std::fs::remove_dir(fixture.config_path()).unwrap();
    fixture.store.save().unwrap();
    assert!(!fixture.store.is_dirty());
}

#[test]
fn test_unknown_keys_survive_load_then_save() {
    let fixture = TestFixture::new();
    fixture.write_config(r#"{"FutureFeatureFlag": "on", "EnableNotifications": false}"#);
    fixture.store.load().unwrap();

    fixture
        .store
        .set(defaults::NOTIFICATION_EMAIL, "a@b.com".to_string())
        .unwrap();
    fixture.store.save().unwrap();

    let json = fixture.read_config_json().unwrap();
    assert_eq!(json["FutureFeatureFlag"], json!("on"));
    assert_eq!(json["EnableNotifications"], json!(false));
    assert_eq!(json["NotificationEmail"], json!("a@b.com"));
}

// =============================================================================
// Load Failure
// =============================================================================

#[test]
fn test_malformed_file_propagates_and_preserves_state() {
    let fixture = TestFixture::new();

    // Establish in-memory state first
    fixture
        .store
        .set(defaults::NOTIFICATION_EMAIL, "keep@me.com".to_string())
        .unwrap();

    fixture.write_config("{ this is not json");
    let result = fixture.store.load();
    assert!(matches!(result.unwrap_err(), Error::Parse { .. }));

    // Pre-load state is intact
    let email: String = fixture
        .store
        .get(defaults::NOTIFICATION_EMAIL, String::new())
        .unwrap();
    assert_eq!(email, "keep@me.com");
}

#[test]
fn test_non_object_root_is_a_parse_error() {
    let fixture = TestFixture::new();
    fixture.write_config(r#"[1, 2, 3]"#);

    assert!(matches!(
        fixture.store.load().unwrap_err(),
        Error::Parse { .. }
    ));
}

// =============================================================================
// Reset
// =============================================================================

#[test]
fn test_reset_discards_extras_and_persists_immediately() {
    let fixture = TestFixture::new();

    fixture.store.set("CustomKey", "custom".to_string()).unwrap();
    fixture
        .store
        .set(defaults::REFRESH_INTERVAL_SECONDS, 5u32)
        .unwrap();
    fixture.store.save().unwrap();

    fixture.store.reset_to_defaults().unwrap();
    assert!(!fixture.store.is_dirty());

    // The file on disk already holds exactly the four built-ins
    let json = fixture.read_config_json().unwrap();
    let obj = json.as_object().unwrap();
    assert_eq!(obj.len(), 4);
    assert_eq!(obj["RefreshIntervalSeconds"], json!(60));
    assert!(obj.get("CustomKey").is_none());

    // And a fresh load from the same path agrees
    let fresh = fixture.fresh_store();
    fresh.load().unwrap();
    assert!(!fresh.has("CustomKey"));
    let interval: u32 = fresh.get(defaults::REFRESH_INTERVAL_SECONDS, 0).unwrap();
    assert_eq!(interval, 60);
}

// =============================================================================
// Persistence Round Trip
// =============================================================================

#[test]
fn test_set_save_reload_in_fresh_store() {
    let fixture = TestFixture::new();

    fixture
        .store
        .set(defaults::NOTIFICATION_EMAIL, "a@b.com".to_string())
        .unwrap();
    fixture.store.save().unwrap();

    let fresh = fixture.fresh_store();
    fresh.load().unwrap();
    let email: String = fresh
        .get(defaults::NOTIFICATION_EMAIL, String::new())
        .unwrap();
    assert_eq!(email, "a@b.com");
}

#[test]
fn test_saved_file_is_pretty_printed() {
    let fixture = TestFixture::new();

    fixture
        .store
        .set(defaults::NOTIFICATION_EMAIL, "a@b.com".to_string())
        .unwrap();
    fixture.store.save().unwrap();

    let content = std::fs::read_to_string(fixture.config_path()).unwrap();
    assert!(content.contains('\n'));
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn test_concurrent_sets_then_save_keeps_both() {
    let fixture = TestFixture::new();

    let writers: Vec<_> = [
        (defaults::NOTIFICATION_EMAIL, "a@b.com"),
        (defaults::IOT_HUB_CONNECTION_STRING, "HostName=gh"),
    ]
    .into_iter()
    .map(|(key, value)| {
        let store = Arc::clone(&fixture.store);
        thread::spawn(move || {
            store.set(key, value.to_string()).unwrap();
        })
    })
    .collect();

    for handle in writers {
        handle.join().unwrap();
    }

    fixture.store.save().unwrap();

    let json = fixture.read_config_json().unwrap();
    assert_eq!(json["NotificationEmail"], json!("a@b.com"));
    assert_eq!(json["IotHubConnectionString"], json!("HostName=gh"));
}

#[test]
fn test_concurrent_readers_and_writers() {
    let fixture = TestFixture::new();
    fixture.store.load().unwrap();

    let mut handles = Vec::new();

    for _ in 0..8 {
        let store = Arc::clone(&fixture.store);
        handles.push(thread::spawn(move || {
            for _ in 0..100 {
                let _: u32 = store.get(defaults::REFRESH_INTERVAL_SECONDS, 0).unwrap();
            }
        }));
    }

    for i in 0..4u32 {
        let store = Arc::clone(&fixture.store);
        handles.push(thread::spawn(move || {
            for n in 0..50u32 {
                store
                    .set(defaults::REFRESH_INTERVAL_SECONDS, i * 100 + n)
                    .unwrap();
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    fixture.store.save().unwrap();
    let json = fixture.read_config_json().unwrap();
    assert!(json["RefreshIntervalSeconds"].is_u64());
}
