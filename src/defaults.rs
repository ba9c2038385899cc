//! Stable setting keys and their built-in defaults

use serde_json::{json, Value};
use std::collections::HashMap;

/// Connection string for the IoT hub command channel (string, default `""`)
pub const IOT_HUB_CONNECTION_STRING: &str = "IotHubConnectionString";

/// Dashboard refresh interval in seconds (integer, default `60`)
pub const REFRESH_INTERVAL_SECONDS: &str = "RefreshIntervalSeconds";

/// Whether alert notifications are enabled (boolean, default `true`)
pub const ENABLE_NOTIFICATIONS: &str = "EnableNotifications";

/// Email address alert notifications are sent to (string, default `""`)
pub const NOTIFICATION_EMAIL: &str = "NotificationEmail";

/// The built-in default settings set.
///
/// Seeded into the cache when no settings file exists yet (or it is blank),
/// and by [`SettingsStore::reset_to_defaults`](crate::SettingsStore::reset_to_defaults).
#[must_use]
pub fn built_in_defaults() -> HashMap<String, Value> {
    HashMap::from([
        (IOT_HUB_CONNECTION_STRING.to_string(), json!("")),
        (REFRESH_INTERVAL_SECONDS.to_string(), json!(60)),
        (ENABLE_NOTIFICATIONS.to_string(), json!(true)),
        (NOTIFICATION_EMAIL.to_string(), json!("")),
    ])
}
