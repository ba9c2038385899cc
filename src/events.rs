//! Change notifications for settings
//!
//! An explicit observer list: components subscribe to value changes either
//! globally or per setting key, and mutations notify every subscriber
//! synchronously with `(key, old, new)`.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Type alias for a change callback
pub type ChangeCallback = Arc<dyn Fn(&str, &Value, &Value) + Send + Sync>;

/// Registry of settings-change listeners
pub struct SettingEvents {
    /// Global listeners (called for every change)
    global_listeners: RwLock<Vec<ChangeCallback>>,

    /// Per-key listeners (called only when that setting changes)
    key_listeners: RwLock<HashMap<String, Vec<ChangeCallback>>>,
}

impl SettingEvents {
    /// Create an empty listener registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            global_listeners: RwLock::new(Vec::new()),
            key_listeners: RwLock::new(HashMap::new()),
        }
    }

    /// Register a listener called for every settings change
    ///
    /// The callback receives `(key, old_value, new_value)`.
    pub fn on_change<F>(&self, callback: F)
    where
        F: Fn(&str, &Value, &Value) + Send + Sync + 'static,
    {
        self.global_listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(callback));
    }

    /// Register a listener for one setting key
    ///
    /// The callback receives `(key, old_value, new_value)`.
    pub fn watch<F>(&self, key: &str, callback: F)
    where
        F: Fn(&str, &Value, &Value) + Send + Sync + 'static,
    {
        self.key_listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key.to_string())
            .or_default()
            .push(Arc::new(callback));
    }

    /// Notify all listeners about a change.
    ///
    /// Listeners run synchronously on the notifying thread, global listeners
    /// first.
    pub fn notify(&self, key: &str, old_value: &Value, new_value: &Value) {
        {
            let guard = self
                .global_listeners
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            for callback in guard.iter() {
                callback(key, old_value, new_value);
            }
        }

        {
            let guard = self
                .key_listeners
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            if let Some(listeners) = guard.get(key) {
                for callback in listeners {
                    callback(key, old_value, new_value);
                }
            }
        }
    }

    /// Remove all listeners for a specific key
    pub fn unwatch(&self, key: &str) {
        self.key_listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }

    /// Clear all listeners
    pub fn clear(&self) {
        self.global_listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.key_listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Default for SettingEvents {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
