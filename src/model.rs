//! Typed, observable facade over the application settings
//!
//! [`AppSettingsModel`] mirrors the four named settings in memory, writes
//! mutations through to the [`SettingsStore`], and notifies change listeners.
//! Saving to disk stays a separate, explicit step.

use crate::defaults;
use crate::error::{Error, Result};
use crate::events::SettingEvents;
use crate::storage::{JsonStorage, StorageBackend};
use crate::store::SettingsStore;
use crate::value::SettingValue;

use log::info;
use std::sync::{Arc, PoisonError, RwLock};

/// In-memory mirror of the four named settings, initialized to the built-in
/// defaults until the first load.
#[derive(Debug, Clone)]
struct ModelState {
    connection_string: String,
    refresh_interval_seconds: u32,
    notifications_enabled: bool,
    notification_email: String,
}

impl Default for ModelState {
    fn default() -> Self {
        Self {
            connection_string: String::new(),
            refresh_interval_seconds: 60,
            notifications_enabled: true,
            notification_email: String::new(),
        }
    }
}

/// Strongly-typed settings facade bound to one [`SettingsStore`].
///
/// Setters short-circuit on equality: writing the value a property already
/// holds emits no notification and touches neither the store nor the dirty
/// flag.
pub struct AppSettingsModel<S: StorageBackend = JsonStorage> {
    store: Arc<SettingsStore<S>>,
    state: RwLock<ModelState>,
    events: Arc<SettingEvents>,
}

impl<S: StorageBackend> AppSettingsModel<S> {
    /// Create a facade bound to the given store.
    pub fn new(store: Arc<SettingsStore<S>>) -> Self {
        Self {
            store,
            state: RwLock::new(ModelState::default()),
            events: Arc::new(SettingEvents::new()),
        }
    }

    /// Listener registry for change notifications.
    ///
    /// Callbacks are keyed by the stable setting-key strings in
    /// [`defaults`](crate::defaults) and receive `(key, old, new)`.
    pub fn events(&self) -> &Arc<SettingEvents> {
        &self.events
    }

    // -------------------------------------------------------------------------
    // Properties
    // -------------------------------------------------------------------------

    /// Current IoT hub connection string
    #[must_use]
    pub fn iot_hub_connection_string(&self) -> String {
        self.read_state().connection_string.clone()
    }

    /// Update the IoT hub connection string.
    ///
    /// # Errors
    ///
    /// Returns a store error if the write-through fails.
    pub fn set_iot_hub_connection_string(&self, value: impl Into<String>) -> Result<()> {
        self.write_through(defaults::IOT_HUB_CONNECTION_STRING, value.into(), |s| {
            &mut s.connection_string
        })
    }

    /// Current dashboard refresh interval in seconds
    #[must_use]
    pub fn refresh_interval_seconds(&self) -> u32 {
        self.read_state().refresh_interval_seconds
    }

    /// Update the dashboard refresh interval.
    ///
    /// # Errors
    ///
    /// Returns a store error if the write-through fails.
    pub fn set_refresh_interval_seconds(&self, value: u32) -> Result<()> {
        self.write_through(defaults::REFRESH_INTERVAL_SECONDS, value, |s| {
            &mut s.refresh_interval_seconds
        })
    }

    /// Whether alert notifications are enabled
    #[must_use]
    pub fn notifications_enabled(&self) -> bool {
        self.read_state().notifications_enabled
    }

    /// Enable or disable alert notifications.
    ///
    /// # Errors
    ///
    /// Returns a store error if the write-through fails.
    pub fn set_notifications_enabled(&self, value: bool) -> Result<()> {
        self.write_through(defaults::ENABLE_NOTIFICATIONS, value, |s| {
            &mut s.notifications_enabled
        })
    }

    /// Current notification email address
    #[must_use]
    pub fn notification_email(&self) -> String {
        self.read_state().notification_email.clone()
    }

    /// Update the notification email address.
    ///
    /// # Errors
    ///
    /// Returns a store error if the write-through fails.
    pub fn set_notification_email(&self, value: impl Into<String>) -> Result<()> {
        self.write_through(defaults::NOTIFICATION_EMAIL, value.into(), |s| {
            &mut s.notification_email
        })
    }

    // -------------------------------------------------------------------------
    // Bulk Operations
    // -------------------------------------------------------------------------

    /// Refresh all four properties from the store.
    ///
    /// Change notifications fire for every value that differs from its
    /// current in-memory state. The store itself stays clean: this reads,
    /// it does not write back.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LoadSettings`] wrapping the store failure.
    pub fn load_settings(&self) -> Result<()> {
        self.load_settings_inner().map_err(Error::into_load)?;
        info!("Application settings loaded");
        Ok(())
    }

    /// Write all four properties to the store and persist to disk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SaveSettings`] wrapping the store failure; the
    /// store stays dirty so the save can be retried.
    pub fn save_settings(&self) -> Result<()> {
        let snapshot = self.read_state().clone();
        (|| {
            self.store.set(
                defaults::IOT_HUB_CONNECTION_STRING,
                snapshot.connection_string,
            )?;
            self.store.set(
                defaults::REFRESH_INTERVAL_SECONDS,
                snapshot.refresh_interval_seconds,
            )?;
            self.store
                .set(defaults::ENABLE_NOTIFICATIONS, snapshot.notifications_enabled)?;
            self.store
                .set(defaults::NOTIFICATION_EMAIL, snapshot.notification_email)?;
            self.store.save()
        })()
        .map_err(Error::into_save)?;

        info!("Application settings saved");
        Ok(())
    }

    /// Reset the store to the built-in defaults and refresh the mirror.
    ///
    /// The file on disk holds only the four defaults when this returns;
    /// listeners are notified for every property that changed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResetSettings`] wrapping the underlying failure.
    pub fn reset_to_defaults(&self) -> Result<()> {
        (|| {
            self.store.reset_to_defaults()?;
            self.load_settings_inner()
        })()
        .map_err(Error::into_reset)?;

        info!("Application settings reset to defaults");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn load_settings_inner(&self) -> Result<()> {
        let connection: String = self
            .store
            .get(defaults::IOT_HUB_CONNECTION_STRING, String::new())?;
        let interval: u32 = self.store.get(defaults::REFRESH_INTERVAL_SECONDS, 60)?;
        let notifications: bool = self.store.get(defaults::ENABLE_NOTIFICATIONS, true)?;
        let email: String = self.store.get(defaults::NOTIFICATION_EMAIL, String::new())?;

        self.assign(defaults::IOT_HUB_CONNECTION_STRING, connection, |s| {
            &mut s.connection_string
        });
        self.assign(defaults::REFRESH_INTERVAL_SECONDS, interval, |s| {
            &mut s.refresh_interval_seconds
        });
        self.assign(defaults::ENABLE_NOTIFICATIONS, notifications, |s| {
            &mut s.notifications_enabled
        });
        self.assign(defaults::NOTIFICATION_EMAIL, email, |s| {
            &mut s.notification_email
        });
        Ok(())
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, ModelState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the mirrored value when it differs, returning the old value.
    fn replace_if_changed<T, F>(&self, new: &T, field: F) -> Option<T>
    where
        T: Clone + PartialEq,
        F: FnOnce(&mut ModelState) -> &mut T,
    {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let slot = field(&mut state);
        if *slot == *new {
            return None;
        }
        Some(std::mem::replace(slot, new.clone()))
    }

    /// Setter path: mirror, write through to the store, then notify.
    fn write_through<T, F>(&self, key: &str, new: T, field: F) -> Result<()>
    where
        T: SettingValue + Clone + PartialEq,
        F: FnOnce(&mut ModelState) -> &mut T,
    {
        let Some(old) = self.replace_if_changed(&new, field) else {
            return Ok(());
        };
        self.store.set(key, new.clone())?;
        self.events.notify(key, &old.into_value(), &new.into_value());
        Ok(())
    }

    /// Load path: mirror and notify without writing back to the store.
    fn assign<T, F>(&self, key: &str, new: T, field: F)
    where
        T: SettingValue + Clone + PartialEq,
        F: FnOnce(&mut ModelState) -> &mut T,
    {
        if let Some(old) = self.replace_if_changed(&new, field) {
            self.events.notify(key, &old.into_value(), &new.into_value());
        }
    }
}
