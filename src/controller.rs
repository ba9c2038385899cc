//! UI-facing orchestration of the settings lifecycle
//!
//! [`SettingsController`] sequences the facade's three bulk operations with a
//! busy guard and human-readable status text. Failures never escape: they
//! become status text and the busy flag clears on every exit path.

use crate::model::AppSettingsModel;
use crate::storage::{JsonStorage, StorageBackend};

use log::{debug, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// Busy-guarded wrapper around the settings facade for a UI caller.
///
/// Only one operation runs at a time; a trigger arriving while another
/// operation is in progress is dropped (the guard is on the trigger side,
/// mirroring a disabled button).
pub struct SettingsController<S: StorageBackend = JsonStorage> {
    model: Arc<AppSettingsModel<S>>,
    busy: AtomicBool,
    status: RwLock<String>,
}

impl<S: StorageBackend> SettingsController<S> {
    /// Create a controller driving the given facade.
    pub fn new(model: Arc<AppSettingsModel<S>>) -> Self {
        Self {
            model,
            busy: AtomicBool::new(false),
            status: RwLock::new(String::new()),
        }
    }

    /// The facade this controller drives
    pub fn model(&self) -> &Arc<AppSettingsModel<S>> {
        &self.model
    }

    /// Whether an operation is currently in progress
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Current human-readable status text
    #[must_use]
    pub fn status_message(&self) -> String {
        self.status
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Load settings. Returns `false` if another operation was in progress
    /// and nothing ran.
    pub fn load(&self) -> bool {
        self.run(
            "Loading settings...",
            "Settings loaded successfully.",
            "Failed to load settings",
            |model| model.load_settings(),
        )
    }

    /// Save settings. Returns `false` if another operation was in progress
    /// and nothing ran.
    pub fn save(&self) -> bool {
        self.run(
            "Saving settings...",
            "Settings saved successfully.",
            "Failed to save settings",
            |model| model.save_settings(),
        )
    }

    /// Reset settings to the built-in defaults. Returns `false` if another
    /// operation was in progress and nothing ran.
    pub fn reset(&self) -> bool {
        self.run(
            "Resetting settings...",
            "Settings reset to defaults.",
            "Failed to reset settings",
            |model| model.reset_to_defaults(),
        )
    }

    /// Claim the busy guard, run the operation, and translate the outcome
    /// into status text. Terminal state is idle regardless of the outcome.
    fn run<F>(&self, running: &str, done: &str, failed: &str, op: F) -> bool
    where
        F: FnOnce(&AppSettingsModel<S>) -> crate::error::Result<()>,
    {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Settings operation already in progress, ignoring trigger");
            return false;
        }

        self.set_status(running);

        match op(&self.model) {
            Ok(()) => self.set_status(done),
            Err(e) => {
                warn!("{failed}: {e}");
                self.set_status(&format!("{failed}: {e}"));
            }
        }

        self.busy.store(false, Ordering::SeqCst);
        true
    }

    fn set_status(&self, message: &str) {
        *self.status.write().unwrap_or_else(PoisonError::into_inner) = message.to_string();
    }
}
