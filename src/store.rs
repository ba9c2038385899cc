//! Durable, typed, concurrency-safe key/value settings store
//!
//! [`SettingsStore`] owns the authoritative key → value mapping for the
//! application. The file is read lazily on first access, mutations only mark
//! the in-memory cache dirty, and an explicit [`save`](SettingsStore::save)
//! flushes to disk. All file access runs under a single mutex; in-memory
//! reads and writes share an `RwLock` and may interleave freely.

use crate::config::SettingsConfig;
use crate::defaults;
use crate::error::{Error, Result};
use crate::storage::{JsonStorage, StorageBackend};
use crate::value::SettingValue;

use log::{debug, info};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError, RwLock};
use time::OffsetDateTime;

/// Process-wide settings store backed by a single JSON file.
///
/// Construct one instance at startup and share it by `Arc`; the store is the
/// sole writer of its file.
///
/// # Example
///
/// ```rust,no_run
/// use greenhouse_core::{SettingsConfig, SettingsStore};
///
/// let store = SettingsStore::new(
///     SettingsConfig::builder("greenhouse-desktop").build(),
/// );
/// let interval: u32 = store.get("RefreshIntervalSeconds", 60)?;
/// # Ok::<(), greenhouse_core::Error>(())
/// ```
pub struct SettingsStore<S: StorageBackend = JsonStorage> {
    /// Configuration (path, filename, storage backend)
    config: SettingsConfig<S>,

    /// In-memory cache, the single source of truth while the process runs
    cache: RwLock<HashMap<String, Value>>,

    /// Serializes all file-touching operations (load/save)
    file_lock: Mutex<()>,

    /// Timestamp of the last completed load; `None` until first load
    last_load: RwLock<Option<OffsetDateTime>>,

    /// True iff the cache has unsaved mutations relative to the file
    dirty: AtomicBool,
}

impl<S: StorageBackend> SettingsStore<S> {
    /// Create a store bound to the configured settings file.
    ///
    /// No I/O happens here; the file is read on first access.
    pub fn new(config: SettingsConfig<S>) -> Self {
        info!(
            "Initialized settings store for {:?}",
            config.settings_path()
        );
        Self {
            config,
            cache: RwLock::new(HashMap::new()),
            file_lock: Mutex::new(()),
            last_load: RwLock::new(None),
            dirty: AtomicBool::new(false),
        }
    }

    /// Full path of the settings file
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.config.settings_path()
    }

    /// Whether the cache has unsaved mutations
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Whether the file has been read at least once this process lifetime
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.last_load
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Get a setting, falling back to `default` when the key is absent or
    /// the stored value cannot be coerced to `T`.
    ///
    /// Triggers a load on the first access since process start. Coercion
    /// failure is deliberately not an error: malformed persisted data must
    /// not crash a caller.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKey`] for an empty/whitespace key, or a
    /// persistence error if the implicit first load fails.
    pub fn get<T: SettingValue>(&self, key: &str, default: T) -> Result<T> {
        validate_key(key)?;
        self.ensure_loaded()?;

        let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
        match cache.get(key) {
            Some(value) => Ok(T::from_value(value).unwrap_or(default)),
            None => Ok(default),
        }
    }

    /// Insert or overwrite a setting and mark the store dirty.
    ///
    /// No file I/O occurs here; call [`save`](Self::save) to persist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKey`] for an empty/whitespace key, or a
    /// persistence error if the implicit first load fails.
    pub fn set<T: SettingValue>(&self, key: &str, value: T) -> Result<()> {
        validate_key(key)?;
        self.ensure_loaded()?;

        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.into_value());
        self.dirty.store(true, Ordering::SeqCst);

        debug!("Setting {key} updated");
        Ok(())
    }

    /// Remove a setting, returning whether a removal happened.
    ///
    /// An empty key and an absent key both return `Ok(false)`; removing
    /// nothing is not an error condition. The store is marked dirty only
    /// when an entry was actually removed.
    ///
    /// # Errors
    ///
    /// Returns a persistence error if the implicit first load fails.
    pub fn remove(&self, key: &str) -> Result<bool> {
        if key.trim().is_empty() {
            return Ok(false);
        }
        self.ensure_loaded()?;

        let removed = self
            .cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
            .is_some();
        if removed {
            self.dirty.store(true, Ordering::SeqCst);
            debug!("Setting {key} removed");
        }
        Ok(removed)
    }

    /// Whether the key is currently present in the cache.
    ///
    /// Pure lookup: does not trigger a load. Empty keys return `false`.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        !key.trim().is_empty()
            && self
                .cache
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .contains_key(key)
    }

    /// Persist the cache to the settings file if it has unsaved mutations.
    ///
    /// A clean store performs no file write at all. The file is replaced
    /// atomically with the full cache as a pretty-printed JSON object, keys
    /// in sorted order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileWrite`] (wrapping the I/O cause) if the write
    /// fails; the dirty flag stays set so the save can be retried.
    pub fn save(&self) -> Result<()> {
        if !self.is_dirty() {
            debug!("Settings unchanged, skipping save");
            return Ok(());
        }

        let path = self.path();
        let _guard = self
            .file_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let snapshot: BTreeMap<String, Value> = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        // Dirty clears only after the write is confirmed; a failed write
        // leaves the flag set for retry.
        self.config.storage.write(&path, &snapshot)?;
        self.dirty.store(false, Ordering::SeqCst);

        info!("Saved {} settings to {:?}", snapshot.len(), path);
        Ok(())
    }

    /// Load the configured settings file, replacing the cache.
    ///
    /// # Errors
    ///
    /// See [`load_from`](Self::load_from).
    pub fn load(&self) -> Result<()> {
        self.load_from(&self.path())
    }

    /// Load settings from `path`, replacing the cache.
    ///
    /// A missing or blank file is a successful first-run load: the cache is
    /// seeded with [`built_in_defaults`](crate::defaults::built_in_defaults).
    /// The file content is parsed fully before the cache is touched, so a
    /// malformed file leaves the store in its pre-load state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileRead`] if an existing file cannot be read, or
    /// [`Error::Parse`] if its content is not a JSON object of scalars.
    pub fn load_from(&self, path: &Path) -> Result<()> {
        let _guard = self
            .file_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let parsed: Option<serde_json::Map<String, Value>> = self.config.storage.read(path)?;

        let fresh = match parsed {
            Some(entries) => {
                let mut map = HashMap::with_capacity(entries.len());
                for (key, value) in entries {
                    // First read wins when merging into the cache
                    map.entry(key).or_insert(value);
                }
                debug!("Loaded {} settings from {:?}", map.len(), path);
                map
            }
            None => {
                info!("No settings at {:?}, seeding built-in defaults", path);
                defaults::built_in_defaults()
            }
        };

        // Swap the fully-built map in; a load is never observable half-applied.
        *self.cache.write().unwrap_or_else(PoisonError::into_inner) = fresh;
        *self
            .last_load
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(OffsetDateTime::now_utc());
        self.dirty.store(false, Ordering::SeqCst);

        Ok(())
    }

    /// Reset the store to the built-in defaults and persist immediately.
    ///
    /// After this returns, both the cache and the file on disk hold exactly
    /// the four built-in settings. Keys outside the built-in set are
    /// discarded.
    ///
    /// # Errors
    ///
    /// Returns a persistence error if the save fails; the cache still holds
    /// the defaults and stays dirty.
    pub fn reset_to_defaults(&self) -> Result<()> {
        *self.cache.write().unwrap_or_else(PoisonError::into_inner) =
            defaults::built_in_defaults();
        *self
            .last_load
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(OffsetDateTime::now_utc());
        self.dirty.store(true, Ordering::SeqCst);

        info!("Settings reset to built-in defaults");
        self.save()
    }

    /// Load the file if this is the first access since process start
    fn ensure_loaded(&self) -> Result<()> {
        if self.is_loaded() {
            return Ok(());
        }
        self.load()
    }
}

fn validate_key(key: &str) -> Result<()> {
    if key.trim().is_empty() {
        Err(Error::InvalidKey)
    } else {
        Ok(())
    }
}
