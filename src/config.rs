//! Configuration for initializing the settings store

use std::path::PathBuf;

use crate::storage::{JsonStorage, StorageBackend};

/// Configuration for a [`SettingsStore`](crate::SettingsStore)
pub struct SettingsConfig<S: StorageBackend = JsonStorage> {
    /// Directory where the settings file lives
    pub config_dir: PathBuf,

    /// Filename for the settings file (e.g., "config.json")
    pub settings_file: String,

    /// Application name (used to derive the platform config directory)
    pub app_name: String,

    /// Storage backend implementation
    pub storage: S,
}

impl<S: StorageBackend> SettingsConfig<S> {
    /// Get the full path to the settings file
    #[must_use]
    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join(&self.settings_file)
    }
}

impl SettingsConfig<JsonStorage> {
    /// Create a new builder for `SettingsConfig`
    ///
    /// # Example
    /// ```rust
    /// use greenhouse_core::SettingsConfig;
    ///
    /// let config = SettingsConfig::builder("greenhouse-desktop")
    ///     .config_dir("/tmp/greenhouse")
    ///     .build();
    /// assert_eq!(config.settings_file, "config.json");
    /// ```
    pub fn builder(app_name: impl Into<String>) -> SettingsConfigBuilder {
        SettingsConfigBuilder::new(app_name)
    }
}

/// Builder for creating a `SettingsConfig` with a fluent API
#[derive(Debug, Clone)]
pub struct SettingsConfigBuilder {
    config_dir: Option<PathBuf>,
    settings_file: String,
    app_name: String,
    pretty_json: bool,
}

impl SettingsConfigBuilder {
    /// Create a new builder with the required app name
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            config_dir: None,
            settings_file: "config.json".into(),
            app_name: app_name.into(),
            pretty_json: true,
        }
    }

    /// Set the configuration directory
    ///
    /// Supports `~` expansion for the home directory.
    #[must_use]
    pub fn config_dir(mut self, path: impl Into<PathBuf>) -> Self {
        let path: PathBuf = path.into();
        let expanded = if path.starts_with("~") {
            if let Some(home) = dirs::home_dir() {
                home.join(path.strip_prefix("~").unwrap_or(&path))
            } else {
                path
            }
        } else {
            path
        };
        self.config_dir = Some(expanded);
        self
    }

    /// Set the settings filename (default: "config.json")
    #[must_use]
    pub fn settings_file(mut self, filename: impl Into<String>) -> Self {
        self.settings_file = filename.into();
        self
    }

    /// Use compact JSON (no pretty printing)
    #[must_use]
    pub fn compact_json(mut self) -> Self {
        self.pretty_json = false;
        self
    }

    /// Build the `SettingsConfig`
    ///
    /// If `config_dir` is not set, uses the platform config directory for
    /// the app, falling back to the current directory.
    #[must_use]
    pub fn build(self) -> SettingsConfig<JsonStorage> {
        let config_dir = self.config_dir.unwrap_or_else(|| {
            dirs::config_dir()
                .map(|d| d.join(&self.app_name))
                .unwrap_or_else(|| PathBuf::from("."))
        });

        let storage = if self.pretty_json {
            JsonStorage::new()
        } else {
            JsonStorage::compact()
        };

        SettingsConfig {
            config_dir,
            settings_file: self.settings_file,
            app_name: self.app_name,
            storage,
        }
    }
}
