//! Common test utilities for greenhouse-core integration tests

#![allow(dead_code)]

use greenhouse_core::{AppSettingsModel, SettingsConfig, SettingsStore};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// Test fixture providing a temporary directory and a store bound to it
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub store: Arc<SettingsStore>,
}

impl TestFixture {
    /// Create a fixture with an empty config directory (no settings file)
    pub fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = Arc::new(SettingsStore::new(
            SettingsConfig::builder("greenhouse-test")
                .config_dir(temp_dir.path())
                .build(),
        ));

        Self { temp_dir, store }
    }

    /// Create a second store bound to the same directory (a "fresh process")
    pub fn fresh_store(&self) -> SettingsStore {
        SettingsStore::new(
            SettingsConfig::builder("greenhouse-test")
                .config_dir(self.temp_dir.path())
                .build(),
        )
    }

    /// Create a facade bound to this fixture's store
    pub fn model(&self) -> Arc<AppSettingsModel> {
        Arc::new(AppSettingsModel::new(self.store.clone()))
    }

    /// Path of the settings file
    pub fn config_path(&self) -> PathBuf {
        self.temp_dir.path().join("config.json")
    }

    /// Write raw content to the settings file
    pub fn write_config(&self, content: &str) {
        std::fs::write(self.config_path(), content).expect("Failed to write config file");
    }

    /// Parse the settings file, if present
    pub fn read_config_json(&self) -> Option<serde_json::Value> {
        let content = std::fs::read_to_string(self.config_path()).ok()?;
        serde_json::from_str(&content).ok()
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
