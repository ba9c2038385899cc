//! # greenhouse-core
//!
//! Settings persistence and controller-command core for the greenhouse
//! desktop application.
//!
//! The crate is built around three layers:
//!
//! - **[`SettingsStore`]**: a typed key/value store backed by a single JSON
//!   file, with lazy load on first access, dirty-flag-gated saves, built-in
//!   default fallback, and safe concurrent access.
//! - **[`AppSettingsModel`]**: a strongly-typed, observable facade over the
//!   four named application settings, with change notifications on mutation.
//! - **[`SettingsController`]**: busy-guarded load/save/reset actions with
//!   status text, ready for a UI to bind against.
//!
//! [`IotHubClient`] is the outbound device-control boundary: it builds
//! timestamped `START`/`STOP` commands and consumes the connection string
//! setting. Its transport is a deliberate stub.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use greenhouse_core::{
//!     AppSettingsModel, SettingsConfig, SettingsController, SettingsStore,
//! };
//! use std::sync::Arc;
//!
//! // One store per process, shared by reference.
//! let store = Arc::new(SettingsStore::new(
//!     SettingsConfig::builder("greenhouse-desktop").build(),
//! ));
//!
//! let model = Arc::new(AppSettingsModel::new(store.clone()));
//! model.events().watch(greenhouse_core::defaults::ENABLE_NOTIFICATIONS, |_key, _old, new| {
//!     println!("Notifications toggled to {new}");
//! });
//!
//! let controller = SettingsController::new(model);
//! controller.load();
//! println!("{}", controller.status_message());
//! ```
//!
//! ## Settings File
//!
//! Settings persist as one pretty-printed JSON object (default
//! `config.json` in the platform config directory). Keys the application
//! does not know are preserved across a load-then-save round trip; only an
//! explicit reset discards them.

mod config;
mod controller;
pub mod defaults;
mod error;
mod events;
mod iothub;
mod model;
pub mod storage;
mod store;
pub mod value;

pub use config::{SettingsConfig, SettingsConfigBuilder};
pub use controller::SettingsController;
pub use error::{Error, Result};
pub use events::{ChangeCallback, SettingEvents};
pub use iothub::{AlertCallback, CommandPayload, ControllerAlert, ControllerCommand, IotHubClient};
pub use model::AppSettingsModel;
pub use storage::{JsonStorage, StorageBackend};
pub use store::SettingsStore;
pub use value::SettingValue;
