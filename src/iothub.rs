//! Outbound device-control channel for the greenhouse controller
//!
//! [`IotHubClient`] builds timestamped start/stop commands and serializes
//! them for dispatch. The transmission itself is deliberately a stub: the
//! serialized command is logged, fire-and-forget, until a transport is wired
//! up. The client consumes exactly one setting, the connection string, read
//! at startup and refreshed whenever the user edits it.

use crate::defaults;
use crate::error::Result;
use crate::storage::StorageBackend;
use crate::store::SettingsStore;

use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use time::OffsetDateTime;

/// Command sent to the greenhouse controller
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ControllerCommand {
    /// Command name, e.g. `"START"` or `"STOP"`
    pub command: String,
    pub payload: CommandPayload,
}

/// Payload carried by every controller command
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CommandPayload {
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl ControllerCommand {
    fn stamped(command: &str) -> Self {
        Self {
            command: command.to_string(),
            payload: CommandPayload {
                timestamp: OffsetDateTime::now_utc(),
            },
        }
    }

    /// Build a `START` command stamped with the current time
    #[must_use]
    pub fn start() -> Self {
        Self::stamped("START")
    }

    /// Build a `STOP` command stamped with the current time
    #[must_use]
    pub fn stop() -> Self {
        Self::stamped("STOP")
    }
}

/// Alert received from the greenhouse controller
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ControllerAlert {
    #[serde(rename = "Type")]
    pub alert_type: String,
    pub message: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

/// Type alias for an alert callback
pub type AlertCallback = Arc<dyn Fn(&ControllerAlert) + Send + Sync>;

/// Client for the outbound controller-command channel.
///
/// # Example
///
/// ```rust,no_run
/// use greenhouse_core::IotHubClient;
///
/// let hub = IotHubClient::new("HostName=greenhouse;SharedAccessKey=...");
/// hub.send_start()?;
/// # Ok::<(), greenhouse_core::Error>(())
/// ```
pub struct IotHubClient {
    connection_string: RwLock<String>,
    connected: AtomicBool,
    alert_listeners: RwLock<Vec<AlertCallback>>,
}

impl IotHubClient {
    /// Create a client with the given connection string.
    pub fn new(connection_string: impl Into<String>) -> Self {
        let client = Self {
            connection_string: RwLock::new(connection_string.into()),
            connected: AtomicBool::new(false),
            alert_listeners: RwLock::new(Vec::new()),
        };
        client.initialize_connection();
        client
    }

    /// Create a client with the connection string from the settings store.
    ///
    /// # Errors
    ///
    /// Returns a persistence error if the store's first load fails.
    pub fn from_settings<S: StorageBackend>(store: &SettingsStore<S>) -> Result<Self> {
        let connection_string =
            store.get(defaults::IOT_HUB_CONNECTION_STRING, String::new())?;
        Ok(Self::new(connection_string))
    }

    // Placeholder for a real-time alert connection (SignalR/WebSocket).
    fn initialize_connection(&self) {
        self.connected.store(true, Ordering::SeqCst);
    }

    /// Whether the alert connection is established
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// The connection string currently in use
    #[must_use]
    pub fn connection_string(&self) -> String {
        self.connection_string
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the connection string.
    ///
    /// Called when the user edits it through the settings dialog.
    pub fn set_connection_string(&self, value: impl Into<String>) {
        *self
            .connection_string
            .write()
            .unwrap_or_else(PoisonError::into_inner) = value.into();
        debug!("IoT hub connection string updated");
    }

    /// Send a `START` signal to the controller.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be serialized.
    pub fn send_start(&self) -> Result<()> {
        self.send_command(&ControllerCommand::start())
    }

    /// Send a `STOP` signal to the controller.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be serialized.
    pub fn send_stop(&self) -> Result<()> {
        self.send_command(&ControllerCommand::stop())
    }

    /// Serialize and dispatch a command.
    ///
    /// Fire and forget: not yet wired to a transport, the serialized
    /// command is logged and dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be serialized.
    pub fn send_command(&self, command: &ControllerCommand) -> Result<()> {
        let json = serde_json::to_string(command)?;
        debug!("Dispatching controller command: {json}");
        Ok(())
    }

    /// Register a listener for controller alerts
    pub fn on_alert<F>(&self, callback: F)
    where
        F: Fn(&ControllerAlert) + Send + Sync + 'static,
    {
        self.alert_listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(callback));
    }

    /// Feed a synthetic alert to all listeners (demo/testing hook)
    pub fn simulate_alert(&self, alert_type: impl Into<String>, message: impl Into<String>) {
        let alert = ControllerAlert {
            alert_type: alert_type.into(),
            message: message.into(),
            timestamp: OffsetDateTime::now_utc(),
        };
        let guard = self
            .alert_listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        for callback in guard.iter() {
            callback(&alert);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
