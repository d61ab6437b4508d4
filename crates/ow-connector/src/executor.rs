//! Client interface used by the front-end
//!
//! Ties a [`PortProbe`] to the configured port set, the pre-script settings
//! and a [`ConnectionMonitor`]. Three operations stay distinct: attaching
//! (`probe` / `connect`), checking a port, and sending a script.

use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;

use ow_core::config::{ConfigFile, SettingEntry};
use ow_core::traits::PortProbe;
use ow_core::{AttemptResult, ConnectionState, Port};
use ow_protocol::Command;

use crate::connector::PortConnector;
use crate::probe::probe_all_ports;
use crate::state::ConnectionMonitor;

/// Reasons a script is not sent at all
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExecuteError {
    /// Script was empty after trimming
    #[error("No script to execute")]
    EmptyScript,

    /// No port is attached
    #[error("Not connected to any port")]
    NotConnected,
}

/// Outcome of one script execution
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionReport {
    /// Port everything was sent to
    pub port: Port,
    /// One result per setting, in send order
    pub settings: Vec<AttemptResult>,
    /// Result of the script send
    pub script: AttemptResult,
}

impl ExecutionReport {
    /// Whether the script itself was delivered
    pub fn is_success(&self) -> bool {
        self.script.is_success()
    }
}

/// Attach, check and execute against the Opiumware listener
pub struct Executor<P: PortProbe> {
    probe: P,
    ports: Vec<Port>,
    settings: Vec<SettingEntry>,
    monitor: ConnectionMonitor,
}

impl Executor<PortConnector> {
    /// Build a TCP executor from configuration
    pub fn from_config(config: &ConfigFile) -> Self {
        Executor::new(
            PortConnector::from_config(&config.connection),
            config.connection.ports.clone(),
        )
        .with_settings(config.execution.settings.clone())
    }
}

impl<P: PortProbe> Executor<P> {
    /// Create an executor that sends no settings before scripts
    pub fn new(probe: P, ports: Vec<Port>) -> Self {
        Self {
            probe,
            ports,
            settings: Vec::new(),
            monitor: ConnectionMonitor::new(),
        }
    }

    /// Settings sent, in order, before every script
    pub fn with_settings(mut self, settings: Vec<SettingEntry>) -> Self {
        self.settings = settings;
        self
    }

    /// Ports probed by auto-attach
    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    /// Current connection state
    pub fn state(&self) -> ConnectionState {
        self.monitor.current()
    }

    /// Subscribe to connection state changes
    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.monitor.subscribe()
    }

    /// Auto-attach: probe the configured ports in order without a payload
    pub async fn probe(&self) -> Option<Port> {
        self.monitor.set(ConnectionState::Connecting);
        let found = probe_all_ports(&self.probe, &self.ports, None).await;
        self.monitor.set(match found {
            Some(port) => ConnectionState::Connected(port),
            None => ConnectionState::Disconnected,
        });
        found
    }

    /// Attach to one port without sending anything
    pub async fn connect(&self, port: Port) -> AttemptResult {
        self.monitor.set(ConnectionState::Connecting);
        let result = self.probe.attempt(port, None).await;
        self.monitor.set(if result.is_success() {
            ConnectionState::Connected(port)
        } else {
            ConnectionState::Disconnected
        });
        result
    }

    /// Forget the attached port
    pub fn disconnect(&self) {
        self.monitor.set(ConnectionState::Disconnected);
    }

    /// Whether a port accepts connections; leaves the state untouched
    pub async fn check_open(&self, port: Port) -> bool {
        self.probe.check_open(port).await
    }

    /// Send the configured settings and then `code` to the attached port
    ///
    /// Each command is its own connect-compress-write-close cycle. A failed
    /// setting is logged and does not stop the script.
    pub async fn send_script(&self, code: &str) -> Result<ExecutionReport, ExecuteError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(ExecuteError::EmptyScript);
        }
        let port = self.state().port().ok_or(ExecuteError::NotConnected)?;

        tracing::info!("Executing script on port {}...", port);

        let mut settings = Vec::with_capacity(self.settings.len());
        for setting in &self.settings {
            let payload = setting.to_command().to_payload();
            let result = self.probe.attempt(port, payload.as_ref()).await;
            if !result.is_success() {
                tracing::warn!("Setting {} was not delivered: {}", setting.key, result);
            }
            settings.push(result);
        }

        let payload = Command::script(code).to_payload();
        let script = self.probe.attempt(port, payload.as_ref()).await;
        if script.is_success() {
            tracing::info!("Script executed successfully");
        } else {
            tracing::warn!("Script execution failed: {}", script);
        }

        Ok(ExecutionReport {
            port,
            settings,
            script,
        })
    }
}
