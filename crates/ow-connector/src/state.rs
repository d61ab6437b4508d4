//! Observable connection state
//!
//! One watch channel is the single source of truth for which port the
//! front-end is attached to. Consumers subscribe instead of polling.

use tokio::sync::watch;

use ow_core::ConnectionState;

/// Holds the current [`ConnectionState`] and notifies subscribers on change
#[derive(Debug)]
pub struct ConnectionMonitor {
    tx: watch::Sender<ConnectionState>,
}

impl ConnectionMonitor {
    /// Create a monitor starting at `Disconnected`
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ConnectionState::Disconnected);
        Self { tx }
    }

    /// Current state
    pub fn current(&self) -> ConnectionState {
        *self.tx.borrow()
    }

    /// Subscribe to state changes
    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.tx.subscribe()
    }

    /// Update the state; subscribers are only notified if it changed
    ///
    /// Returns whether the state changed.
    pub fn set(&self, state: ConnectionState) -> bool {
        let changed = self.tx.send_if_modified(|current| {
            if *current == state {
                return false;
            }
            *current = state;
            true
        });
        if changed {
            tracing::debug!("Connection state: {}", state);
        }
        changed
    }
}

impl Default for ConnectionMonitor {
    fn default() -> Self {
        Self::new()
    }
}
