//! Core domain types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConnectionError;

/// The fixed, ordered set of loopback ports Opiumware may listen on
pub const CANDIDATE_PORTS: [Port; 6] = [
    Port(8392),
    Port(8393),
    Port(8394),
    Port(8395),
    Port(8396),
    Port(8397),
];

/// A non-zero TCP port on the loopback interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Port(u16);

impl Port {
    /// Create a port, rejecting zero
    pub fn new(port: u16) -> Option<Self> {
        (port != 0).then_some(Self(port))
    }

    /// Get the raw port number
    pub fn get(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u16> for Port {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Port::new(value).ok_or_else(|| "port must be between 1 and 65535".to_string())
    }
}

impl From<Port> for u16 {
    fn from(port: Port) -> Self {
        port.0
    }
}

impl FromStr for Port {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u16 = s
            .trim()
            .parse()
            .map_err(|_| format!("invalid port: {:?}", s))?;
        Port::try_from(value)
    }
}

/// Terminal outcome of a single connection attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AttemptResult {
    /// Connected and closed without sending anything
    Connected { port: Port },
    /// Connected, wrote the compressed payload and closed
    ConnectedAndSent { port: Port, bytes: usize },
    /// Connect, compression or write failed
    ConnectionFailed { port: Port, error: ConnectionError },
    /// The attempt did not settle before its deadline
    Timeout { port: Port },
}

impl AttemptResult {
    /// Port this attempt targeted
    pub fn port(&self) -> Port {
        match self {
            AttemptResult::Connected { port }
            | AttemptResult::ConnectedAndSent { port, .. }
            | AttemptResult::ConnectionFailed { port, .. }
            | AttemptResult::Timeout { port } => *port,
        }
    }

    /// Whether the attempt reached the listener
    ///
    /// There is no application-level acknowledgement; a completed local
    /// write counts as success.
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            AttemptResult::Connected { .. } | AttemptResult::ConnectedAndSent { .. }
        )
    }
}

impl fmt::Display for AttemptResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptResult::Connected { port } => write!(
                f,
                "Successfully connected to Opiumware on port: {} (no script sent)",
                port
            ),
            AttemptResult::ConnectedAndSent { port, .. } => {
                write!(f, "Successfully executed script on port: {}", port)
            }
            AttemptResult::ConnectionFailed { port, error } => {
                write!(f, "Failed to connect or send on port {}: {}", port, error)
            }
            AttemptResult::Timeout { port } => {
                write!(f, "Connection to port {} timed out", port)
            }
        }
    }
}

/// Connection state shown by the front-end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "port", rename_all = "snake_case")]
pub enum ConnectionState {
    /// No port attached
    #[default]
    Disconnected,
    /// A probe is in flight
    Connecting,
    /// Attached to a listener on this port
    Connected(Port),
}

impl ConnectionState {
    /// Attached port, if any
    pub fn port(&self) -> Option<Port> {
        match self {
            ConnectionState::Connected(port) => Some(*port),
            _ => None,
        }
    }

    /// Whether a port is attached
    pub fn is_connected(&self) -> bool {
        self.port().is_some()
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Disconnected => write!(f, "disconnected"),
            ConnectionState::Connecting => write!(f, "connecting"),
            ConnectionState::Connected(port) => write!(f, "connected (port {})", port),
        }
    }
}
