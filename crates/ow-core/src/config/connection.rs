//! Connection configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::serde_utils::duration_millis;
use crate::error::ConfigError;
use crate::types::{Port, CANDIDATE_PORTS};
use ow_protocol::DEFAULT_COMPRESSION_LEVEL;

/// How the connector reaches the listener
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Ports probed by auto-attach, in order
    pub ports: Vec<Port>,

    /// Deadline for a connect-and-send attempt
    #[serde(with = "duration_millis")]
    pub connect_timeout: Duration,

    /// Deadline for a status check
    #[serde(with = "duration_millis")]
    pub check_timeout: Duration,

    /// zlib level, 0 (store) to 9 (best)
    pub compression_level: u32,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            ports: CANDIDATE_PORTS.to_vec(),
            connect_timeout: Duration::from_millis(3000),
            check_timeout: Duration::from_millis(1000),
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}

impl ConnectionConfig {
    /// Reject configurations the connector cannot honour
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ports.is_empty() {
            return Err(ConfigError::Invalid(
                "connection.ports must list at least one port".to_string(),
            ));
        }
        if self.connect_timeout.is_zero() || self.check_timeout.is_zero() {
            return Err(ConfigError::Invalid(
                "connection timeouts must be positive".to_string(),
            ));
        }
        if self.compression_level > 9 {
            return Err(ConfigError::Invalid(format!(
                "connection.compression_level must be 0-9, got {}",
                self.compression_level
            )));
        }
        Ok(())
    }
}
