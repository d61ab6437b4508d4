//! Execution configuration

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use ow_protocol::Command;

/// A listener setting sent before every script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingEntry {
    pub key: String,
    pub value: String,
}

impl SettingEntry {
    /// Create a setting entry
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Render as a wire command
    pub fn to_command(&self) -> Command {
        Command::setting(&self.key, &self.value)
    }
}

/// What happens around a script execution
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Probe the configured ports when no port is given
    pub auto_attach: bool,

    /// Settings sent, in order, before the script
    pub settings: Vec<SettingEntry>,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            auto_attach: true,
            settings: vec![SettingEntry::new("EnableWS", "true")],
        }
    }
}

impl ExecutionConfig {
    /// Setting keys are sent space-delimited, so they cannot contain spaces
    pub fn validate(&self) -> Result<(), ConfigError> {
        for setting in &self.settings {
            if setting.key.is_empty() || setting.key.contains(char::is_whitespace) {
                return Err(ConfigError::Invalid(format!(
                    "execution.settings key {:?} must be a single word",
                    setting.key
                )));
            }
        }
        Ok(())
    }
}
