//! Configuration management for the executor

mod connection;
mod execution;
mod scripts;
pub mod serde_utils;

pub use connection::ConnectionConfig;
pub use execution::{ExecutionConfig, SettingEntry};
pub use scripts::ScriptsConfig;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Get the default configuration directory
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ow-exec")
}

/// Get the default configuration file path
pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.toml")
}

/// On-disk layout of `config.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    /// Port set, timeouts and compression
    pub connection: ConnectionConfig,
    /// Auto-attach and pre-script settings
    pub execution: ExecutionConfig,
    /// Script store location
    pub scripts: ScriptsConfig,
}

impl ConfigFile {
    /// Load from an explicit path, or from the default path if present
    ///
    /// An explicit path must exist. A missing default file yields defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config: ConfigFile = match path {
            Some(path) => load_config(path)?,
            None => {
                let default_path = default_config_path();
                if default_path.exists() {
                    load_config(&default_path)?
                } else {
                    tracing::debug!("No config at {:?}, using defaults", default_path);
                    ConfigFile::default()
                }
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.connection.validate()?;
        self.execution.validate()
    }
}

/// Load configuration from a file
pub fn load_config<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Invalid(format!("Failed to read config: {}", e)))?;

    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to a file
pub fn save_config<T: serde::Serialize>(path: &Path, config: &T) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(config)?;

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| ConfigError::Invalid(format!("Failed to create config dir: {}", e)))?;
    }

    std::fs::write(path, content)
        .map_err(|e| ConfigError::Invalid(format!("Failed to write config: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CANDIDATE_PORTS;
    use std::time::Duration;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config: ConfigFile = toml::from_str("").unwrap();
        assert_eq!(config.connection.ports, CANDIDATE_PORTS.to_vec());
        assert_eq!(config.connection.connect_timeout, Duration::from_millis(3000));
        assert_eq!(config.connection.check_timeout, Duration::from_millis(1000));
        assert!(config.execution.auto_attach);
    }

    #[test]
    fn test_partial_file() {
        let config: ConfigFile = toml::from_str(
            r#"
            [connection]
            ports = [8393, 8392]
            connect_timeout = 500

            [execution]
            auto_attach = false
            "#,
        )
        .unwrap();
        assert_eq!(config.connection.ports[0].get(), 8393);
        assert_eq!(config.connection.connect_timeout, Duration::from_millis(500));
        assert_eq!(config.connection.check_timeout, Duration::from_millis(1000));
        assert!(!config.execution.auto_attach);
        assert_eq!(config.execution.settings.len(), 1);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = ConfigFile::default();
        config.connection.compression_level = 9;
        config.execution.settings.push(SettingEntry::new("Redirect", "false"));
        save_config(&path, &config).unwrap();

        let loaded = ConfigFile::load_or_default(Some(&path)).unwrap();
        assert_eq!(loaded.connection.compression_level, 9);
        assert_eq!(loaded.execution.settings, config.execution.settings);
    }

    #[test]
    fn test_explicit_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let result = ConfigFile::load_or_default(Some(&dir.path().join("missing.toml")));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_invalid_rejected_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[connection]\nports = []\n").unwrap();
        let result = ConfigFile::load_or_default(Some(&path));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }
}
