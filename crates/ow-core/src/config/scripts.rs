//! Script store configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where saved scripts live
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptsConfig {
    /// Directory holding one `<name>.lua` file per script
    pub dir: PathBuf,
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self {
            dir: super::default_config_dir().join("scripts"),
        }
    }
}
