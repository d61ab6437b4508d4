//! Exec command implementation

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};

use ow_connector::{ExecuteError, Executor};
use ow_core::config::ConfigFile;
use ow_core::traits::ScriptStore;
use ow_core::{FsScriptStore, Port};

use crate::output::{format_report, print_info, print_json, print_success, print_warning};

/// Where the script text comes from
///
/// Checked in order: inline code, saved script, file. With none of them
/// (or a file of `-`) the script is read from stdin.
#[derive(Debug, Default, Clone)]
pub struct ScriptSource {
    pub inline: Option<String>,
    pub saved: Option<String>,
    pub file: Option<PathBuf>,
}

impl ScriptSource {
    fn read(&self, store: &impl ScriptStore) -> Result<String> {
        if let Some(code) = &self.inline {
            return Ok(code.clone());
        }
        if let Some(name) = &self.saved {
            return store
                .load(name)
                .with_context(|| format!("Failed to load script {:?}", name));
        }
        match &self.file {
            Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read script file: {:?}", path)),
            _ => {
                let mut code = String::new();
                std::io::stdin()
                    .read_to_string(&mut code)
                    .context("Failed to read script from stdin")?;
                Ok(code)
            }
        }
    }
}

/// Attach and send the configured settings followed by the script
///
/// With `port` the executor connects to that port only; otherwise it
/// auto-attaches if the configuration allows it.
pub async fn exec_command(
    config: &ConfigFile,
    source: &ScriptSource,
    port: Option<Port>,
    json: bool,
) -> Result<()> {
    let store = FsScriptStore::new(&config.scripts.dir);
    let code = source.read(&store)?;
    if code.trim().is_empty() {
        return Err(ExecuteError::EmptyScript.into());
    }

    let executor = Executor::from_config(config);

    match port {
        Some(port) => {
            let result = executor.connect(port).await;
            if !result.is_success() {
                anyhow::bail!("Failed to connect to port {}: {}", port, result);
            }
        }
        None if config.execution.auto_attach => {
            if !json {
                print_info("Attempting to auto-attach...");
            }
            if executor.probe().await.is_none() {
                anyhow::bail!("Auto-attach failed: Failed to connect on all ports");
            }
        }
        None => return Err(ExecuteError::NotConnected.into()),
    }

    let report = executor.send_script(&code).await?;

    if json {
        print_json(&report)?;
    } else {
        for setting in report.settings.iter().filter(|s| !s.is_success()) {
            print_warning(&format!("Setting not delivered: {}", setting));
        }
        tracing::debug!("{}", format_report(&report));
    }

    if !report.is_success() {
        anyhow::bail!("Script execution failed: {}", report.script);
    }
    if !json {
        print_success(&format!("Script executed successfully on port {}", report.port));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_wins() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsScriptStore::new(dir.path());
        store.save("saved", "print('saved')").unwrap();

        let source = ScriptSource {
            inline: Some("print('inline')".to_string()),
            saved: Some("saved".to_string()),
            file: None,
        };
        assert_eq!(source.read(&store).unwrap(), "print('inline')");
    }

    #[test]
    fn test_saved_before_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsScriptStore::new(dir.path());
        store.save("saved", "print('saved')").unwrap();

        let source = ScriptSource {
            inline: None,
            saved: Some("saved".to_string()),
            file: Some(dir.path().join("missing.lua")),
        };
        assert_eq!(source.read(&store).unwrap(), "print('saved')");
    }

    #[test]
    fn test_file_source() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsScriptStore::new(dir.path().join("scripts"));
        let path = dir.path().join("hello.lua");
        std::fs::write(&path, "print('hello')").unwrap();

        let source = ScriptSource {
            file: Some(path),
            ..Default::default()
        };
        assert_eq!(source.read(&store).unwrap(), "print('hello')");
    }

    #[test]
    fn test_missing_saved_script() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsScriptStore::new(dir.path());
        let source = ScriptSource {
            saved: Some("ghost".to_string()),
            ..Default::default()
        };
        assert!(source.read(&store).is_err());
    }
}
