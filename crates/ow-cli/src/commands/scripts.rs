//! Saved-script command implementations

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use ow_core::config::ConfigFile;
use ow_core::traits::ScriptStore;
use ow_core::{import_file, FsScriptStore};

use crate::output::{format_scripts, print_json, print_success};

fn open_store(config: &ConfigFile) -> FsScriptStore {
    FsScriptStore::new(&config.scripts.dir)
}

/// List saved scripts
pub fn scripts_list(config: &ConfigFile, json: bool) -> Result<()> {
    let store = open_store(config);
    let names = store
        .list()
        .with_context(|| format!("Failed to list scripts in {:?}", store.dir()))?;

    if json {
        print_json(&names)?;
    } else {
        println!("{}", format_scripts(&names));
    }
    Ok(())
}

/// Print a saved script's body
pub fn scripts_show(config: &ConfigFile, name: &str) -> Result<()> {
    let content = open_store(config).load(name)?;
    println!("{}", content);
    Ok(())
}

/// Save a script from a file, or from stdin when no file is given
pub fn scripts_save(config: &ConfigFile, name: &str, file: Option<&Path>) -> Result<()> {
    let content = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {:?}", path))?,
        None => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .context("Failed to read script from stdin")?;
            content
        }
    };

    if content.trim().is_empty() {
        anyhow::bail!("Refusing to save an empty script");
    }

    open_store(config).save(name, &content)?;
    print_success(&format!("Saved script: {}", name));
    Ok(())
}

/// Delete a saved script
pub fn scripts_delete(config: &ConfigFile, name: &str) -> Result<()> {
    open_store(config).delete(name)?;
    print_success(&format!("Deleted script: {}", name));
    Ok(())
}

/// Copy a script file into the store, named after the file unless overridden
pub fn scripts_import(config: &ConfigFile, file: &PathBuf, name: Option<&str>) -> Result<()> {
    let imported =
        import_file(file).with_context(|| format!("Failed to open file: {:?}", file))?;
    let name = name.unwrap_or(&imported.name);

    open_store(config).save(name, &imported.content)?;
    print_success(&format!("Imported script: {}", name));
    Ok(())
}
