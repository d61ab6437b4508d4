//! Config command implementations

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::output::{print_info, print_success, print_warning};
use ow_core::config::{self, ConfigFile};

const CONFIG_HEADER: &str = "\
# ow-exec configuration
#
# connection.ports         loopback ports tried by auto-attach, in order
# connection.*_timeout     milliseconds
# execution.settings       sent as `OpiumwareSetting <key> <value>` before each script
# scripts.dir              one <name>.lua file per saved script

";

fn resolve_path(config_path: Option<&Path>) -> PathBuf {
    config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(config::default_config_path)
}

fn read_table(path: &Path) -> Result<toml::Table> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;
    toml::from_str(&content).with_context(|| "Failed to parse config file")
}

fn lookup<'a>(root: &'a toml::Value, key: &str) -> Option<&'a toml::Value> {
    key.split('.')
        .try_fold(root, |current, part| current.as_table()?.get(part))
}

/// Parse a command-line value into the most specific TOML type
///
/// Comma-separated integers become an array, so `connection.ports` can be
/// set as `8393,8392`. A lone value for an array key is wrapped by
/// [`config_set`].
fn parse_value(value: &str) -> toml::Value {
    if value == "true" {
        return toml::Value::Boolean(true);
    }
    if value == "false" {
        return toml::Value::Boolean(false);
    }
    if let Ok(i) = value.parse::<i64>() {
        return toml::Value::Integer(i);
    }
    if value.contains(',') {
        let items: Result<Vec<i64>, _> = value.split(',').map(|v| v.trim().parse()).collect();
        if let Ok(items) = items {
            return toml::Value::Array(items.into_iter().map(toml::Value::Integer).collect());
        }
    }
    toml::Value::String(value.to_string())
}

/// Get a config value by dotted key
pub fn config_get(config_path: Option<&Path>, key: &str) -> Result<()> {
    let path = resolve_path(config_path);
    let root = if path.exists() {
        toml::Value::Table(read_table(&path)?)
    } else {
        // Fall back to what the defaults would say
        toml::Value::try_from(ConfigFile::default())?
    };

    let current = lookup(&root, key).ok_or_else(|| anyhow::anyhow!("Key not found: {}", key))?;

    match current {
        toml::Value::String(s) => println!("{}", s),
        toml::Value::Table(_) => println!("{}", toml::to_string_pretty(current)?),
        other => println!("{}", other),
    }
    Ok(())
}

/// Set a config value by dotted key, creating the file if needed
///
/// The result must still be a valid configuration or nothing is written.
/// The file is rewritten from the parsed table under the standard header.
pub fn config_set(config_path: Option<&Path>, key: &str, value: &str) -> Result<()> {
    let path = resolve_path(config_path);
    if !path.exists() {
        print_info("Creating default configuration...");
        config_init(Some(&path), false)?;
    }

    let mut table = read_table(&path)?;

    let parts: Vec<&str> = key.split('.').collect();
    let (last_key, parents) = parts
        .split_last()
        .filter(|(last, _)| !last.is_empty())
        .ok_or_else(|| anyhow::anyhow!("Invalid key: {:?}", key))?;

    let mut current = &mut table;
    for part in parents {
        current = current
            .entry(part.to_string())
            .or_insert(toml::Value::Table(toml::Table::new()))
            .as_table_mut()
            .ok_or_else(|| anyhow::anyhow!("Cannot navigate to key: {}", key))?;
    }

    // A lone value for a list key (e.g. one port) becomes a one-item list
    let mut parsed = parse_value(value);
    let defaults = toml::Value::try_from(ConfigFile::default())?;
    let expects_array = current.get(*last_key).map_or(false, toml::Value::is_array)
        || lookup(&defaults, key).map_or(false, toml::Value::is_array);
    if expects_array && !parsed.is_array() {
        parsed = toml::Value::Array(vec![parsed]);
    }
    current.insert(last_key.to_string(), parsed);

    let updated: ConfigFile = toml::Value::Table(table.clone())
        .try_into()
        .with_context(|| format!("Invalid value for {}: {}", key, value))?;
    updated.validate()?;

    let body = toml::to_string_pretty(&table)?;
    std::fs::write(&path, format!("{}{}", CONFIG_HEADER, body))
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    print_success(&format!("Set {} = {}", key, value));
    Ok(())
}

/// Show the configuration file, or the defaults if there is none
pub fn config_show(config_path: Option<&Path>) -> Result<()> {
    let path = resolve_path(config_path);

    if !path.exists() {
        print_warning(&format!("No configuration file found at {:?}", path));
        print_info("Showing defaults. Run 'ow-exec config init' to create one");
        println!();
        println!("{}", toml::to_string_pretty(&ConfigFile::default())?);
        return Ok(());
    }

    print_info(&format!("Configuration file: {:?}", path));
    println!();
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;
    println!("{}", content);
    Ok(())
}

/// Write the default configuration
pub fn config_init(config_path: Option<&Path>, force: bool) -> Result<()> {
    let path = resolve_path(config_path);

    if path.exists() && !force {
        print_warning(&format!("Config file already exists: {:?}", path));
        print_info("Use --force to overwrite");
        return Ok(());
    }

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create config directory: {:?}", dir))?;
    }

    let body = toml::to_string_pretty(&ConfigFile::default())?;
    std::fs::write(&path, format!("{}{}", CONFIG_HEADER, body))
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    print_success(&format!("Created configuration file: {:?}", path));
    Ok(())
}
