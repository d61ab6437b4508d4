//! Attach and connect command implementations

use anyhow::Result;
use serde::Serialize;

use ow_connector::{Executor, PortConnector};
use ow_core::config::ConfigFile;
use ow_core::{ConnectionState, Port};
use ow_protocol::Payload;

use crate::output::{print_info, print_json, print_success};

#[derive(Serialize)]
struct AttachOutput {
    port: Option<Port>,
    state: ConnectionState,
}

/// Probe the configured ports in order and report the first listener
pub async fn attach_command(config: &ConfigFile, json: bool) -> Result<()> {
    let executor = Executor::from_config(config);

    if !json {
        print_info("Attempting to auto-attach...");
    }
    let found = executor.probe().await;

    if json {
        print_json(&AttachOutput {
            port: found,
            state: executor.state(),
        })?;
    }

    match found {
        Some(port) => {
            if !json {
                print_success(&format!("Successfully connected to port {}", port));
            }
            Ok(())
        }
        None => anyhow::bail!("Failed to connect on all ports"),
    }
}

/// Single attempt against one port, optionally carrying a payload
///
/// A payload of `NULL` is treated the same as no payload.
pub async fn connect_command(
    config: &ConfigFile,
    port: Port,
    payload: Option<String>,
    json: bool,
) -> Result<()> {
    let connector = PortConnector::from_config(&config.connection);
    let payload = payload.and_then(Payload::from_text);

    if !json {
        print_info(&format!("Attempting to connect to port {}...", port));
    }
    let result = connector
        .attempt_connect_and_send(port, payload.as_ref())
        .await;

    if json {
        print_json(&result)?;
    } else if result.is_success() {
        print_success(&result.to_string());
    }

    if !result.is_success() {
        anyhow::bail!("{}", result);
    }
    Ok(())
}
