//! Port status command implementations

use anyhow::Result;
use futures::future::join_all;
use serde::Serialize;

use ow_connector::PortConnector;
use ow_core::config::ConfigFile;
use ow_core::Port;

use crate::output::{format_ports, print_json, print_success};

#[derive(Serialize)]
struct PortStatus {
    port: Port,
    open: bool,
}

/// Check a single port; fails if nothing is listening
pub async fn check_command(config: &ConfigFile, port: Port, json: bool) -> Result<()> {
    let connector = PortConnector::from_config(&config.connection);
    let open = connector.check_port_open(port).await;

    if json {
        print_json(&PortStatus { port, open })?;
    } else if open {
        print_success(&format!("Port {} is available", port));
    }

    if !open {
        anyhow::bail!("Port {} is not available", port);
    }
    Ok(())
}

/// Show the status of every configured port
///
/// Status checks never send data, so they run concurrently.
pub async fn check_all_command(config: &ConfigFile, json: bool) -> Result<()> {
    let connector = PortConnector::from_config(&config.connection);
    let ports = &config.connection.ports;

    let results = join_all(ports.iter().map(|&port| connector.check_port_open(port))).await;
    let statuses: Vec<(Port, bool)> = ports.iter().copied().zip(results).collect();

    if json {
        let rows: Vec<PortStatus> = statuses
            .iter()
            .map(|&(port, open)| PortStatus { port, open })
            .collect();
        print_json(&rows)?;
    } else {
        println!("{}", format_ports(&statuses));
    }

    Ok(())
}
