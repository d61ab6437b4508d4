//! Output formatting utilities for the CLI
//!
//! Tables for port status and saved scripts, execution summaries, JSON
//! output and coloured status lines.

use std::io::Write;

use anyhow::Result;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use ow_connector::ExecutionReport;
use ow_core::Port;

/// Format the availability of each port as an ASCII table
///
/// Returns "No ports configured" if the list is empty.
pub fn format_ports(ports: &[(Port, bool)]) -> String {
    if ports.is_empty() {
        return "No ports configured".to_string();
    }

    #[derive(Tabled)]
    struct PortRow {
        #[tabled(rename = "PORT")]
        port: u16,
        #[tabled(rename = "STATUS")]
        status: &'static str,
    }

    let rows: Vec<PortRow> = ports
        .iter()
        .map(|(port, open)| PortRow {
            port: port.get(),
            status: if *open { "available" } else { "not available" },
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

/// Format saved script names as an ASCII table
pub fn format_scripts(names: &[String]) -> String {
    if names.is_empty() {
        return "No saved scripts".to_string();
    }

    #[derive(Tabled)]
    struct ScriptRow {
        #[tabled(rename = "#")]
        index: usize,
        #[tabled(rename = "NAME")]
        name: String,
    }

    let rows: Vec<ScriptRow> = names
        .iter()
        .enumerate()
        .map(|(i, name)| ScriptRow {
            index: i + 1,
            name: name.clone(),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

/// One line per command sent during an execution
pub fn format_report(report: &ExecutionReport) -> String {
    let mut output = String::new();
    for setting in &report.settings {
        output.push_str(&format!("setting: {}\n", setting));
    }
    output.push_str(&format!("script:  {}", report.script));
    output
}

/// Print any serializable value as pretty JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_status(out: &mut impl Write, color: Color, symbol: &str, msg: &str) {
    let _ = crossterm::execute!(
        out,
        SetForegroundColor(color),
        Print(symbol),
        Print(" "),
        ResetColor,
        Print(msg),
        Print("\n")
    );
}

/// Print a success message in green to stdout
pub fn print_success(msg: &str) {
    print_status(&mut std::io::stdout(), Color::Green, "✓", msg);
}

/// Print an error message in red to stderr
pub fn print_error(msg: &str) {
    print_status(&mut std::io::stderr(), Color::Red, "✗", msg);
}

/// Print a warning message in yellow to stderr
pub fn print_warning(msg: &str) {
    print_status(&mut std::io::stderr(), Color::Yellow, "⚠", msg);
}

/// Print an informational message in cyan to stdout
pub fn print_info(msg: &str) {
    print_status(&mut std::io::stdout(), Color::Cyan, "ℹ", msg);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ow_core::AttemptResult;

    #[test]
    fn test_format_ports() {
        let a = Port::new(8392).unwrap();
        let b = Port::new(8393).unwrap();
        let table = format_ports(&[(a, false), (b, true)]);
        assert!(table.contains("PORT"));
        assert!(table.contains("8392"));
        assert!(table.contains("not available"));
        assert!(table.contains("available"));
        assert_eq!(format_ports(&[]), "No ports configured");
    }

    #[test]
    fn test_format_scripts() {
        let table = format_scripts(&["fly".to_string(), "noclip".to_string()]);
        assert!(table.contains("NAME"));
        assert!(table.contains("noclip"));
        assert_eq!(format_scripts(&[]), "No saved scripts");
    }

    #[test]
    fn test_format_report() {
        let port = Port::new(8392).unwrap();
        let report = ExecutionReport {
            port,
            settings: vec![AttemptResult::ConnectedAndSent { port, bytes: 30 }],
            script: AttemptResult::Timeout { port },
        };
        let text = format_report(&report);
        assert!(text.starts_with("setting: Successfully executed script on port: 8392"));
        assert!(text.ends_with("script:  Connection to port 8392 timed out"));
    }
}
