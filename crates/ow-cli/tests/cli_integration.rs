//! CLI integration tests
//!
//! Runs the ow-exec binary against temporary config files and plain
//! std TCP listeners standing in for the receiver.

use std::io::Read;
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn ow_exec() -> Command {
    Command::cargo_bin("ow-exec")
        .expect("Failed to locate ow-exec binary - ensure it's built before running tests")
}

/// Write a config whose script store lives inside `dir`
fn write_config(dir: &TempDir, extra: &str) -> PathBuf {
    let path = dir.path().join("config.toml");
    let scripts = dir.path().join("scripts");
    let body = format!("[scripts]\ndir = '{}'\n\n{}", scripts.display(), extra);
    std::fs::write(&path, body).unwrap();
    path
}

fn ports_config(port: u16) -> String {
    format!(
        "[connection]\nports = [{}]\nconnect_timeout = 2000\ncheck_timeout = 500\n",
        port
    )
}

/// A loopback port with nothing listening on it
fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

/// Accept `count` connections and return the raw bytes of each
fn receiver(count: usize) -> (u16, JoinHandle<Vec<Vec<u8>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let handle = thread::spawn(move || {
        (0..count)
            .map(|_| {
                let (mut stream, _) = listener.accept().unwrap();
                let mut buf = Vec::new();
                stream.read_to_end(&mut buf).unwrap();
                buf
            })
            .collect()
    });
    (port, handle)
}

fn decoded(raw: &[u8]) -> String {
    let bytes = ow_protocol::decompress(raw).unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn config_arg(path: &Path) -> [&std::ffi::OsStr; 2] {
    ["--config".as_ref(), path.as_os_str()]
}

#[test]
fn test_cli_help() {
    ow_exec()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ow-exec"))
        .stdout(predicate::str::contains("Opiumware"));
}

#[test]
fn test_cli_version() {
    ow_exec()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ow-exec"));
}

#[test]
fn test_cli_exec_help() {
    ow_exec()
        .args(["exec", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--eval"))
        .stdout(predicate::str::contains("--port"));
}

#[test]
fn test_cli_scripts_lifecycle() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "");

    ow_exec()
        .args(config_arg(&config))
        .args(["scripts", "save", "hello"])
        .write_stdin("print('hello')\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved script: hello"));

    assert!(dir.path().join("scripts").join("hello.lua").exists());

    ow_exec()
        .args(config_arg(&config))
        .args(["scripts", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hello"));

    ow_exec()
        .args(config_arg(&config))
        .args(["scripts", "show", "hello"])
        .assert()
        .success()
        .stdout(predicate::str::contains("print('hello')"));

    ow_exec()
        .args(config_arg(&config))
        .args(["scripts", "delete", "hello"])
        .assert()
        .success();

    ow_exec()
        .args(config_arg(&config))
        .args(["scripts", "show", "hello"])
        .assert()
        .failure();
}

#[test]
fn test_cli_scripts_import() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "");
    let source = dir.path().join("esp.lua");
    std::fs::write(&source, "print('esp')").unwrap();

    ow_exec()
        .args(config_arg(&config))
        .args(["scripts", "import"])
        .arg(&source)
        .assert()
        .success();

    ow_exec()
        .args(config_arg(&config))
        .args(["--json", "scripts", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"esp\""));
}

#[test]
fn test_cli_scripts_save_empty_fails() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "");

    ow_exec()
        .args(config_arg(&config))
        .args(["scripts", "save", "blank"])
        .write_stdin("   \n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("empty"));
}

#[test]
fn test_cli_exec_empty_script() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &ports_config(closed_port()));

    ow_exec()
        .args(config_arg(&config))
        .args(["exec", "-e", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No script to execute"));
}

#[test]
fn test_cli_exec_not_connected() {
    let dir = TempDir::new().unwrap();
    let extra = format!(
        "{}\n[execution]\nauto_attach = false\n",
        ports_config(closed_port())
    );
    let config = write_config(&dir, &extra);

    ow_exec()
        .args(config_arg(&config))
        .args(["exec", "-e", "print(1)"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not connected to any port"));
}

#[test]
fn test_cli_attach_fails_when_nothing_listens() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &ports_config(closed_port()));

    ow_exec()
        .args(config_arg(&config))
        .arg("attach")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to connect on all ports"));
}

#[test]
fn test_cli_check_closed_port() {
    let dir = TempDir::new().unwrap();
    let port = closed_port();
    let config = write_config(&dir, &ports_config(port));

    ow_exec()
        .args(config_arg(&config))
        .args(["check", &port.to_string()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not available"));
}

#[test]
fn test_cli_connect_with_payload() {
    let dir = TempDir::new().unwrap();
    let (port, handle) = receiver(1);
    let config = write_config(&dir, &ports_config(port));

    ow_exec()
        .args(config_arg(&config))
        .args(["connect", &port.to_string(), "--payload", "hello"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "Successfully executed script on port: {}",
            port
        )));

    let received = handle.join().unwrap();
    assert_eq!(decoded(&received[0]), "hello");
}

#[test]
fn test_cli_connect_sentinel_sends_nothing() {
    let dir = TempDir::new().unwrap();
    let (port, handle) = receiver(1);
    let config = write_config(&dir, &ports_config(port));

    ow_exec()
        .args(config_arg(&config))
        .args(["connect", &port.to_string(), "--payload", "NULL"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no script sent"));

    assert!(handle.join().unwrap()[0].is_empty());
}

#[test]
fn test_cli_exec_sends_settings_then_script() {
    let dir = TempDir::new().unwrap();
    // Attach probe, EnableWS setting, script
    let (port, handle) = receiver(3);
    let config = write_config(&dir, &ports_config(port));

    ow_exec()
        .args(config_arg(&config))
        .args(["exec", "-e", "print('hi')", "--port", &port.to_string()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Script executed successfully"));

    let received = handle.join().unwrap();
    assert!(received[0].is_empty());
    assert_eq!(decoded(&received[1]), "OpiumwareSetting EnableWS true");
    assert_eq!(decoded(&received[2]), "OpiumwareScript print('hi')");
}

#[test]
fn test_cli_config_init_get_set() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("ow").join("config.toml");

    ow_exec()
        .args(config_arg(&config))
        .args(["config", "init"])
        .assert()
        .success();
    assert!(config.exists());

    ow_exec()
        .args(config_arg(&config))
        .args(["config", "get", "connection.connect_timeout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3000"));

    ow_exec()
        .args(config_arg(&config))
        .args(["config", "set", "connection.connect_timeout", "1500"])
        .assert()
        .success();

    ow_exec()
        .args(config_arg(&config))
        .args(["config", "get", "connection.connect_timeout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1500"));
}

#[test]
fn test_cli_config_set_rejects_invalid() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "");

    ow_exec()
        .args(config_arg(&config))
        .args(["config", "set", "connection.compression_level", "12"])
        .assert()
        .failure();
}

#[test]
fn test_cli_config_path() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("custom.toml");

    ow_exec()
        .args(config_arg(&config))
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("custom.toml"));
}
