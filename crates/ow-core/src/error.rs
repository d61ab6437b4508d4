//! Core error types for the executor

use std::io;
use std::path::PathBuf;

use ow_protocol::ProtocolError;
use serde::Serialize;
use thiserror::Error;

/// Top-level error type for the executor
#[derive(Error, Debug)]
pub enum OwError {
    /// Protocol error
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Connection error
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),

    /// Script store error
    #[error("Script store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Why a single connection attempt failed
///
/// Carried inside [`crate::AttemptResult`], so it holds rendered reasons
/// rather than the originating `io::Error`.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "reason", rename_all = "snake_case")]
pub enum ConnectionError {
    /// Nothing is listening on the port
    #[error("Connection refused: {0}")]
    Refused(String),

    /// Address or network could not be reached
    #[error("Host unreachable: {0}")]
    Unreachable(String),

    /// Peer reset or aborted the connection
    #[error("Connection reset: {0}")]
    Reset(String),

    /// Writing the payload failed after connecting
    #[error("Write failed: {0}")]
    WriteFailure(String),

    /// Payload could not be compressed
    #[error("Compression failed: {0}")]
    CompressionFailure(String),

    /// Any other socket error
    #[error("{0}")]
    Other(String),
}

impl ConnectionError {
    /// Classify an error raised while establishing a connection
    pub fn from_connect(err: &io::Error) -> Self {
        let reason = err.to_string();
        match err.kind() {
            io::ErrorKind::ConnectionRefused => Self::Refused(reason),
            io::ErrorKind::ConnectionReset | io::ErrorKind::ConnectionAborted => {
                Self::Reset(reason)
            }
            io::ErrorKind::AddrNotAvailable => Self::Unreachable(reason),
            _ if is_unreachable(err) => Self::Unreachable(reason),
            _ => Self::Other(reason),
        }
    }

    /// Classify an error raised while waiting for the listener to close
    pub fn from_drain(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::ConnectionReset | io::ErrorKind::ConnectionAborted => {
                Self::Reset(err.to_string())
            }
            _ => Self::Other(err.to_string()),
        }
    }

    /// Classify an error raised while writing or closing
    pub fn from_write(err: &io::Error) -> Self {
        Self::WriteFailure(err.to_string())
    }
}

/// Host or network unreachable, matched on the raw OS error
#[cfg(unix)]
fn is_unreachable(err: &io::Error) -> bool {
    matches!(
        err.raw_os_error(),
        Some(libc::EHOSTUNREACH) | Some(libc::ENETUNREACH)
    )
}

#[cfg(windows)]
fn is_unreachable(err: &io::Error) -> bool {
    use windows_sys::Win32::Networking::WinSock::{WSAEHOSTUNREACH, WSAENETUNREACH};

    matches!(
        err.raw_os_error(),
        Some(WSAEHOSTUNREACH) | Some(WSAENETUNREACH)
    )
}

#[cfg(not(any(unix, windows)))]
fn is_unreachable(_err: &io::Error) -> bool {
    false
}

impl From<ProtocolError> for ConnectionError {
    fn from(err: ProtocolError) -> Self {
        Self::CompressionFailure(err.to_string())
    }
}

/// Script store errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// Name is empty or would escape the scripts directory
    #[error("Invalid script name: {0:?}")]
    InvalidName(String),

    /// No script with that name
    #[error("Script not found: {0}")]
    NotFound(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// Invalid configuration
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialize error
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refused_classification() {
        let err = io::Error::from(io::ErrorKind::ConnectionRefused);
        assert!(matches!(
            ConnectionError::from_connect(&err),
            ConnectionError::Refused(_)
        ));
    }

    #[test]
    fn test_reset_classification() {
        let err = io::Error::from(io::ErrorKind::ConnectionAborted);
        assert!(matches!(
            ConnectionError::from_connect(&err),
            ConnectionError::Reset(_)
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreachable_classification() {
        for code in [libc::EHOSTUNREACH, libc::ENETUNREACH] {
            let err = io::Error::from_raw_os_error(code);
            assert!(matches!(
                ConnectionError::from_connect(&err),
                ConnectionError::Unreachable(_)
            ));
        }
    }

    #[test]
    fn test_not_found_is_not_unreachable() {
        let err = io::Error::from(io::ErrorKind::NotFound);
        assert!(matches!(
            ConnectionError::from_connect(&err),
            ConnectionError::Other(_)
        ));
    }

    #[test]
    fn test_drain_classification() {
        let err = io::Error::from(io::ErrorKind::ConnectionReset);
        assert!(matches!(
            ConnectionError::from_drain(&err),
            ConnectionError::Reset(_)
        ));
    }

    #[test]
    fn test_write_classification() {
        let err = io::Error::from(io::ErrorKind::BrokenPipe);
        assert!(matches!(
            ConnectionError::from_write(&err),
            ConnectionError::WriteFailure(_)
        ));
    }

    #[test]
    fn test_serialize_tagged() {
        let err = ConnectionError::Refused("nope".to_string());
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, r#"{"kind":"refused","reason":"nope"}"#);
    }
}
