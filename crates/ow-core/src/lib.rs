//! ow-core: Core abstractions and configuration for the Opiumware executor
//!
//! This crate provides the shared types, error taxonomy, traits and
//! configuration used by the connector and the command-line front-end.

pub mod config;
pub mod error;
pub mod store;
pub mod traits;
pub mod types;

pub use error::{ConfigError, ConnectionError, OwError, StoreError};
pub use store::{import_file, FsScriptStore, ImportedScript};
pub use types::{AttemptResult, ConnectionState, Port, CANDIDATE_PORTS};
