//! ow-connector: Loopback client for the Opiumware listener
//!
//! Probes a set of local ports, connects with a deadline, compresses a
//! script and writes it, resolving every attempt to an [`AttemptResult`].
//! [`Executor`] layers auto-attach, connection state and the
//! settings-then-script convention on top.
//!
//! [`AttemptResult`]: ow_core::AttemptResult

pub mod connector;
pub mod dialer;
pub mod executor;
pub mod probe;
pub mod state;

pub use connector::{ConnectorOptions, PortConnector};
pub use dialer::{Dialer, LoopbackDialer};
pub use executor::{ExecuteError, ExecutionReport, Executor};
pub use probe::probe_all_ports;
pub use state::ConnectionMonitor;
