//! ow-exec: Command-line front-end for the Opiumware executor
//!
//! Attaches to the local listener, checks ports, executes scripts and
//! manages the saved-script library.

pub mod commands;
pub mod output;
