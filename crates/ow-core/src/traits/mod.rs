//! Core trait definitions

mod probe;
mod store;

pub use probe::PortProbe;
pub use store::ScriptStore;
