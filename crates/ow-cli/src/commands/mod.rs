//! CLI command implementations

mod attach;
mod check;
mod config;
mod exec;
mod listen;
mod scripts;

pub use attach::{attach_command, connect_command};
pub use check::{check_all_command, check_command};
pub use config::{config_get, config_init, config_set, config_show};
pub use exec::{exec_command, ScriptSource};
pub use listen::{listen_command, receive_command};
pub use scripts::{
    scripts_delete, scripts_import, scripts_list, scripts_save, scripts_show,
};
