//! Application-level command strings
//!
//! Each execution sends independent connect-compress-write-close cycles:
//! first one `OpiumwareSetting <key> <value>` per setting, then a single
//! `OpiumwareScript <code>`. The connector itself never inspects these.

use std::fmt;

use crate::payload::Payload;

/// Prefix of a setting command
pub const SETTING_PREFIX: &str = "OpiumwareSetting";

/// Prefix of a script command
pub const SCRIPT_PREFIX: &str = "OpiumwareScript";

/// A command understood by the Opiumware listener
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Toggle a listener-side setting
    Setting { key: String, value: String },
    /// Execute script source
    Script(String),
    /// Text that carries neither prefix
    Raw(String),
}

impl Command {
    /// Create a setting command
    pub fn setting(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Setting {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create a script command
    pub fn script(code: impl Into<String>) -> Self {
        Self::Script(code.into())
    }

    /// Parse received text back into a command
    pub fn parse(text: &str) -> Self {
        if let Some(rest) = strip_command(text, SETTING_PREFIX) {
            if let Some((key, value)) = rest.split_once(' ') {
                return Self::setting(key, value);
            }
        } else if let Some(code) = strip_command(text, SCRIPT_PREFIX) {
            return Self::script(code);
        }
        Self::Raw(text.to_string())
    }

    /// Render the command as a wire payload
    ///
    /// Always `Some` unless the command is a raw empty string or the sentinel.
    pub fn to_payload(&self) -> Option<Payload> {
        Payload::from_text(self.to_string())
    }

    /// Short label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Command::Setting { .. } => "setting",
            Command::Script(_) => "script",
            Command::Raw(_) => "raw",
        }
    }
}

fn strip_command<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    text.strip_prefix(prefix)?.strip_prefix(' ')
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Setting { key, value } => write!(f, "{} {} {}", SETTING_PREFIX, key, value),
            Command::Script(code) => write!(f, "{} {}", SCRIPT_PREFIX, code),
            Command::Raw(text) => write!(f, "{}", text),
        }
    }
}
