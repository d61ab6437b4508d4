//! Script payloads
//!
//! The front-end historically passed the literal text `"NULL"` to mean
//! "connect but send nothing". That sentinel is recognised here and turned
//! into `None`; everything below this layer works with `Option<&Payload>`.

use std::fmt;

use bytes::Bytes;

/// Reserved text meaning "no payload, connectivity probe only"
pub const SENTINEL: &str = "NULL";

/// Script text to be compressed and written to the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload(Bytes);

impl Payload {
    /// Build a payload from text, mapping the sentinel and empty text to `None`
    pub fn from_text(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.is_empty() || text == SENTINEL {
            return None;
        }
        Some(Self(Bytes::from(text)))
    }

    /// Wrap raw bytes without sentinel handling
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    /// Raw bytes of the payload
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Payload as text, if it is valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }

    /// Uncompressed length in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the payload holds no bytes
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume into the underlying buffer
    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}
