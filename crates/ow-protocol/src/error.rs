//! Protocol error types

use thiserror::Error;

/// Errors that can occur while encoding or decoding a payload
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Deflate stream could not be produced
    #[error("Compression failed: {0}")]
    Compression(#[source] std::io::Error),

    /// Received bytes are not a valid zlib stream
    #[error("Decompression failed: {0}")]
    Decompression(#[source] std::io::Error),

    /// Inflated stream exceeds the receive limit
    #[error("Payload too large: more than {max} bytes after decompression")]
    PayloadTooLarge { max: usize },

    /// Inflated payload is not UTF-8 text
    #[error("Payload is not valid UTF-8")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
