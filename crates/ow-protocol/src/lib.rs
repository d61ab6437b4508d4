//! ow-protocol: Wire format for the Opiumware loopback channel
//!
//! A script travels as a single zlib stream written straight to a TCP
//! socket. There is no length prefix and no message boundary: the receiver
//! reads until the sender closes and then inflates what it got.

pub mod codec;
pub mod command;
pub mod deflate;
pub mod error;
pub mod payload;

pub use codec::DeflateCodec;
pub use command::{Command, SCRIPT_PREFIX, SETTING_PREFIX};
pub use deflate::{compress, decompress, DEFAULT_COMPRESSION_LEVEL, MAX_PAYLOAD_SIZE};
pub use error::ProtocolError;
pub use payload::{Payload, SENTINEL};
