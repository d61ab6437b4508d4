//! Tokio codec for the unframed deflate stream

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::deflate::{compress, decompress, DEFAULT_COMPRESSION_LEVEL, MAX_PAYLOAD_SIZE};
use crate::error::ProtocolError;
use crate::payload::Payload;

/// Codec for one compressed payload per connection
///
/// Encoding appends the zlib stream for a payload. Decoding buffers until
/// the peer closes, then inflates everything received as a single payload.
#[derive(Debug, Clone)]
pub struct DeflateCodec {
    level: u32,
}

impl DeflateCodec {
    /// Create a codec with the default compression level
    pub fn new() -> Self {
        Self::with_level(DEFAULT_COMPRESSION_LEVEL)
    }

    /// Create a codec with an explicit compression level
    pub fn with_level(level: u32) -> Self {
        Self { level }
    }
}

impl Default for DeflateCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for DeflateCodec {
    type Item = Payload;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        // Bound the buffered stream; inflated size is checked in decode_eof
        if src.len() > MAX_PAYLOAD_SIZE {
            return Err(ProtocolError::PayloadTooLarge {
                max: MAX_PAYLOAD_SIZE,
            });
        }
        Ok(None)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.is_empty() {
            return Ok(None);
        }
        let compressed = src.split().freeze();
        let inflated = decompress(&compressed)?;
        tracing::trace!(
            compressed = compressed.len(),
            inflated = inflated.len(),
            "Decoded payload"
        );
        Ok(Some(Payload::from_bytes(inflated)))
    }
}

impl Encoder<Payload> for DeflateCodec {
    type Error = ProtocolError;

    fn encode(&mut self, payload: Payload, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let compressed = compress(payload.as_bytes(), self.level)?;
        dst.extend_from_slice(&compressed);
        Ok(())
    }
}
