//! zlib compression of payloads
//!
//! Streams carry a 2-byte zlib header, a raw deflate body and an adler32
//! trailer, which is what the listener expects to inflate.

use std::io::{Read, Write};

use bytes::Bytes;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::error::ProtocolError;

/// Compression level used when none is configured
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// Upper bound on an inflated stream accepted by the receiving side (16MB)
pub const MAX_PAYLOAD_SIZE: usize = 16 * 1024 * 1024;

/// Compress bytes into a zlib stream
///
/// Levels above 9 are clamped.
pub fn compress(data: &[u8], level: u32) -> Result<Bytes, ProtocolError> {
    let mut encoder = ZlibEncoder::new(
        Vec::with_capacity(data.len() / 2 + 16),
        Compression::new(level.min(9)),
    );
    encoder.write_all(data).map_err(ProtocolError::Compression)?;
    let compressed = encoder.finish().map_err(ProtocolError::Compression)?;
    Ok(Bytes::from(compressed))
}

/// Inflate a complete zlib stream
pub fn decompress(data: &[u8]) -> Result<Bytes, ProtocolError> {
    let mut decoder = ZlibDecoder::new(data).take(MAX_PAYLOAD_SIZE as u64 + 1);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(ProtocolError::Decompression)?;

    if out.len() > MAX_PAYLOAD_SIZE {
        return Err(ProtocolError::PayloadTooLarge {
            max: MAX_PAYLOAD_SIZE,
        });
    }

    Ok(Bytes::from(out))
}
