//! zlib compression for payloads.
//!
//! Unlike a marker-byte scheme, whether compression was applied is recorded
//! in the header flags, so the compressed stream is stored as-is.

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::error::{Result, StegoError};

/// Compression level used for payloads (zlib 0-9).
pub const LEVEL: u32 = 6;

/// Compresses data with zlib.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(data.len() / 2 + 16), Compression::new(LEVEL));
    encoder
        .write_all(data)
        .map_err(|e| StegoError::CompressionError(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| StegoError::CompressionError(e.to_string()))
}

/// Default ceiling on inflated payload size (16 MiB).
pub const DEFAULT_MAX_PLAINTEXT: usize = 16 * 1024 * 1024;

/// Decompresses a zlib stream produced by [`compress`].
///
/// At most `limit` bytes are inflated; a stream that would produce more is
/// rejected with [`StegoError::DecompressionError`] instead of being
/// allocated. The stream's Adler-32 trailer catches most corruption that
/// slips past an unencrypted payload.
pub fn decompress(data: &[u8], limit: usize) -> Result<Vec<u8>> {
    let mut decompressed = Vec::new();
    ZlibDecoder::new(data)
        .take((limit as u64).saturating_add(1))
        .read_to_end(&mut decompressed)
        .map_err(|e| StegoError::DecompressionError(e.to_string()))?;
    if decompressed.len() > limit {
        return Err(StegoError::DecompressionError(format!(
            "stream inflates past the {limit}-byte limit"
        )));
    }
    Ok(decompressed)
}

/// Compresses `data` only if that makes it smaller.
///
/// Returns `None` when the compressed form would not save space.
pub fn compress_if_smaller(data: &[u8]) -> Result<Option<Vec<u8>>> {
    let compressed = compress(data)?;
    if compressed.len() < data.len() {
        Ok(Some(compressed))
    } else {
        Ok(None)
    }
}
