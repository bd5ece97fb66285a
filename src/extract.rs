//! Recovering payloads from stego grids.
//!
//! Extraction is a two-phase read: the fixed depth-1 header first, then the
//! payload region at the depth the header declares. Nothing partial is ever
//! returned; any failure discards what was read.

use log::debug;
use rayon::prelude::*;

use crate::addressing::{set_stream_bit, Layout};
use crate::capacity::capacity;
use crate::codec;
use crate::config::EngineConfig;
use crate::error::{Result, StegoError};
use crate::grid::{BitDepth, PixelGrid};
use crate::header::{Header, HEADER_BITS, HEADER_LEN};

/// A recovered plaintext together with the header that described it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub plaintext: Vec<u8>,
    pub header: Header,
}

/// Extracts payloads from pixel grids.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    config: EngineConfig,
}

impl Extractor {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Reads and validates the header without touching the payload region.
    ///
    /// A grid too small to hold a header cannot carry valid magic and yields
    /// [`StegoError::InvalidMagic`].
    pub fn read_header(&self, grid: &PixelGrid) -> Result<Header> {
        let layout = Layout::new(grid, BitDepth::ONE);
        if !layout.fits_header() {
            return Err(StegoError::InvalidMagic);
        }

        let raw = grid.as_raw();
        let mut bytes = [0u8; HEADER_LEN];
        for i in 0..HEADER_BITS {
            if let Some(addr) = layout.locate(i) {
                set_stream_bit(&mut bytes, i, raw[layout.offset(&addr)] & 1);
            }
        }
        Header::from_bytes(&bytes)
    }

    /// Recovers the plaintext hidden in `grid`.
    ///
    /// # Errors
    /// Header errors (`InvalidMagic`, `UnsupportedVersion`, `CorruptHeader`),
    /// codec errors (`DecryptionError`, `DecompressionError`) and
    /// `ChecksumMismatch` when the recovered bytes fail the stored digest.
    /// An unencrypted payload that fails to inflate, or inflates past
    /// `max_plaintext_bytes`, is also reported as `ChecksumMismatch`.
    pub fn extract(&self, grid: &PixelGrid, key: Option<&[u8]>) -> Result<Vec<u8>> {
        self.extract_with_header(grid, key).map(|e| e.plaintext)
    }

    /// Like [`Extractor::extract`], also returning the header.
    pub fn extract_with_header(&self, grid: &PixelGrid, key: Option<&[u8]>) -> Result<Extracted> {
        let header = self.read_header(grid)?;

        let payload_len = header.payload_len as usize;
        let available = capacity(grid, header.bit_depth);
        if payload_len > available {
            return Err(StegoError::CorruptHeader(format!(
                "declares {payload_len} payload bytes, carrier holds at most {available} at depth {}",
                header.bit_depth
            )));
        }
        debug!(
            "header ok: {} payload bytes at depth {}, compressed={}, encrypted={}",
            payload_len, header.bit_depth, header.flags.compressed, header.flags.encrypted
        );

        let layout = Layout::new(grid, header.bit_depth);
        let payload = self.read_payload(grid, &layout, payload_len);
        let plaintext =
            codec::recover_bounded(&payload, key, header.flags, self.config.max_plaintext_bytes)
                .map_err(|e| match e {
                    // Without authentication a corrupt stream is a tampered payload.
                    StegoError::DecompressionError(_) if !header.flags.encrypted => {
                        StegoError::ChecksumMismatch
                    }
                    other => other,
                })?;

        if !header.matches(&plaintext) {
            return Err(StegoError::ChecksumMismatch);
        }

        Ok(Extracted { plaintext, header })
    }

    /// Reads exactly `len` payload bytes, one worker per output chunk.
    fn read_payload(&self, grid: &PixelGrid, layout: &Layout, len: usize) -> Vec<u8> {
        let mut out = vec![0u8; len];
        if len == 0 {
            return out;
        }

        let raw = grid.as_raw();
        // The chunk_pixels setting doubles as payload bytes per worker here.
        let bytes_per_worker = self.config.aligned_chunk_pixels();

        let worker = |(index, chunk): (usize, &mut [u8])| {
            let first_bit = HEADER_BITS + index * bytes_per_worker * 8;
            for j in 0..chunk.len() * 8 {
                if let Some(addr) = layout.locate(first_bit + j) {
                    let bit = (raw[layout.offset(&addr)] >> addr.bit) & 1;
                    set_stream_bit(chunk, j, bit);
                }
            }
        };

        if self.config.use_parallel(len) {
            out.par_chunks_mut(bytes_per_worker).enumerate().for_each(worker);
        } else {
            out.chunks_mut(bytes_per_worker).enumerate().for_each(worker);
        }
        out
    }
}

/// Recovers the plaintext hidden in `grid` with the default configuration.
pub fn extract(grid: &PixelGrid, key: Option<&[u8]>) -> Result<Vec<u8>> {
    Extractor::default().extract(grid, key)
}

/// Reads only the header of `grid`.
pub fn read_header(grid: &PixelGrid) -> Result<Header> {
    Extractor::default().read_header(grid)
}
