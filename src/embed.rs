//! Writing header and payload bits into a carrier.
//!
//! Embedding is all-or-nothing: the payload is prepared and checked against
//! the carrier's capacity before the first channel value is touched.
//!
//! [`Embedder::embed`] returns a modified copy and leaves the input alone.
//! [`Embedder::embed_in_place`] writes into the caller's grid, and is the
//! only operation in this crate that mutates a grid it was given.

use log::{debug, warn};
use rayon::prelude::*;

use crate::addressing::{stream_bit, Layout};
use crate::capacity;
use crate::codec;
use crate::config::EngineConfig;
use crate::error::{Result, StegoError};
use crate::grid::{BitDepth, PixelGrid};
use crate::header::{Header, HEADER_BITS};

/// Embeds payloads into pixel grids.
#[derive(Debug, Clone, Default)]
pub struct Embedder {
    config: EngineConfig,
}

/// A payload that has passed the codec and the capacity check.
struct Plan {
    header: Header,
    payload: Vec<u8>,
    layout: Layout,
}

impl Embedder {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Hides `plaintext` in a copy of `grid`.
    ///
    /// # Arguments
    /// * `key` - 32-byte symmetric key; `None` embeds without encryption
    /// * `depth` - low-order bits per channel for the payload region
    /// * `compress` - try zlib before encrypting (kept only if it helps)
    ///
    /// # Returns
    /// A grid with the same shape as `grid` in which only addressed low-order
    /// bits differ.
    pub fn embed(
        &self,
        grid: &PixelGrid,
        plaintext: &[u8],
        key: Option<&[u8]>,
        depth: BitDepth,
        compress: bool,
    ) -> Result<PixelGrid> {
        let plan = self.plan(grid, plaintext, key, depth, compress)?;
        let mut output = grid.clone();
        self.write(&mut output, &plan);
        Ok(output)
    }

    /// Hides `plaintext` directly in `grid`.
    ///
    /// On error the grid is left exactly as it was. Returns the header that
    /// was written.
    pub fn embed_in_place(
        &self,
        grid: &mut PixelGrid,
        plaintext: &[u8],
        key: Option<&[u8]>,
        depth: BitDepth,
        compress: bool,
    ) -> Result<Header> {
        let plan = self.plan(grid, plaintext, key, depth, compress)?;
        self.write(grid, &plan);
        Ok(plan.header)
    }

    fn plan(
        &self,
        grid: &PixelGrid,
        plaintext: &[u8],
        key: Option<&[u8]>,
        depth: BitDepth,
        compress: bool,
    ) -> Result<Plan> {
        let fits_inflate_limit = plaintext.len() <= self.config.max_plaintext_bytes;
        if compress && !fits_inflate_limit {
            debug!(
                "{} bytes exceed the {}-byte inflate limit, storing uncompressed",
                plaintext.len(),
                self.config.max_plaintext_bytes
            );
        }
        let compress = compress && fits_inflate_limit;

        let prepared = codec::prepare(plaintext, key, compress)?;
        if compress && !prepared.flags.compressed {
            warn!("compression requested but gave no gain; payload stored uncompressed");
        }

        capacity::validate(grid, depth, prepared.bytes.len())?;
        let payload_len = u32::try_from(prepared.bytes.len()).map_err(|_| StegoError::CapacityExceeded {
            required: prepared.bytes.len(),
            available: u32::MAX as usize,
        })?;

        let header = Header::new(depth, prepared.flags, payload_len, plaintext);
        debug!(
            "embedding {} bytes ({} prepared) into {}x{}x{} at depth {}",
            plaintext.len(),
            payload_len,
            grid.width(),
            grid.height(),
            grid.channels(),
            depth
        );

        Ok(Plan {
            header,
            payload: prepared.bytes,
            layout: Layout::new(grid, depth),
        })
    }

    fn write(&self, grid: &mut PixelGrid, plan: &Plan) {
        write_header(grid, &plan.header);
        self.write_payload(grid, &plan.layout, &plan.payload);
    }

    /// Writes the payload region, splitting the grid into pixel chunks.
    ///
    /// Chunks are a multiple of 8 pixels, so each one starts on a payload
    /// byte boundary and owns a disjoint slice of the channel buffer.
    fn write_payload(&self, grid: &mut PixelGrid, layout: &Layout, payload: &[u8]) {
        if payload.is_empty() {
            return;
        }

        let channels = grid.channels() as usize;
        let payload_channels = grid.payload_channels() as usize;
        let end_bit = HEADER_BITS + payload.len() * 8;
        let depth = layout.depth().bits() as usize;
        let end_slot = HEADER_BITS + (payload.len() * 8).div_ceil(depth);
        let end_pixel = end_slot.div_ceil(payload_channels);

        let chunk_pixels = self.config.aligned_chunk_pixels();
        let region = &mut grid.as_raw_mut()[..end_pixel * channels];

        let worker = |(index, chunk): (usize, &mut [u8])| {
            let first_pixel = index * chunk_pixels;
            let pixels = first_pixel..first_pixel + chunk.len() / channels;
            let bits = layout.bit_range_for_pixels(pixels);
            let base = first_pixel * channels;

            for i in bits.start.max(HEADER_BITS)..bits.end.min(end_bit) {
                if let Some(addr) = layout.locate(i) {
                    let bit = stream_bit(payload, i - HEADER_BITS);
                    let value = &mut chunk[layout.offset(&addr) - base];
                    *value = (*value & !(1 << addr.bit)) | (bit << addr.bit);
                }
            }
        };

        if self.config.use_parallel(payload.len()) {
            debug!("payload split into chunks of {chunk_pixels} pixels across workers");
            region
                .par_chunks_mut(chunk_pixels * channels)
                .enumerate()
                .for_each(worker);
        } else {
            region
                .chunks_mut(chunk_pixels * channels)
                .enumerate()
                .for_each(worker);
        }
    }
}

/// Writes the header into the first [`HEADER_BITS`] slots at depth 1.
fn write_header(grid: &mut PixelGrid, header: &Header) {
    let layout = Layout::new(grid, BitDepth::ONE);
    let bits = header.to_bits();
    let raw = grid.as_raw_mut();
    for (i, bit) in bits.into_iter().enumerate() {
        if let Some(addr) = layout.locate(i) {
            let value = &mut raw[layout.offset(&addr)];
            *value = (*value & !1) | bit;
        }
    }
}

/// Hides `plaintext` in a copy of `grid` with the default configuration.
pub fn embed(
    grid: &PixelGrid,
    plaintext: &[u8],
    key: Option<&[u8]>,
    depth: BitDepth,
    compress: bool,
) -> Result<PixelGrid> {
    Embedder::default().embed(grid, plaintext, key, depth, compress)
}
