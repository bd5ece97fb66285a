//! Capacity arithmetic.
//!
//! The header takes [`HEADER_BITS`] slots at depth 1; the payload gets the
//! remaining slots at the payload depth. At depth 1 this is exactly
//! `(width * height * channels - HEADER_BITS) / 8` bytes.

use crate::addressing::Layout;
use crate::error::{Result, StegoError};
use crate::grid::{BitDepth, PixelGrid};
use crate::header::{HEADER_BITS, HEADER_LEN};

/// Detailed capacity figures for one grid and depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapacityReport {
    pub width: u32,
    pub height: u32,
    pub pixels: usize,
    pub channels: u8,
    pub payload_channels: u8,
    pub bit_depth: BitDepth,
    pub header_bits: usize,
    /// Logical bits available to the payload region.
    pub available_bits: usize,
    /// Whole payload bytes that fit (after the header), capped at `u32::MAX`.
    pub available_bytes: usize,
}

impl CapacityReport {
    /// Share of the capacity a payload of `len` bytes would use, in percent.
    pub fn usage_percent(&self, len: usize) -> f64 {
        if self.available_bytes == 0 {
            return 100.0;
        }
        len as f64 * 100.0 / self.available_bytes as f64
    }
}

/// Maximum payload bytes `grid` can hold at `depth`.
///
/// Computed as `floor((slots - HEADER_BITS) * depth / 8)` because the header
/// always fills the first [`HEADER_BITS`] slots at depth 1. At depths 2 and 3
/// this is smaller than `(slots * depth - HEADER_BITS) / 8` (by 86 bytes at
/// depth 3 once the grid is large enough); both agree at depth 1.
///
/// Returns 0 if the grid cannot even hold the header.
pub fn capacity(grid: &PixelGrid, depth: BitDepth) -> usize {
    let layout = Layout::new(grid, depth);
    if !layout.fits_header() {
        return 0;
    }
    (layout.payload_bits() / 8).min(u32::MAX as usize)
}

/// Checks that a prepared payload of `payload_len` bytes fits.
///
/// # Errors
/// [`StegoError::CapacityExceeded`] with the required and available byte counts
/// (header included on both sides).
pub fn validate(grid: &PixelGrid, depth: BitDepth, payload_len: usize) -> Result<()> {
    let available = capacity(grid, depth);
    let fits_header = Layout::new(grid, depth).fits_header();
    if !fits_header || payload_len > available {
        return Err(StegoError::CapacityExceeded {
            required: payload_len.saturating_add(HEADER_LEN),
            available: if fits_header { available + HEADER_LEN } else { grid.slot_count() / 8 },
        });
    }
    Ok(())
}

/// Full capacity breakdown, as shown by the `capacity` command.
pub fn report(grid: &PixelGrid, depth: BitDepth) -> CapacityReport {
    let layout = Layout::new(grid, depth);
    CapacityReport {
        width: grid.width(),
        height: grid.height(),
        pixels: grid.pixel_count(),
        channels: grid.channels(),
        payload_channels: grid.payload_channels(),
        bit_depth: depth,
        header_bits: HEADER_BITS,
        available_bits: if layout.fits_header() { layout.payload_bits() } else { 0 },
        available_bytes: capacity(grid, depth),
    }
}
