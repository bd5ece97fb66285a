//! Deterministic mapping from logical bit indices to channel bits.
//!
//! Slots are the non-alpha channels of the grid in raster order (row-major,
//! left to right, top to bottom, channels in storage order). The first
//! [`HEADER_BITS`] logical bits use one slot each at depth 1. Every later
//! bit belongs to the payload region, which packs `depth` bits into each
//! remaining slot, lowest channel bit first.
//!
//! ```text
//! logical bit:  0 1 2 ... 343 | 344 345 346 | 347 348 349 | ...
//! slot:         0 1 2 ... 343 |     344     |     345     | ...   (depth 3)
//! channel bit:  0 0 0 ...  0  |  0   1   2  |  0   1   2  |
//! ```
//!
//! [`Layout::locate`] is a pure function of its inputs. Embedder and extractor
//! each build their own [`Layout`] and agree on every address without sharing
//! any state.

use std::ops::Range;

use crate::grid::{BitDepth, PixelGrid};
use crate::header::HEADER_BITS;

/// Position of one logical bit inside a pixel grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitAddress {
    pub x: u32,
    pub y: u32,
    /// Storage channel index (alpha is never returned).
    pub channel: u8,
    /// Bit position within the channel value, 0 = least significant.
    pub bit: u8,
}

/// Geometry needed to resolve bit addresses for one grid and payload depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    width: u32,
    channels: u8,
    payload_channels: u8,
    slots: usize,
    depth: BitDepth,
}

impl Layout {
    pub fn new(grid: &PixelGrid, depth: BitDepth) -> Self {
        Self {
            width: grid.width(),
            channels: grid.channels(),
            payload_channels: grid.payload_channels(),
            slots: grid.slot_count(),
            depth,
        }
    }

    pub fn depth(&self) -> BitDepth {
        self.depth
    }

    pub fn slot_count(&self) -> usize {
        self.slots
    }

    /// Whether the grid has enough slots for the header alone.
    pub fn fits_header(&self) -> bool {
        self.slots >= HEADER_BITS
    }

    /// Number of logical bits the grid can address in total.
    pub fn total_bits(&self) -> usize {
        self.first_bit_of_slot(self.slots)
    }

    /// Logical bits available to the payload region.
    pub fn payload_bits(&self) -> usize {
        self.total_bits().saturating_sub(HEADER_BITS)
    }

    /// First logical bit stored in `slot`. Also valid for `slot == slot_count()`.
    pub fn first_bit_of_slot(&self, slot: usize) -> usize {
        if slot <= HEADER_BITS {
            slot
        } else {
            HEADER_BITS + (slot - HEADER_BITS) * self.depth.bits() as usize
        }
    }

    /// Logical bit range stored in a contiguous range of pixels.
    pub fn bit_range_for_pixels(&self, pixels: Range<usize>) -> Range<usize> {
        let k = self.payload_channels as usize;
        let start = (pixels.start * k).min(self.slots);
        let end = (pixels.end * k).min(self.slots);
        self.first_bit_of_slot(start)..self.first_bit_of_slot(end)
    }

    /// Resolves a logical bit index, or `None` past the end of the grid.
    pub fn locate(&self, bit_index: usize) -> Option<BitAddress> {
        let (slot, bit) = if bit_index < HEADER_BITS {
            (bit_index, 0)
        } else {
            let d = self.depth.bits() as usize;
            let rel = bit_index - HEADER_BITS;
            (HEADER_BITS + rel / d, (rel % d) as u8)
        };
        if slot >= self.slots {
            return None;
        }

        let k = self.payload_channels as usize;
        let pixel = slot / k;
        let width = self.width as usize;
        Some(BitAddress {
            x: (pixel % width) as u32,
            y: (pixel / width) as u32,
            channel: (slot % k) as u8,
            bit,
        })
    }

    /// Offset of an address in the grid's flat channel buffer.
    pub fn offset(&self, addr: &BitAddress) -> usize {
        ((addr.y as usize) * (self.width as usize) + addr.x as usize) * self.channels as usize
            + addr.channel as usize
    }
}

/// Resolves `bit_index` for `grid` at payload depth `depth`.
///
/// Same arguments, same answer: there is no hidden state and no randomness.
pub fn locate(bit_index: usize, grid: &PixelGrid, depth: BitDepth) -> Option<BitAddress> {
    Layout::new(grid, depth).locate(bit_index)
}

/// Bit `i` of a byte stream, most significant bit of each byte first.
#[inline]
pub(crate) fn stream_bit(bytes: &[u8], i: usize) -> u8 {
    (bytes[i / 8] >> (7 - (i % 8))) & 1
}

/// Sets bit `i` of a zero-initialised byte stream (MSB first).
#[inline]
pub(crate) fn set_stream_bit(bytes: &mut [u8], i: usize, bit: u8) {
    bytes[i / 8] |= (bit & 1) << (7 - (i % 8));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(width: u32, height: u32, channels: u8) -> PixelGrid {
        PixelGrid::filled(width, height, channels, 0).unwrap()
    }

    #[test]
    fn test_header_bits_are_one_per_slot() {
        let g = grid(200, 1, 3);
        let layout = Layout::new(&g, BitDepth::THREE);

        assert_eq!(
            layout.locate(0),
            Some(BitAddress { x: 0, y: 0, channel: 0, bit: 0 })
        );
        assert_eq!(
            layout.locate(4),
            Some(BitAddress { x: 1, y: 0, channel: 1, bit: 0 })
        );
        // 343 = pixel 114, channel 1
        assert_eq!(
            layout.locate(HEADER_BITS - 1),
            Some(BitAddress { x: 114, y: 0, channel: 1, bit: 0 })
        );
    }

    #[test]
    fn test_payload_bits_fill_low_bits_first() {
        let g = grid(200, 1, 3);
        let layout = Layout::new(&g, BitDepth::THREE);

        let first = layout.locate(HEADER_BITS).unwrap();
        let second = layout.locate(HEADER_BITS + 1).unwrap();
        let third = layout.locate(HEADER_BITS + 2).unwrap();
        let fourth = layout.locate(HEADER_BITS + 3).unwrap();

        assert_eq!((first.x, first.channel, first.bit), (114, 2, 0));
        assert_eq!((second.x, second.channel, second.bit), (114, 2, 1));
        assert_eq!((third.x, third.channel, third.bit), (114, 2, 2));
        assert_eq!((fourth.x, fourth.channel, fourth.bit), (115, 0, 0));
    }

    #[test]
    fn test_rows_wrap() {
        let g = grid(10, 50, 3);
        let addr = locate(31, &g, BitDepth::ONE).unwrap();
        assert_eq!((addr.x, addr.y, addr.channel), (0, 1, 1));
    }

    #[test]
    fn test_alpha_is_skipped() {
        let g = grid(200, 1, 4);
        let layout = Layout::new(&g, BitDepth::ONE);
        for i in 0..layout.total_bits() {
            assert_ne!(layout.locate(i).unwrap().channel, 3);
        }
        let addr = layout.locate(3).unwrap();
        assert_eq!((addr.x, addr.channel), (1, 0));
        assert_eq!(layout.offset(&addr), 4);
    }

    #[test]
    fn test_out_of_range_is_none() {
        let g = grid(100, 100, 3);
        let layout = Layout::new(&g, BitDepth::TWO);
        let total = layout.total_bits();
        assert_eq!(total, HEADER_BITS + (30_000 - HEADER_BITS) * 2);
        assert!(layout.locate(total - 1).is_some());
        assert!(layout.locate(total).is_none());
    }

    #[test]
    fn test_locate_is_deterministic() {
        let g = grid(37, 23, 3);
        for depth in BitDepth::ALL {
            for i in [0, 1, 343, 344, 345, 1000, 2000] {
                assert_eq!(locate(i, &g, depth), locate(i, &g, depth));
            }
        }
    }

    #[test]
    fn test_addresses_are_unique() {
        let g = grid(40, 4, 3);
        let layout = Layout::new(&g, BitDepth::TWO);
        let mut seen = std::collections::HashSet::new();
        for i in 0..layout.total_bits() {
            assert!(seen.insert(layout.locate(i).unwrap()));
        }
    }

    #[test]
    fn test_pixel_ranges_partition_bits() {
        let g = grid(64, 8, 3);
        let layout = Layout::new(&g, BitDepth::THREE);
        let a = layout.bit_range_for_pixels(0..200);
        let b = layout.bit_range_for_pixels(200..512);
        assert_eq!(a.start, 0);
        assert_eq!(a.end, b.start);
        assert_eq!(b.end, layout.total_bits());
    }

    #[test]
    fn test_stream_bits_msb_first() {
        let bytes = [0b1000_0001u8, 0b0100_0000];
        assert_eq!(stream_bit(&bytes, 0), 1);
        assert_eq!(stream_bit(&bytes, 7), 1);
        assert_eq!(stream_bit(&bytes, 9), 1);

        let mut out = [0u8; 2];
        for i in 0..16 {
            set_stream_bit(&mut out, i, stream_bit(&bytes, i));
        }
        assert_eq!(out, bytes);
    }
}
