//! In-memory pixel grids and bit depths.
//!
//! A [`PixelGrid`] is a row-major `width × height × channels` array of 8-bit
//! channel values. The engine only ever sees this structure; decoding and
//! encoding image files is the job of [`crate::carrier`].

use crate::error::{Result, StegoError};

/// Number of low-order bits per channel used for the payload region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BitDepth(u8);

impl BitDepth {
    /// One bit per channel. The header is always written at this depth.
    pub const ONE: BitDepth = BitDepth(1);
    pub const TWO: BitDepth = BitDepth(2);
    pub const THREE: BitDepth = BitDepth(3);

    /// All supported depths, lowest first.
    pub const ALL: [BitDepth; 3] = [Self::ONE, Self::TWO, Self::THREE];

    /// Creates a bit depth, rejecting anything outside {1, 2, 3}.
    pub fn new(bits: u8) -> Result<Self> {
        match bits {
            1..=3 => Ok(Self(bits)),
            other => Err(StegoError::UnsupportedBitDepth(other)),
        }
    }

    /// Number of bits as a plain integer.
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Mask covering the low `bits` bits of a channel value.
    pub fn mask(self) -> u8 {
        (1u8 << self.0) - 1
    }
}

impl TryFrom<u8> for BitDepth {
    type Error = StegoError;

    fn try_from(bits: u8) -> Result<Self> {
        Self::new(bits)
    }
}

impl Default for BitDepth {
    fn default() -> Self {
        Self::ONE
    }
}

impl std::fmt::Display for BitDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Channel values needed for a `width` x `height` grid with `channels` per pixel.
fn buffer_len(width: u32, height: u32, channels: u8) -> Result<usize> {
    if !(1..=4).contains(&channels) {
        return Err(StegoError::InvalidGrid(format!(
            "unsupported channel count {channels}"
        )));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(channels as usize))
        .ok_or_else(|| StegoError::InvalidGrid("dimensions overflow".to_string()))
}

/// A decoded carrier image.
///
/// Supported layouts are gray (1), gray+alpha (2), RGB (3) and RGBA (4).
/// Alpha is never used for payload bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    channels: u8,
    data: Vec<u8>,
}

impl PixelGrid {
    /// Wraps a raw channel buffer, checking it against the declared dimensions.
    pub fn new(width: u32, height: u32, channels: u8, data: Vec<u8>) -> Result<Self> {
        let expected = buffer_len(width, height, channels)?;
        if data.len() != expected {
            return Err(StegoError::InvalidGrid(format!(
                "buffer holds {} values, {width}x{height}x{channels} needs {expected}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// A grid with every channel set to `value`.
    pub fn filled(width: u32, height: u32, channels: u8, value: u8) -> Result<Self> {
        let len = buffer_len(width, height, channels)?;
        Self::new(width, height, channels, vec![value; len])
    }

    /// Builds a grid by evaluating `f(x, y, channel)` for every value.
    pub fn from_fn<F>(width: u32, height: u32, channels: u8, mut f: F) -> Result<Self>
    where
        F: FnMut(u32, u32, u8) -> u8,
    {
        let mut data = Vec::with_capacity(buffer_len(width, height, channels)?);
        for y in 0..height {
            for x in 0..width {
                for c in 0..channels {
                    data.push(f(x, y, c));
                }
            }
        }
        Self::new(width, height, channels, data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Channels stored per pixel, including alpha.
    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Whether the last channel of each pixel is alpha.
    pub fn has_alpha(&self) -> bool {
        self.channels == 2 || self.channels == 4
    }

    /// Channels per pixel that carry payload bits (alpha excluded).
    pub fn payload_channels(&self) -> u8 {
        if self.has_alpha() {
            self.channels - 1
        } else {
            self.channels
        }
    }

    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Total number of addressable channel slots.
    pub fn slot_count(&self) -> usize {
        self.pixel_count() * self.payload_channels() as usize
    }

    /// Offset of `(x, y, channel)` in the flat buffer.
    pub fn offset(&self, x: u32, y: u32, channel: u8) -> usize {
        ((y as usize) * (self.width as usize) + x as usize) * self.channels as usize
            + channel as usize
    }

    /// Returns a channel value, or `None` if out of bounds.
    pub fn get(&self, x: u32, y: u32, channel: u8) -> Option<u8> {
        if x >= self.width || y >= self.height || channel >= self.channels {
            return None;
        }
        Some(self.data[self.offset(x, y, channel)])
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn as_raw_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consumes the grid and returns its channel buffer.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Whether `other` has identical width, height and channel layout.
    pub fn same_shape(&self, other: &PixelGrid) -> bool {
        self.width == other.width && self.height == other.height && self.channels == other.channels
    }
}
