//! Fixed-layout preamble written ahead of every payload.
//!
//! The header is always embedded at bit depth 1 in the first
//! [`HEADER_BITS`] channel slots, so an extractor can read it before it
//! knows anything else about the carrier.
//!
//! Layout (43 bytes, big-endian):
//!
//! ```text
//! [4 bytes ] magic "SVLT"
//! [1 byte  ] format version
//! [1 byte  ] payload bit depth (1-3)
//! [1 byte  ] flags: bit 0 = compressed, bit 1 = encrypted
//! [4 bytes ] payload length in bytes (after compression/encryption)
//! [32 bytes] SHA-256 of the original plaintext
//! ```

use sha2::{Digest, Sha256};

use crate::error::{Result, StegoError};
use crate::grid::BitDepth;

/// Identifies this engine's embedding format.
pub const MAGIC: [u8; 4] = *b"SVLT";

/// Newest header version this build writes and understands.
pub const FORMAT_VERSION: u8 = 1;

/// Length of the checksum field.
pub const CHECKSUM_LEN: usize = 32;

/// Serialized header length in bytes.
pub const HEADER_LEN: usize = 4 + 1 + 1 + 1 + 4 + CHECKSUM_LEN;

/// Serialized header length in bits (one channel slot per bit).
pub const HEADER_BITS: usize = HEADER_LEN * 8;

const FLAG_COMPRESSED: u8 = 0b0000_0001;
const FLAG_ENCRYPTED: u8 = 0b0000_0010;
const FLAG_KNOWN: u8 = FLAG_COMPRESSED | FLAG_ENCRYPTED;

/// Which codec stages were applied to the payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    pub compressed: bool,
    pub encrypted: bool,
}

impl Flags {
    pub fn to_byte(self) -> u8 {
        let mut byte = 0;
        if self.compressed {
            byte |= FLAG_COMPRESSED;
        }
        if self.encrypted {
            byte |= FLAG_ENCRYPTED;
        }
        byte
    }

    /// Parses the flag byte, rejecting bits this version does not define.
    pub fn from_byte(byte: u8) -> Result<Self> {
        if byte & !FLAG_KNOWN != 0 {
            return Err(StegoError::CorruptHeader(format!(
                "unknown flag bits 0x{byte:02x}"
            )));
        }
        Ok(Self {
            compressed: byte & FLAG_COMPRESSED != 0,
            encrypted: byte & FLAG_ENCRYPTED != 0,
        })
    }
}

/// Decoded header metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub version: u8,
    pub bit_depth: BitDepth,
    pub flags: Flags,
    pub payload_len: u32,
    pub checksum: [u8; CHECKSUM_LEN],
}

impl Header {
    /// Builds a current-version header for a prepared payload.
    pub fn new(bit_depth: BitDepth, flags: Flags, payload_len: u32, plaintext: &[u8]) -> Self {
        Self {
            version: FORMAT_VERSION,
            bit_depth,
            flags,
            payload_len,
            checksum: checksum(plaintext),
        }
    }

    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[0..4].copy_from_slice(&MAGIC);
        out[4] = self.version;
        out[5] = self.bit_depth.bits();
        out[6] = self.flags.to_byte();
        out[7..11].copy_from_slice(&self.payload_len.to_be_bytes());
        out[11..].copy_from_slice(&self.checksum);
        out
    }

    /// Header as a bit sequence (one `0`/`1` per element, MSB first).
    pub fn to_bits(&self) -> Vec<u8> {
        self.to_bytes()
            .iter()
            .flat_map(|byte| (0..8).rev().map(move |i| (byte >> i) & 1))
            .collect()
    }

    /// Parses a serialized header.
    ///
    /// Checks run in order: magic, version, then structural constraints, so a
    /// foreign carrier always reports [`StegoError::InvalidMagic`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != HEADER_LEN {
            return Err(StegoError::CorruptHeader(format!(
                "expected {HEADER_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        if bytes[0..4] != MAGIC {
            return Err(StegoError::InvalidMagic);
        }

        let version = bytes[4];
        if version > FORMAT_VERSION {
            return Err(StegoError::UnsupportedVersion {
                found: version,
                supported: FORMAT_VERSION,
            });
        }
        if version == 0 {
            return Err(StegoError::CorruptHeader("version 0".to_string()));
        }

        let bit_depth = BitDepth::new(bytes[5])
            .map_err(|_| StegoError::CorruptHeader(format!("bit depth {}", bytes[5])))?;
        let flags = Flags::from_byte(bytes[6])?;

        let mut len_bytes = [0u8; 4];
        len_bytes.copy_from_slice(&bytes[7..11]);
        let mut checksum = [0u8; CHECKSUM_LEN];
        checksum.copy_from_slice(&bytes[11..]);

        Ok(Self {
            version,
            bit_depth,
            flags,
            payload_len: u32::from_be_bytes(len_bytes),
            checksum,
        })
    }

    /// Inverse of [`Header::to_bits`].
    pub fn from_bits(bits: &[u8]) -> Result<Self> {
        if bits.len() != HEADER_BITS {
            return Err(StegoError::CorruptHeader(format!(
                "expected {HEADER_BITS} bits, got {}",
                bits.len()
            )));
        }
        let bytes: Vec<u8> = bits
            .chunks(8)
            .map(|chunk| chunk.iter().fold(0u8, |acc, bit| (acc << 1) | (bit & 1)))
            .collect();
        Self::from_bytes(&bytes)
    }

    /// Whether `plaintext` hashes to the stored checksum.
    pub fn matches(&self, plaintext: &[u8]) -> bool {
        checksum(plaintext) == self.checksum
    }
}

/// SHA-256 of the plaintext payload.
pub fn checksum(plaintext: &[u8]) -> [u8; CHECKSUM_LEN] {
    Sha256::digest(plaintext).into()
}
