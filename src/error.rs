//! Engine error taxonomy.
//!
//! Every engine operation returns either its success value or exactly one
//! [`StegoError`]. Wrong keys, undersized carriers and damaged headers are
//! all expected failures and surface here, never as panics.

use thiserror::Error;

/// Errors that can occur while embedding into or extracting from a pixel grid.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StegoError {
    /// The payload (after compression/encryption) plus header does not fit the carrier.
    #[error("Carrier too small: need {required} bytes, have capacity for {available}")]
    CapacityExceeded { required: usize, available: usize },

    /// The header magic did not match; the grid was never written by this engine.
    #[error("No embedded data found (invalid magic)")]
    InvalidMagic,

    /// The header was written by a newer format version.
    #[error("Unsupported header version {found} (this build supports up to {supported})")]
    UnsupportedVersion { found: u8, supported: u8 },

    /// The header has the right magic but violates a structural constraint.
    #[error("Corrupt header: {0}")]
    CorruptHeader(String),

    /// Key was malformed, or the cipher refused to encrypt.
    #[error("Encryption failed: {0}")]
    EncryptionError(String),

    /// Authentication failed: wrong key or corrupted ciphertext.
    #[error("Decryption failed: {0}")]
    DecryptionError(String),

    /// The compressor failed on the embed side.
    #[error("Compression failed: {0}")]
    CompressionError(String),

    /// The payload decrypted (or was plain) but did not inflate.
    #[error("Decompression failed: {0}")]
    DecompressionError(String),

    /// Data was recovered but does not match the checksum stored in the header.
    #[error("Checksum mismatch: recovered payload was corrupted or tampered with")]
    ChecksumMismatch,

    /// Bit depth outside {1, 2, 3}.
    #[error("Unsupported bit depth {0} (expected 1, 2 or 3)")]
    UnsupportedBitDepth(u8),

    /// Caller passed an inconsistent pixel grid. This is a programmer error.
    #[error("Invalid pixel grid: {0}")]
    InvalidGrid(String),
}

impl StegoError {
    /// Process exit code the command-line boundary uses for this error.
    ///
    /// Distinct codes let scripts tell a wrong key (4) from a damaged carrier
    /// (3) from a tampered payload (5).
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::CapacityExceeded { .. } => 2,
            Self::InvalidMagic | Self::UnsupportedVersion { .. } | Self::CorruptHeader(_) => 3,
            Self::DecryptionError(_) | Self::EncryptionError(_) => 4,
            Self::ChecksumMismatch | Self::DecompressionError(_) => 5,
            Self::CompressionError(_) => 6,
            Self::UnsupportedBitDepth(_) | Self::InvalidGrid(_) => 64,
        }
    }
}

/// Result alias used throughout the engine.
pub type Result<T> = std::result::Result<T, StegoError>;
