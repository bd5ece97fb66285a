//! Payload codec: compression and encryption, no image knowledge.
//!
//! Embedding runs [`prepare`]: optional zlib compression, then optional
//! ChaCha20-Poly1305 encryption. Extraction runs [`recover`], which undoes
//! whichever stages the header flags say were applied.

pub mod cipher;
pub mod compression;

pub use cipher::{SymmetricKey, KEY_LEN};
pub use compression::DEFAULT_MAX_PLAINTEXT;

use log::debug;

use crate::error::{Result, StegoError};
use crate::header::Flags;

/// Payload bytes ready to embed, plus the stages that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prepared {
    pub bytes: Vec<u8>,
    pub flags: Flags,
}

/// Compresses (if requested and beneficial) and encrypts (if a key is given).
///
/// # Errors
/// [`StegoError::EncryptionError`] if `key` is not exactly 32 bytes.
pub fn prepare(plaintext: &[u8], key: Option<&[u8]>, compress: bool) -> Result<Prepared> {
    let key = key.map(SymmetricKey::from_slice).transpose()?;

    let mut flags = Flags::default();
    let mut bytes = if compress {
        match compression::compress_if_smaller(plaintext)? {
            Some(compressed) => {
                debug!(
                    "compressed payload {} -> {} bytes",
                    plaintext.len(),
                    compressed.len()
                );
                flags.compressed = true;
                compressed
            }
            None => {
                debug!("compression skipped: no gain on {} bytes", plaintext.len());
                plaintext.to_vec()
            }
        }
    } else {
        plaintext.to_vec()
    };

    if let Some(key) = key {
        bytes = cipher::encrypt(&bytes, &key)?;
        flags.encrypted = true;
    }

    Ok(Prepared { bytes, flags })
}

/// Inverse of [`prepare`], driven by the header flags.
///
/// # Errors
/// - [`StegoError::DecryptionError`] if authentication fails or the payload is
///   encrypted but no key was supplied.
/// - [`StegoError::DecompressionError`] if the decrypted bytes do not inflate.
/// - [`StegoError::EncryptionError`] if `key` is not exactly 32 bytes.
pub fn recover(bytes: &[u8], key: Option<&[u8]>, flags: Flags) -> Result<Vec<u8>> {
    recover_bounded(bytes, key, flags, compression::DEFAULT_MAX_PLAINTEXT)
}

/// Like [`recover`], inflating at most `max_plaintext` bytes.
pub fn recover_bounded(
    bytes: &[u8],
    key: Option<&[u8]>,
    flags: Flags,
    max_plaintext: usize,
) -> Result<Vec<u8>> {
    let decrypted = if flags.encrypted {
        let key = key
            .ok_or_else(|| StegoError::DecryptionError("payload is encrypted but no key was given".to_string()))?;
        let key = SymmetricKey::from_slice(key)?;
        cipher::decrypt(bytes, &key)?
    } else {
        bytes.to_vec()
    };

    if flags.compressed {
        compression::decompress(&decrypted, max_plaintext)
    } else {
        Ok(decrypted)
    }
}
