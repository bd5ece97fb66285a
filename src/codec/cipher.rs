//! Authenticated encryption for payloads.
//!
//! Uses ChaCha20-Poly1305 with a caller-supplied 256-bit key and a fresh
//! 96-bit nonce per message from the OS RNG.
//!
//! Output format: nonce (12 bytes) || ciphertext || tag (16 bytes)

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Nonce,
};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Result, StegoError};

/// Key length in bytes.
pub const KEY_LEN: usize = 32;

/// Nonce size for ChaCha20Poly1305.
pub const NONCE_LEN: usize = 12;

/// Poly1305 tag size.
pub const TAG_LEN: usize = 16;

/// Bytes added to every encrypted payload.
pub const OVERHEAD: usize = NONCE_LEN + TAG_LEN;

/// A derived 256-bit symmetric key, wiped on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey([u8; KEY_LEN]);

impl SymmetricKey {
    /// Accepts exactly [`KEY_LEN`] bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let key: [u8; KEY_LEN] = bytes.try_into().map_err(|_| {
            StegoError::EncryptionError(format!(
                "key must be {KEY_LEN} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(key))
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl From<[u8; KEY_LEN]> for SymmetricKey {
    fn from(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }
}

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SymmetricKey(..)")
    }
}

/// Encrypts `plaintext` under `key` with a random nonce.
pub fn encrypt(plaintext: &[u8], key: &SymmetricKey) -> Result<Vec<u8>> {
    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let cipher = ChaCha20Poly1305::new_from_slice(key.as_bytes())
        .map_err(|e| StegoError::EncryptionError(e.to_string()))?;

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| StegoError::EncryptionError(e.to_string()))?;

    let mut result = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    result.extend_from_slice(&nonce_bytes);
    result.extend_from_slice(&ciphertext);
    Ok(result)
}

/// Decrypts and authenticates data produced by [`encrypt`].
pub fn decrypt(data: &[u8], key: &SymmetricKey) -> Result<Vec<u8>> {
    if data.len() < OVERHEAD {
        return Err(StegoError::DecryptionError(format!(
            "ciphertext too short ({} bytes)",
            data.len()
        )));
    }

    let (nonce_bytes, ciphertext) = data.split_at(NONCE_LEN);
    let cipher = ChaCha20Poly1305::new_from_slice(key.as_bytes())
        .map_err(|e| StegoError::DecryptionError(e.to_string()))?;

    cipher
        .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|_| StegoError::DecryptionError("authentication failed (wrong key or corrupted data)".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(byte: u8) -> SymmetricKey {
        SymmetricKey::from([byte; KEY_LEN])
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let encrypted = encrypt(b"Hello, stegvault!", &key(7)).unwrap();
        assert_eq!(encrypted.len(), 17 + OVERHEAD);
        assert_eq!(decrypt(&encrypted, &key(7)).unwrap(), b"Hello, stegvault!");
    }

    #[test]
    fn test_wrong_key_fails() {
        let encrypted = encrypt(b"Secret data", &key(1)).unwrap();
        assert!(matches!(
            decrypt(&encrypted, &key(2)),
            Err(StegoError::DecryptionError(_))
        ));
    }

    #[test]
    fn test_nonces_are_fresh() {
        let a = encrypt(b"same", &key(3)).unwrap();
        let b = encrypt(b"same", &key(3)).unwrap();
        assert_ne!(a[..NONCE_LEN], b[..NONCE_LEN]);
    }

    #[test]
    fn test_ciphertext_too_short() {
        assert!(matches!(
            decrypt(&[0u8; 10], &key(0)),
            Err(StegoError::DecryptionError(_))
        ));
    }

    #[test]
    fn test_malformed_key_rejected() {
        assert!(matches!(
            SymmetricKey::from_slice(&[0u8; 16]),
            Err(StegoError::EncryptionError(_))
        ));
    }
}
