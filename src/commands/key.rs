//! Key arguments shared by the embed and extract commands.
//!
//! The engine only accepts an already-derived 256-bit key. Passphrases are
//! turned into one here, at the command-line boundary.

use anyhow::{bail, Context, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use clap::Args;
use hkdf::Hkdf;
use sha2::Sha256;

use stegvault::{SymmetricKey, KEY_LEN};

/// HKDF info string for passphrase-based key derivation.
const HKDF_INFO: &[u8] = b"STEGVAULT-V1-PAYLOAD-KEY";

/// Salt for HKDF (fixed so the same passphrase always yields the same key).
const HKDF_SALT: &[u8] = b"STEGVAULT-V1-SALT";

/// Where the payload key comes from. Omit both to skip encryption.
#[derive(Args, Debug, Clone, Default)]
pub struct KeyArgs {
    /// Passphrase to derive the payload key from
    #[arg(short, long, conflicts_with = "key")]
    pub passphrase: Option<String>,

    /// Raw 256-bit key, as 64 hex digits or base64
    #[arg(short, long, conflicts_with = "passphrase")]
    pub key: Option<String>,
}

impl KeyArgs {
    /// Resolves the arguments into a key, or `None` for no encryption.
    pub fn resolve(&self) -> Result<Option<SymmetricKey>> {
        match (&self.passphrase, &self.key) {
            (Some(passphrase), _) => Ok(Some(derive_key_from_passphrase(passphrase)?)),
            (None, Some(encoded)) => Ok(Some(parse_key(encoded)?)),
            (None, None) => Ok(None),
        }
    }
}

/// Derives a 256-bit key from a passphrase with HKDF-SHA256.
///
/// This is a single HKDF pass with a fixed salt and no work factor, so it
/// does nothing to slow down guessing. Weak passphrases stay weak; pass a
/// random `--key` when that matters.
pub fn derive_key_from_passphrase(passphrase: &str) -> Result<SymmetricKey> {
    if passphrase.is_empty() {
        bail!("passphrase must not be empty");
    }
    let hk = Hkdf::<Sha256>::new(Some(HKDF_SALT), passphrase.as_bytes());
    let mut key = [0u8; KEY_LEN];
    hk.expand(HKDF_INFO, &mut key)
        .map_err(|_| anyhow::anyhow!("key derivation failed"))?;
    Ok(SymmetricKey::from(key))
}

/// Parses a key given as hex (64 digits) or base64.
pub fn parse_key(encoded: &str) -> Result<SymmetricKey> {
    let encoded = encoded.trim();
    let bytes = if encoded.len() == KEY_LEN * 2 && encoded.chars().all(|c| c.is_ascii_hexdigit()) {
        hex::decode(encoded).context("Invalid hex key")?
    } else {
        BASE64.decode(encoded).context("Key is neither 64 hex digits nor base64")?
    };
    Ok(SymmetricKey::from_slice(&bytes)?)
}
