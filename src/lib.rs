//! # Stegvault - LSB steganography for pixel grids
//!
//! Stegvault hides an arbitrary byte payload in the least significant bits
//! of an image's channel values and recovers it byte-for-byte later.
//!
//! ## Overview
//!
//! ```text
//! plaintext -> codec (zlib, ChaCha20-Poly1305) -> payload bytes
//!                                                  |
//!        header (magic, version, depth, flags, length, SHA-256)
//!                                                  |
//!        addressing (header at depth 1, payload at depth 1-3) -> pixel grid
//! ```
//!
//! - **Self-describing**: a fixed 43-byte header, always at depth 1, tells
//!   the extractor the payload depth, length and codec stages
//! - **All-or-nothing**: capacity and key checks complete before any channel
//!   value is written; extraction never returns partial data
//! - **Stateless addressing**: embedder and extractor compute identical bit
//!   positions from `(bit index, grid shape, depth)` alone
//! - **Parallel**: payload regions are split into disjoint, byte-aligned
//!   chunks processed by rayon workers without locks
//! - **Typed failures**: wrong key, foreign carrier and tampered payload are
//!   distinct [`StegoError`] variants
//!
//! The engine works on in-memory [`PixelGrid`]s. Reading and writing image
//! files lives in [`carrier`], which only accepts lossless formats.
//!
//! ## Example Usage
//!
//! ```rust
//! use stegvault::{embed, extract, BitDepth, PixelGrid, StegoError};
//!
//! let carrier = PixelGrid::from_fn(100, 100, 3, |x, y, c| (x + y + c as u32) as u8).unwrap();
//! let key = [7u8; 32];
//!
//! let stego = embed(&carrier, b"hello world", Some(&key[..]), BitDepth::ONE, false).unwrap();
//! assert_eq!(extract(&stego, Some(&key[..])).unwrap(), b"hello world");
//!
//! let wrong = [8u8; 32];
//! assert!(matches!(
//!     extract(&stego, Some(&wrong[..])),
//!     Err(StegoError::DecryptionError(_))
//! ));
//! ```
//!
//! ## Modules
//!
//! - [`codec`]: compression and authenticated encryption of payloads
//! - [`header`]: fixed-layout preamble
//! - [`capacity`]: how many bytes a grid can hold
//! - [`addressing`]: logical bit index to channel bit mapping
//! - [`embed`] / [`extract`]: the two directions of the engine
//! - [`digest`]: whole-file SHA-256 for audit logs
//! - [`quality`]: carrier-versus-stego perturbation metrics
//! - [`carrier`]: image file boundary (PNG, BMP, TIFF)
//! - [`config`]: engine tunables from `~/.stegvault/config.toml`

pub mod addressing;
pub mod capacity;
pub mod carrier;
pub mod codec;
pub mod config;
pub mod digest;
pub mod embed;
pub mod error;
pub mod extract;
pub mod grid;
pub mod header;
pub mod quality;

// Re-export commonly used types at the crate root
pub use addressing::{locate, BitAddress, Layout};
pub use capacity::{capacity, validate, CapacityReport};
pub use carrier::CarrierError;
pub use codec::{prepare, recover, recover_bounded, Prepared, SymmetricKey, KEY_LEN};
pub use config::{ConfigError, EngineConfig};
pub use digest::digest;
pub use embed::{embed, Embedder};
pub use error::StegoError;
pub use extract::{extract, read_header, Extracted, Extractor};
pub use grid::{BitDepth, PixelGrid};
pub use header::{Flags, Header, FORMAT_VERSION, HEADER_BITS, HEADER_LEN, MAGIC};
pub use quality::Perturbation;
