//! Engine configuration, stored in `~/.stegvault/config.toml`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::codec::DEFAULT_MAX_PLAINTEXT;
use crate::grid::BitDepth;

/// Default pixels per worker chunk.
pub const DEFAULT_CHUNK_PIXELS: usize = 4096;

/// Payloads below this size are processed on the calling thread.
pub const DEFAULT_MIN_PARALLEL_BYTES: usize = 16 * 1024;

/// Errors that can occur when loading or saving configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config directory not found. Unable to determine home directory.")]
    NoConfigDir,

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),
}

/// Tunables for embedding and extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Spread payload regions across rayon workers.
    pub parallel: bool,

    /// Pixels per worker chunk. Rounded up to a multiple of 8 so every chunk
    /// starts on a payload byte boundary. The extractor uses the same rounded
    /// value as its payload bytes per worker.
    pub chunk_pixels: usize,

    /// Payloads smaller than this stay on one thread.
    pub min_parallel_bytes: usize,

    /// Bit depth used by the CLI when `--bits` is absent.
    pub default_bit_depth: u8,

    /// Whether the CLI compresses by default.
    pub compress: bool,

    /// Largest plaintext a compressed payload may inflate to on extraction.
    /// Larger plaintexts are embedded uncompressed.
    pub max_plaintext_bytes: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            chunk_pixels: DEFAULT_CHUNK_PIXELS,
            min_parallel_bytes: DEFAULT_MIN_PARALLEL_BYTES,
            default_bit_depth: 1,
            compress: true,
            max_plaintext_bytes: DEFAULT_MAX_PLAINTEXT,
        }
    }
}

impl EngineConfig {
    /// Configuration that never spawns workers.
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// Loads the configuration from the default location.
    ///
    /// Returns defaults if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Loads and validates a configuration file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: EngineConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Writes the configuration as TOML, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_pixels == 0 {
            return Err(ConfigError::Invalid("chunk_pixels must be positive".to_string()));
        }
        if self.max_plaintext_bytes == 0 {
            return Err(ConfigError::Invalid("max_plaintext_bytes must be positive".to_string()));
        }
        BitDepth::new(self.default_bit_depth)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(())
    }

    /// Chunk size actually used: `chunk_pixels` rounded up to a multiple of 8.
    pub fn aligned_chunk_pixels(&self) -> usize {
        self.chunk_pixels.max(1).div_ceil(8) * 8
    }

    /// Whether a payload of `payload_len` bytes should be processed in parallel.
    pub fn use_parallel(&self, payload_len: usize) -> bool {
        self.parallel && payload_len >= self.min_parallel_bytes
    }

    /// Path to the configuration file.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(get_config_dir()?.join("config.toml"))
    }
}

/// Returns `~/.stegvault`.
pub fn get_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(".stegvault"))
        .ok_or(ConfigError::NoConfigDir)
}
