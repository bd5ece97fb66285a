//! Embed command - hide a message or file in a lossless carrier image.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use log::info;

use stegvault::{capacity, carrier, digest, BitDepth, Embedder, EngineConfig};

use super::key::KeyArgs;
use super::CommandExecutor;

/// Hide a message or file in the low-order bits of an image.
///
/// The carrier must be lossless (PNG, BMP or TIFF). Output is always PNG.
#[derive(Args, Debug)]
pub struct EmbedCommand {
    /// Carrier image
    #[arg(short, long)]
    pub image: PathBuf,

    /// Text message to hide (mutually exclusive with --file)
    #[arg(short, long, conflicts_with = "file", required_unless_present = "file")]
    pub text: Option<String>,

    /// File to hide (mutually exclusive with --text)
    #[arg(short, long, conflicts_with = "text")]
    pub file: Option<PathBuf>,

    /// Output stego image (defaults to <image>_stego.png)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub key: KeyArgs,

    /// Low-order bits per channel for the payload (1-3)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=3))]
    pub bits: Option<u8>,

    /// Store the payload without compression
    #[arg(long)]
    pub no_compress: bool,
}

impl CommandExecutor for EmbedCommand {
    fn execute(&self, config: &EngineConfig) -> Result<()> {
        let secret = self.read_secret()?;
        let depth = BitDepth::new(self.bits.unwrap_or(config.default_bit_depth))?;
        let compress = config.compress && !self.no_compress;
        let key = self.key.resolve()?;

        let grid = carrier::load(&self.image)
            .with_context(|| format!("Failed to load carrier {}", self.image.display()))?;

        let available = capacity(&grid, depth);
        info!(
            "carrier {}x{}x{}, capacity {} bytes at depth {}",
            grid.width(),
            grid.height(),
            grid.channels(),
            available,
            depth
        );

        let stego = Embedder::new(config.clone()).embed(
            &grid,
            &secret,
            key.as_ref().map(|k| k.as_bytes().as_slice()),
            depth,
            compress,
        )?;

        let output = self.output_path();
        carrier::save(&stego, &output)
            .with_context(|| format!("Failed to write {}", output.display()))?;

        let file_digest = digest::digest_file(&output)
            .with_context(|| format!("Failed to hash {}", output.display()))?;

        println!("Embedded {} bytes into {}", secret.len(), output.display());
        println!("  Bit depth:  {depth}");
        println!("  Encrypted:  {}", if key.is_some() { "yes" } else { "no" });
        println!("  Capacity:   {available} bytes");
        println!("  SHA-256:    {}", digest::to_hex(&file_digest));
        Ok(())
    }
}

impl EmbedCommand {
    fn read_secret(&self) -> Result<Vec<u8>> {
        match (&self.text, &self.file) {
            (Some(text), _) => Ok(text.as_bytes().to_vec()),
            (None, Some(path)) => std::fs::read(path)
                .with_context(|| format!("Failed to read secret file {}", path.display())),
            (None, None) => bail!("Either --text or --file must be provided"),
        }
    }

    fn output_path(&self) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => {
                let stem = self
                    .image
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("carrier");
                self.image.with_file_name(format!("{stem}_stego.png"))
            }
        }
    }
}
