//! Inspect command - decode only the header of a stego image.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use stegvault::{carrier, EngineConfig, Extractor};

use super::CommandExecutor;

/// Show the embedded header without decrypting anything.
#[derive(Args, Debug)]
pub struct InspectCommand {
    /// Stego image
    #[arg(short, long)]
    pub image: PathBuf,
}

impl CommandExecutor for InspectCommand {
    fn execute(&self, config: &EngineConfig) -> Result<()> {
        let grid = carrier::load(&self.image)
            .with_context(|| format!("Failed to load {}", self.image.display()))?;
        let header = Extractor::new(config.clone()).read_header(&grid)?;

        println!("Header: {}", self.image.display());
        println!("  Version:     {}", header.version);
        println!("  Bit depth:   {}", header.bit_depth);
        println!("  Payload:     {} bytes", header.payload_len);
        println!("  Compressed:  {}", header.flags.compressed);
        println!("  Encrypted:   {}", header.flags.encrypted);
        println!("  Checksum:    {}", hex::encode(header.checksum));
        Ok(())
    }
}
