//! Capacity command - show how much a carrier can hold.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use stegvault::{capacity, carrier, BitDepth, EngineConfig};

use super::CommandExecutor;

/// Show the embedding capacity of a carrier image.
#[derive(Args, Debug)]
pub struct CapacityCommand {
    /// Carrier image
    #[arg(short, long)]
    pub image: PathBuf,

    /// Only report this bit depth (default: all)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=3))]
    pub bits: Option<u8>,
}

impl CommandExecutor for CapacityCommand {
    fn execute(&self, _config: &EngineConfig) -> Result<()> {
        let grid = carrier::load(&self.image)
            .with_context(|| format!("Failed to load carrier {}", self.image.display()))?;

        let depths = match self.bits {
            Some(bits) => vec![BitDepth::new(bits)?],
            None => BitDepth::ALL.to_vec(),
        };

        println!("Image: {}", self.image.display());
        println!(
            "  {}x{} pixels, {} channels ({} usable)",
            grid.width(),
            grid.height(),
            grid.channels(),
            grid.payload_channels()
        );
        for depth in depths {
            let report = capacity::report(&grid, depth);
            println!(
                "  depth {}: {} bytes ({} bits after {}-bit header)",
                depth, report.available_bytes, report.available_bits, report.header_bits
            );
        }
        Ok(())
    }
}
