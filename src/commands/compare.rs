//! Compare command - measure how much an embed changed a carrier.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use stegvault::quality::{self, DEFAULT_MSE_THRESHOLD};
use stegvault::{carrier, EngineConfig};

use super::CommandExecutor;

/// Compare an original carrier with its stego image.
#[derive(Args, Debug)]
pub struct CompareCommand {
    /// Original carrier image
    #[arg(long)]
    pub original: PathBuf,

    /// Stego image
    #[arg(long)]
    pub stego: PathBuf,

    /// Mean squared error at or above which the change counts as visible
    #[arg(long, default_value_t = DEFAULT_MSE_THRESHOLD)]
    pub threshold: f64,
}

impl CommandExecutor for CompareCommand {
    fn execute(&self, _config: &EngineConfig) -> Result<()> {
        let original = carrier::load(&self.original)
            .with_context(|| format!("Failed to load {}", self.original.display()))?;
        let stego = carrier::load(&self.stego)
            .with_context(|| format!("Failed to load {}", self.stego.display()))?;

        let report = quality::compare(&original, &stego)?;
        println!("Changed channel values: {}", report.changed_channels);
        println!("Max delta:              {}", report.max_delta);
        println!("MSE:                    {:.4}", report.mse);
        match report.psnr() {
            Some(psnr) => println!("PSNR:                   {psnr:.2} dB"),
            None => println!("PSNR:                   identical"),
        }
        if report.is_imperceptible(self.threshold) {
            println!("Result: within threshold ({})", self.threshold);
        } else {
            println!("Result: visible change (MSE >= {})", self.threshold);
        }
        Ok(())
    }
}
