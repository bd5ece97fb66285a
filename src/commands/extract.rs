//! Extract command - recover a hidden payload from a stego image.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use log::info;

use stegvault::{carrier, EngineConfig, Extractor};

use super::key::KeyArgs;
use super::CommandExecutor;

/// Recover the payload hidden in a stego image.
///
/// Without -o/--output the payload is printed as text (lossy UTF-8).
#[derive(Args, Debug)]
pub struct ExtractCommand {
    /// Stego image
    #[arg(short, long)]
    pub image: PathBuf,

    /// Write the recovered bytes to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub key: KeyArgs,
}

impl CommandExecutor for ExtractCommand {
    fn execute(&self, config: &EngineConfig) -> Result<()> {
        let key = self.key.resolve()?;
        let grid = carrier::load(&self.image)
            .with_context(|| format!("Failed to load stego image {}", self.image.display()))?;

        let extracted = Extractor::new(config.clone())
            .extract_with_header(&grid, key.as_ref().map(|k| k.as_bytes().as_slice()))?;
        info!(
            "recovered {} bytes (depth {}, compressed={}, encrypted={})",
            extracted.plaintext.len(),
            extracted.header.bit_depth,
            extracted.header.flags.compressed,
            extracted.header.flags.encrypted
        );

        match &self.output {
            Some(path) => {
                std::fs::write(path, &extracted.plaintext)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("Extracted {} bytes to {}", extracted.plaintext.len(), path.display());
            }
            None => {
                let mut stdout = std::io::stdout();
                writeln!(stdout, "{}", String::from_utf8_lossy(&extracted.plaintext))?;
            }
        }
        Ok(())
    }
}
