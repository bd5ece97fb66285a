//! Digest command - hash a file for the audit trail.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use stegvault::{digest, EngineConfig};

use super::CommandExecutor;

/// Print the SHA-256 of one or more files.
#[derive(Args, Debug)]
pub struct DigestCommand {
    /// Files to hash
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

impl CommandExecutor for DigestCommand {
    fn execute(&self, _config: &EngineConfig) -> Result<()> {
        for path in &self.files {
            let hash = digest::digest_file(path)
                .with_context(|| format!("Failed to hash {}", path.display()))?;
            println!("{}  {}", digest::to_hex(&hash), path.display());
        }
        Ok(())
    }
}
