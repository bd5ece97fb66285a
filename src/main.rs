//! Stegvault - LSB steganography for lossless images
//!
//! Command-line front end over the `stegvault` engine. Loads and saves image
//! files, turns passphrases into keys, and maps engine errors to exit codes.

mod commands;

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Builder;
use log::LevelFilter;

use commands::{
    CapacityCommand, CommandExecutor, CompareCommand, DigestCommand, EmbedCommand, ExtractCommand,
    InspectCommand,
};
use stegvault::{EngineConfig, StegoError};

/// Stegvault - hide data in the low-order bits of lossless images
///
/// Payloads are optionally compressed and encrypted (ChaCha20-Poly1305),
/// prefixed with a self-describing header, and spread across pixel channels.
#[derive(Parser)]
#[command(name = "stegvault")]
#[command(version)]
#[command(about = "LSB steganography with authenticated encryption for PNG/BMP/TIFF carriers")]
#[command(long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (default: ~/.stegvault/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hide a message or file in a carrier image
    Embed(EmbedCommand),

    /// Recover a hidden payload from a stego image
    Extract(ExtractCommand),

    /// Show how many bytes a carrier can hold
    Capacity(CapacityCommand),

    /// Show the embedded header of a stego image
    Inspect(InspectCommand),

    /// Print SHA-256 digests of files
    Digest(DigestCommand),

    /// Measure how much a stego image differs from its carrier
    Compare(CompareCommand),
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<EngineConfig> {
    let config = match path {
        Some(path) => EngineConfig::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EngineConfig::load().context("Failed to load config")?,
    };
    Ok(config)
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli.config.as_ref())?;

    let command: &dyn CommandExecutor = match &cli.command {
        Commands::Embed(cmd) => cmd,
        Commands::Extract(cmd) => cmd,
        Commands::Capacity(cmd) => cmd,
        Commands::Inspect(cmd) => cmd,
        Commands::Digest(cmd) => cmd,
        Commands::Compare(cmd) => cmd,
    };
    command.execute(&config)
}

/// Exit code for an error: the engine's code if it came from the engine.
fn exit_code(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<StegoError>())
        .map(StegoError::exit_code)
        .unwrap_or(1)
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    if let Err(err) = run(&cli) {
        eprintln!("Error: {err:#}");
        std::process::exit(exit_code(&err));
    }
}
