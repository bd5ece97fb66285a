//! Command module - Strategy pattern for CLI commands.
//!
//! Each command is a separate module implementing the `CommandExecutor` trait.

mod capacity;
mod compare;
mod digest;
mod embed;
mod extract;
mod inspect;
mod key;

pub use capacity::CapacityCommand;
pub use compare::CompareCommand;
pub use digest::DigestCommand;
pub use embed::EmbedCommand;
pub use extract::ExtractCommand;
pub use inspect::InspectCommand;

use anyhow::Result;
use stegvault::EngineConfig;

/// Trait for command execution - Strategy pattern.
///
/// Each command struct holds its parsed arguments and implements
/// this trait to define its execution logic.
pub trait CommandExecutor {
    /// Executes the command with its parsed arguments.
    fn execute(&self, config: &EngineConfig) -> Result<()>;
}
