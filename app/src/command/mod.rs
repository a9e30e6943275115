//! Static strategy pattern for CLI commands.
//!
//! Each command is a separate strategy with its own type and input, so
//! dispatch is resolved at compile time.

use slotfill_config::Config;
use tracing::warn;

mod chat;
mod extract;
mod info;
mod init;
mod version;

pub use chat::{ChatInput, ChatStrategy, Demo};
pub use extract::{ExtractInput, ExtractStrategy};
pub use info::InfoStrategy;
pub use init::InitStrategy;
pub use version::VersionStrategy;

/// Load the config file, falling back to the built-in template when it cannot be read.
fn load_config_or_default() -> Config {
    Config::load().unwrap_or_else(|e| {
        warn!("{e:#}");
        Config::builtin().map_or_else(
            |e| {
                warn!("Using an empty configuration: {e:#}");
                Config::default()
            },
            |config| {
                warn!(
                    "Using the built-in configuration ({} slot definitions)",
                    config.slots.len()
                );
                config
            },
        )
    })
}

/// Core trait defining the contract for all command strategies.
///
/// # Example
/// ```rust,ignore
/// struct MyStrategy;
///
/// impl CommandStrategy for MyStrategy {
///     type Input = MyInput;
///
///     async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
///         // Command logic here
///         Ok(())
///     }
/// }
/// ```
pub trait CommandStrategy: Send + Sync + 'static {
    /// The input type this strategy accepts.
    type Input;

    /// Execute the command with the given input.
    ///
    /// # Errors
    /// Returns an error if command execution fails.
    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}
