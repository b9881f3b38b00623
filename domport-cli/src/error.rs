//! CLI error type.

use domport::config::ConfigError;
use domport::discovery::DiscoveryError;
use thiserror::Error;

/// Errors surfaced to the user by the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid configuration or flags.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Package discovery failed.
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    /// Loading or saving the config file failed.
    #[error(transparent)]
    ConfigFile(#[from] ConfigError),
}
