//! Configuration management CLI commands.
//!
//! Provides `config get`, `config set`, `config list`, and `config path`
//! commands for viewing and modifying settings from the command line.

use clap::Subcommand;
use domport::config::{config_file_path, ConfigFile, ConfigKey};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Get a configuration value
    Get {
        /// Configuration key in format section.key (e.g., scan.prefix)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key in format section.key (e.g., scan.prefix)
        key: String,

        /// Value to set
        value: String,
    },

    /// List all configuration settings
    List,

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Get { key } => run_get(&key),
        ConfigCommands::Set { key, value } => run_set(&key, &value),
        ConfigCommands::List => run_list(),
        ConfigCommands::Path => run_path(),
    }
}

fn parse_key(key: &str) -> Result<ConfigKey, CliError> {
    key.parse().map_err(|_| {
        CliError::Config(format!(
            "Unknown configuration key '{}'. Use 'domport config list' to see available keys.",
            key
        ))
    })
}

/// Get a configuration value.
fn run_get(key: &str) -> Result<(), CliError> {
    let config_key = parse_key(key)?;
    let config = ConfigFile::load().unwrap_or_default();

    println!("{}", config_key.get(&config));
    Ok(())
}

/// Set a configuration value and persist it.
fn run_set(key: &str, value: &str) -> Result<(), CliError> {
    let config_key = parse_key(key)?;
    let mut config = ConfigFile::load().unwrap_or_default();

    config_key.set(&mut config, value)?;
    config.save()?;

    println!("{} = {}", config_key.name(), value);
    Ok(())
}

/// List all configuration settings.
fn run_list() -> Result<(), CliError> {
    let config = ConfigFile::load().unwrap_or_default();

    for key in ConfigKey::ALL {
        println!("{} = {}", key.name(), key.get(&config));
    }
    Ok(())
}

/// Show the configuration file path.
fn run_path() -> Result<(), CliError> {
    match config_file_path() {
        Some(path) => println!("{}", path.display()),
        None => println!("(no configuration directory available)"),
    }
    Ok(())
}
