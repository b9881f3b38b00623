//! Domport CLI - batch Java-to-TypeScript conversion driver.
//!
//! Scans a root directory for package roots matching a name prefix and runs
//! the configured converter over each of them, reporting one aggregate
//! result. The process exits nonzero if the scan fails or any conversion
//! fails.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod error;

use commands::config::ConfigCommands;
use commands::list::ListArgs;
use commands::run::RunArgs;

/// Batch source conversion for dombler-fx-core package trees.
#[derive(Debug, Parser)]
#[command(name = "domport", version = domport::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scan for matching package roots and convert them all
    Run(RunArgs),

    /// Show matching package roots without converting
    List(ListArgs),

    /// View or modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => commands::run::run(args).await,
        Commands::List(args) => commands::list::run(args).map(|()| ExitCode::SUCCESS),
        Commands::Config { command } => {
            commands::config::run(command).map(|()| ExitCode::SUCCESS)
        }
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
