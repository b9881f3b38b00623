//! List command - show matching package roots without converting.

use std::path::PathBuf;

use clap::Args;
use domport::config::ConfigFile;

use super::common::resolve_discovery;
use crate::error::CliError;

/// Arguments for the list command.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Directory to scan for package roots (default: config, then "..")
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Literal name prefix selecting package directories
    #[arg(long)]
    pub prefix: Option<String>,
}

/// Run the list command.
pub fn run(args: ListArgs) -> Result<(), CliError> {
    let config = ConfigFile::load().unwrap_or_default();

    let discovery = resolve_discovery(args.root, args.prefix, &config);
    let packages = discovery.find_packages()?;

    if packages.is_empty() {
        println!(
            "No packages matching '{}' under {}",
            discovery.filter().prefix(),
            discovery.scan_root().display()
        );
        return Ok(());
    }

    for package in &packages {
        println!("{}  {}", package.name, package.path.display());
    }
    println!("{} package(s)", packages.len());

    Ok(())
}
