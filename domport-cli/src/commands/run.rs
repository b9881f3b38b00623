//! Run command - scan for matching package roots and convert them all.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Args;
use domport::config::ConfigFile;
use domport::convert::CommandConverter;
use domport::orchestrator::{BatchOrchestrator, DispatchMode};

use super::common::resolve_discovery;
use crate::error::CliError;

/// Arguments for the run command.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Directory to scan for package roots (default: config, then "..")
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Literal name prefix selecting package directories
    #[arg(long)]
    pub prefix: Option<String>,

    /// Converter program to invoke per package root
    #[arg(long)]
    pub converter: Option<String>,

    /// Run conversions one at a time instead of concurrently
    #[arg(long)]
    pub sequential: bool,

    /// Maximum concurrent conversions
    #[arg(long, conflicts_with = "sequential")]
    pub parallel: Option<usize>,

    /// Per-conversion timeout in seconds (0 = no limit)
    #[arg(long)]
    pub timeout: Option<u64>,
}

/// Run the run command.
pub async fn run(args: RunArgs) -> Result<ExitCode, CliError> {
    let config = ConfigFile::load().unwrap_or_default();

    let discovery = resolve_discovery(args.root, args.prefix, &config);
    let packages = discovery.find_packages()?;

    if packages.is_empty() {
        println!(
            "No packages matching '{}' under {}",
            discovery.filter().prefix(),
            discovery.scan_root().display()
        );
        return Ok(ExitCode::SUCCESS);
    }

    let command = args.converter.unwrap_or_else(|| config.convert.command.clone());
    let timeout_secs = args.timeout.unwrap_or(config.convert.timeout_secs);
    let parallel = args.parallel.unwrap_or(config.convert.parallel);

    let mut converter = CommandConverter::new(&command);
    if timeout_secs > 0 {
        converter = converter.with_timeout(Duration::from_secs(timeout_secs));
    }

    let mode = if args.sequential || parallel <= 1 {
        DispatchMode::Sequential
    } else {
        DispatchMode::concurrent(parallel)
    };

    println!(
        "Converting {} package(s) under {} with '{}'",
        packages.len(),
        discovery.scan_root().display(),
        command
    );

    let orchestrator = BatchOrchestrator::new(converter).with_mode(mode);
    let report = orchestrator.dispatch(packages).await;

    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(converted) => println!(
                "  ok     {} ({:.1}s)",
                outcome.entry.name,
                converted.elapsed.as_secs_f64()
            ),
            Err(err) => println!("  FAILED {}: {}", outcome.entry.name, err),
        }
    }

    println!(
        "Converted {}/{} package(s) in {:.1}s",
        report.succeeded(),
        report.total(),
        report.elapsed.as_secs_f64()
    );

    if report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
