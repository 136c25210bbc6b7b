//! CLI entry point
//!
//! `run()` parses arguments, discovers configuration, initializes logging,
//! runs the aggregator and handles all output, including errors.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use akscreds_engine::report::{next_steps, preview_banner, render_summary};
use akscreds_utils::logging::init_tracing;

use super::args::Cli;
use crate::{AksCredsError, CliArgs, Config, ExitCode, Executor, RunAggregator};

/// Main CLI execution function.
///
/// Returns `Err(ExitCode)` after printing the error; main.rs only maps it to
/// `std::process::exit`.
pub fn run() -> Result<(), ExitCode> {
    let cli = Cli::parse();

    let cli_args = CliArgs {
        config_path: cli.config.clone(),
        verbose: Some(cli.verbose),
        dry_run: Some(cli.dry_run),
        subscriptions: cli.subscriptions.clone(),
    };

    let config = match Config::discover(&cli_args) {
        Ok(config) => config,
        Err(err) => {
            let err = AksCredsError::Config(err);
            eprintln!("{}", err.display_for_user());
            return Err(err.to_exit_code());
        }
    };

    if let Err(e) = init_tracing(config.defaults.verbose) {
        eprintln!("Warning: failed to initialize logging: {e}");
    }

    if let Some(path) = &config.config_path {
        debug!("Loaded configuration from {}", path.display());
    }
    for (key, (value, source)) in config.effective_config() {
        debug!("{key} = {value} ({source})");
    }

    if let Err(error) = execute(&cli, &config) {
        if let Some(akscreds_error) = error.downcast_ref::<AksCredsError>() {
            eprintln!("{}", akscreds_error.display_for_user());
            return Err(akscreds_error.to_exit_code());
        }
        eprintln!("✗ Unexpected error: {error:#}");
        eprintln!("\n  Run with --verbose for more detailed output");
        return Err(ExitCode::INTERNAL);
    }

    Ok(())
}

fn execute(cli: &Cli, config: &Config) -> Result<()> {
    let dry_run = config.defaults.dry_run;
    let executor = Executor::native(dry_run);

    if dry_run && !cli.json {
        println!("{}\n", preview_banner());
    }

    let report = RunAggregator::new(&executor, config).run(&config.subscriptions.include)?;

    if cli.json {
        let json = serde_json::to_string_pretty(&report)
            .context("Failed to serialize run report")?;
        println!("{json}");
        return Ok(());
    }

    println!();
    print!("{}", render_summary(&report));
    if !dry_run && report.summary.targets_succeeded > 0 {
        println!("\n{}", next_steps());
    }
    Ok(())
}
