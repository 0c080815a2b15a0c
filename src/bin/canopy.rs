//! Canopy CLI Binary
//!
//! Command-line interface for browsing and managing a remote file manager.

use anyhow::Context;
use canopy::logging::init_logging;
use canopy::tooling::cli::{Cli, CliContext};
use clap::Parser;
use std::process;

fn run(cli: &Cli) -> anyhow::Result<String> {
    let config = cli.resolve_config().context("Failed to load configuration")?;
    init_logging(Some(&config.logging)).context("Failed to initialize logging")?;
    let context = CliContext::new(config).context("Failed to connect to the file service")?;
    Ok(context.execute(&cli.command)?)
}

fn main() {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}
