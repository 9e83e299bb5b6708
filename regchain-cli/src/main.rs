//! Regchain ledger tool.
//!
//! Generates keys, funds accounts, submits account registrations and
//! inspects the resulting accounts and receipts in a local ledger.

mod cli;
mod commands;
mod config;

use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::config::CliConfig;

fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Set up logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Regchain v{}", env!("CARGO_PKG_VERSION"));

    // Build configuration
    let config = CliConfig::from_cli(&cli)?;
    tracing::debug!(log_level = %config.log_level, "configuration loaded");

    commands::run(&config, cli.command)
}
