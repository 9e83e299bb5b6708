//! Tool configuration.

use std::path::PathBuf;

use anyhow::Context;
use regchain_core::{symbol_from_str, TokenSymbol, NATIVE_SYMBOL};

use crate::cli::Cli;

/// Resolved configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Data directory for ledger data.
    pub data_dir: PathBuf,

    /// Log level.
    pub log_level: String,

    /// Currency fees are charged and funds credited in.
    pub fee_symbol: TokenSymbol,
}

impl CliConfig {
    /// Create a configuration from CLI arguments.
    pub fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        let fee_symbol = symbol_from_str(&cli.fee_symbol)
            .with_context(|| format!("invalid fee symbol '{}'", cli.fee_symbol))?;

        Ok(Self {
            data_dir: cli.expanded_data_dir(),
            log_level: cli.log_level.clone(),
            fee_symbol,
        })
    }

    /// Directory holding the ledger database.
    pub fn ledger_dir(&self) -> PathBuf {
        self.data_dir.join("ledger")
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("~/.regchain"),
            log_level: "info".to_string(),
            fee_symbol: NATIVE_SYMBOL,
        }
    }
}
