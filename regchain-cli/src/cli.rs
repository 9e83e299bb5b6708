//! Command-line argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Regchain account ledger tool.
#[derive(Parser, Debug, Clone)]
#[command(name = "regchain")]
#[command(about = "Inspect and drive the regchain account ledger")]
#[command(version)]
pub struct Cli {
    /// Data directory for ledger data.
    #[arg(long, default_value = "~/.regchain")]
    pub data_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Currency fees are charged in.
    #[arg(long, default_value = "RGC")]
    pub fee_symbol: String,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Ledger commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Generate an Ed25519 key pair.
    Keygen {
        /// Output in JSON format for machine parsing.
        #[arg(long)]
        json: bool,
    },

    /// Credit funds to the account of a public key, creating it if needed.
    Fund {
        /// Public key in hex.
        pubkey: String,
        /// Amount in the smallest unit of the fee currency.
        amount: u64,
    },

    /// Submit an account registration as the next block of the ledger.
    Register {
        /// Sender public key in hex.
        pubkey: String,
        /// Registration fee.
        #[arg(long, default_value_t = 0)]
        fee: u64,
        /// Validity height carried in the transaction. Defaults to the
        /// height the registration will be included at.
        #[arg(long)]
        valid_height: Option<u32>,
        /// Optional block-production public key in hex.
        #[arg(long)]
        miner: Option<String>,
    },

    /// Show an account by public key, key id or registration id.
    Show {
        /// `absent`, `<height>-<index>`, a 40-char key id, or a public key
        /// (each optionally prefixed with `regid:`, `keyid:` or `pubkey:`).
        identity: String,
        /// Output in JSON format.
        #[arg(long)]
        json: bool,
    },

    /// Show the receipts of a transaction.
    Receipts {
        /// Transaction hash in hex.
        tx_hash: String,
        /// Output in JSON format.
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Expand the data directory path (handle ~ for home).
    pub fn expanded_data_dir(&self) -> PathBuf {
        let path_str = self.data_dir.to_string_lossy();
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        }
        self.data_dir.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let cli = Cli::parse_from(["regchain", "keygen"]);
        assert_eq!(cli.log_level, "info");
        assert_eq!(cli.fee_symbol, "RGC");
        assert!(matches!(cli.command, Command::Keygen { json: false }));
    }

    #[test]
    fn test_register_args() {
        let cli = Cli::parse_from([
            "regchain",
            "register",
            "abcd",
            "--fee",
            "100",
            "--valid-height",
            "12",
            "--miner",
            "ef01",
        ]);
        match cli.command {
            Command::Register {
                pubkey,
                fee,
                valid_height,
                miner,
            } => {
                assert_eq!(pubkey, "abcd");
                assert_eq!(fee, 100);
                assert_eq!(valid_height, Some(12));
                assert_eq!(miner.as_deref(), Some("ef01"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_register_takes_no_ledger_position() {
        let cli = Cli::parse_from(["regchain", "register", "abcd"]);
        assert!(matches!(
            cli.command,
            Command::Register { valid_height: None, .. }
        ));
        assert!(Cli::try_parse_from(["regchain", "register", "abcd", "--index", "3"]).is_err());
        assert!(Cli::try_parse_from(["regchain", "register", "abcd", "--height", "3"]).is_err());
    }

    #[test]
    fn test_data_dir_expansion() {
        let cli = Cli::parse_from(["regchain", "--data-dir", "/tmp/ledger", "keygen"]);
        assert_eq!(cli.expanded_data_dir(), PathBuf::from("/tmp/ledger"));

        let cli = Cli::parse_from(["regchain", "keygen"]);
        if let Some(home) = dirs::home_dir() {
            assert_eq!(cli.expanded_data_dir(), home.join(".regchain"));
        }
    }
}
