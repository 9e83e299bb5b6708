//! Command implementations.
//!
//! Ledger commands are generic over the key-value backend so they can be
//! exercised against `MemoryBackend`; `run` wires them to RocksDB.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{bail, Context};
use regchain_core::{
    symbol_to_string, Account, AccountRegisterTx, Identity, KeyPair, RawPublicKey, Receipt, RegId,
    TxHash,
};
use regchain_state::{
    check_tx, AccountStore, ExecutionContext, ReceiptStore, ValidationState,
};
use regchain_storage::{KvBackend, PersistentLedger, RocksBackend};
use serde::Serialize;

use crate::cli::Command;
use crate::config::CliConfig;

/// JSON view of a key pair.
#[derive(Serialize)]
struct KeypairJson {
    /// Public key in hex format (64 characters).
    public_key: String,
    /// Secret seed in hex format (64 characters).
    private_key: String,
    /// Key id derived from the public key (40 characters).
    key_id: String,
}

/// JSON view of an account.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct AccountView {
    key_id: String,
    registered: bool,
    reg_id: Option<String>,
    owner_pubkey: Option<String>,
    miner_pubkey: Option<String>,
    balances: BTreeMap<String, u64>,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            key_id: hex::encode(account.key_id),
            registered: account.is_registered(),
            reg_id: account.reg_id().map(|id| id.to_string()),
            owner_pubkey: account.owner_pubkey().map(|k| k.to_string()),
            miner_pubkey: account.miner_pubkey().map(|k| k.to_string()),
            balances: account
                .tokens
                .iter()
                .map(|(symbol, token)| (symbol_to_string(symbol), token.free_amount))
                .collect(),
        }
    }
}

/// JSON view of a receipt.
#[derive(Debug, Serialize)]
struct ReceiptView {
    code: u16,
    from: String,
    to: Option<String>,
    symbol: String,
    amount: u64,
}

impl From<&Receipt> for ReceiptView {
    fn from(receipt: &Receipt) -> Self {
        Self {
            code: receipt.code.code(),
            from: hex::encode(receipt.from),
            to: receipt.to.map(hex::encode),
            symbol: symbol_to_string(&receipt.symbol),
            amount: receipt.amount,
        }
    }
}

/// Run a command.
pub fn run(config: &CliConfig, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Keygen { json } => keygen(json),
        Command::Fund { pubkey, amount } => {
            let mut ledger = open_ledger(config)?;
            let account = fund(&mut ledger, config, &pubkey, amount)?;
            println!(
                "Funded {}: balance {} {}",
                hex::encode(account.key_id),
                account.free_balance(&config.fee_symbol),
                symbol_to_string(&config.fee_symbol)
            );
            Ok(())
        }
        Command::Register {
            pubkey,
            fee,
            valid_height,
            miner,
        } => {
            let mut ledger = open_ledger(config)?;
            let valid_height = match valid_height {
                Some(height) => height,
                None => ledger.tip_height()?.saturating_add(1),
            };
            let tx = build_register_tx(&pubkey, miner.as_deref(), fee, valid_height)?;
            let reg_id = register(&mut ledger, config, &tx)?;
            println!("Registered {} as {}", tx.tx_uid, reg_id);
            println!("Transaction: {}", hex::encode(tx.hash()));
            Ok(())
        }
        Command::Show { identity, json } => {
            let mut ledger = open_ledger(config)?;
            let uid = parse_identity(&identity)?;
            let account = ledger
                .get_account(&uid)?
                .with_context(|| format!("no account for {}", uid))?;
            print_account(&AccountView::from(&account), json)
        }
        Command::Receipts { tx_hash, json } => {
            let mut ledger = open_ledger(config)?;
            let hash = parse_tx_hash(&tx_hash)?;
            let receipts = ledger
                .get_tx_receipts(&hash)?
                .with_context(|| format!("no receipts for transaction {}", tx_hash))?;
            print_receipts(&receipts, json)
        }
    }
}

fn open_ledger(config: &CliConfig) -> anyhow::Result<PersistentLedger<RocksBackend>> {
    let path = config.ledger_dir();
    std::fs::create_dir_all(&path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    tracing::debug!("Opening ledger at {:?}", path);

    let backend = RocksBackend::open(&path)
        .with_context(|| format!("failed to open ledger at {}", path.display()))?;
    Ok(PersistentLedger::new(Arc::new(backend)))
}

fn keygen(json: bool) -> anyhow::Result<()> {
    let kp = KeyPair::generate();
    let public_key = kp.raw_public_key();
    let output = KeypairJson {
        public_key: public_key.to_string(),
        private_key: hex::encode(kp.secret_bytes()),
        key_id: hex::encode(public_key.key_id()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("=== Regchain Keypair ===");
        println!();
        println!("Public Key:  {}", output.public_key);
        println!("Private Key: {}", output.private_key);
        println!("Key Id:      {}", output.key_id);
        println!();
        println!("IMPORTANT: Store your private key securely!");
    }
    Ok(())
}

/// Credit the account of `pubkey` and commit.
pub fn fund<B: KvBackend>(
    ledger: &mut PersistentLedger<B>,
    config: &CliConfig,
    pubkey: &str,
    amount: u64,
) -> anyhow::Result<Account> {
    let key_id = parse_public_key(pubkey)?.key_id();
    ledger.fund(key_id, &config.fee_symbol, amount)?;
    ledger.commit()?;

    ledger
        .get_account(&Identity::KeyId(key_id))?
        .context("funded account disappeared")
}

/// Build a registration transaction from command-line values.
pub fn build_register_tx(
    pubkey: &str,
    miner: Option<&str>,
    fee: u64,
    valid_height: u32,
) -> anyhow::Result<AccountRegisterTx> {
    let sender = Identity::PublicKey(parse_public_key(pubkey)?);
    let miner_uid = match miner {
        Some(miner) => Identity::PublicKey(parse_public_key(miner)?),
        None => Identity::Absent,
    };
    Ok(AccountRegisterTx::new(sender, miner_uid, fee, valid_height))
}

/// Check and apply a registration as the only transaction of the next
/// block, so it is minted `<tip + 1>-0`.
///
/// Commits on success. On rejection nothing is committed and the tip does
/// not move.
pub fn register<B: KvBackend>(
    ledger: &mut PersistentLedger<B>,
    config: &CliConfig,
    tx: &AccountRegisterTx,
) -> anyhow::Result<RegId> {
    let mut state = ValidationState::new();

    if check_tx(tx, &mut state) {
        let height = ledger.advance_tip()?;
        let ctx = ExecutionContext::new(height, 0).with_fee_symbol(config.fee_symbol);
        if ledger.apply_tx(tx, &ctx, &mut state) {
            ledger.commit()?;
            return Ok(ctx.reg_id());
        }
        ledger.rollback();
    }

    let class = state
        .reject_class()
        .map(|class| class.to_string())
        .unwrap_or_default();
    bail!(
        "registration rejected: {} [{}, dos {}]: {}",
        state.reject_reason(),
        class,
        state.dos_score(),
        state.debug_message()
    );
}

/// Parse hex public key bytes. Well-formedness is left to validation.
pub fn parse_public_key(s: &str) -> anyhow::Result<RawPublicKey> {
    let bytes = hex::decode(s).with_context(|| format!("invalid hex public key '{}'", s))?;
    Ok(RawPublicKey::new(bytes))
}

/// Parse an identity argument.
pub fn parse_identity(s: &str) -> anyhow::Result<Identity> {
    if s == "absent" {
        return Ok(Identity::Absent);
    }
    if let Some(rest) = s.strip_prefix("regid:") {
        return Ok(Identity::RegId(rest.parse()?));
    }
    if let Some(rest) = s.strip_prefix("keyid:") {
        return parse_key_id(rest);
    }
    if let Some(rest) = s.strip_prefix("pubkey:") {
        return Ok(Identity::PublicKey(parse_public_key(rest)?));
    }
    if s.contains('-') {
        return Ok(Identity::RegId(s.parse()?));
    }
    if s.len() == 40 {
        return parse_key_id(s);
    }
    Ok(Identity::PublicKey(parse_public_key(s)?))
}

fn parse_key_id(s: &str) -> anyhow::Result<Identity> {
    let bytes = hex::decode(s).with_context(|| format!("invalid hex key id '{}'", s))?;
    let key_id: [u8; 20] = bytes
        .try_into()
        .map_err(|_| anyhow::anyhow!("key id must be 20 bytes"))?;
    Ok(Identity::KeyId(key_id))
}

/// Parse a transaction hash argument.
pub fn parse_tx_hash(s: &str) -> anyhow::Result<TxHash> {
    let bytes = hex::decode(s).with_context(|| format!("invalid hex hash '{}'", s))?;
    bytes
        .try_into()
        .map_err(|_| anyhow::anyhow!("transaction hash must be 32 bytes"))
}

fn print_account(view: &AccountView, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(view)?);
        return Ok(());
    }

    println!("Key Id:     {}", view.key_id);
    match &view.reg_id {
        Some(reg_id) => println!("Reg Id:     {}", reg_id),
        None => println!("Reg Id:     (unregistered)"),
    }
    if let Some(owner) = &view.owner_pubkey {
        println!("Owner Key:  {}", owner);
    }
    if let Some(miner) = &view.miner_pubkey {
        println!("Miner Key:  {}", miner);
    }
    for (symbol, amount) in &view.balances {
        println!("Balance:    {} {}", amount, symbol);
    }
    Ok(())
}

fn print_receipts(receipts: &[Receipt], json: bool) -> anyhow::Result<()> {
    let views: Vec<ReceiptView> = receipts.iter().map(ReceiptView::from).collect();
    if json {
        println!("{}", serde_json::to_string_pretty(&views)?);
        return Ok(());
    }

    for view in views {
        println!(
            "code {} from {} amount {} {}",
            view.code, view.from, view.amount, view.symbol
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use regchain_storage::MemoryBackend;

    fn memory_ledger() -> PersistentLedger<MemoryBackend> {
        PersistentLedger::new(Arc::new(MemoryBackend::new()))
    }

    #[test]
    fn test_parse_identity() {
        assert_eq!(parse_identity("absent").unwrap(), Identity::Absent);
        assert_eq!(
            parse_identity("12-3").unwrap(),
            Identity::RegId(RegId::new(12, 3))
        );
        assert_eq!(
            parse_identity("regid:12-3").unwrap(),
            Identity::RegId(RegId::new(12, 3))
        );
        assert_eq!(
            parse_identity(&"ab".repeat(20)).unwrap(),
            Identity::KeyId([0xAB; 20])
        );
        assert_eq!(
            parse_identity(&format!("pubkey:{}", "cd".repeat(32))).unwrap(),
            Identity::PublicKey(RawPublicKey::new(vec![0xCD; 32]))
        );
        assert!(parse_identity("zz").is_err());
        assert!(parse_identity("keyid:abcd").is_err());
    }

    #[test]
    fn test_parse_tx_hash() {
        assert_eq!(parse_tx_hash(&"01".repeat(32)).unwrap(), [1u8; 32]);
        assert!(parse_tx_hash("0102").is_err());
    }

    #[test]
    fn test_fund_then_register() {
        let mut ledger = memory_ledger();
        let config = CliConfig::default();
        let kp = KeyPair::from_bytes(&[1u8; 32]);
        let pubkey = kp.raw_public_key().to_string();

        let account = fund(&mut ledger, &config, &pubkey, 1000).unwrap();
        assert_eq!(account.free_balance(&config.fee_symbol), 1000);

        let tx = build_register_tx(&pubkey, None, 100, 8).unwrap();
        let reg_id = register(&mut ledger, &config, &tx).unwrap();
        assert_eq!(reg_id, RegId::new(1, 0));

        let account = ledger.get_account(&Identity::RegId(reg_id)).unwrap().unwrap();
        let view = AccountView::from(&account);
        assert!(view.registered);
        assert_eq!(view.balances.get("RGC"), Some(&900));
        assert_eq!(view.owner_pubkey, Some(pubkey));
        assert_eq!(ledger.pending_changes(), 0);
    }

    #[test]
    fn test_register_rejection_rolls_back() {
        let mut ledger = memory_ledger();
        let config = CliConfig::default();
        let kp = KeyPair::from_bytes(&[2u8; 32]);
        let pubkey = kp.raw_public_key().to_string();
        fund(&mut ledger, &config, &pubkey, 10).unwrap();

        let tx = build_register_tx(&pubkey, Some("0102"), 5, 1).unwrap();
        let err = register(&mut ledger, &config, &tx).unwrap_err();
        assert!(err.to_string().contains("MinerPKey Is Invalid"));

        let account = ledger
            .get_account(&Identity::PublicKey(kp.raw_public_key()))
            .unwrap()
            .unwrap();
        assert!(!account.is_registered());
        assert_eq!(account.free_balance(&config.fee_symbol), 10);
        assert_eq!(ledger.pending_changes(), 0);
        assert_eq!(ledger.tip_height().unwrap(), 0);
    }

    #[test]
    fn test_registrations_get_distinct_reg_ids() {
        let mut ledger = memory_ledger();
        let config = CliConfig::default();
        let first = KeyPair::from_bytes(&[3u8; 32]).raw_public_key().to_string();
        let second = KeyPair::from_bytes(&[4u8; 32]).raw_public_key().to_string();
        fund(&mut ledger, &config, &first, 10).unwrap();
        fund(&mut ledger, &config, &second, 10).unwrap();

        // Same valid height on both; the ledger position is what mints the id
        let tx = build_register_tx(&first, None, 1, 1).unwrap();
        assert_eq!(register(&mut ledger, &config, &tx).unwrap(), RegId::new(1, 0));

        let tx = build_register_tx(&second, None, 50, 1).unwrap();
        assert!(register(&mut ledger, &config, &tx).is_err());

        let tx = build_register_tx(&second, None, 1, 1).unwrap();
        assert_eq!(register(&mut ledger, &config, &tx).unwrap(), RegId::new(2, 0));

        let holder = ledger
            .get_account(&Identity::RegId(RegId::new(1, 0)))
            .unwrap()
            .unwrap();
        assert_eq!(AccountView::from(&holder).owner_pubkey, Some(first));
        let holder = ledger
            .get_account(&Identity::RegId(RegId::new(2, 0)))
            .unwrap()
            .unwrap();
        assert_eq!(AccountView::from(&holder).owner_pubkey, Some(second));
    }

    #[test]
    fn test_register_malformed_sender_rejected_by_check() {
        let mut ledger = memory_ledger();
        let config = CliConfig::default();
        let tx = build_register_tx("00ff", None, 0, 1).unwrap();

        let err = register(&mut ledger, &config, &tx).unwrap_err();
        assert!(err.to_string().contains("bad-tx-publickey"));
        assert_eq!(ledger.tip_height().unwrap(), 0);
    }

    #[test]
    fn test_receipt_view() {
        let receipt = Receipt::fee([0xAA; 20], regchain_core::NATIVE_SYMBOL, 100);
        let view = ReceiptView::from(&receipt);
        assert_eq!(view.code, 1);
        assert_eq!(view.symbol, "RGC");
        assert_eq!(view.from, "aa".repeat(20));
        assert!(view.to.is_none());
    }
}
