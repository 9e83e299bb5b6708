//! AccountRegister transaction handler.

use regchain_core::{AccountRegisterTx, BalanceOp, Identity, Receipt, RegId};

use crate::error::{StateError, StateResult};
use crate::state::LedgerStore;
use super::check::{check_miner_uid, sender_public_key};
use super::context::ExecutionContext;

/// Execute an AccountRegister transaction.
///
/// Binds the sender's public key (and the optional miner key) to the sender
/// account, mints its registration id from the context, and charges the fee
/// into the block reward pool.
///
/// All mutation happens on a local copy of the account; nothing reaches the
/// store until every check has passed. A failure while persisting the
/// receipt leaves the account write in place, so callers backed by a
/// staging store must roll back on error.
///
/// # Validation
/// - Sender must be a well-formed public key, miner a public key or absent
/// - Sender account must exist and be unregistered
/// - Free balance must cover the fee
/// - A present miner key must be well-formed
/// - The minted registration id must not already name an account
///
/// # Returns
/// The minted registration id.
pub fn execute_account_register<S: LedgerStore>(
    store: &mut S,
    ctx: &ExecutionContext,
    tx: &AccountRegisterTx,
) -> StateResult<RegId> {
    let owner_pubkey = sender_public_key(&tx.tx_uid)?;
    check_miner_uid(&tx.miner_uid)?;
    let key_id = regchain_core::derive_key_id(&owner_pubkey);

    // Load a copy of the sender account
    let mut account = store
        .get_account(&tx.tx_uid)
        .map_err(|e| StateError::AccountReadFailed {
            key_id,
            detail: e.to_string(),
        })?
        .ok_or_else(|| StateError::AccountReadFailed {
            key_id,
            detail: "account not found".to_string(),
        })?;

    if account.is_registered() {
        return Err(StateError::DuplicateRegistration { key_id });
    }

    let reg_id = ctx.reg_id();

    // Charge the fee
    let available = account.free_balance(&ctx.fee_symbol);
    account
        .operate_balance(&ctx.fee_symbol, BalanceOp::SubFree, tx.fees)
        .map_err(|_| StateError::InsufficientFunds {
            key_id,
            available,
            required: tx.fees,
        })?;
    let receipts = vec![Receipt::fee(key_id, ctx.fee_symbol, tx.fees)];

    // Validate the miner key
    let miner_pubkey = match &tx.miner_uid {
        Identity::PublicKey(raw) => Some(raw.to_public_key().map_err(|reason| {
            StateError::InvalidMinerPublicKey {
                miner_pubkey: raw.clone(),
                reason,
            }
        })?),
        _ => None,
    };

    // Registration ids are never reissued
    let holder = store
        .get_account(&Identity::RegId(reg_id))
        .map_err(|e| StateError::AccountReadFailed {
            key_id,
            detail: e.to_string(),
        })?;
    if let Some(holder) = holder {
        return Err(StateError::RegIdInUse {
            reg_id,
            holder: holder.key_id,
        });
    }

    account
        .register(reg_id, owner_pubkey, miner_pubkey)
        .map_err(|_| StateError::DuplicateRegistration { key_id })?;

    // Persist account, then receipts
    store
        .save_account(&account)
        .map_err(|e| StateError::AccountWriteFailed {
            reg_id,
            detail: e.to_string(),
        })?;

    let tx_hash = tx.hash();
    store
        .set_tx_receipts(&tx_hash, &receipts)
        .map_err(|e| StateError::ReceiptSaveFailed {
            tx_hash,
            detail: e.to_string(),
        })?;

    tracing::debug!(
        key_id = %hex::encode(key_id),
        tx_hash = %hex::encode(tx_hash),
        reg_id = %reg_id,
        fee = tx.fees,
        "account registered"
    );

    Ok(reg_id)
}
