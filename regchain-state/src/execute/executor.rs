//! Driver-facing entry points.
//!
//! The block assembler and mempool call [`check_tx`] and [`execute_tx`].
//! Both return `true` on acceptance; every failure is reported through the
//! supplied [`ValidationState`] and nothing panics across this boundary.

use regchain_core::AccountRegisterTx;

use crate::error::StateError;
use crate::state::LedgerStore;
use crate::validation::ValidationState;

use super::check::check_account_register;
use super::context::ExecutionContext;
use super::register::execute_account_register;

/// Stateless check of a registration transaction.
///
/// Safe to call repeatedly and concurrently; touches no store.
pub fn check_tx(tx: &AccountRegisterTx, state: &mut ValidationState) -> bool {
    match check_account_register(tx) {
        Ok(()) => true,
        Err(err) => reject(tx, &err, state),
    }
}

/// Apply a registration transaction to the ledger.
///
/// A failure to save receipts comes after the account write, so on
/// rejection a staging store must be reset to its state before the call.
pub fn execute_tx<S: LedgerStore>(
    store: &mut S,
    tx: &AccountRegisterTx,
    ctx: &ExecutionContext,
    state: &mut ValidationState,
) -> bool {
    match execute_account_register(store, ctx, tx) {
        Ok(_) => true,
        Err(err) => reject(tx, &err, state),
    }
}

fn reject(tx: &AccountRegisterTx, err: &StateError, state: &mut ValidationState) -> bool {
    let tx_hash = hex::encode(tx.hash());
    if err.is_local_fault() {
        tracing::error!(
            tx_hash = %tx_hash,
            reason = err.reject_reason(),
            "local store fault: {}",
            err
        );
    } else {
        tracing::warn!(
            tx_hash = %tx_hash,
            reason = err.reject_reason(),
            "registration rejected: {}",
            err
        );
    }
    err.report(state)
}
