//! Stateless registration checks.

use regchain_core::{AccountRegisterTx, Identity, PublicKey};

use crate::error::{StateError, StateResult};

/// Check an AccountRegister transaction without touching any store.
///
/// # Validation
/// - Sender must be a public key
/// - Miner must be a public key or absent
/// - Sender public key must be well-formed
///
/// The first failing check wins.
pub fn check_account_register(tx: &AccountRegisterTx) -> StateResult<()> {
    let sender = match &tx.tx_uid {
        Identity::PublicKey(key) => key,
        other => {
            return Err(StateError::SenderNotPublicKey { kind: other.kind() });
        }
    };

    check_miner_uid(&tx.miner_uid)?;

    sender
        .to_public_key()
        .map_err(|reason| StateError::BadSenderPublicKey {
            key_id: sender.key_id(),
            reason,
        })?;

    Ok(())
}

/// Validate the sender and return its owner key.
pub(crate) fn sender_public_key(tx_uid: &Identity) -> StateResult<PublicKey> {
    let sender = tx_uid
        .public_key()
        .ok_or(StateError::SenderNotPublicKey { kind: tx_uid.kind() })?;

    sender
        .to_public_key()
        .map_err(|reason| StateError::BadSenderPublicKey {
            key_id: sender.key_id(),
            reason,
        })
}

/// The miner identity may only be a public key or absent.
pub(crate) fn check_miner_uid(miner_uid: &Identity) -> StateResult<()> {
    match miner_uid {
        Identity::PublicKey(_) | Identity::Absent => Ok(()),
        Identity::RegId(_) | Identity::KeyId(_) => Err(StateError::MinerNotPublicKey {
            kind: miner_uid.kind(),
        }),
    }
}
