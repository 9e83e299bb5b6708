//! Account records.
//!
//! An account is created unregistered (funds may arrive before the owner
//! ever transacts) and becomes registered exactly once, when its
//! registration transaction is included. The registration state is an
//! explicit tag so the one-way transition is enforced by the type rather
//! than by checking whether a key happens to be present.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{KeyId, RegId, TokenSymbol};
use crate::crypto::PublicKey;
use crate::error::AccountError;

/// Registration state of an account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Registration {
    /// No owner key bound yet.
    Unregistered,
    /// Owner key bound. Terminal.
    Registered {
        /// Registration id minted at inclusion.
        reg_id: RegId,
        /// Key that owns the account.
        owner_pubkey: PublicKey,
        /// Optional block-production key.
        miner_pubkey: Option<PublicKey>,
    },
}

/// Balance of one token held by an account.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountToken {
    /// Spendable balance in the token's smallest unit.
    pub free_amount: u64,
}

/// Balance mutation applied through [`Account::operate_balance`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BalanceOp {
    /// Credit the free balance.
    AddFree,
    /// Debit the free balance.
    SubFree,
}

/// A ledger account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Key id the account is stored under.
    pub key_id: KeyId,

    /// Registration state. Only [`Account::register`] moves it.
    registration: Registration,

    /// Per-token balances. Ordered so serialization is deterministic.
    pub tokens: BTreeMap<TokenSymbol, AccountToken>,
}

impl Account {
    /// Create an empty, unregistered account.
    pub fn new(key_id: KeyId) -> Self {
        Self {
            key_id,
            registration: Registration::Unregistered,
            tokens: BTreeMap::new(),
        }
    }

    /// Registration state.
    pub fn registration(&self) -> &Registration {
        &self.registration
    }

    /// Check if an owner key is bound.
    #[inline]
    pub fn is_registered(&self) -> bool {
        matches!(self.registration, Registration::Registered { .. })
    }

    /// Registration id, once registered.
    pub fn reg_id(&self) -> Option<RegId> {
        match &self.registration {
            Registration::Registered { reg_id, .. } => Some(*reg_id),
            Registration::Unregistered => None,
        }
    }

    /// Owner key, once registered.
    pub fn owner_pubkey(&self) -> Option<&PublicKey> {
        match &self.registration {
            Registration::Registered { owner_pubkey, .. } => Some(owner_pubkey),
            Registration::Unregistered => None,
        }
    }

    /// Block-production key, if one was bound at registration.
    pub fn miner_pubkey(&self) -> Option<&PublicKey> {
        match &self.registration {
            Registration::Registered { miner_pubkey, .. } => miner_pubkey.as_ref(),
            Registration::Unregistered => None,
        }
    }

    /// Bind the owner (and optional miner) key.
    ///
    /// Fails with [`AccountError::AlreadyRegistered`] if the account is
    /// already registered; the existing binding is left untouched.
    pub fn register(
        &mut self,
        reg_id: RegId,
        owner_pubkey: PublicKey,
        miner_pubkey: Option<PublicKey>,
    ) -> Result<(), AccountError> {
        if self.is_registered() {
            return Err(AccountError::AlreadyRegistered);
        }
        self.registration = Registration::Registered {
            reg_id,
            owner_pubkey,
            miner_pubkey,
        };
        Ok(())
    }

    /// Free balance of a token (zero when the token was never held).
    pub fn free_balance(&self, symbol: &TokenSymbol) -> u64 {
        self.tokens
            .get(symbol)
            .map(|token| token.free_amount)
            .unwrap_or(0)
    }

    /// Apply a balance operation.
    ///
    /// On error the balance is unchanged.
    pub fn operate_balance(
        &mut self,
        symbol: &TokenSymbol,
        op: BalanceOp,
        amount: u64,
    ) -> Result<(), AccountError> {
        let available = self.free_balance(symbol);
        let updated = match op {
            BalanceOp::AddFree => available
                .checked_add(amount)
                .ok_or(AccountError::BalanceOverflow)?,
            BalanceOp::SubFree => {
                available
                    .checked_sub(amount)
                    .ok_or(AccountError::InsufficientFunds {
                        available,
                        required: amount,
                    })?
            }
        };
        self.tokens.entry(*symbol).or_default().free_amount = updated;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{derive_key_id, KeyPair};
    use crate::types::NATIVE_SYMBOL;

    fn funded_account(kp: &KeyPair, amount: u64) -> Account {
        let mut account = Account::new(derive_key_id(&kp.public_key()));
        account
            .operate_balance(&NATIVE_SYMBOL, BalanceOp::AddFree, amount)
            .unwrap();
        account
    }

    #[test]
    fn test_new_account_is_unregistered() {
        let account = Account::new([1u8; 20]);
        assert!(!account.is_registered());
        assert!(account.owner_pubkey().is_none());
        assert!(account.reg_id().is_none());
        assert_eq!(account.free_balance(&NATIVE_SYMBOL), 0);
    }

    #[test]
    fn test_register_once() {
        let kp = KeyPair::generate();
        let miner = KeyPair::generate();
        let mut account = funded_account(&kp, 10);

        account
            .register(RegId::new(10, 1), kp.public_key(), Some(miner.public_key()))
            .unwrap();

        assert!(account.is_registered());
        assert_eq!(account.reg_id(), Some(RegId::new(10, 1)));
        assert_eq!(account.owner_pubkey(), Some(&kp.public_key()));
        assert_eq!(account.miner_pubkey(), Some(&miner.public_key()));
    }

    #[test]
    fn test_register_twice_keeps_first_binding() {
        let kp = KeyPair::generate();
        let other = KeyPair::generate();
        let mut account = funded_account(&kp, 10);

        account.register(RegId::new(10, 1), kp.public_key(), None).unwrap();
        let result = account.register(RegId::new(11, 0), other.public_key(), None);

        assert_eq!(result, Err(AccountError::AlreadyRegistered));
        assert_eq!(
            account.registration(),
            &Registration::Registered {
                reg_id: RegId::new(10, 1),
                owner_pubkey: kp.public_key(),
                miner_pubkey: None,
            }
        );
        assert_eq!(account.reg_id(), Some(RegId::new(10, 1)));
        assert_eq!(account.owner_pubkey(), Some(&kp.public_key()));
    }

    #[test]
    fn test_sub_free() {
        let kp = KeyPair::generate();
        let mut account = funded_account(&kp, 1000);

        account
            .operate_balance(&NATIVE_SYMBOL, BalanceOp::SubFree, 100)
            .unwrap();
        assert_eq!(account.free_balance(&NATIVE_SYMBOL), 900);
    }

    #[test]
    fn test_sub_free_insufficient_leaves_balance() {
        let kp = KeyPair::generate();
        let mut account = funded_account(&kp, 50);

        let result = account.operate_balance(&NATIVE_SYMBOL, BalanceOp::SubFree, 51);
        assert_eq!(
            result,
            Err(AccountError::InsufficientFunds {
                available: 50,
                required: 51
            })
        );
        assert_eq!(account.free_balance(&NATIVE_SYMBOL), 50);
    }

    #[test]
    fn test_add_free_overflow() {
        let kp = KeyPair::generate();
        let mut account = funded_account(&kp, u64::MAX);

        let result = account.operate_balance(&NATIVE_SYMBOL, BalanceOp::AddFree, 1);
        assert_eq!(result, Err(AccountError::BalanceOverflow));
        assert_eq!(account.free_balance(&NATIVE_SYMBOL), u64::MAX);
    }

    #[test]
    fn test_balances_are_per_symbol() {
        let kp = KeyPair::generate();
        let mut account = funded_account(&kp, 10);
        let other = *b"USD\0\0\0\0\0";

        account.operate_balance(&other, BalanceOp::AddFree, 3).unwrap();
        assert_eq!(account.free_balance(&NATIVE_SYMBOL), 10);
        assert_eq!(account.free_balance(&other), 3);
    }

    #[test]
    fn test_serialization() {
        let kp = KeyPair::generate();
        let mut account = funded_account(&kp, 77);
        account.register(RegId::new(3, 4), kp.public_key(), None).unwrap();

        let bytes = crate::serialization::serialize(&account).unwrap();
        let recovered: Account = crate::serialization::deserialize(&bytes).unwrap();
        assert_eq!(account, recovered);
    }
}
