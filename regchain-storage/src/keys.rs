//! Key schema encoding for storage.
//!
//! All state is stored with prefixed keys to enable prefix scans and
//! logical grouping.

use regchain_core::{KeyId, RegId, TxHash};

/// Key prefixes for different state types.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyPrefix {
    /// Account: `0x01 || key_id`
    Account = 0x01,
    /// Registration id index: `0x02 || height_be || index_be`
    RegIdIndex = 0x02,
    /// Receipts: `0x03 || tx_hash`
    Receipts = 0x03,
    /// Height of the last committed block: `0x04`
    Tip = 0x04,
}

/// State key for addressing state entries.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum StateKey {
    /// Account by key id.
    Account(KeyId),
    /// Key id of a registered account by its registration id.
    RegIdIndex(RegId),
    /// Receipt list by transaction hash.
    Receipts(TxHash),
    /// Ledger tip height.
    Tip,
}

impl StateKey {
    /// Prefix of this key.
    pub fn prefix(&self) -> KeyPrefix {
        match self {
            StateKey::Account(_) => KeyPrefix::Account,
            StateKey::RegIdIndex(_) => KeyPrefix::RegIdIndex,
            StateKey::Receipts(_) => KeyPrefix::Receipts,
            StateKey::Tip => KeyPrefix::Tip,
        }
    }

    /// Convert the state key to bytes for storage.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut key = Vec::with_capacity(33);
        key.push(self.prefix() as u8);
        match self {
            StateKey::Account(key_id) => key.extend_from_slice(key_id),
            StateKey::RegIdIndex(reg_id) => key.extend_from_slice(&reg_id.to_bytes()),
            StateKey::Receipts(tx_hash) => key.extend_from_slice(tx_hash),
            StateKey::Tip => {}
        }
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_key_layout() {
        let bytes = StateKey::Account([1u8; 20]).to_bytes();
        assert_eq!(bytes.len(), 21);
        assert_eq!(bytes[0], 0x01);
        assert_eq!(&bytes[1..], &[1u8; 20]);
    }

    #[test]
    fn test_reg_id_key_sorts_by_height() {
        let low = StateKey::RegIdIndex(RegId::new(1, 500)).to_bytes();
        let high = StateKey::RegIdIndex(RegId::new(2, 0)).to_bytes();
        assert!(low < high);
        assert_eq!(high, vec![0x02, 0, 0, 0, 2, 0, 0]);
    }

    #[test]
    fn test_receipts_and_tip_keys() {
        let bytes = StateKey::Receipts([9u8; 32]).to_bytes();
        assert_eq!(bytes.len(), 33);
        assert_eq!(bytes[0], 0x03);

        assert_eq!(StateKey::Tip.to_bytes(), vec![0x04]);
    }

    #[test]
    fn test_key_prefixes_unique() {
        let prefixes = [
            KeyPrefix::Account,
            KeyPrefix::RegIdIndex,
            KeyPrefix::Receipts,
            KeyPrefix::Tip,
        ];

        let values: Vec<u8> = prefixes.iter().map(|p| *p as u8).collect();
        let unique: std::collections::HashSet<u8> = values.iter().copied().collect();
        assert_eq!(values.len(), unique.len(), "Duplicate prefix values found");
    }
}
