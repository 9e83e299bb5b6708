//! Execution context for transaction processing.

use regchain_core::{RegId, TokenSymbol, NATIVE_SYMBOL};

/// Execution context carrying block-level information.
///
/// The height and in-block index of the transaction being applied
/// determine the registration id it mints.
#[derive(Clone, Debug)]
pub struct ExecutionContext {
    /// Current ledger height.
    pub block_height: u32,

    /// Index of the transaction within its block.
    pub tx_index: u16,

    /// Currency fees are charged in.
    pub fee_symbol: TokenSymbol,
}

impl ExecutionContext {
    /// Create a new execution context charging fees in the native currency.
    pub fn new(block_height: u32, tx_index: u16) -> Self {
        Self {
            block_height,
            tx_index,
            fee_symbol: NATIVE_SYMBOL,
        }
    }

    /// Charge fees in `symbol` instead of the native currency.
    pub fn with_fee_symbol(mut self, symbol: TokenSymbol) -> Self {
        self.fee_symbol = symbol;
        self
    }

    /// Registration id minted by a registration applied in this context.
    pub fn reg_id(&self) -> RegId {
        RegId::new(self.block_height, self.tx_index)
    }

    /// Create an execution context for testing with minimal values.
    #[cfg(test)]
    pub fn test_context() -> Self {
        Self::new(1, 0)
    }
}
