//! Token symbols.
//!
//! A symbol is an 8-byte tag naming a currency held in an account's
//! balance ledger (e.g. "RGC").

use crate::error::SymbolError;

/// 8-byte token symbol tag.
pub type TokenSymbol = [u8; 8];

/// The ledger's base currency, in which transaction fees are paid.
pub const NATIVE_SYMBOL: TokenSymbol = [b'R', b'G', b'C', 0, 0, 0, 0, 0];

/// Create a symbol from a string.
///
/// The string must be between 1 and 8 bytes. Shorter strings are
/// padded with null bytes.
pub fn symbol_from_str(s: &str) -> Result<TokenSymbol, SymbolError> {
    let bytes = s.as_bytes();
    if bytes.is_empty() {
        return Err(SymbolError::Empty);
    }
    if bytes.len() > 8 {
        return Err(SymbolError::TooLong);
    }

    let mut symbol = [0u8; 8];
    symbol[..bytes.len()].copy_from_slice(bytes);
    Ok(symbol)
}

/// Convert a symbol to a string, stripping trailing null bytes.
pub fn symbol_to_string(symbol: &TokenSymbol) -> String {
    let end = symbol.iter().position(|&b| b == 0).unwrap_or(8);
    String::from_utf8_lossy(&symbol[..end]).into_owned()
}
