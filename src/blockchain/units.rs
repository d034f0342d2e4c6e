//! Unit conversion helpers for log lines and API parameters.

use alloy::primitives::utils::{format_units, parse_units};
use alloy::primitives::U256;

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Format a raw amount with `decimals`, dropping trailing zeros.
///
/// `1_500_000` with 6 decimals becomes `"1.5"`; whole amounts keep no point.
pub fn format_amount(value: U256, decimals: u8) -> String {
    let formatted = format_units(value, decimals).unwrap_or_else(|_| value.to_string());
    if !formatted.contains('.') {
        return formatted;
    }
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Parse a decimal string into a raw amount with `decimals`.
pub fn parse_amount(value: &str, decimals: u8) -> BlockchainResult<U256> {
    parse_units(value, decimals)
        .map(|units| units.get_absolute())
        .map_err(|e| BlockchainError::Contract(format!("Invalid amount '{}': {}", value, e)))
}

/// `10^exp` as a U256.
pub fn pow10(exp: u8) -> U256 {
    U256::from(10u8).pow(U256::from(exp))
}
