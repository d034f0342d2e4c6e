//! Token descriptors.

use alloy::primitives::{address, Address, U256};

use crate::blockchain::units::format_amount;

/// Wrapped MON, also the WETH slot of every V2 path.
pub const WMON_ADDRESS: Address = address!("760AfE86e5de5fa0Ee542fc7B7B713e1c5425701");

/// A tradeable asset. `address` is `None` for the native coin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub symbol: &'static str,
    pub address: Option<Address>,
    pub decimals: u8,
}

impl Token {
    pub const fn native(symbol: &'static str) -> Self {
        Self {
            symbol,
            address: None,
            decimals: 18,
        }
    }

    pub const fn erc20(symbol: &'static str, address: Address, decimals: u8) -> Self {
        Self {
            symbol,
            address: Some(address),
            decimals,
        }
    }

    pub fn is_native(&self) -> bool {
        self.address.is_none()
    }

    pub fn is_wmon(&self) -> bool {
        self.address == Some(WMON_ADDRESS)
    }

    /// Contract address, or the zero address for the native coin.
    pub fn address_or_zero(&self) -> Address {
        self.address.unwrap_or(Address::ZERO)
    }

    /// `"1.5 USDC"`
    pub fn display(&self, amount: U256) -> String {
        format!("{} {}", format_amount(amount, self.decimals), self.symbol)
    }
}

pub const MON: Token = Token::native("MON");
pub const WMON: Token = Token::erc20("WMON", WMON_ADDRESS, 18);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_kinds() {
        assert!(MON.is_native());
        assert_eq!(MON.address_or_zero(), Address::ZERO);
        assert!(WMON.is_wmon());
        assert!(!WMON.is_native());
    }

    #[test]
    fn test_display() {
        let usdc = Token::erc20("USDC", Address::ZERO, 6);
        assert_eq!(usdc.display(U256::from(1_500_000u64)), "1.5 USDC");
    }
}
