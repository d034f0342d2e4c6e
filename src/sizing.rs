//! Randomized transaction sizing.
//!
//! Amounts are drawn as a random share of the current balance. Percentages
//! have 0.1% precision: each bound is `balance * round(p * 10) / 1000`.

use alloy::primitives::U256;
use rand::Rng;

use crate::blockchain::units::{parse_amount, pow10};
use crate::blockchain::{BlockchainError, BlockchainResult};

/// `[min, max]` share of `balance` for a percentage range.
pub fn percent_bounds(balance: U256, percent_range: [f64; 2]) -> (U256, U256) {
    let per_mille = |p: f64| U256::from((p * 10.0).round().max(0.0) as u64);
    let min = balance * per_mille(percent_range[0]) / U256::from(1000u64);
    let max = balance * per_mille(percent_range[1]) / U256::from(1000u64);
    (min, max)
}

/// Smallest amount worth sending: 0.0001 whole units.
pub fn dust_floor(decimals: u8) -> U256 {
    if decimals >= 4 {
        pow10(decimals - 4)
    } else {
        U256::from(1u8)
    }
}

fn random_u256() -> U256 {
    U256::from_be_bytes(rand::random::<[u8; 32]>())
}

/// Random amount in the percentage range, never below the dust floor.
///
/// When the lower bound is under 0.0001 units the floor itself is returned,
/// even if that exceeds the balance; the node will reject the transaction.
pub fn random_amount_with_floor(balance: U256, percent_range: [f64; 2], decimals: u8) -> U256 {
    let (min, max) = percent_bounds(balance, percent_range);
    let floor = dust_floor(decimals);

    if min < floor {
        tracing::warn!("Balance too low, using minimum amount");
        return floor;
    }

    let range = max - min;
    if range.is_zero() {
        return min;
    }
    min + random_u256() % range
}

/// Random amount in the percentage range; an empty lower bound is an error.
pub fn random_amount_strict(balance: U256, percent_range: [f64; 2]) -> BlockchainResult<U256> {
    let (min, max) = percent_bounds(balance, percent_range);

    if min.is_zero() {
        return Err(BlockchainError::InsufficientBalance(format!(
            "balance {} too small to size a transaction",
            balance
        )));
    }

    let span = max - min + U256::from(1u8);
    Ok(min + random_u256() % span)
}

/// 99% of the balance, used when swapping back to the native token.
pub fn drain_amount(balance: U256) -> U256 {
    balance * U256::from(99u8) / U256::from(100u8)
}

/// Round up to 3 decimals for 18-decimal tokens, 2 decimals otherwise.
pub fn round_up(amount: U256, decimals: u8) -> U256 {
    let kept = if decimals == 18 { 3 } else { 2 };
    if decimals <= kept {
        return amount;
    }
    let step = pow10(decimals - kept);
    let rem = amount % step;
    if rem.is_zero() {
        amount
    } else {
        amount - rem + step
    }
}

/// Uniform native amount in `[min, max)` with 6 fractional digits.
pub fn random_native_amount(min: f64, max: f64) -> BlockchainResult<U256> {
    let value = if max > min {
        rand::thread_rng().gen_range(min..max)
    } else {
        min
    };
    parse_amount(&format!("{:.6}", value), 18)
}

/// Uniform gas limit in `[lo, hi]`.
pub fn random_gas_limit(lo: u64, hi: u64) -> u64 {
    rand::thread_rng().gen_range(lo..=hi.max(lo))
}
