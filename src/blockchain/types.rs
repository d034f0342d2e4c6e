//! Chain-specific types and error definitions.

use alloy::primitives::{Address, TxHash};
use thiserror::Error;

// Re-export ChainConfig from config module to avoid duplication
pub use crate::config::schema::ChainConfig;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Transaction was not confirmed within expected time.
    #[error("Transaction not confirmed after {0} seconds")]
    ConfirmationTimeout(u64),

    /// Transaction was reverted on-chain.
    #[error("Transaction reverted: {0}")]
    Reverted(String),

    /// Invalid private key format or derivation error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// Balance too small for the requested operation.
    #[error("Insufficient balance: {0}")]
    InsufficientBalance(String),

    /// Contract call or calldata error.
    #[error("Contract error: {0}")]
    Contract(String),
}

impl BlockchainError {
    /// Whether the node rejected the transaction for lack of funds.
    pub fn is_insufficient_funds(&self) -> bool {
        match self {
            BlockchainError::InsufficientBalance(_) => true,
            BlockchainError::Rpc(msg) | BlockchainError::Contract(msg) => {
                let msg = msg.to_lowercase();
                msg.contains("insufficient balance") || msg.contains("insufficient funds")
            }
            _ => false,
        }
    }
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// A mined transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOutcome {
    /// Transaction hash.
    pub hash: TxHash,
    /// Block the transaction was included in, if the node reported it.
    pub block_number: Option<u64>,
    /// Address of a contract created by this transaction.
    pub contract_address: Option<Address>,
}
