//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Key file (one private key per line) / environment (main wallet)
//!     → wallet.rs (key loading, address derivation)
//!     → client.rs (read-only RPC with timeouts and failover)
//!     → transaction.rs (sign, broadcast, confirm)
//! ```
//!
//! # Security Constraints
//! - The funding key comes ONLY from an environment variable
//! - Never log private keys
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod transaction;
pub mod types;
pub mod units;
pub mod wallet;

pub use client::{ChainClient, FeeEstimate};
pub use transaction::TxSender;
pub use types::{BlockchainError, BlockchainResult, ChainId, TxOutcome};
pub use wallet::{load_wallets, Wallet, WalletEntry};
