//! Testnet wallet automation library.
//!
//! Wallets from a key file run cycles of faucet claims, contract deploys,
//! staking and DEX swaps, one wallet at a time with randomized amounts and
//! pauses.

pub mod blockchain;
pub mod cli;
pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod quoting;
pub mod resilience;
pub mod runner;
pub mod sizing;
pub mod tasks;

pub use config::AppConfig;
pub use lifecycle::Shutdown;
pub use runner::{RunSummary, TaskContext};
