//! Per-account cycle runner.
//!
//! # Data Flow
//! ```text
//! Key file → WalletEntry list
//!     → for each wallet: connect TxSender → Task::run_cycle × N (random pauses)
//!     → pause between wallets
//!     → RunSummary
//! Schedule:
//!     run_scheduled / run_all repeat the pass every `interval_hours`
//! ```
//!
//! # Design Decisions
//! - Strictly sequential: one wallet, one transaction at a time
//! - A failed cycle or wallet is logged and skipped, never fatal to the run
//! - Every pause ends early on shutdown

pub mod accounts;
pub mod types;

pub use accounts::{repeat_on_interval, run_accounts, run_all, run_scheduled};
pub use types::{Account, RunSummary, Task, TaskContext, TaskError, TaskResult};
