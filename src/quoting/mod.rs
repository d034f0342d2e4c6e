//! HTTP integrations: swap quotes, withdrawal lookups and faucet claims.
//!
//! # Data Flow
//! ```text
//! tasks::monorail → pathfinder.rs (GET quote → ready-to-send transaction)
//! tasks::stake    → apriori.rs    (GET withdrawal requests → claimable id)
//! tasks::faucet   → faucet.rs     (POST claim) + claims.rs (cooldown file)
//! ```
//!
//! # Design Decisions
//! - One shared `reqwest::Client` per run; base URLs come from config
//! - Non-2xx responses surface as `QuoteError::Status` so retry predicates
//!   can see the code

pub mod apriori;
pub mod claims;
pub mod faucet;
pub mod pathfinder;
pub mod types;

pub use apriori::AprioriApi;
pub use claims::{ClaimRecord, FaucetStatus, StatusError};
pub use faucet::FaucetClient;
pub use pathfinder::PathfinderClient;
pub use types::{QuoteError, QuoteResult, QuotedTransaction, RequestId, WithdrawalRequest};
