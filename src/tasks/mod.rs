//! Testnet activity tasks.
//!
//! # Data Flow
//! ```text
//! Cycle tasks (runner::Task, repeated per wallet):
//!     wrap.rs      → rubic, izumi (MON ↔ WMON)
//!     stake.rs     → magma, kintsu, apriori
//!     pair_cycle.rs + beanswap.rs / monorail.rs / ambient.rs
//!     uniswap.rs   → buy a token basket and sell it back
//! One-shot tasks (single pass over the key file):
//!     deploy.rs, send.rs, faucet.rs
//! ```
//!
//! # Design Decisions
//! - Contract addresses and selectors are compile-time constants
//! - Swap routers share one pair cycle through the `PairRouter` trait

pub mod ambient;
pub mod beanswap;
pub mod deploy;
pub mod erc20;
pub mod faucet;
pub mod monorail;
pub mod pair_cycle;
pub mod send;
pub mod stake;
pub mod tokens;
pub mod uniswap;
pub mod v2_router;
pub mod wrap;

use crate::config::ScheduleConfig;
use crate::runner::{run_accounts, run_scheduled, RunSummary, TaskContext, TaskResult};

pub use ambient::Ambient;
pub use beanswap::Beanswap;
pub use deploy::run_deploy;
pub use faucet::run_faucet;
pub use monorail::Monorail;
pub use pair_cycle::PairSwapTask;
pub use send::run_send;
pub use stake::{StakeProtocol, StakeTask};
pub use uniswap::UniswapTask;
pub use wrap::WrapTask;

/// Every task that runs in cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Rubic,
    Izumi,
    Beanswap,
    Magma,
    Apriori,
    Monorail,
    Kintsu,
    Uniswap,
    Ambient,
}

impl TaskKind {
    /// Order used by the `all` command.
    pub const SEQUENCE: [TaskKind; 8] = [
        TaskKind::Rubic,
        TaskKind::Izumi,
        TaskKind::Beanswap,
        TaskKind::Magma,
        TaskKind::Apriori,
        TaskKind::Monorail,
        TaskKind::Kintsu,
        TaskKind::Uniswap,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TaskKind::Rubic => "rubic",
            TaskKind::Izumi => "izumi",
            TaskKind::Beanswap => "beanswap",
            TaskKind::Magma => "magma",
            TaskKind::Apriori => "apriori",
            TaskKind::Monorail => "monorail",
            TaskKind::Kintsu => "kintsu",
            TaskKind::Uniswap => "uniswap",
            TaskKind::Ambient => "ambient",
        }
    }

    /// One pass over all wallets.
    pub async fn run(self, ctx: &TaskContext, cycles: u32) -> TaskResult<RunSummary> {
        match self {
            TaskKind::Rubic => run_accounts(&WrapTask::rubic(), ctx, cycles).await,
            TaskKind::Izumi => run_accounts(&WrapTask::izumi(), ctx, cycles).await,
            TaskKind::Beanswap => run_accounts(&PairSwapTask(Beanswap), ctx, cycles).await,
            TaskKind::Monorail => run_accounts(&PairSwapTask(Monorail), ctx, cycles).await,
            TaskKind::Ambient => run_accounts(&PairSwapTask(Ambient), ctx, cycles).await,
            TaskKind::Uniswap => run_accounts(&UniswapTask, ctx, cycles).await,
            TaskKind::Magma => run_accounts(&StakeTask::new(StakeProtocol::Magma), ctx, cycles).await,
            TaskKind::Kintsu => run_accounts(&StakeTask::new(StakeProtocol::Kintsu), ctx, cycles).await,
            TaskKind::Apriori => run_accounts(&StakeTask::new(StakeProtocol::Apriori), ctx, cycles).await,
        }
    }

    /// Passes repeated per `schedule`.
    pub async fn run_scheduled(self, ctx: &TaskContext, schedule: &ScheduleConfig) -> TaskResult<RunSummary> {
        match self {
            TaskKind::Rubic => run_scheduled(&WrapTask::rubic(), ctx, schedule).await,
            TaskKind::Izumi => run_scheduled(&WrapTask::izumi(), ctx, schedule).await,
            TaskKind::Beanswap => run_scheduled(&PairSwapTask(Beanswap), ctx, schedule).await,
            TaskKind::Monorail => run_scheduled(&PairSwapTask(Monorail), ctx, schedule).await,
            TaskKind::Ambient => run_scheduled(&PairSwapTask(Ambient), ctx, schedule).await,
            TaskKind::Uniswap => run_scheduled(&UniswapTask, ctx, schedule).await,
            TaskKind::Magma => run_scheduled(&StakeTask::new(StakeProtocol::Magma), ctx, schedule).await,
            TaskKind::Kintsu => run_scheduled(&StakeTask::new(StakeProtocol::Kintsu), ctx, schedule).await,
            TaskKind::Apriori => run_scheduled(&StakeTask::new(StakeProtocol::Apriori), ctx, schedule).await,
        }
    }
}
