//! Runner types: task context, accounts, errors, summaries.

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::Address;
use thiserror::Error;

use crate::blockchain::{BlockchainError, ChainClient, TxSender, WalletEntry};
use crate::config::AppConfig;
use crate::lifecycle::Shutdown;
use crate::quoting::{QuoteError, StatusError};
use crate::resilience::{random_delay, sleep_or_shutdown};

/// Errors surfaced by a task.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error(transparent)]
    Chain(#[from] BlockchainError),

    #[error(transparent)]
    Quote(#[from] QuoteError),

    #[error(transparent)]
    Status(#[from] StatusError),

    /// Failed to build the HTTP client.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// The step could not run with the current balances or token pair.
    #[error("{0}")]
    Skipped(String),

    /// Repeat interval that cannot be slept on.
    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("Interrupted by shutdown")]
    Cancelled,
}

pub type TaskResult<T> = Result<T, TaskError>;

/// Shared state handed to every task.
#[derive(Clone)]
pub struct TaskContext {
    pub config: Arc<AppConfig>,
    pub client: ChainClient,
    pub shutdown: Shutdown,
    pub http: reqwest::Client,
}

impl TaskContext {
    pub fn new(config: Arc<AppConfig>, client: ChainClient, shutdown: Shutdown) -> TaskResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.apis.request_timeout_secs))
            .build()?;
        Ok(Self {
            config,
            client,
            shutdown,
            http,
        })
    }

    /// Open a signing provider for one wallet.
    pub async fn connect(&self, entry: &WalletEntry) -> TaskResult<Account> {
        let sender = TxSender::connect(&self.config.chain, entry.wallet.clone()).await?;
        Ok(Account { id: entry.id, sender })
    }

    /// Sleep unless shutdown fires; `Err(Cancelled)` when it does.
    pub async fn pause(&self, duration: Duration) -> TaskResult<()> {
        if sleep_or_shutdown(duration, &self.shutdown).await {
            Ok(())
        } else {
            Err(TaskError::Cancelled)
        }
    }

    /// Random pause in the configured cycle range.
    pub async fn cycle_pause(&self) -> TaskResult<()> {
        self.scaled_cycle_pause(1).await
    }

    /// Random pause in the configured cycle range multiplied by `factor`.
    pub async fn scaled_cycle_pause(&self, factor: u64) -> TaskResult<()> {
        let delays = &self.config.delays;
        let duration = random_delay(
            delays.cycle_min_secs.saturating_mul(factor),
            delays.cycle_max_secs.saturating_mul(factor),
        );
        tracing::info!(secs = duration.as_secs(), "Waiting before next step");
        self.pause(duration).await
    }

    /// Short random pause between back-to-back transactions.
    pub async fn short_pause(&self) -> TaskResult<()> {
        self.pause(random_delay(1, 3)).await
    }

    pub fn percent_range(&self) -> [f64; 2] {
        self.config.amounts.percent_range
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.is_triggered()
    }
}

/// A wallet with a connected signing provider.
#[derive(Debug, Clone)]
pub struct Account {
    /// 1-based key file id.
    pub id: usize,
    pub sender: TxSender,
}

impl Account {
    pub fn address(&self) -> Address {
        self.sender.address()
    }

    pub fn short_address(&self) -> String {
        self.sender.wallet().short_address()
    }
}

/// Behaviour repeated per wallet by the runner.
#[allow(async_fn_in_trait)]
pub trait Task {
    /// Name used in logs and metrics.
    fn name(&self) -> &'static str;

    /// Whether the runner logs the balance difference after the cycles.
    fn reports_profit(&self) -> bool {
        false
    }

    /// Whether a failed cycle ends the wallet's remaining cycles.
    fn stops_on_failure(&self) -> bool {
        false
    }

    /// Pause between two cycles of the same wallet.
    async fn pause_between_cycles(&self, ctx: &TaskContext) -> TaskResult<()> {
        ctx.cycle_pause().await
    }

    /// Run cycle `cycle` of `total` for `account`.
    async fn run_cycle(
        &self,
        ctx: &TaskContext,
        account: &Account,
        cycle: u32,
        total: u32,
    ) -> TaskResult<()>;
}

/// Outcome of one pass over the key file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub accounts: usize,
    /// Accounts whose every cycle succeeded.
    pub succeeded: usize,
    pub cycles_ok: u32,
    pub cycles_failed: u32,
}

impl RunSummary {
    pub fn merge(&mut self, other: RunSummary) {
        self.accounts += other.accounts;
        self.succeeded += other.succeeded;
        self.cycles_ok += other.cycles_ok;
        self.cycles_failed += other.cycles_failed;
    }
}
