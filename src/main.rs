//! testnet-cycler
//!
//! # Architecture Overview
//!
//! ```text
//!   cli ──▶ config ──▶ TaskContext ──▶ runner ──▶ tasks ──▶ blockchain (alloy)
//!                         │                         │
//!                         │                         └──▶ quoting (reqwest)
//!                         ▼
//!              lifecycle (Ctrl-C) · observability (tracing, metrics)
//! ```

use std::sync::Arc;

use clap::Parser;

use testnet_cycler::blockchain::ChainClient;
use testnet_cycler::cli::{Cli, Command};
use testnet_cycler::config::load_or_default;
use testnet_cycler::lifecycle::{spawn_signal_listener, Shutdown};
use testnet_cycler::observability::{logging, metrics};
use testnet_cycler::runner::{run_all, RunSummary, TaskContext};
use testnet_cycler::tasks::{run_deploy, run_faucet, run_send};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_or_default(&cli.config)?;

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.observability.log_level.clone());
    logging::init_logging(&level);

    tracing::info!("testnet-cycler v{} starting", env!("CARGO_PKG_VERSION"));
    if cli.config.exists() {
        tracing::info!(path = %cli.config.display(), "Configuration loaded");
    } else {
        tracing::warn!(path = %cli.config.display(), "Config file not found, using defaults");
    }

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let shutdown = Shutdown::new();
    spawn_signal_listener(shutdown.clone());

    let client = ChainClient::new(config.chain.clone()).await?;
    let config = Arc::new(config);
    let ctx = TaskContext::new(config.clone(), client, shutdown)?;

    let summary: RunSummary = match &cli.command {
        Command::Deploy { wallets } => run_deploy(&ctx, wallets).await?,
        Command::Send => run_send(&ctx).await?,
        Command::Faucet => run_faucet(&ctx).await?,
        Command::All(args) => run_all(&ctx, &args.apply(&config.schedule)).await?,
        command => match command.cycle_task() {
            Some((kind, args)) => kind.run_scheduled(&ctx, &args.apply(&config.schedule)).await?,
            None => RunSummary::default(),
        },
    };

    tracing::info!(
        accounts = summary.accounts,
        succeeded = summary.succeeded,
        cycles_ok = summary.cycles_ok,
        cycles_failed = summary.cycles_failed,
        "Shutdown complete"
    );
    Ok(())
}
