//! Faucet claims with a per-address cooldown.

use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::blockchain::load_wallets;
use crate::quoting::{FaucetClient, FaucetStatus};
use crate::runner::{RunSummary, TaskContext, TaskResult};

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Claim for every wallet whose cooldown has passed.
pub async fn run_faucet(ctx: &TaskContext) -> TaskResult<RunSummary> {
    let config = &ctx.config;
    let status_path = Path::new(&config.files.faucet_status);
    let mut status = FaucetStatus::load(status_path)?;
    let wallets = load_wallets(Path::new(&config.files.private_keys), config.chain.chain_id)?;
    let cooldown_secs = config.faucet.cooldown_hours.saturating_mul(3600);
    let client = FaucetClient::new(
        ctx.http.clone(),
        config.faucet.claim_url.clone(),
        Duration::from_secs(config.faucet.request_timeout_secs),
    );

    let mut summary = RunSummary::default();
    for (index, entry) in wallets.iter().enumerate() {
        if ctx.is_shutting_down() {
            break;
        }
        summary.accounts += 1;
        let address = entry.wallet.address();
        let now = unix_now();

        if !status.is_eligible(address, now, cooldown_secs) {
            let remaining = status.remaining(address, now, cooldown_secs);
            tracing::info!(
                address = %address,
                wait_minutes = remaining / 60,
                "Already claimed, waiting for cooldown"
            );
            continue;
        }

        let visitor_id = FaucetClient::new_visitor_id();
        match client.claim(address, &visitor_id).await {
            Ok(()) => {
                tracing::info!(address = %address, "Faucet claim succeeded");
                summary.succeeded += 1;
                summary.cycles_ok += 1;
                status.record(address, unix_now(), Some(visitor_id));
                if let Err(e) = status.save(status_path) {
                    tracing::error!(error = %e, path = %status_path.display(), "Unable to save faucet status");
                }
            }
            Err(e) => {
                summary.cycles_failed += 1;
                tracing::warn!(address = %address, error = %e, "Faucet claim failed");
            }
        }

        if index + 1 < wallets.len() {
            let pause = Duration::from_secs(config.delays.account_switch_secs);
            if ctx.pause(pause).await.is_err() {
                break;
            }
        }
    }

    tracing::info!(claimed = summary.succeeded, accounts = summary.accounts, "Faucet run finished");
    Ok(summary)
}
