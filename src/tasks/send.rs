//! Fund every key-file wallet from the main wallet.
//!
//! The main key is read from `CYCLER_MAIN_PRIVATE_KEY` only.

use std::path::Path;
use std::time::Duration;

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, U256};
use alloy::rpc::types::TransactionRequest;

use crate::blockchain::{load_wallets, TxSender, Wallet};
use crate::runner::{RunSummary, TaskContext, TaskError, TaskResult};
use crate::sizing::random_native_amount;
use crate::tasks::tokens::MON;

const TRANSFER_GAS: u64 = 21_000;

async fn transfer(ctx: &TaskContext, main: &TxSender, to: Address, amount: U256) -> TaskResult<()> {
    let gas_price = ctx.client.get_gas_price().await?;
    let nonce = ctx.client.get_pending_nonce(main.address()).await?;
    let tx = TransactionRequest::default()
        .with_to(to)
        .with_value(amount)
        .with_gas_limit(TRANSFER_GAS)
        .with_gas_price(gas_price)
        .with_nonce(nonce);
    main.send(tx, "Transfer").await?;
    Ok(())
}

/// Send a random `send_range` amount to each wallet other than the main one.
pub async fn run_send(ctx: &TaskContext) -> TaskResult<RunSummary> {
    let chain_id = ctx.config.chain.chain_id;
    let main_wallet = Wallet::from_env(chain_id)?;
    let main = TxSender::connect(&ctx.config.chain, main_wallet).await?;
    let wallets = load_wallets(Path::new(&ctx.config.files.private_keys), chain_id)?;
    let [min, max] = ctx.config.amounts.send_range;

    tracing::info!(from = %main.address(), recipients = wallets.len(), "Starting transfers");
    let mut summary = RunSummary::default();

    for (index, entry) in wallets.iter().enumerate() {
        if ctx.is_shutting_down() {
            break;
        }
        let to = entry.wallet.address();
        if to == main.address() {
            tracing::info!(id = entry.id, "Skipping the main wallet");
            continue;
        }
        summary.accounts += 1;

        let result = match random_native_amount(min, max) {
            Ok(amount) => {
                tracing::info!(to = %to, amount = %MON.display(amount), "Sending");
                transfer(ctx, &main, to, amount).await
            }
            Err(e) => Err(e.into()),
        };
        match result {
            Ok(()) => {
                summary.succeeded += 1;
                summary.cycles_ok += 1;
            }
            Err(TaskError::Cancelled) => break,
            Err(e) => {
                summary.cycles_failed += 1;
                tracing::error!(to = %to, error = %e, "Transfer failed");
            }
        }

        if index + 1 < wallets.len() {
            let pause = Duration::from_secs(ctx.config.delays.account_switch_secs);
            if ctx.pause(pause).await.is_err() {
                break;
            }
        }
    }

    tracing::info!(sent = summary.succeeded, failed = summary.cycles_failed, "Transfers finished");
    Ok(summary)
}
