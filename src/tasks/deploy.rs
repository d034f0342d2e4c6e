//! Contract deployment from a small embedded catalogue.
//!
//! The init codes are hand-assembled so no compiler is needed at runtime:
//! - `EmptyContract`: returns empty runtime code
//! - `AnswerContract`: every call returns 42
//! - `SimpleCounter`: every call increments slot 0 and returns it
//! - `SimpleLogger`: every call emits its calldata as a LOG0

use std::time::Duration;

use alloy::network::TransactionBuilder;
use alloy::primitives::{hex, U256};
use alloy::rpc::types::TransactionRequest;

use crate::blockchain::units::format_amount;
use crate::blockchain::{load_wallets, BlockchainError, WalletEntry};
use crate::runner::{Account, RunSummary, TaskContext, TaskError, TaskResult};
use crate::sizing::random_gas_limit;

/// A contract the deploy task can create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogueEntry {
    pub name: &'static str,
    pub init_code: &'static [u8],
}

pub const CATALOGUE: [CatalogueEntry; 4] = [
    CatalogueEntry {
        name: "EmptyContract",
        init_code: &hex!("60006000f3"),
    },
    CatalogueEntry {
        name: "AnswerContract",
        init_code: &hex!("600a600c600039600a6000f3" "602a60005260206000f3"),
    },
    CatalogueEntry {
        name: "SimpleCounter",
        init_code: &hex!("6012600c60003960126000f3" "600054600101806000556000526020" "6000f3"),
    },
    CatalogueEntry {
        name: "SimpleLogger",
        init_code: &hex!("600b600c600039600b6000f3" "3660006000373660" "00a000"),
    },
];

const FALLBACK_FEE_WEI: u128 = 1_000_000_000;

/// Random catalogue entry.
pub fn pick_contract() -> CatalogueEntry {
    CATALOGUE[fastrand::usize(..CATALOGUE.len())]
}

/// Gas estimate plus 30%.
pub fn buffered_gas(estimate: u64) -> u64 {
    estimate.saturating_mul(13) / 10
}

/// Base fee plus 30%, or 1 gwei without a base fee.
pub fn deploy_fee(base_fee: Option<u64>) -> u128 {
    match base_fee {
        Some(fee) if fee > 0 => u128::from(fee) * 13 / 10,
        _ => FALLBACK_FEE_WEI,
    }
}

/// Worst-case cost with a 20% margin.
pub fn deployment_cost(fee_per_gas: u128, gas_limit: u64) -> U256 {
    U256::from(fee_per_gas) * U256::from(gas_limit) * U256::from(12u8) / U256::from(10u8)
}

/// Keep only the wallets whose 1-based ids are listed; an empty list keeps all.
pub fn select_wallets(wallets: Vec<WalletEntry>, ids: &[usize]) -> Vec<WalletEntry> {
    if ids.is_empty() {
        return wallets;
    }
    for id in ids {
        if !wallets.iter().any(|w| w.id == *id) {
            tracing::warn!(id, "No wallet with this id, ignoring");
        }
    }
    wallets.into_iter().filter(|w| ids.contains(&w.id)).collect()
}

async fn deploy_one(ctx: &TaskContext, account: &Account) -> TaskResult<bool> {
    let symbol = &ctx.config.chain.symbol;
    let contract = pick_contract();
    let balance = account.sender.balance().await?;
    tracing::info!(
        address = %account.address(),
        contract = contract.name,
        balance = %format!("{} {}", format_amount(balance, 18), symbol),
        "Preparing deployment"
    );

    let request = TransactionRequest::default()
        .with_from(account.address())
        .with_deploy_code(contract.init_code);

    let gas_limit = match ctx.client.estimate_gas(&request).await {
        Ok(estimate) => buffered_gas(estimate),
        Err(e) => {
            tracing::warn!(error = %e, "Unable to estimate gas, using a random limit");
            random_gas_limit(150_000, 250_000)
        }
    };

    let base_fee = match ctx.client.latest_base_fee().await {
        Ok(fee) => fee,
        Err(e) => {
            tracing::warn!(error = %e, "Unable to fetch base fee");
            None
        }
    };
    let fee = deploy_fee(base_fee);
    let cost = deployment_cost(fee, gas_limit);
    tracing::info!(cost = %format!("{} {}", format_amount(cost, 18), symbol), gas_limit, "Estimated cost");

    if balance < cost {
        tracing::error!(
            address = %account.address(),
            needed = %format!("{} {}", format_amount(cost - balance, 18), symbol),
            "Not enough funds to deploy"
        );
        return Ok(false);
    }

    let tx = request
        .with_gas_limit(gas_limit)
        .with_max_fee_per_gas(fee)
        .with_max_priority_fee_per_gas(fee);

    match account.sender.send(tx, "Deploy").await {
        Ok(outcome) => {
            if let Some(address) = outcome.contract_address {
                tracing::info!(
                    contract = contract.name,
                    url = %format!("{}{}", ctx.config.chain.address_explorer, address),
                    "Contract deployed"
                );
            }
            Ok(true)
        }
        Err(e) if e.is_insufficient_funds() || is_call_exception(&e) => {
            let balance = account.sender.balance().await.unwrap_or(balance);
            tracing::error!(
                address = %account.address(),
                balance = %format!("{} {}", format_amount(balance, 18), symbol),
                error = %e,
                "Not enough funds to deploy; try a higher gas price or add funds"
            );
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

fn is_call_exception(err: &BlockchainError) -> bool {
    let msg = err.to_string();
    msg.contains("CALL_EXCEPTION") || msg.contains("-32603")
}

/// Deploy one random contract from each selected wallet.
pub async fn run_deploy(ctx: &TaskContext, ids: &[usize]) -> TaskResult<RunSummary> {
    let wallets = load_wallets(
        std::path::Path::new(&ctx.config.files.private_keys),
        ctx.config.chain.chain_id,
    )?;
    let wallets = select_wallets(wallets, ids);
    let total = wallets.len();
    let mut summary = RunSummary::default();

    for (index, entry) in wallets.iter().enumerate() {
        if ctx.is_shutting_down() {
            break;
        }
        summary.accounts += 1;
        tracing::info!(account = format!("{}/{}", index + 1, total), id = entry.id, "Deploying");

        let result = match ctx.connect(entry).await {
            Ok(account) => deploy_one(ctx, &account).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(true) => {
                summary.succeeded += 1;
                summary.cycles_ok += 1;
            }
            Ok(false) => summary.cycles_failed += 1,
            Err(TaskError::Cancelled) => break,
            Err(e) => {
                summary.cycles_failed += 1;
                tracing::error!(id = entry.id, error = %e, "Deployment failed");
            }
        }

        if index + 1 < total {
            let pause = Duration::from_secs(ctx.config.delays.account_switch_secs);
            if ctx.pause(pause).await.is_err() {
                break;
            }
        }
    }

    tracing::info!(deployed = summary.succeeded, accounts = summary.accounts, "Deployment finished");
    Ok(summary)
}
