//! Monorail pair swaps routed by the pathfinder API.
//!
//! Wrapping, approvals, the quote and the broadcast are retried on transient
//! server errors using the `[retries]` settings.

use std::time::Duration;

use alloy::network::TransactionBuilder;
use alloy::primitives::{address, Address, U256};
use alloy::rpc::types::TransactionRequest;

use crate::blockchain::units::format_amount;
use crate::quoting::PathfinderClient;
use crate::resilience::{is_server_error, retry_fixed};
use crate::runner::{Account, TaskContext, TaskResult};
use crate::tasks::erc20::{ensure_allowance, token_balance, with_fees};
use crate::tasks::pair_cycle::{wrap_shortcut, PairRouter};
use crate::tasks::tokens::{Token, MON, WMON};

pub const MONORAIL_ROUTER: Address = address!("C995498c22a012353FAE7eCC701810D673E25794");

pub const TOKENS: [Token; 4] = [
    MON,
    WMON,
    Token::erc20("USDC", address!("f817257fed379853cDe0fa4F97AB987181B1E5Ea"), 6),
    Token::erc20("WETH", address!("b5a30b0fdc5ea94a52fdc42e3e9760cb8449fb37"), 18),
];

const SWAP_GAS: u64 = 500_000;

#[derive(Debug, Clone, Copy, Default)]
pub struct Monorail;

impl Monorail {
    fn retry_settings(ctx: &TaskContext) -> (u32, Duration) {
        let retries = &ctx.config.retries;
        (retries.max_attempts, Duration::from_millis(retries.delay_ms))
    }
}

impl PairRouter for Monorail {
    fn name(&self) -> &'static str {
        "monorail"
    }

    fn tokens(&self) -> &'static [Token] {
        &TOKENS
    }

    async fn balance(&self, ctx: &TaskContext, account: &Account, token: &Token) -> TaskResult<U256> {
        let (attempts, delay) = Self::retry_settings(ctx);
        let label = format!("Fetching {} balance", token.symbol);
        let balance = retry_fixed(
            attempts,
            delay,
            &label,
            || token_balance(&account.sender, token),
            |_| true,
        )
        .await?;
        Ok(balance)
    }

    async fn swap(
        &self,
        ctx: &TaskContext,
        account: &Account,
        from: &Token,
        to: &Token,
        amount: U256,
    ) -> TaskResult<()> {
        let (attempts, delay) = Self::retry_settings(ctx);

        let shortcut = retry_fixed(
            attempts,
            delay,
            &format!("{} → {}", from.symbol, to.symbol),
            || wrap_shortcut(account, from, to, amount),
            is_server_error,
        )
        .await?;
        if shortcut {
            return Ok(());
        }

        retry_fixed(
            attempts,
            delay,
            &format!("Approving {}", from.symbol),
            || ensure_allowance(&account.sender, from, MONORAIL_ROUTER, amount, U256::MAX),
            is_server_error,
        )
        .await?;

        let pathfinder = PathfinderClient::new(ctx.http.clone(), ctx.config.apis.pathfinder_url.clone());
        let amount_str = format_amount(amount, from.decimals);
        let to_address = to.address_or_zero();

        let quoted = retry_fixed(
            attempts,
            delay,
            "Getting pathfinder quote",
            || pathfinder.quote(from.address, to_address, &amount_str, account.address()),
            is_server_error,
        )
        .await?;

        // The quote's own value is ignored; native input pays exactly `amount`.
        let value = if from.is_native() { amount } else { U256::ZERO };
        let label = format!("Swap {} → {}", from.symbol, to.symbol);
        let (client, sender, quoted) = (&ctx.client, &account.sender, &quoted);

        retry_fixed(
            attempts,
            delay,
            &label,
            move || async move {
                let fees = client.estimate_fees().await?;
                let tx = TransactionRequest::default()
                    .with_to(quoted.to)
                    .with_input(quoted.data.clone())
                    .with_value(value)
                    .with_gas_limit(SWAP_GAS);
                sender.send(with_fees(tx, fees), "Swap").await
            },
            is_server_error,
        )
        .await?;
        Ok(())
    }
}
