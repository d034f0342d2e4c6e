//! Bean Exchange pair swaps through the V2 router.

use alloy::network::TransactionBuilder;
use alloy::primitives::{address, U256};
use alloy::rpc::types::TransactionRequest;

use crate::runner::{Account, TaskContext, TaskError, TaskResult};
use crate::sizing::random_gas_limit;
use crate::tasks::erc20::{deadline, ensure_allowance, with_fees};
use crate::tasks::pair_cycle::{wrap_shortcut, PairRouter};
use crate::tasks::tokens::{Token, MON, WMON};
use crate::tasks::v2_router::{amount_out, path, swap_input, V2_ROUTER};

pub const TOKENS: [Token; 5] = [
    MON,
    WMON,
    Token::erc20("USDC", address!("62534E4bBD6D9ebAC0ac99aeaa0aa48E56372df0"), 6),
    Token::erc20("BEAN", address!("268E4E24E0051EC27b3D27A95977E71cE6875a05"), 18),
    Token::erc20("JAI", address!("70F893f65E3C1d7f82aad72f71615eb220b74D10"), 18),
];

const DEADLINE_SECS: u64 = 6 * 3600;

#[derive(Debug, Clone, Copy, Default)]
pub struct Beanswap;

impl PairRouter for Beanswap {
    fn name(&self) -> &'static str {
        "beanswap"
    }

    fn tokens(&self) -> &'static [Token] {
        &TOKENS
    }

    async fn swap(
        &self,
        ctx: &TaskContext,
        account: &Account,
        from: &Token,
        to: &Token,
        amount: U256,
    ) -> TaskResult<()> {
        if wrap_shortcut(account, from, to, amount).await? {
            return Ok(());
        }

        ensure_allowance(&account.sender, from, V2_ROUTER, amount, U256::MAX).await?;

        let expected = amount_out(&account.sender, amount, path(from, to))
            .await
            .map_err(|e| TaskError::Skipped(format!("Not enough liquidity: {}", e)))?;
        let min_out = expected * U256::from(95u8) / U256::from(100u8);
        tracing::info!(
            amount_in = %from.display(amount),
            expected_out = %to.display(expected),
            "Quoted swap"
        );

        let (input, value) = swap_input(from, to, amount, min_out, account.address(), deadline(DEADLINE_SECS));
        let fees = ctx.client.estimate_fees().await?;
        let tx = TransactionRequest::default()
            .with_to(V2_ROUTER)
            .with_value(value)
            .with_input(input)
            .with_gas_limit(random_gas_limit(250_000, 350_000));
        account.sender.send(with_fees(tx, fees), "Swap").await?;
        Ok(())
    }
}
