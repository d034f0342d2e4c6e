//! Uniswap V2 round trip: buy every listed token with a little MON, then
//! sell each whole balance back.

use alloy::network::TransactionBuilder;
use alloy::primitives::{address, U256};
use alloy::rpc::types::TransactionRequest;

use crate::runner::{Account, Task, TaskContext, TaskError, TaskResult};
use crate::sizing::random_native_amount;
use crate::tasks::erc20::{approve, deadline, token_balance};
use crate::tasks::tokens::{Token, MON};
use crate::tasks::v2_router::{swap_input, V2_ROUTER};

pub const TOKENS: [Token; 6] = [
    Token::erc20("DAC", address!("0f0bdebf0f83cd1ee3974779bcb7315f9808c714"), 18),
    Token::erc20("USDT", address!("88b8e2161dedc77ef4ab7585569d2415a1c1055d"), 6),
    Token::erc20("WETH", address!("836047a99e11f376522b447bffb6e3495dd0637c"), 18),
    Token::erc20("MUK", address!("989d38aeed8408452f0273c7d4a17fef20878e62"), 18),
    Token::erc20("USDC", address!("f817257fed379853cDe0fa4F97AB987181B1E5Ea"), 6),
    Token::erc20("CHOG", address!("E0590015A873bF326bd645c3E1266d4db41C4E6B"), 18),
];

const SWAP_GAS: u64 = 210_000;
const DEADLINE_SECS: u64 = 600;

#[derive(Debug, Clone, Copy, Default)]
pub struct UniswapTask;

impl UniswapTask {
    async fn send_swap(
        &self,
        ctx: &TaskContext,
        account: &Account,
        from: &Token,
        to: &Token,
        amount: U256,
    ) -> TaskResult<()> {
        let (input, value) = swap_input(from, to, amount, U256::ZERO, account.address(), deadline(DEADLINE_SECS));
        let nonce = ctx.client.get_pending_nonce(account.address()).await?;
        let tx = TransactionRequest::default()
            .with_to(V2_ROUTER)
            .with_value(value)
            .with_input(input)
            .with_gas_limit(SWAP_GAS)
            .with_nonce(nonce);
        account.sender.send(tx, "Swap").await?;
        Ok(())
    }

    async fn buy(&self, ctx: &TaskContext, account: &Account, token: &Token) -> TaskResult<()> {
        let amount = random_native_amount(0.0001, 0.01)?;
        tracing::info!(amount = %MON.display(amount), token = token.symbol, "Buying token");
        self.send_swap(ctx, account, &MON, token, amount).await
    }

    async fn sell_all(&self, ctx: &TaskContext, account: &Account, token: &Token) -> TaskResult<()> {
        let balance = token_balance(&account.sender, token).await?;
        if balance.is_zero() {
            tracing::info!(token = token.symbol, "No balance, skipping");
            return Ok(());
        }

        if let Some(address) = token.address {
            approve(&account.sender, address, V2_ROUTER, balance).await?;
        }
        tracing::info!(amount = %token.display(balance), "Selling back to MON");
        self.send_swap(ctx, account, token, &MON, balance).await
    }
}

fn log_step_error(result: TaskResult<()>, token: &Token) -> TaskResult<()> {
    match result {
        Err(TaskError::Cancelled) => Err(TaskError::Cancelled),
        Err(e) => {
            tracing::warn!(token = token.symbol, error = %e, "Swap step failed");
            Ok(())
        }
        Ok(()) => Ok(()),
    }
}

impl Task for UniswapTask {
    fn name(&self) -> &'static str {
        "uniswap"
    }

    async fn run_cycle(
        &self,
        ctx: &TaskContext,
        account: &Account,
        _cycle: u32,
        _total: u32,
    ) -> TaskResult<()> {
        for token in &TOKENS {
            log_step_error(self.buy(ctx, account, token).await, token)?;
            ctx.short_pause().await?;
        }

        tracing::info!("Selling all tokens back to MON");
        for token in &TOKENS {
            log_step_error(self.sell_all(ctx, account, token).await, token)?;
            ctx.short_pause().await?;
        }
        Ok(())
    }
}
