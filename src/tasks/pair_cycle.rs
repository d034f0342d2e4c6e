//! Random pair swap cycle shared by the DEX tasks.
//!
//! # Cycle
//! ```text
//! pick (A, B) → top up A from MON if dusty → swap A → B
//!     → pause → top up B if dusty → swap B → A
//! ```
//! A failed first leg is retried once with a fresh pair that excludes A.
//! A failed return leg is logged; the cycle still counts.

use alloy::primitives::U256;

use crate::blockchain::units::parse_amount;
use crate::runner::{Account, Task, TaskContext, TaskError, TaskResult};
use crate::sizing::{drain_amount, dust_floor, random_amount_with_floor};
use crate::tasks::erc20::{token_balance, unwrap, wrap};
use crate::tasks::tokens::{Token, MON};

/// A DEX able to swap between its listed tokens.
#[allow(async_fn_in_trait)]
pub trait PairRouter {
    fn name(&self) -> &'static str;

    fn tokens(&self) -> &'static [Token];

    async fn balance(&self, _ctx: &TaskContext, account: &Account, token: &Token) -> TaskResult<U256> {
        Ok(token_balance(&account.sender, token).await?)
    }

    /// Amount of `from` to sell for `to`: 99% into the native coin, a random share otherwise.
    fn size(&self, ctx: &TaskContext, balance: U256, from: &Token, to: &Token) -> U256 {
        if to.is_native() {
            drain_amount(balance)
        } else {
            random_amount_with_floor(balance, ctx.percent_range(), from.decimals)
        }
    }

    async fn swap(
        &self,
        ctx: &TaskContext,
        account: &Account,
        from: &Token,
        to: &Token,
        amount: U256,
    ) -> TaskResult<()>;
}

/// Runs `run_pair_cycle` for every account cycle.
#[derive(Debug, Clone, Copy)]
pub struct PairSwapTask<R>(pub R);

impl<R: PairRouter> Task for PairSwapTask<R> {
    fn name(&self) -> &'static str {
        self.0.name()
    }

    /// Swap cycles wait twice the usual range between rounds.
    async fn pause_between_cycles(&self, ctx: &TaskContext) -> TaskResult<()> {
        ctx.scaled_cycle_pause(2).await
    }

    async fn run_cycle(
        &self,
        ctx: &TaskContext,
        account: &Account,
        _cycle: u32,
        _total: u32,
    ) -> TaskResult<()> {
        run_pair_cycle(&self.0, ctx, account).await
    }
}

/// Two distinct random tokens, skipping `exclude`.
pub fn pick_pair(tokens: &[Token], exclude: Option<&Token>) -> Option<(Token, Token)> {
    let candidates: Vec<Token> = tokens
        .iter()
        .filter(|t| exclude.map_or(true, |ex| ex.symbol != t.symbol))
        .copied()
        .collect();
    if candidates.len() < 2 {
        return None;
    }

    let a = fastrand::usize(..candidates.len());
    let mut b = fastrand::usize(..candidates.len());
    while b == a {
        b = fastrand::usize(..candidates.len());
    }
    Some((candidates[a], candidates[b]))
}

/// Handle MON ↔ WMON directly through the wrapper contract.
///
/// Returns `true` when the pair was a wrap or unwrap.
pub async fn wrap_shortcut(account: &Account, from: &Token, to: &Token, amount: U256) -> TaskResult<bool> {
    if from.is_native() && to.is_wmon() {
        wrap(&account.sender, amount).await?;
        return Ok(true);
    }
    if from.is_wmon() && to.is_native() {
        unwrap(&account.sender, amount).await?;
        return Ok(true);
    }
    Ok(false)
}

fn propagate_cancel(result: TaskResult<()>) -> TaskResult<Result<(), TaskError>> {
    match result {
        Err(TaskError::Cancelled) => Err(TaskError::Cancelled),
        other => Ok(other),
    }
}

/// Balance of `token`, read as zero when the lookup fails.
async fn balance_or_zero<R: PairRouter>(
    router: &R,
    ctx: &TaskContext,
    account: &Account,
    token: &Token,
) -> TaskResult<U256> {
    match router.balance(ctx, account, token).await {
        Ok(balance) => Ok(balance),
        Err(TaskError::Cancelled) => Err(TaskError::Cancelled),
        Err(e) => {
            tracing::warn!(token = token.symbol, error = %e, "Unable to read balance, assuming zero");
            Ok(U256::ZERO)
        }
    }
}

/// Make sure there is at least 0.0001 of `token`, buying it with MON if needed.
async fn ensure_funded<R: PairRouter>(
    router: &R,
    ctx: &TaskContext,
    account: &Account,
    token: &Token,
) -> TaskResult<bool> {
    let balance = balance_or_zero(router, ctx, account, token).await?;
    tracing::info!(token = token.symbol, balance = %token.display(balance), "Token balance");
    if balance >= dust_floor(token.decimals) {
        return Ok(true);
    }

    if token.is_native() {
        tracing::warn!("MON balance too low to swap");
        return Ok(false);
    }

    tracing::info!(token = token.symbol, "Balance too low, buying with MON first");
    let mon_balance = balance_or_zero(router, ctx, account, &MON).await?;
    if mon_balance < parse_amount("0.001", MON.decimals)? {
        tracing::warn!(balance = %MON.display(mon_balance), "MON balance too low to top up");
        return Ok(false);
    }

    let amount = router.size(ctx, mon_balance, &MON, token);
    match propagate_cancel(router.swap(ctx, account, &MON, token, amount).await)? {
        Ok(()) => Ok(true),
        Err(e) => {
            tracing::warn!(token = token.symbol, error = %e, "Unable to buy token with MON");
            Ok(false)
        }
    }
}

async fn sell<R: PairRouter>(
    router: &R,
    ctx: &TaskContext,
    account: &Account,
    from: &Token,
    to: &Token,
) -> TaskResult<()> {
    let balance = router.balance(ctx, account, from).await?;
    let amount = router.size(ctx, balance, from, to);
    tracing::info!(
        dex = router.name(),
        amount = %from.display(amount),
        to = to.symbol,
        "Swapping"
    );
    router.swap(ctx, account, from, to, amount).await
}

/// One swap with a fresh pair that excludes `exclude`; no return leg.
async fn retry_with_different_pair<R: PairRouter>(
    router: &R,
    ctx: &TaskContext,
    account: &Account,
    exclude: &Token,
) -> TaskResult<()> {
    let (a, b) = pick_pair(router.tokens(), Some(exclude))
        .ok_or_else(|| TaskError::Skipped("Not enough tokens to retry with another pair".to_string()))?;
    tracing::info!(from = a.symbol, to = b.symbol, "Retrying with a different pair");

    if !ensure_funded(router, ctx, account, &a).await? {
        return Err(TaskError::Skipped(format!("Cannot continue with {}", a.symbol)));
    }
    sell(router, ctx, account, &a, &b).await
}

/// Swap a random pair there and back.
pub async fn run_pair_cycle<R: PairRouter>(router: &R, ctx: &TaskContext, account: &Account) -> TaskResult<()> {
    let (a, b) = pick_pair(router.tokens(), None)
        .ok_or_else(|| TaskError::Skipped("Router lists fewer than two tokens".to_string()))?;
    tracing::info!(dex = router.name(), from = a.symbol, to = b.symbol, "Selected pair");

    if !ensure_funded(router, ctx, account, &a).await? {
        tracing::warn!(token = a.symbol, "Cannot continue with token, trying a different pair");
        return retry_with_different_pair(router, ctx, account, &a).await;
    }

    if let Err(e) = propagate_cancel(sell(router, ctx, account, &a, &b).await)? {
        tracing::warn!(from = a.symbol, to = b.symbol, error = %e, "Swap failed, trying a different pair");
        return retry_with_different_pair(router, ctx, account, &a).await;
    }

    ctx.cycle_pause().await?;

    if !ensure_funded(router, ctx, account, &b).await? {
        tracing::warn!("Cannot swap back, but the first swap succeeded");
        return Ok(());
    }

    if let Err(e) = propagate_cancel(sell(router, ctx, account, &b, &a).await)? {
        tracing::warn!(from = b.symbol, to = a.symbol, error = %e, "Reverse swap failed");
    }
    Ok(())
}
