//! Wrap/unwrap cycles (Rubic and Izumi flows).
//!
//! Each cycle wraps a random share of the MON balance into WMON and unwraps
//! the same amount. A failed wrap skips the unwrap.

use crate::runner::{Account, Task, TaskContext, TaskResult};
use crate::sizing::{random_amount_strict, random_amount_with_floor};
use crate::tasks::erc20::{unwrap, wrap};
use crate::tasks::tokens::MON;

/// How the wrap amount is drawn from the balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sizing {
    /// Never below 0.0001 MON.
    Floor,
    /// Errors when the lower bound is zero.
    Strict,
}

#[derive(Debug, Clone, Copy)]
pub struct WrapTask {
    name: &'static str,
    sizing: Sizing,
    /// Rubic runs its cycles back to back.
    pauses: bool,
}

impl WrapTask {
    pub const fn rubic() -> Self {
        Self {
            name: "rubic",
            sizing: Sizing::Floor,
            pauses: false,
        }
    }

    pub const fn izumi() -> Self {
        Self {
            name: "izumi",
            sizing: Sizing::Strict,
            pauses: true,
        }
    }
}

impl Task for WrapTask {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn pause_between_cycles(&self, ctx: &TaskContext) -> TaskResult<()> {
        if self.pauses {
            ctx.cycle_pause().await?;
        }
        Ok(())
    }

    async fn run_cycle(
        &self,
        ctx: &TaskContext,
        account: &Account,
        _cycle: u32,
        _total: u32,
    ) -> TaskResult<()> {
        let balance = account.sender.balance().await?;
        let amount = match self.sizing {
            Sizing::Floor => random_amount_with_floor(balance, ctx.percent_range(), MON.decimals),
            Sizing::Strict => random_amount_strict(balance, ctx.percent_range())?,
        };

        tracing::info!(address = %account.short_address(), amount = %MON.display(amount), "Wrapping MON");
        wrap(&account.sender, amount).await?;

        tracing::info!(address = %account.short_address(), amount = %MON.display(amount), "Unwrapping WMON");
        unwrap(&account.sender, amount).await?;
        Ok(())
    }
}
