//! Liquid staking cycles: stake, pause, unstake the same amount.
//!
//! # Protocols
//! - Magma: `stake()` with value, `unstake(amount)`
//! - Kintsu: plain value transfer, `requestUnlock(amount, me, me)`
//! - Apriori: ERC-4626 style `deposit(amount, me)`, `requestRedeem(amount, me, me)`,
//!   then `claimWithdrawal([id], me)` once the API reports the request claimable

use std::time::Duration;

use alloy::primitives::{address, Address, Bytes, U256};
use alloy::sol_types::SolValue;

use crate::quoting::AprioriApi;
use crate::runner::{Account, Task, TaskContext, TaskResult};
use crate::sizing::{random_amount_strict, random_amount_with_floor};
use crate::tasks::tokens::MON;

pub const MAGMA_CONTRACT: Address = address!("2c9C959516e9AAEdB2C748224a41249202ca8BE7");
pub const KINTSU_CONTRACT: Address = address!("07AabD925866E8353407E67C1D157836f7Ad923e");
pub const APRIORI_CONTRACT: Address = address!("b2f82D0f38dc453D596Ad40A37799446Cc89274A");

const MAGMA_STAKE: [u8; 4] = [0xd5, 0x57, 0x59, 0x82];
const MAGMA_UNSTAKE: [u8; 4] = [0x6f, 0xed, 0x1e, 0xa7];
const KINTSU_UNSTAKE: [u8; 4] = [0x30, 0xaf, 0x6b, 0x2e];
const APRIORI_DEPOSIT: [u8; 4] = [0x6e, 0x55, 0x3f, 0x65];
const APRIORI_REQUEST_REDEEM: [u8; 4] = [0x7d, 0x41, 0xc8, 0x6e];
const APRIORI_CLAIM: [u8; 4] = [0x49, 0x2e, 0x47, 0xd2];

const STAKE_GAS: u64 = 500_000;
const UNSTAKE_GAS: u64 = 800_000;

fn with_selector(selector: [u8; 4], params: Vec<u8>) -> Bytes {
    let mut data = Vec::with_capacity(4 + params.len());
    data.extend_from_slice(&selector);
    data.extend_from_slice(&params);
    data.into()
}

pub fn magma_stake_calldata() -> Bytes {
    with_selector(MAGMA_STAKE, Vec::new())
}

pub fn magma_unstake_calldata(amount: U256) -> Bytes {
    with_selector(MAGMA_UNSTAKE, (amount,).abi_encode_params())
}

pub fn kintsu_unstake_calldata(amount: U256, owner: Address) -> Bytes {
    with_selector(KINTSU_UNSTAKE, (amount, owner, owner).abi_encode_params())
}

pub fn apriori_deposit_calldata(amount: U256, receiver: Address) -> Bytes {
    with_selector(APRIORI_DEPOSIT, (amount, receiver).abi_encode_params())
}

pub fn apriori_request_redeem_calldata(amount: U256, owner: Address) -> Bytes {
    with_selector(APRIORI_REQUEST_REDEEM, (amount, owner, owner).abi_encode_params())
}

pub fn apriori_claim_calldata(request_id: U256, receiver: Address) -> Bytes {
    with_selector(APRIORI_CLAIM, (vec![request_id], receiver).abi_encode_params())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StakeProtocol {
    Magma,
    Kintsu,
    Apriori,
}

#[derive(Debug, Clone, Copy)]
pub struct StakeTask {
    protocol: StakeProtocol,
}

impl StakeTask {
    pub const fn new(protocol: StakeProtocol) -> Self {
        Self { protocol }
    }

    fn contract(&self) -> Address {
        match self.protocol {
            StakeProtocol::Magma => MAGMA_CONTRACT,
            StakeProtocol::Kintsu => KINTSU_CONTRACT,
            StakeProtocol::Apriori => APRIORI_CONTRACT,
        }
    }

    async fn stake(&self, account: &Account, amount: U256) -> TaskResult<()> {
        let me = account.address();
        let input = match self.protocol {
            StakeProtocol::Magma => magma_stake_calldata(),
            StakeProtocol::Kintsu => Bytes::new(),
            StakeProtocol::Apriori => apriori_deposit_calldata(amount, me),
        };
        tracing::info!(protocol = self.name(), amount = %MON.display(amount), "Staking MON");
        account
            .sender
            .call(self.contract(), amount, input, STAKE_GAS, "Stake")
            .await?;
        Ok(())
    }

    async fn unstake(&self, account: &Account, amount: U256) -> TaskResult<()> {
        let me = account.address();
        let input = match self.protocol {
            StakeProtocol::Magma => magma_unstake_calldata(amount),
            StakeProtocol::Kintsu => kintsu_unstake_calldata(amount, me),
            StakeProtocol::Apriori => apriori_request_redeem_calldata(amount, me),
        };
        tracing::info!(protocol = self.name(), amount = %MON.display(amount), "Unstaking");
        account
            .sender
            .call(self.contract(), U256::ZERO, input, UNSTAKE_GAS, "Unstake")
            .await?;
        Ok(())
    }

    /// Claim the first ready withdrawal; nothing ready is not an error.
    async fn claim(&self, ctx: &TaskContext, account: &Account) -> TaskResult<()> {
        let api = AprioriApi::new(ctx.http.clone(), ctx.config.apis.apriori_api_url.clone());

        let request = match api.claimable(account.address()).await {
            Ok(Some(request)) => request,
            Ok(None) => {
                tracing::info!(address = %account.short_address(), "No claimable withdrawal requests");
                return Ok(());
            }
            Err(e) => {
                tracing::warn!(error = %e, "Unable to query withdrawal requests");
                return Ok(());
            }
        };

        let id = request.id_u256()?;
        tracing::info!(request_id = %id, "Claiming withdrawal");
        account
            .sender
            .call(
                APRIORI_CONTRACT,
                U256::ZERO,
                apriori_claim_calldata(id, account.address()),
                UNSTAKE_GAS,
                "Claim",
            )
            .await?;
        Ok(())
    }
}

impl Task for StakeTask {
    fn name(&self) -> &'static str {
        match self.protocol {
            StakeProtocol::Magma => "magma",
            StakeProtocol::Kintsu => "kintsu",
            StakeProtocol::Apriori => "apriori",
        }
    }

    fn reports_profit(&self) -> bool {
        true
    }

    fn stops_on_failure(&self) -> bool {
        matches!(self.protocol, StakeProtocol::Magma | StakeProtocol::Apriori)
    }

    async fn run_cycle(
        &self,
        ctx: &TaskContext,
        account: &Account,
        _cycle: u32,
        _total: u32,
    ) -> TaskResult<()> {
        let balance = account.sender.balance().await?;
        let amount = match self.protocol {
            StakeProtocol::Magma => random_amount_strict(balance, ctx.percent_range())?,
            _ => random_amount_with_floor(balance, ctx.percent_range(), MON.decimals),
        };

        self.stake(account, amount).await?;
        ctx.cycle_pause().await?;
        self.unstake(account, amount).await?;

        if self.protocol == StakeProtocol::Apriori {
            let wait = Duration::from_secs(ctx.config.delays.claim_wait_secs);
            tracing::info!(secs = wait.as_secs(), "Waiting before checking claim status");
            ctx.pause(wait).await?;
            self.claim(ctx, account).await?;
        }
        Ok(())
    }
}
