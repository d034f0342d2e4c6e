//! Ambient (CrocSwap) pair swaps through `userCmd`.

use alloy::network::TransactionBuilder;
use alloy::primitives::{address, Address, Bytes, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::{SolCall, SolValue};

use crate::blockchain::BlockchainError;
use crate::runner::{Account, TaskContext, TaskResult};
use crate::sizing::{random_gas_limit, round_up};
use crate::tasks::erc20::{ensure_allowance, with_fees, ICrocSwapDex};
use crate::tasks::pair_cycle::PairRouter;
use crate::tasks::tokens::{Token, MON};

pub const CROC_DEX: Address = address!("88B96aF200c8a9c35442C8AC6cd3D22695AaE4F0");

pub const TOKENS: [Token; 2] = [
    MON,
    Token::erc20("USDT", address!("88b8E2161DEDC77EF4ab7585569D2415a1C1055D"), 6),
];

const SWAP_CALLPATH: u16 = 1;
const POOL_IDX: u64 = 36_000;
const LIMIT_SELL: u128 = 1;
const LIMIT_BUY: u128 = 0x10001;

/// Parameters of one CrocSwap swap command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapCommand {
    pub base: Address,
    pub quote: Address,
    pub is_buy: bool,
    pub in_base_qty: bool,
    pub qty: u128,
    pub limit_price: u128,
    pub min_out: u128,
    pub reserve_flags: u8,
}

impl SwapCommand {
    /// Build the command for selling `amount` of `from` into `to`.
    pub fn new(from: &Token, to: &Token, amount: U256) -> Result<Self, BlockchainError> {
        let qty = u128::try_from(amount)
            .map_err(|_| BlockchainError::Contract(format!("amount {} exceeds uint128", amount)))?;
        let pct = |n: u128| qty / 100 * n + qty % 100 * n / 100;

        let command = if from.is_native() {
            Self {
                base: Address::ZERO,
                quote: to.address_or_zero(),
                is_buy: false,
                in_base_qty: true,
                qty,
                limit_price: LIMIT_SELL,
                min_out: pct(95),
                reserve_flags: 0,
            }
        } else if to.is_native() {
            Self {
                base: Address::ZERO,
                quote: from.address_or_zero(),
                is_buy: false,
                in_base_qty: false,
                qty,
                limit_price: LIMIT_SELL,
                min_out: pct(97),
                reserve_flags: 2,
            }
        } else {
            Self {
                base: to.address_or_zero(),
                quote: from.address_or_zero(),
                is_buy: true,
                in_base_qty: false,
                qty,
                limit_price: LIMIT_BUY,
                min_out: pct(97),
                reserve_flags: 2,
            }
        };
        Ok(command)
    }

    /// ABI-encoded `cmd` argument.
    pub fn encode(&self) -> Vec<u8> {
        (
            self.base,
            self.quote,
            U256::from(POOL_IDX),
            self.is_buy,
            self.in_base_qty,
            self.qty,
            0u16,
            self.limit_price,
            self.min_out,
            U256::from(self.reserve_flags),
        )
            .abi_encode_params()
    }

    /// Full `userCmd` calldata.
    pub fn calldata(&self) -> Bytes {
        ICrocSwapDex::userCmdCall {
            callpath: SWAP_CALLPATH,
            cmd: self.encode().into(),
        }
        .abi_encode()
        .into()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Ambient;

impl PairRouter for Ambient {
    fn name(&self) -> &'static str {
        "ambient"
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
        let amount = round_up(amount, from.decimals);
        ensure_allowance(&account.sender, from, CROC_DEX, amount, U256::MAX).await?;

        let command = SwapCommand::new(from, to, amount)?;
        tracing::debug!(
            base = %command.base,
            quote = %command.quote,
            is_buy = command.is_buy,
            in_base_qty = command.in_base_qty,
            "Swap parameters"
        );

        let value = if from.is_native() { amount } else { U256::ZERO };
        let fees = ctx.client.estimate_fees().await?;
        let tx = TransactionRequest::default()
            .with_to(CROC_DEX)
            .with_value(value)
            .with_input(command.calldata())
            .with_gas_limit(random_gas_limit(250_000, 350_000));
        account.sender.send(with_fees(tx, fees), "Swap").await?;
        Ok(())
    }
}
