//! Contract bindings and token helpers shared by the swap tasks.

use std::time::{SystemTime, UNIX_EPOCH};

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::sol;
use alloy::sol_types::SolCall;

use crate::blockchain::{BlockchainError, BlockchainResult, FeeEstimate, TxOutcome, TxSender};
use crate::tasks::tokens::{Token, WMON_ADDRESS};

sol! {
    #[sol(rpc)]
    interface IERC20 {
        function balanceOf(address owner) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
    }

    interface IWMON {
        function deposit() external payable;
        function withdraw(uint256 amount) external;
    }

    #[sol(rpc)]
    interface IUniswapV2Router {
        function swapExactETHForTokens(uint256 amountOutMin, address[] path, address to, uint256 deadline) external payable returns (uint256[] amounts);
        function swapExactTokensForETH(uint256 amountIn, uint256 amountOutMin, address[] path, address to, uint256 deadline) external returns (uint256[] amounts);
        function swapExactTokensForTokens(uint256 amountIn, uint256 amountOutMin, address[] path, address to, uint256 deadline) external returns (uint256[] amounts);
        function getAmountsOut(uint256 amountIn, address[] path) external view returns (uint256[] amounts);
    }

    interface ICrocSwapDex {
        function userCmd(uint16 callpath, bytes cmd) external payable returns (bytes);
    }
}

const WRAP_GAS: u64 = 500_000;

/// Balance of `token` held by the sender.
pub async fn token_balance(sender: &TxSender, token: &Token) -> BlockchainResult<U256> {
    match token.address {
        None => sender.balance().await,
        Some(address) => IERC20::new(address, sender.provider().clone())
            .balanceOf(sender.address())
            .call()
            .await
            .map_err(|e| BlockchainError::Contract(format!("balanceOf {} failed: {}", token.symbol, e))),
    }
}

/// Approve `spender` for exactly `amount`.
pub async fn approve(
    sender: &TxSender,
    token: Address,
    spender: Address,
    amount: U256,
) -> BlockchainResult<TxOutcome> {
    let input = IERC20::approveCall { spender, amount }.abi_encode();
    let tx = TransactionRequest::default()
        .with_to(token)
        .with_input(input);
    sender.send(tx, "Approve").await
}

/// Approve `approve_amount` when the current allowance is below `needed`.
pub async fn ensure_allowance(
    sender: &TxSender,
    token: &Token,
    spender: Address,
    needed: U256,
    approve_amount: U256,
) -> BlockchainResult<()> {
    let Some(address) = token.address else {
        return Ok(());
    };

    let allowance = IERC20::new(address, sender.provider().clone())
        .allowance(sender.address(), spender)
        .call()
        .await
        .map_err(|e| BlockchainError::Contract(format!("allowance {} failed: {}", token.symbol, e)))?;

    if allowance >= needed {
        return Ok(());
    }

    tracing::info!(token = token.symbol, %spender, "Approving token");
    approve(sender, address, spender, approve_amount).await?;
    Ok(())
}

/// MON → WMON.
pub async fn wrap(sender: &TxSender, amount: U256) -> BlockchainResult<TxOutcome> {
    sender
        .call(WMON_ADDRESS, amount, IWMON::depositCall {}.abi_encode(), WRAP_GAS, "Wrap MON")
        .await
}

/// WMON → MON.
pub async fn unwrap(sender: &TxSender, amount: U256) -> BlockchainResult<TxOutcome> {
    sender
        .call(
            WMON_ADDRESS,
            U256::ZERO,
            IWMON::withdrawCall { amount }.abi_encode(),
            WRAP_GAS,
            "Unwrap WMON",
        )
        .await
}

/// Apply an EIP-1559 fee pair.
pub fn with_fees(tx: TransactionRequest, fees: FeeEstimate) -> TransactionRequest {
    tx.with_max_fee_per_gas(fees.max_fee_per_gas)
        .with_max_priority_fee_per_gas(fees.max_priority_fee_per_gas)
}

/// Unix time `secs` from now, as a router deadline.
pub fn deadline(secs: u64) -> U256 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    U256::from(now + secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::hex;

    #[test]
    fn test_wrap_selectors() {
        assert_eq!(IWMON::depositCall {}.abi_encode(), hex!("d0e30db0"));
        let withdraw = IWMON::withdrawCall { amount: U256::from(1u8) }.abi_encode();
        assert_eq!(&withdraw[..4], &hex!("2e1a7d4d"));
        assert_eq!(withdraw.len(), 36);
    }

    #[test]
    fn test_approve_selector() {
        let input = IERC20::approveCall {
            spender: Address::ZERO,
            amount: U256::MAX,
        }
        .abi_encode();
        assert_eq!(&input[..4], &hex!("095ea7b3"));
    }

    #[test]
    fn test_deadline_in_future() {
        let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs();
        let d = deadline(600);
        assert!(d >= U256::from(now + 600));
    }
}
