//! Uniswap V2 style router calls.

use alloy::primitives::{address, Address, Bytes, U256};
use alloy::sol_types::SolCall;

use crate::blockchain::{BlockchainError, BlockchainResult, TxSender};
use crate::tasks::erc20::IUniswapV2Router;
use crate::tasks::tokens::{Token, WMON_ADDRESS};

/// Router used by both the Uniswap and Bean Exchange flows.
pub const V2_ROUTER: Address = address!("Ca810D095e90Daae6e867c19DF6D9A8C56db2c89");

/// Two-hop path with WMON standing in for the native coin.
pub fn path(from: &Token, to: &Token) -> Vec<Address> {
    vec![
        from.address.unwrap_or(WMON_ADDRESS),
        to.address.unwrap_or(WMON_ADDRESS),
    ]
}

/// Router calldata and native value for selling `amount_in` of `from`.
pub fn swap_input(
    from: &Token,
    to: &Token,
    amount_in: U256,
    min_out: U256,
    recipient: Address,
    deadline: U256,
) -> (Bytes, U256) {
    let path = path(from, to);
    if from.is_native() {
        let input = IUniswapV2Router::swapExactETHForTokensCall {
            amountOutMin: min_out,
            path,
            to: recipient,
            deadline,
        }
        .abi_encode();
        (input.into(), amount_in)
    } else if to.is_native() {
        let input = IUniswapV2Router::swapExactTokensForETHCall {
            amountIn: amount_in,
            amountOutMin: min_out,
            path,
            to: recipient,
            deadline,
        }
        .abi_encode();
        (input.into(), U256::ZERO)
    } else {
        let input = IUniswapV2Router::swapExactTokensForTokensCall {
            amountIn: amount_in,
            amountOutMin: min_out,
            path,
            to: recipient,
            deadline,
        }
        .abi_encode();
        (input.into(), U256::ZERO)
    }
}

/// Expected output of the last hop.
pub async fn amount_out(sender: &TxSender, amount_in: U256, path: Vec<Address>) -> BlockchainResult<U256> {
    let amounts = IUniswapV2Router::new(V2_ROUTER, sender.provider().clone())
        .getAmountsOut(amount_in, path)
        .call()
        .await
        .map_err(|e| BlockchainError::Contract(format!("getAmountsOut failed: {}", e)))?;
    amounts
        .last()
        .copied()
        .ok_or_else(|| BlockchainError::Contract("getAmountsOut returned no amounts".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::tokens::MON;

    const USDC: Token = Token::erc20("USDC", address!("62534E4bBD6D9ebAC0ac99aeaa0aa48E56372df0"), 6);

    #[test]
    fn test_path_substitutes_wmon() {
        assert_eq!(path(&MON, &USDC), vec![WMON_ADDRESS, USDC.address.unwrap()]);
        assert_eq!(path(&USDC, &MON), vec![USDC.address.unwrap(), WMON_ADDRESS]);
    }

    #[test]
    fn test_swap_input_variants() {
        let me = Address::repeat_byte(0x11);
        let amount = U256::from(1000u64);

        let (input, value) = swap_input(&MON, &USDC, amount, U256::ZERO, me, U256::from(1u8));
        assert_eq!(&input[..4], &IUniswapV2Router::swapExactETHForTokensCall::SELECTOR);
        assert_eq!(value, amount);

        let (input, value) = swap_input(&USDC, &MON, amount, U256::ZERO, me, U256::from(1u8));
        assert_eq!(&input[..4], &IUniswapV2Router::swapExactTokensForETHCall::SELECTOR);
        assert_eq!(value, U256::ZERO);

        let bean = Token::erc20("BEAN", Address::repeat_byte(0x22), 18);
        let (input, _) = swap_input(&USDC, &bean, amount, U256::ZERO, me, U256::from(1u8));
        assert_eq!(&input[..4], &IUniswapV2Router::swapExactTokensForTokensCall::SELECTOR);
    }
}
