//! Transaction signing, broadcast and confirmation.
//!
//! # Responsibilities
//! - Open a signing provider for one wallet on the first reachable endpoint
//! - Broadcast transactions and log explorer links
//! - Wait for receipts with a deadline and surface reverts

use std::time::Duration;

use alloy::network::{Ethereum, TransactionBuilder};
use alloy::primitives::{Address, Bytes, U256};
use alloy::providers::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use tokio::time::timeout;

use crate::blockchain::types::{BlockchainError, BlockchainResult, ChainConfig, TxOutcome};
use crate::blockchain::wallet::Wallet;
use crate::observability::metrics;

/// Signing provider bound to a single wallet.
#[derive(Clone)]
pub struct TxSender {
    provider: DynProvider,
    wallet: Wallet,
    rpc_url: String,
    tx_explorer: String,
    receipt_timeout_secs: u64,
}

impl TxSender {
    /// Connect a signing provider, trying the primary URL then each failover.
    ///
    /// An endpoint is accepted once it answers `eth_chainId` within the RPC timeout.
    pub async fn connect(config: &ChainConfig, wallet: Wallet) -> BlockchainResult<Self> {
        let rpc_timeout = Duration::from_secs(config.rpc_timeout_secs);

        for url_str in config.all_urls() {
            let url: url::Url = match url_str.parse() {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!(url = %url_str, error = %e, "Skipping invalid RPC URL");
                    continue;
                }
            };

            let provider = ProviderBuilder::new()
                .wallet(wallet.network_wallet())
                .connect_http(url)
                .erased();

            match timeout(rpc_timeout, provider.get_chain_id()).await {
                Ok(Ok(_)) => {
                    tracing::debug!(url = %url_str, address = %wallet.address(), "Signing provider connected");
                    return Ok(Self {
                        provider,
                        wallet,
                        rpc_url: url_str.to_string(),
                        tx_explorer: config.tx_explorer.clone(),
                        receipt_timeout_secs: config.receipt_timeout_secs,
                    });
                }
                Ok(Err(e)) => {
                    tracing::warn!(url = %url_str, error = %e, "Failed to connect, trying another endpoint");
                }
                Err(_) => {
                    tracing::warn!(url = %url_str, "Connection timed out, trying another endpoint");
                }
            }
        }

        Err(BlockchainError::Rpc("Unable to connect to any RPC endpoint".to_string()))
    }

    /// Submit a transaction and wait for its receipt.
    pub async fn send(&self, tx: TransactionRequest, label: &str) -> BlockchainResult<TxOutcome> {
        let tx = tx.with_from(self.wallet.address());

        let pending = match self.provider.send_transaction(tx).await {
            Ok(pending) => pending,
            Err(e) => {
                metrics::record_tx_failed(label);
                return Err(BlockchainError::Rpc(format!("{} failed to send: {}", label, e)));
            }
        };

        self.confirm(pending, label).await
    }

    /// Wait for a broadcast transaction to be mined.
    pub async fn confirm(
        &self,
        pending: PendingTransactionBuilder<Ethereum>,
        label: &str,
    ) -> BlockchainResult<TxOutcome> {
        let tx_hash = *pending.tx_hash();
        metrics::record_tx_sent(label);
        tracing::info!(
            tx = %format!("{}{}", self.tx_explorer, tx_hash),
            "{} transaction sent",
            label
        );

        let receipt = match timeout(
            Duration::from_secs(self.receipt_timeout_secs),
            pending.get_receipt(),
        )
        .await
        {
            Ok(Ok(receipt)) => receipt,
            Ok(Err(e)) => {
                metrics::record_tx_failed(label);
                return Err(BlockchainError::Rpc(format!("{} receipt error: {}", label, e)));
            }
            Err(_) => {
                metrics::record_tx_failed(label);
                return Err(BlockchainError::ConfirmationTimeout(self.receipt_timeout_secs));
            }
        };

        if !receipt.status() {
            metrics::record_tx_failed(label);
            return Err(BlockchainError::Reverted(format!("{} ({})", label, tx_hash)));
        }

        tracing::info!(
            tx_hash = %tx_hash,
            block = receipt.block_number.unwrap_or_default(),
            "{} confirmed",
            label
        );

        Ok(TxOutcome {
            hash: tx_hash,
            block_number: receipt.block_number,
            contract_address: receipt.contract_address,
        })
    }

    /// Build and submit a call to `to` with `value` and `input`.
    pub async fn call(
        &self,
        to: Address,
        value: U256,
        input: impl Into<Bytes>,
        gas_limit: u64,
        label: &str,
    ) -> BlockchainResult<TxOutcome> {
        let tx = TransactionRequest::default()
            .with_to(to)
            .with_value(value)
            .with_input(input.into())
            .with_gas_limit(gas_limit);
        self.send(tx, label).await
    }

    /// Native balance of this wallet.
    pub async fn balance(&self) -> BlockchainResult<U256> {
        self.provider
            .get_balance(self.wallet.address())
            .await
            .map_err(|e| BlockchainError::Rpc(format!("Failed to get balance: {}", e)))
    }

    /// The signing provider, for contract bindings.
    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }

    /// The wallet signing through this provider.
    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    /// Get the wallet address.
    pub fn address(&self) -> Address {
        self.wallet.address()
    }
}

impl std::fmt::Debug for TxSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TxSender")
            .field("address", &self.wallet.address())
            .field("rpc_url", &self.rpc_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_PRIVATE_KEY: &str =
        "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[tokio::test]
    async fn test_connect_fails_when_no_endpoint_answers() {
        let config = ChainConfig {
            rpc_url: "http://127.0.0.1:1".to_string(),
            failover_urls: vec!["::bad::".to_string()],
            rpc_timeout_secs: 2,
            ..ChainConfig::default()
        };
        let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY, 31337).unwrap();

        let err = TxSender::connect(&config, wallet).await.unwrap_err();
        assert!(err.to_string().contains("Unable to connect"));
    }
}
