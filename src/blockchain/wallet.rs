//! Wallet loading and key handling.
//!
//! # Security
//! - The main wallet key is loaded ONLY from an environment variable
//! - Keys are never logged or serialized

use std::fs;
use std::path::Path;

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Environment variable name for the funding wallet's private key.
pub const MAIN_KEY_ENV_VAR: &str = "CYCLER_MAIN_PRIVATE_KEY";

/// A signing key bound to a chain.
#[derive(Debug, Clone)]
pub struct Wallet {
    signer: PrivateKeySigner,
    chain_id: u64,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key string.
    ///
    /// Accepts the key with or without a `0x` prefix. The key is never logged.
    pub fn from_private_key(private_key_hex: &str, chain_id: u64) -> BlockchainResult<Self> {
        let trimmed = private_key_hex.trim();
        let key_hex = trimmed.strip_prefix("0x").unwrap_or(trimmed);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| BlockchainError::Wallet(format!("Invalid private key format: {}", e)))?;

        Ok(Self { signer, chain_id })
    }

    /// Load the funding wallet from `CYCLER_MAIN_PRIVATE_KEY`.
    pub fn from_env(chain_id: u64) -> BlockchainResult<Self> {
        let private_key = std::env::var(MAIN_KEY_ENV_VAR).map_err(|_| {
            BlockchainError::Wallet(format!("Environment variable {} not set", MAIN_KEY_ENV_VAR))
        })?;

        Self::from_private_key(&private_key, chain_id)
    }

    /// Get the wallet's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Abbreviated address for log lines (`0x1234...abcd`).
    pub fn short_address(&self) -> String {
        short_address(&self.address())
    }

    /// Get the chain ID this wallet is configured for.
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Network wallet used by signing providers.
    pub fn network_wallet(&self) -> EthereumWallet {
        EthereumWallet::from(self.signer.clone())
    }
}

/// Abbreviate an address as `0x1234...abcd`.
pub fn short_address(address: &Address) -> String {
    let full = address.to_string();
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}

/// One usable line of the key file.
#[derive(Debug, Clone)]
pub struct WalletEntry {
    /// 1-based position among the non-empty lines.
    pub id: usize,
    pub wallet: Wallet,
}

/// Parse key file contents.
///
/// Blank lines are ignored. Lines that do not parse are logged and skipped;
/// they still consume an id so ids match what the operator sees in the file.
pub fn parse_wallets(content: &str, chain_id: u64) -> Vec<WalletEntry> {
    content
        .lines()
        .map(|line| line.replace('\r', "").trim().to_string())
        .filter(|line| !line.is_empty())
        .enumerate()
        .filter_map(|(index, key)| match Wallet::from_private_key(&key, chain_id) {
            Ok(wallet) => Some(WalletEntry {
                id: index + 1,
                wallet,
            }),
            Err(e) => {
                tracing::error!(line = index + 1, error = %e, "Invalid private key, skipping");
                None
            }
        })
        .collect()
}

/// Load wallets from the key file. An empty result is an error.
pub fn load_wallets(path: &Path, chain_id: u64) -> BlockchainResult<Vec<WalletEntry>> {
    let content = fs::read_to_string(path).map_err(|e| {
        BlockchainError::Wallet(format!("Unable to read {}: {}", path.display(), e))
    })?;

    let wallets = parse_wallets(&content, chain_id);
    if wallets.is_empty() {
        return Err(BlockchainError::Wallet(format!(
            "No private keys found in {}",
            path.display()
        )));
    }

    tracing::info!(count = wallets.len(), path = %path.display(), "Wallets loaded");
    Ok(wallets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    // Well-known test private keys (Anvil's first two accounts)
    const TEST_PRIVATE_KEY: &str =
        "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const TEST_PRIVATE_KEY_2: &str =
        "59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

    #[test]
    fn test_wallet_from_private_key() {
        let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY, 1).unwrap();
        assert_eq!(
            wallet.address().to_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn test_wallet_with_0x_prefix() {
        let wallet = Wallet::from_private_key(&format!("0x{}", TEST_PRIVATE_KEY), 1).unwrap();
        assert_eq!(
            wallet.address().to_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn test_invalid_private_key() {
        let result = Wallet::from_private_key("invalid_key", 1);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid private key"));
    }

    #[test]
    fn test_short_address() {
        let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY, 1).unwrap();
        assert_eq!(wallet.short_address(), "0xf39F...2266");
    }

    #[test]
    fn test_parse_wallets_skips_blank_and_invalid_lines() {
        let content = format!(
            "0x{}\r\n\n   \nnot-a-key\n{}\n",
            TEST_PRIVATE_KEY, TEST_PRIVATE_KEY_2
        );
        let wallets = parse_wallets(&content, 10143);

        assert_eq!(wallets.len(), 2);
        assert_eq!(wallets[0].id, 1);
        assert_eq!(wallets[1].id, 3);
        assert_eq!(
            wallets[1].wallet.address().to_string().to_lowercase(),
            "0x70997970c51812dc3a010c7d01b50e0d17dc79c8"
        );
        assert_eq!(wallets[1].wallet.chain_id(), 10143);
    }

    #[test]
    fn test_load_wallets_empty_file_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "\n\n").unwrap();
        let err = load_wallets(file.path(), 1).unwrap_err();
        assert!(err.to_string().contains("No private keys found"));
    }

    #[test]
    fn test_load_wallets_missing_file() {
        let err = load_wallets(Path::new("/definitely/not/here.txt"), 1).unwrap_err();
        assert!(err.to_string().contains("Unable to read"));
    }
}
