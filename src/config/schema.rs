//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the cycler.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Chain endpoints and explorer links.
    pub chain: ChainConfig,

    /// Input and state files.
    pub files: FilesConfig,

    /// Transaction sizing.
    pub amounts: AmountConfig,

    /// Sleeps between steps, cycles and accounts.
    pub delays: DelayConfig,

    /// Fixed-delay retry settings.
    pub retries: RetryConfig,

    /// Default cycle count and repeat interval.
    pub schedule: ScheduleConfig,

    /// Faucet claim settings.
    pub faucet: FaucetConfig,

    /// Third-party HTTP APIs.
    pub apis: ApiConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Chain integration configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs, tried in order.
    pub failover_urls: Vec<String>,

    /// Chain ID (10143 for Monad testnet).
    pub chain_id: u64,

    /// Native currency symbol used in log lines.
    pub symbol: String,

    /// Explorer prefix for transaction links.
    pub tx_explorer: String,

    /// Explorer prefix for address links.
    pub address_explorer: String,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Maximum time to wait for a receipt in seconds.
    pub receipt_timeout_secs: u64,
}

impl ChainConfig {
    /// Primary URL followed by the failovers.
    pub fn all_urls(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.rpc_url.as_str()).chain(self.failover_urls.iter().map(String::as_str))
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://testnet-rpc.monad.xyz/".to_string(),
            failover_urls: vec![
                "https://testnet-rpc.monorail.xyz".to_string(),
                "https://monad-testnet.drpc.org".to_string(),
            ],
            chain_id: 10143,
            symbol: "MON".to_string(),
            tx_explorer: "https://testnet.monadexplorer.com/tx/".to_string(),
            address_explorer: "https://testnet.monadexplorer.com/address/".to_string(),
            rpc_timeout_secs: 10,
            receipt_timeout_secs: 120,
        }
    }
}

/// File locations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FilesConfig {
    /// One private key per line.
    pub private_keys: String,

    /// JSON map of address -> last faucet claim.
    pub faucet_status: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            private_keys: "private_keys.txt".to_string(),
            faucet_status: "faucet_status.json".to_string(),
        }
    }
}

/// Amount configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AmountConfig {
    /// Percent of the current balance used per transaction, `[min, max]`.
    pub percent_range: [f64; 2],

    /// Native amount the send task transfers to each wallet, `[min, max]`.
    pub send_range: [f64; 2],
}

impl Default for AmountConfig {
    fn default() -> Self {
        Self {
            percent_range: [1.0, 5.0],
            send_range: [0.01, 0.05],
        }
    }
}

/// Delay configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DelayConfig {
    /// Lower bound of the random delay between steps and cycles.
    pub cycle_min_secs: u64,

    /// Upper bound of the random delay between steps and cycles.
    pub cycle_max_secs: u64,

    /// Pause before moving to the next wallet.
    pub account_switch_secs: u64,

    /// Pause between tasks in `all` mode.
    pub task_gap_secs: u64,

    /// Wait between an Apriori unstake request and the claim check.
    pub claim_wait_secs: u64,
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            cycle_min_secs: 30,
            cycle_max_secs: 60,
            account_switch_secs: 3,
            task_gap_secs: 5,
            claim_wait_secs: 660,
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one.
    pub max_attempts: u32,

    /// Constant delay between attempts in milliseconds.
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_ms: 5000,
        }
    }
}

/// Schedule configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Cycles per wallet.
    pub cycles: u32,

    /// Hours to wait before repeating the whole run. `None` runs once.
    pub interval_hours: Option<f64>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            cycles: 1,
            interval_hours: None,
        }
    }
}

/// Faucet configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FaucetConfig {
    /// Claim endpoint (POST).
    pub claim_url: String,

    /// Minimum hours between two claims for the same address.
    pub cooldown_hours: u64,

    /// HTTP timeout for a claim request.
    pub request_timeout_secs: u64,
}

impl Default for FaucetConfig {
    fn default() -> Self {
        Self {
            claim_url: "http://localhost:8080/api/claim".to_string(),
            cooldown_hours: 12,
            request_timeout_secs: 30,
        }
    }
}

/// Third-party API endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Monorail pathfinder base URL.
    pub pathfinder_url: String,

    /// Apriori staking API base URL.
    pub apriori_api_url: String,

    /// HTTP timeout for API calls.
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            pathfinder_url: "https://testnet-pathfinder.monorail.xyz".to_string(),
            apriori_api_url: "https://stake-api.apr.io".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_monad_testnet() {
        let config = AppConfig::default();
        assert_eq!(config.chain.chain_id, 10143);
        assert_eq!(config.amounts.percent_range, [1.0, 5.0]);
        assert_eq!(config.delays.claim_wait_secs, 660);
        assert_eq!(config.retries.max_attempts, 3);
        assert!(config.schedule.interval_hours.is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [chain]
            rpc_url = "http://localhost:8545"
            chain_id = 31337

            [schedule]
            cycles = 4
            interval_hours = 6.0
            "#,
        )
        .unwrap();

        assert_eq!(config.chain.rpc_url, "http://localhost:8545");
        assert_eq!(config.chain.symbol, "MON");
        assert_eq!(config.schedule.cycles, 4);
        assert_eq!(config.schedule.interval_hours, Some(6.0));
        assert_eq!(config.delays.cycle_min_secs, 30);
    }

    #[test]
    fn test_all_urls_order() {
        let chain = ChainConfig {
            rpc_url: "http://a".into(),
            failover_urls: vec!["http://b".into(), "http://c".into()],
            ..ChainConfig::default()
        };
        let urls: Vec<&str> = chain.all_urls().collect();
        assert_eq!(urls, vec!["http://a", "http://b", "http://c"]);
    }
}
