//! Persistent faucet claim history.
//!
//! Stored as a JSON object keyed by checksummed address. The whole file is
//! rewritten on every save.

use std::collections::BTreeMap;
use std::path::Path;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatusError {
    #[error("Failed to access status file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse status file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Last successful claim of one address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRecord {
    /// Unix seconds.
    pub last_claim: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visitor_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FaucetStatus {
    records: BTreeMap<String, ClaimRecord>,
}

impl FaucetStatus {
    /// Load from `path`; a missing file yields an empty history.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StatusError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StatusError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn get(&self, address: Address) -> Option<&ClaimRecord> {
        self.records.get(&address.to_checksum(None))
    }

    /// Whether `address` may claim at `now` given a cooldown in seconds.
    pub fn is_eligible(&self, address: Address, now: u64, cooldown_secs: u64) -> bool {
        match self.get(address) {
            None => true,
            Some(record) => now.saturating_sub(record.last_claim) >= cooldown_secs,
        }
    }

    /// Seconds until `address` may claim again.
    pub fn remaining(&self, address: Address, now: u64, cooldown_secs: u64) -> u64 {
        self.get(address)
            .map(|r| r.last_claim.saturating_add(cooldown_secs).saturating_sub(now))
            .unwrap_or(0)
    }

    pub fn record(&mut self, address: Address, now: u64, visitor_id: Option<String>) {
        self.records.insert(
            address.to_checksum(None),
            ClaimRecord {
                last_claim: now,
                visitor_id,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
