//! Types shared by the HTTP integrations.

use alloy::primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the HTTP integrations.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// Transport failure (connect, timeout, body read).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status code.
    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body did not match the expected shape.
    #[error("Invalid response: {0}")]
    Decode(String),

    /// Quote response carried no transaction.
    #[error("Quote response does not contain transaction data")]
    MissingTransaction,

    /// The service answered but refused the request.
    #[error("Request rejected: {0}")]
    Rejected(String),
}

/// Result type for HTTP integrations.
pub type QuoteResult<T> = Result<T, QuoteError>;

/// Transaction returned by the pathfinder, ready to sign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotedTransaction {
    pub to: Address,
    pub data: Bytes,
    pub value: U256,
}

/// Withdrawal request id; the API has returned both numbers and strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(u64),
    Text(String),
}

/// One entry of the withdrawal request listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalRequest {
    pub id: RequestId,
    #[serde(default)]
    pub claimed: bool,
    #[serde(default)]
    pub is_claimable: bool,
}

impl WithdrawalRequest {
    /// Request id as a uint256 for calldata.
    pub fn id_u256(&self) -> QuoteResult<U256> {
        match &self.id {
            RequestId::Number(n) => Ok(U256::from(*n)),
            RequestId::Text(s) => s
                .parse::<U256>()
                .map_err(|e| QuoteError::Decode(format!("request id '{}': {}", s, e))),
        }
    }

    pub fn is_ready(&self) -> bool {
        !self.claimed && self.is_claimable
    }
}
