//! Faucet claim endpoint.

use std::time::Duration;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use crate::quoting::types::{QuoteError, QuoteResult};

#[derive(Debug, Serialize)]
struct ClaimRequest<'a> {
    address: String,
    #[serde(rename = "visitorId")]
    visitor_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct ClaimResponse {
    #[serde(default)]
    message: Option<String>,
}

/// Client for `POST {claim_url}`.
#[derive(Debug, Clone)]
pub struct FaucetClient {
    http: reqwest::Client,
    claim_url: String,
    timeout: Duration,
}

impl FaucetClient {
    pub fn new(http: reqwest::Client, claim_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http,
            claim_url: claim_url.into(),
            timeout,
        }
    }

    /// Random 32 hex character visitor id.
    pub fn new_visitor_id() -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }

    /// Request testnet funds for `address`.
    ///
    /// Succeeds only when the body reports `"message": "Success"`; any other
    /// message is returned as `Rejected`.
    pub async fn claim(&self, address: Address, visitor_id: &str) -> QuoteResult<()> {
        let payload = ClaimRequest {
            address: address.to_string(),
            visitor_id,
        };

        let response = self
            .http
            .post(&self.claim_url)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let message = serde_json::from_str::<ClaimResponse>(&body)
            .ok()
            .and_then(|r| r.message);

        match message.as_deref() {
            Some("Success") if status.is_success() => Ok(()),
            Some(other) => Err(QuoteError::Rejected(other.to_string())),
            None if !status.is_success() => Err(QuoteError::Status {
                status: status.as_u16(),
                body,
            }),
            None => Err(QuoteError::Decode(format!("no message in faucet response: {}", body))),
        }
    }
}
