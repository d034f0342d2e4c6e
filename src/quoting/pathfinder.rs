//! Monorail pathfinder quote API.

use alloy::primitives::{Address, Bytes, U256};
use serde::Deserialize;

use crate::quoting::types::{QuoteError, QuoteResult, QuotedTransaction};

#[derive(Debug, Deserialize)]
struct QuoteEnvelope {
    quote: Option<QuoteBody>,
}

#[derive(Debug, Deserialize)]
struct QuoteBody {
    transaction: Option<RawTransaction>,
}

#[derive(Debug, Deserialize)]
struct RawTransaction {
    to: Address,
    data: Bytes,
    #[serde(default)]
    value: Option<String>,
}

/// Client for `GET /v1/router/quote`.
#[derive(Debug, Clone)]
pub struct PathfinderClient {
    http: reqwest::Client,
    base_url: String,
}

impl PathfinderClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Ask for a swap transaction of `amount` (decimal string) from `from` to `to`.
    ///
    /// `from` is `None` for the native token.
    pub async fn quote(
        &self,
        from: Option<Address>,
        to: Address,
        amount: &str,
        sender: Address,
    ) -> QuoteResult<QuotedTransaction> {
        let url = format!("{}/v1/router/quote", self.base_url);
        let from = from.unwrap_or(Address::ZERO);

        tracing::debug!(%from, %to, amount, "Requesting pathfinder quote");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("amount", amount.to_string()),
                ("from", from.to_string()),
                ("to", to.to_string()),
                ("slippage", "100".to_string()),
                ("deadline", "60".to_string()),
                ("source", "fe".to_string()),
                ("sender", sender.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(QuoteError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: QuoteEnvelope =
            serde_json::from_str(&body).map_err(|e| QuoteError::Decode(e.to_string()))?;
        let tx = envelope
            .quote
            .and_then(|q| q.transaction)
            .ok_or(QuoteError::MissingTransaction)?;

        let value = match tx.value.as_deref() {
            None | Some("") => U256::ZERO,
            Some(v) => v
                .parse::<U256>()
                .map_err(|e| QuoteError::Decode(format!("value '{}': {}", v, e)))?,
        };

        Ok(QuotedTransaction {
            to: tx.to,
            data: tx.data,
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_without_transaction() {
        let envelope: QuoteEnvelope = serde_json::from_str(r#"{"quote": {}}"#).unwrap();
        assert!(envelope.quote.unwrap().transaction.is_none());
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = PathfinderClient::new(reqwest::Client::new(), "http://localhost:1/");
        assert_eq!(client.base_url, "http://localhost:1");
    }
}
