//! Apriori withdrawal request API.

use alloy::primitives::Address;

use crate::quoting::types::{QuoteError, QuoteResult, WithdrawalRequest};

#[derive(Debug, Clone)]
pub struct AprioriApi {
    http: reqwest::Client,
    base_url: String,
}

impl AprioriApi {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// All withdrawal requests of `address`.
    pub async fn withdrawal_requests(&self, address: Address) -> QuoteResult<Vec<WithdrawalRequest>> {
        let url = format!("{}/withdrawal_requests", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("address", address.to_string())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(QuoteError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        response
            .json::<Vec<WithdrawalRequest>>()
            .await
            .map_err(|e| QuoteError::Decode(e.to_string()))
    }

    /// First request that is claimable and not yet claimed.
    pub async fn claimable(&self, address: Address) -> QuoteResult<Option<WithdrawalRequest>> {
        let requests = self.withdrawal_requests(address).await?;
        Ok(requests.into_iter().find(WithdrawalRequest::is_ready))
    }
}
