//! HTTP client for the read-only info API.

use crate::error::{RegistryError, RegistryResult};
use crate::info::{ClearinghouseStateResponse, RawAllMids, SpotClearinghouseStateResponse};
use crate::system_address::format_system_address;
use alloy_primitives::Address;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

/// Default timeout for API requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Request body for the info endpoint.
#[derive(Debug, Serialize)]
struct InfoRequest {
    #[serde(rename = "type")]
    request_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<String>,
}

/// Client for the info endpoint.
pub struct InfoClient {
    client: Client,
    info_url: String,
}

impl InfoClient {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `info_url` - URL of the info endpoint (e.g., "https://api.hyperliquid-testnet.xyz/info")
    pub fn new(info_url: impl Into<String>) -> RegistryResult<Self> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| RegistryError::HttpClient(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            info_url: info_url.into(),
        })
    }

    pub fn info_url(&self) -> &str {
        &self.info_url
    }

    async fn post<T: DeserializeOwned>(&self, request: &InfoRequest) -> RegistryResult<T> {
        debug!(url = %self.info_url, request_type = request.request_type, "Info request");

        let response = self
            .client
            .post(&self.info_url)
            .json(request)
            .send()
            .await
            .map_err(|e| RegistryError::HttpClient(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RegistryError::HttpClient(format!("HTTP {status}: {body}")));
        }

        response.json().await.map_err(|e| {
            RegistryError::HttpClient(format!(
                "Failed to parse {} response: {e}",
                request.request_type
            ))
        })
    }

    /// Fetch perp account state (margin summary and open positions).
    pub async fn fetch_clearinghouse_state(
        &self,
        user: Address,
    ) -> RegistryResult<ClearinghouseStateResponse> {
        let request = InfoRequest {
            request_type: "clearinghouseState",
            user: Some(format_system_address(&user)),
        };
        let state: ClearinghouseStateResponse = self.post(&request).await?;
        info!(
            %user,
            positions = state.asset_positions.len(),
            "Fetched clearinghouseState"
        );
        Ok(state)
    }

    /// Fetch Core spot balances.
    pub async fn fetch_spot_state(
        &self,
        user: Address,
    ) -> RegistryResult<SpotClearinghouseStateResponse> {
        let request = InfoRequest {
            request_type: "spotClearinghouseState",
            user: Some(format_system_address(&user)),
        };
        let state: SpotClearinghouseStateResponse = self.post(&request).await?;
        info!(%user, balances = state.balances.len(), "Fetched spotClearinghouseState");
        Ok(state)
    }

    /// Fetch mid prices for every listed coin.
    pub async fn fetch_all_mids(&self) -> RegistryResult<RawAllMids> {
        let request = InfoRequest {
            request_type: "allMids",
            user: None,
        };
        self.post(&request).await
    }
}
