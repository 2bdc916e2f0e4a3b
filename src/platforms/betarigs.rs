//! Betarigs hashing-power marketplace integration.
//!
//! API base: https://www.betarigs.com/api/v1
//! Auth: not required for reads; `X-Api-Key` header for rig updates.
//! Prices are quoted per speed unit (e.g. `BTC/Mh/day`) and may be sent
//! either as JSON numbers or as strings.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use super::RentalPlatform;
use crate::types::{
    Algorithm, AlgorithmId, MarketplaceError, Price, RigId, RigListing, RigState, RigStatus,
};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

pub const DEFAULT_BASE_URL: &str = "https://www.betarigs.com/api/v1";
const PLATFORM_NAME: &str = "betarigs";
const API_KEY_HEADER: &str = "X-Api-Key";

// ---------------------------------------------------------------------------
// API response types (Betarigs JSON → Rust)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct BetarigsRig {
    id: RigId,
    #[serde(default)]
    name: String,
    algorithm: BetarigsAlgorithmRef,
    price: BetarigsRigPrice,
}

#[derive(Debug, Deserialize)]
struct BetarigsAlgorithmRef {
    id: AlgorithmId,
}

#[derive(Debug, Deserialize)]
struct BetarigsRigPrice {
    per_speed_unit: BetarigsAmount,
}

#[derive(Debug, Deserialize)]
struct BetarigsAmount {
    value: Decimal,
    #[serde(default)]
    unit: String,
}

#[derive(Debug, Deserialize)]
struct BetarigsAlgorithm {
    id: AlgorithmId,
    #[serde(default)]
    name: String,
    market_price: BetarigsAmount,
}

/// Response from `/rigs.json`.
#[derive(Debug, Deserialize)]
struct BetarigsRigList {
    #[serde(default)]
    items: Vec<BetarigsRig>,
}

/// Response from `PUT /rig/{id}.json`.
#[derive(Debug, Deserialize)]
struct BetarigsUpdateResponse {
    #[serde(default)]
    success: Option<bool>,
}

#[derive(Debug, Serialize)]
struct UpdateRigRequest {
    rig: UpdateRig,
}

#[derive(Debug, Serialize)]
struct UpdateRig {
    price: UpdatePrice,
}

#[derive(Debug, Serialize)]
struct UpdatePrice {
    per_speed_unit: UpdateAmount,
}

#[derive(Debug, Serialize)]
struct UpdateAmount {
    value: Decimal,
}

impl UpdateRigRequest {
    fn per_speed_unit(value: Decimal) -> Self {
        Self {
            rig: UpdateRig {
                price: UpdatePrice {
                    per_speed_unit: UpdateAmount { value },
                },
            },
        }
    }
}

impl From<BetarigsAmount> for Price {
    fn from(a: BetarigsAmount) -> Self {
        Price::new(a.value, a.unit)
    }
}

impl From<BetarigsRig> for RigState {
    fn from(r: BetarigsRig) -> Self {
        RigState {
            id: r.id,
            name: r.name,
            price: r.price.per_speed_unit.into(),
            algorithm_id: r.algorithm.id,
        }
    }
}

impl From<BetarigsRig> for RigListing {
    fn from(r: BetarigsRig) -> Self {
        RigListing {
            id: r.id,
            price: r.price.per_speed_unit.into(),
        }
    }
}

impl From<BetarigsAlgorithm> for Algorithm {
    fn from(a: BetarigsAlgorithm) -> Self {
        Algorithm {
            id: a.id,
            name: a.name,
            market_price: a.market_price.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Betarigs marketplace client.
pub struct BetarigsClient {
    http: Client,
    base_url: String,
    api_key: SecretString,
}

impl BetarigsClient {
    /// Create a new Betarigs client.
    pub fn new(
        api_key: SecretString,
        base_url: Option<String>,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .context("Failed to build HTTP client for Betarigs")?;

        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        info!(base_url = %base_url, "Betarigs client ready");

        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    // -- Internal helpers ------------------------------------------------

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, MarketplaceError> {
        let resp = request.send().await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(MarketplaceError::Api { status, message });
        }

        let body = resp.text().await?;
        parse_body(&body)
    }
}

fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, MarketplaceError> {
    serde_json::from_str(body).map_err(|e| MarketplaceError::InvalidResponse(e.to_string()))
}

// ---------------------------------------------------------------------------
// RentalPlatform trait implementation
// ---------------------------------------------------------------------------

#[async_trait]
impl RentalPlatform for BetarigsClient {
    async fn list_rigs(
        &self,
        algorithm: AlgorithmId,
        status: RigStatus,
        page: u32,
    ) -> Result<Vec<RigListing>, MarketplaceError> {
        let url = self.url("rigs.json");
        debug!(url = %url, algorithm, status = %status, page, "Fetching Betarigs rig list");

        let list: BetarigsRigList = self
            .send(self.http.get(&url).query(&[
                ("algorithm", algorithm.to_string()),
                ("status", status.as_str().to_string()),
                ("page", page.to_string()),
            ]))
            .await?;

        Ok(list.items.into_iter().map(RigListing::from).collect())
    }

    async fn get_rig(&self, rig: RigId) -> Result<RigState, MarketplaceError> {
        let url = self.url(&format!("rig/{rig}.json"));
        debug!(url = %url, "Fetching Betarigs rig");

        let rig: BetarigsRig = self.send(self.http.get(&url)).await?;
        Ok(rig.into())
    }

    async fn get_algorithm(&self, algorithm: AlgorithmId) -> Result<Algorithm, MarketplaceError> {
        let url = self.url(&format!("algorithm/{algorithm}.json"));
        debug!(url = %url, "Fetching Betarigs algorithm");

        let algorithm: BetarigsAlgorithm = self.send(self.http.get(&url)).await?;
        Ok(algorithm.into())
    }

    async fn update_rig_price(&self, rig: RigId, price: Decimal) -> Result<bool, MarketplaceError> {
        let url = self.url(&format!("rig/{rig}.json"));
        debug!(url = %url, price = %price, "Updating Betarigs rig price");

        let resp: BetarigsUpdateResponse = self
            .send(
                self.http
                    .put(&url)
                    .header(API_KEY_HEADER, self.api_key.expose_secret())
                    .json(&UpdateRigRequest::per_speed_unit(price)),
            )
            .await?;

        Ok(resp.success.unwrap_or(true))
    }

    fn name(&self) -> &str {
        PLATFORM_NAME
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
