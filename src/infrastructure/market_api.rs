//! Liquidity-aggregator market API client

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::domain::model::TokenRecord;
use crate::shared::errors::MarketError;

/// Bulk market-data capability behind the aggregator/detector pipeline
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Fetch a complete usable batch of token records
    async fn fetch_tokens(&self) -> Result<Vec<TokenRecord>, MarketError>;

    fn source_name(&self) -> &'static str;
}

/// Token entry returned by the impulse-style market API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpstreamToken {
    address: String,
    name: Option<String>,
    symbol: Option<String>,
    verified: Option<bool>,
    #[serde(default)]
    tags: Vec<String>,
    market: Option<UpstreamMarket>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpstreamMarket {
    current_price: Option<f64>,
    price_change_percentage_24h: Option<f64>,
    starknet_volume_24h: Option<f64>,
    market_cap: Option<f64>,
    starknet_tvl: Option<f64>,
}

/// Map one upstream token into the uniform record shape.
///
/// Defaults for absent upstream fields: name falls back to the symbol,
/// symbol to "UNKNOWN", price/change/volume to 0.0, market cap and
/// liquidity to None. A token is verified when the flag is set or the
/// curation tags carry "Verified". Entries without an address are dropped.
fn normalize_token(token: UpstreamToken) -> Option<TokenRecord> {
    if token.address.is_empty() {
        return None;
    }

    let symbol = token.symbol.unwrap_or_else(|| "UNKNOWN".to_string());
    let name = token.name.unwrap_or_else(|| symbol.clone());
    let verified =
        token.verified.unwrap_or(false) || token.tags.iter().any(|t| t == "Verified");
    let market = token.market;

    Some(TokenRecord {
        symbol,
        name,
        address: token.address,
        price_usd: market.as_ref().and_then(|m| m.current_price).unwrap_or(0.0),
        price_change_24h: market
            .as_ref()
            .and_then(|m| m.price_change_percentage_24h)
            .unwrap_or(0.0),
        volume_24h: market
            .as_ref()
            .and_then(|m| m.starknet_volume_24h)
            .unwrap_or(0.0),
        market_cap: market.as_ref().and_then(|m| m.market_cap),
        liquidity: market.as_ref().and_then(|m| m.starknet_tvl),
        verified,
        last_updated: Utc::now(),
    })
}

/// AVNU impulse market API client
pub struct AvnuMarketClient {
    http_client: Client,
    base_url: String,
}

impl AvnuMarketClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl MarketDataSource for AvnuMarketClient {
    async fn fetch_tokens(&self) -> Result<Vec<TokenRecord>, MarketError> {
        let url = format!("{}/v1/tokens", self.base_url);
        debug!("Fetching market data from {}", url);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| MarketError::ApiError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MarketError::ApiError(format!(
                "market API returned status {}",
                response.status()
            )));
        }

        let tokens: Vec<UpstreamToken> = response
            .json()
            .await
            .map_err(|e| MarketError::InvalidResponse(e.to_string()))?;

        let records: Vec<TokenRecord> = tokens.into_iter().filter_map(normalize_token).collect();
        if records.is_empty() {
            // An empty upstream batch is indistinguishable from an outage;
            // callers skip the cycle instead of reporting zero activity
            return Err(MarketError::EmptyBatch);
        }

        info!("Fetched {} token records from {}", records.len(), self.source_name());
        Ok(records)
    }

    fn source_name(&self) -> &'static str {
        "avnu"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_full_payload() {
        let json = r#"{
            "address": "0x049d",
            "name": "Ether",
            "symbol": "ETH",
            "verified": true,
            "tags": [],
            "market": {
                "currentPrice": 3000.0,
                "priceChangePercentage24h": 6.2,
                "starknetVolume24h": 1000000.0,
                "marketCap": 360000000000.0,
                "starknetTvl": 42000000.0
            }
        }"#;
        let token: UpstreamToken = serde_json::from_str(json).unwrap();
        let record = normalize_token(token).unwrap();

        assert_eq!(record.symbol, "ETH");
        assert_eq!(record.price_usd, 3000.0);
        assert_eq!(record.price_change_24h, 6.2);
        assert_eq!(record.volume_24h, 1_000_000.0);
        assert_eq!(record.liquidity, Some(42_000_000.0));
        assert!(record.verified);
    }

    #[test]
    fn test_normalize_defaults_for_missing_fields() {
        let json = r#"{ "address": "0xabc", "symbol": "NEW" }"#;
        let token: UpstreamToken = serde_json::from_str(json).unwrap();
        let record = normalize_token(token).unwrap();

        assert_eq!(record.name, "NEW");
        assert_eq!(record.price_usd, 0.0);
        assert_eq!(record.price_change_24h, 0.0);
        assert_eq!(record.volume_24h, 0.0);
        assert_eq!(record.market_cap, None);
        assert_eq!(record.liquidity, None);
        assert!(!record.verified);
    }

    #[test]
    fn test_verified_from_curation_tag() {
        let json = r#"{ "address": "0xabc", "symbol": "STRK", "tags": ["Verified"] }"#;
        let token: UpstreamToken = serde_json::from_str(json).unwrap();
        assert!(normalize_token(token).unwrap().verified);
    }

    #[test]
    fn test_missing_address_is_dropped() {
        let json = r#"{ "address": "", "symbol": "GHOST" }"#;
        let token: UpstreamToken = serde_json::from_str(json).unwrap();
        assert!(normalize_token(token).is_none());
    }
}
