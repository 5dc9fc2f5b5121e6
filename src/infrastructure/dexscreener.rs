//! Secondary pair-based price feed

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::domain::model::TokenRecord;
use crate::shared::errors::MarketError;

use super::market_api::MarketDataSource;

/// One pair entry from the screener API. Numeric fields arrive as strings
/// or numbers depending on the endpoint, hence the loose shapes.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PairEntry {
    base_token: PairToken,
    price_usd: Option<String>,
    price_change: Option<PairWindow>,
    volume: Option<PairWindow>,
    liquidity: Option<PairLiquidity>,
    fdv: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct PairToken {
    address: String,
    name: Option<String>,
    symbol: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PairWindow {
    h24: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct PairLiquidity {
    usd: Option<f64>,
}

/// Map a pair entry into the uniform record shape.
///
/// Defaults mirror the primary feed: absent numbers become 0.0, absent
/// metadata falls back to the address. Pairs carry no curation tags, so
/// records from this feed are never marked verified and can never trigger
/// new-token alerts.
fn normalize_pair(pair: PairEntry) -> Option<TokenRecord> {
    if pair.base_token.address.is_empty() {
        return None;
    }

    let symbol = pair
        .base_token
        .symbol
        .unwrap_or_else(|| pair.base_token.address.clone());
    let price_usd = pair
        .price_usd
        .as_deref()
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0);

    Some(TokenRecord {
        name: pair.base_token.name.unwrap_or_else(|| symbol.clone()),
        symbol,
        address: pair.base_token.address,
        price_usd,
        price_change_24h: pair.price_change.and_then(|w| w.h24).unwrap_or(0.0),
        volume_24h: pair.volume.and_then(|w| w.h24).unwrap_or(0.0),
        market_cap: pair.fdv,
        liquidity: pair.liquidity.and_then(|l| l.usd),
        verified: false,
        last_updated: Utc::now(),
    })
}

/// DexScreener-style secondary feed, polled for a fixed address set
pub struct DexScreenerClient {
    http_client: Client,
    base_url: String,
    chain_id: String,
    addresses: Vec<String>,
}

impl DexScreenerClient {
    pub fn new(chain_id: impl Into<String>, addresses: Vec<String>) -> Self {
        Self {
            http_client: Client::new(),
            base_url: "https://api.dexscreener.com".to_string(),
            chain_id: chain_id.into(),
            addresses,
        }
    }
}

#[async_trait]
impl MarketDataSource for DexScreenerClient {
    async fn fetch_tokens(&self) -> Result<Vec<TokenRecord>, MarketError> {
        if self.addresses.is_empty() {
            return Err(MarketError::EmptyBatch);
        }

        let url = format!(
            "{}/tokens/v1/{}/{}",
            self.base_url,
            self.chain_id,
            self.addresses.join(",")
        );
        debug!("Fetching pair data from {}", url);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| MarketError::ApiError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MarketError::ApiError(format!(
                "pair API returned status {}",
                response.status()
            )));
        }

        let pairs: Vec<PairEntry> = response
            .json()
            .await
            .map_err(|e| MarketError::InvalidResponse(e.to_string()))?;

        // Several pairs can quote the same base token; keep the first
        // (highest-ranked) pair per address
        let mut records: Vec<TokenRecord> = Vec::new();
        for record in pairs.into_iter().filter_map(normalize_pair) {
            if !records.iter().any(|r| r.address == record.address) {
                records.push(record);
            }
        }

        if records.is_empty() {
            return Err(MarketError::EmptyBatch);
        }

        info!("Fetched {} records from {}", records.len(), self.source_name());
        Ok(records)
    }

    fn source_name(&self) -> &'static str {
        "dexscreener"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_pair_with_string_price() {
        let json = r#"{
            "baseToken": { "address": "0x049d", "name": "Ether", "symbol": "ETH" },
            "priceUsd": "2987.45",
            "priceChange": { "h24": -2.1 },
            "volume": { "h24": 750000.0 },
            "liquidity": { "usd": 1200000.0 },
            "fdv": 500000000.0
        }"#;
        let pair: PairEntry = serde_json::from_str(json).unwrap();
        let record = normalize_pair(pair).unwrap();

        assert_eq!(record.symbol, "ETH");
        assert_eq!(record.price_usd, 2987.45);
        assert_eq!(record.price_change_24h, -2.1);
        assert_eq!(record.volume_24h, 750_000.0);
        assert_eq!(record.liquidity, Some(1_200_000.0));
        assert!(!record.verified);
    }

    #[test]
    fn test_normalize_pair_defaults() {
        let json = r#"{ "baseToken": { "address": "0xabc" } }"#;
        let pair: PairEntry = serde_json::from_str(json).unwrap();
        let record = normalize_pair(pair).unwrap();

        assert_eq!(record.symbol, "0xabc");
        assert_eq!(record.price_usd, 0.0);
        assert_eq!(record.volume_24h, 0.0);
        assert!(!record.verified);
    }

    #[test]
    fn test_unparseable_price_defaults_to_zero() {
        let json = r#"{
            "baseToken": { "address": "0xabc", "symbol": "X" },
            "priceUsd": "n/a"
        }"#;
        let pair: PairEntry = serde_json::from_str(json).unwrap();
        assert_eq!(normalize_pair(pair).unwrap().price_usd, 0.0);
    }
}
