//! Swap-quote API client used for DCA estimation

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::domain::model::QuoteEstimate;
use crate::shared::errors::QuoteError;

/// Point lookup: expected output and fee for one sell/buy pair
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn fetch_quote(
        &self,
        sell_address: &str,
        buy_address: &str,
        sell_amount_raw: u128,
    ) -> Result<QuoteEstimate, QuoteError>;
}

/// One quote entry from the swap API; amounts are hex-encoded strings
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpstreamQuote {
    buy_amount: String,
    gas_fees_in_usd: Option<f64>,
}

fn parse_hex_amount(s: &str) -> Result<u128, QuoteError> {
    let trimmed = s.strip_prefix("0x").unwrap_or(s);
    u128::from_str_radix(trimmed, 16)
        .map_err(|e| QuoteError::InvalidResponse(format!("bad amount {:?}: {}", s, e)))
}

/// AVNU swap API client
pub struct AvnuQuoteClient {
    http_client: Client,
    base_url: String,
}

impl AvnuQuoteClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl QuoteSource for AvnuQuoteClient {
    async fn fetch_quote(
        &self,
        sell_address: &str,
        buy_address: &str,
        sell_amount_raw: u128,
    ) -> Result<QuoteEstimate, QuoteError> {
        let url = format!("{}/swap/v2/quotes", self.base_url);
        debug!("Fetching quote {} -> {} from {}", sell_address, buy_address, url);

        let sell_amount = format!("{:#x}", sell_amount_raw);
        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("sellTokenAddress", sell_address),
                ("buyTokenAddress", buy_address),
                ("sellAmount", sell_amount.as_str()),
            ])
            .send()
            .await
            .map_err(|e| QuoteError::ApiError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(QuoteError::ApiError(format!(
                "quote API returned status {}",
                response.status()
            )));
        }

        let quotes: Vec<UpstreamQuote> = response
            .json()
            .await
            .map_err(|e| QuoteError::InvalidResponse(e.to_string()))?;

        // The API ranks quotes best-first
        let best = quotes.into_iter().next().ok_or(QuoteError::NoRoute {
            sell: sell_address.to_string(),
            buy: buy_address.to_string(),
        })?;

        Ok(QuoteEstimate {
            buy_amount_raw: parse_hex_amount(&best.buy_amount)?,
            fee_usd: best.gas_fees_in_usd,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_amount() {
        assert_eq!(parse_hex_amount("0x10").unwrap(), 16);
        assert_eq!(parse_hex_amount("ff").unwrap(), 255);
        assert!(parse_hex_amount("0xzz").is_err());
    }

    #[test]
    fn test_decode_quote_entry() {
        let json = r#"{ "buyAmount": "0xde0b6b3a7640000", "gasFeesInUsd": 0.12 }"#;
        let quote: UpstreamQuote = serde_json::from_str(json).unwrap();
        assert_eq!(parse_hex_amount(&quote.buy_amount).unwrap(), 1_000_000_000_000_000_000);
        assert_eq!(quote.gas_fees_in_usd, Some(0.12));
    }
}
