//! Application services and use cases

use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::alerts::{AlertDetector, DetectorConfig};
use crate::domain::model::{AlertEvent, DetectorState, MarketSnapshot};
use crate::domain::snapshot::SnapshotAggregator;
use crate::infrastructure::market_api::{AvnuMarketClient, MarketDataSource};
use crate::infrastructure::quote_api::QuoteSource;
use crate::shared::config::Config;
use crate::shared::errors::AppError;

/// Orchestrates fetch -> aggregate -> detect over one market data source.
///
/// A failed or empty fetch surfaces as an error and the cycle is skipped;
/// it is never aggregated as if it were real zero-activity data.
pub struct MarketService {
    config: Config,
    source: Arc<dyn MarketDataSource>,
    aggregator: SnapshotAggregator,
    detector: AlertDetector,
}

impl MarketService {
    pub fn new(config: Config) -> Self {
        let source = Arc::new(AvnuMarketClient::new(config.network.market_api_url.clone()));
        Self::with_source(config, source)
    }

    pub fn with_source(config: Config, source: Arc<dyn MarketDataSource>) -> Self {
        let aggregator = SnapshotAggregator::new(config.network.name.clone());
        let detector = AlertDetector::new(DetectorConfig {
            price_change_threshold: config.alerts.price_change_threshold,
            volume_spike_threshold: config.alerts.volume_spike_threshold,
            watchlist: config.alerts.watchlist.clone(),
        });
        Self {
            config,
            source,
            aggregator,
            detector,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fetch one batch and compute a ranked snapshot
    pub async fn snapshot(&self) -> Result<MarketSnapshot, AppError> {
        let records = self.source.fetch_tokens().await?;
        let snapshot = self.aggregator.aggregate(&records, &self.config.watchlist);
        info!(
            "Snapshot: {} tokens, {:.0} USD total 24h volume",
            snapshot.token_count, snapshot.total_volume_24h
        );
        Ok(snapshot)
    }

    /// Fetch one batch and run alert detection against the carried state
    pub async fn scan_alerts(&self, state: &mut DetectorState) -> Result<Vec<AlertEvent>, AppError> {
        let records = self.source.fetch_tokens().await?;
        let first_scan = state.is_empty();
        let alerts = self.detector.detect(&records, state);
        if first_scan && !alerts.is_empty() {
            warn!("First scan against an empty baseline; new-token alerts cover the whole batch");
        }
        info!("Alert scan: {} records, {} alerts", records.len(), alerts.len());
        Ok(alerts)
    }
}

/// Result of a DCA schedule estimate
#[derive(Debug, Clone)]
pub struct DcaEstimate {
    pub sell_symbol: String,
    pub buy_symbol: String,
    pub orders: u32,
    pub amount_per_order: f64,
    pub buy_per_order: f64,
    pub buy_total: f64,
    pub fee_total_usd: Option<f64>,
}

/// Estimate the outcome of a recurring buy split into equal orders.
/// Symbols are resolved through the configured token registry; an unknown
/// symbol fails fast.
pub async fn estimate_dca(
    config: &Config,
    quotes: &dyn QuoteSource,
    sell_symbol: &str,
    buy_symbol: &str,
    amount_per_order: f64,
    orders: u32,
) -> Result<DcaEstimate, AppError> {
    if orders == 0 || amount_per_order <= 0.0 {
        return Err(AppError::ConfigError(
            "DCA estimate needs a positive amount and at least one order".to_string(),
        ));
    }

    let sell = config.resolve_token(sell_symbol)?;
    let buy = config.resolve_token(buy_symbol)?;

    let sell_amount_raw = (amount_per_order * 10f64.powi(sell.decimals as i32)) as u128;
    let quote = quotes
        .fetch_quote(&sell.address, &buy.address, sell_amount_raw)
        .await?;

    let buy_per_order = quote.buy_amount_raw as f64 / 10f64.powi(buy.decimals as i32);
    Ok(DcaEstimate {
        sell_symbol: sell.symbol.clone(),
        buy_symbol: buy.symbol.clone(),
        orders,
        amount_per_order,
        buy_per_order,
        buy_total: buy_per_order * orders as f64,
        fee_total_usd: quote.fee_usd.map(|f| f * orders as f64),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{QuoteEstimate, TokenRecord};
    use crate::shared::errors::{MarketError, QuoteError};
    use async_trait::async_trait;
    use chrono::Utc;

    struct StaticSource {
        records: Vec<TokenRecord>,
    }

    #[async_trait]
    impl MarketDataSource for StaticSource {
        async fn fetch_tokens(&self) -> Result<Vec<TokenRecord>, MarketError> {
            if self.records.is_empty() {
                return Err(MarketError::EmptyBatch);
            }
            Ok(self.records.clone())
        }

        fn source_name(&self) -> &'static str {
            "static"
        }
    }

    struct StaticQuotes {
        estimate: QuoteEstimate,
    }

    #[async_trait]
    impl QuoteSource for StaticQuotes {
        async fn fetch_quote(
            &self,
            _sell: &str,
            _buy: &str,
            _amount: u128,
        ) -> Result<QuoteEstimate, QuoteError> {
            Ok(self.estimate.clone())
        }
    }

    fn record(symbol: &str, address: &str, change: f64, volume: f64) -> TokenRecord {
        TokenRecord {
            symbol: symbol.to_string(),
            name: symbol.to_string(),
            address: address.to_string(),
            price_usd: 1.0,
            volume_24h: volume,
            price_change_24h: change,
            market_cap: None,
            liquidity: None,
            verified: false,
            last_updated: Utc::now(),
        }
    }

    fn service(records: Vec<TokenRecord>) -> MarketService {
        MarketService::with_source(Config::default(), Arc::new(StaticSource { records }))
    }

    #[tokio::test]
    async fn test_snapshot_pipeline() {
        let svc = service(vec![
            record("ETH", "0x1", 6.2, 1_000_000.0),
            record("STRK", "0x2", -3.0, 500_000.0),
        ]);
        let snapshot = svc.snapshot().await.unwrap();

        assert_eq!(snapshot.token_count, 2);
        assert_eq!(snapshot.total_volume_24h, 1_500_000.0);
        assert_eq!(snapshot.network, "starknet");
    }

    #[tokio::test]
    async fn test_failed_fetch_skips_aggregation() {
        let svc = service(Vec::new());
        assert!(svc.snapshot().await.is_err());

        let mut state = DetectorState::new();
        assert!(svc.scan_alerts(&mut state).await.is_err());
        // The failed cycle must not advance detector state
        assert!(state.is_empty());
        assert!(state.last_check.is_none());
    }

    #[tokio::test]
    async fn test_alert_pipeline_carries_state_between_scans() {
        let svc = service(vec![record("ETH", "0x1", 1.0, 1_000_000.0)]);
        let mut state = DetectorState::new();

        let alerts = svc.scan_alerts(&mut state).await.unwrap();
        assert!(alerts.is_empty());
        assert_eq!(state.last_volume_by_address.get("0x1"), Some(&1_000_000.0));

        let svc = service(vec![record("ETH", "0x1", 1.0, 4_000_000.0)]);
        let alerts = svc.scan_alerts(&mut state).await.unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].value, 300.0);
    }

    #[tokio::test]
    async fn test_dca_estimate_scales_orders() {
        let config = Config::default();
        let quotes = StaticQuotes {
            estimate: QuoteEstimate {
                // 0.0005 ETH in wei
                buy_amount_raw: 500_000_000_000_000,
                fee_usd: Some(0.10),
            },
        };

        let est = estimate_dca(&config, &quotes, "USDC", "ETH", 100.0, 4)
            .await
            .unwrap();
        assert_eq!(est.orders, 4);
        assert!((est.buy_per_order - 0.0005).abs() < 1e-12);
        assert!((est.buy_total - 0.002).abs() < 1e-12);
        assert_eq!(est.fee_total_usd, Some(0.4));
    }

    #[tokio::test]
    async fn test_dca_estimate_rejects_unknown_symbol() {
        let config = Config::default();
        let quotes = StaticQuotes {
            estimate: QuoteEstimate {
                buy_amount_raw: 1,
                fee_usd: None,
            },
        };

        let err = estimate_dca(&config, &quotes, "NOPE", "ETH", 100.0, 1).await;
        assert!(matches!(err, Err(AppError::ConfigError(_))));
    }
}
