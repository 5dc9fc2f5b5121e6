//! Snapshot aggregation - ranked views over one fetch batch

use chrono::Utc;
use std::cmp::Ordering;

use super::model::{MarketSnapshot, TokenRecord};

/// Ranking sizes preserved from the original policy
pub const TOP_BY_VOLUME_LIMIT: usize = 20;
pub const TOP_MOVERS_LIMIT: usize = 10;

/// Computes ranked snapshots from token batches
pub struct SnapshotAggregator {
    network: String,
}

impl SnapshotAggregator {
    pub fn new(network: impl Into<String>) -> Self {
        Self {
            network: network.into(),
        }
    }

    /// Build a snapshot from one batch.
    ///
    /// Volume rankings and the total-volume sum only consider records with
    /// positive 24h volume; the watchlist view is drawn from the full batch
    /// so zero-volume watched tokens still surface. Sorts are stable, ties
    /// keep input order. An empty batch yields an empty snapshot.
    pub fn aggregate(&self, records: &[TokenRecord], watchlist: &[String]) -> MarketSnapshot {
        let active: Vec<&TokenRecord> = records.iter().filter(|r| r.volume_24h > 0.0).collect();

        let total_volume_24h: f64 = active.iter().map(|r| r.volume_24h).sum();

        let mut by_volume = active.clone();
        by_volume.sort_by(|a, b| cmp_f64_desc(a.volume_24h, b.volume_24h));
        let top_by_volume = take_cloned(&by_volume, TOP_BY_VOLUME_LIMIT);

        let mut gainers: Vec<&TokenRecord> = active
            .iter()
            .copied()
            .filter(|r| r.price_change_24h > 0.0)
            .collect();
        gainers.sort_by(|a, b| cmp_f64_desc(a.price_change_24h, b.price_change_24h));
        let top_gainers = take_cloned(&gainers, TOP_MOVERS_LIMIT);

        let mut losers: Vec<&TokenRecord> = active
            .iter()
            .copied()
            .filter(|r| r.price_change_24h < 0.0)
            .collect();
        // Most negative first
        losers.sort_by(|a, b| cmp_f64_asc(a.price_change_24h, b.price_change_24h));
        let top_losers = take_cloned(&losers, TOP_MOVERS_LIMIT);

        let watch_upper: Vec<String> = watchlist.iter().map(|s| s.to_uppercase()).collect();
        let watchlist_records: Vec<TokenRecord> = records
            .iter()
            .filter(|r| watch_upper.contains(&r.symbol.to_uppercase()))
            .cloned()
            .collect();

        MarketSnapshot {
            timestamp: Utc::now(),
            network: self.network.clone(),
            token_count: records.len(),
            total_volume_24h,
            top_by_volume,
            top_gainers,
            top_losers,
            watchlist: watchlist_records,
        }
    }
}

fn cmp_f64_desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

fn cmp_f64_asc(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

fn take_cloned(records: &[&TokenRecord], limit: usize) -> Vec<TokenRecord> {
    records.iter().take(limit).map(|r| (*r).clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(symbol: &str, address: &str, volume: f64, change: f64) -> TokenRecord {
        TokenRecord {
            symbol: symbol.to_string(),
            name: symbol.to_string(),
            address: address.to_string(),
            price_usd: 1.0,
            volume_24h: volume,
            price_change_24h: change,
            market_cap: None,
            liquidity: None,
            verified: true,
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn test_total_volume_sums_active_records_only() {
        let records = vec![
            record("ETH", "0x1", 1_000_000.0, 6.2),
            record("STRK", "0x2", 500_000.0, -3.0),
            record("USDC", "0x3", 0.0, 0.0),
        ];
        let snapshot = SnapshotAggregator::new("starknet").aggregate(&records, &[]);

        assert_eq!(snapshot.token_count, 3);
        assert_eq!(snapshot.total_volume_24h, 1_500_000.0);
        assert_eq!(snapshot.top_by_volume.len(), 2);
        assert_eq!(snapshot.top_by_volume[0].symbol, "ETH");
    }

    #[test]
    fn test_zero_change_appears_in_neither_movers_list() {
        let records = vec![
            record("A", "0x1", 100.0, 5.0),
            record("B", "0x2", 100.0, 0.0),
            record("C", "0x3", 100.0, -5.0),
        ];
        let snapshot = SnapshotAggregator::new("starknet").aggregate(&records, &[]);

        assert_eq!(snapshot.top_gainers.len(), 1);
        assert_eq!(snapshot.top_gainers[0].symbol, "A");
        assert_eq!(snapshot.top_losers.len(), 1);
        assert_eq!(snapshot.top_losers[0].symbol, "C");
    }

    #[test]
    fn test_gainers_descend_and_losers_ascend() {
        let records = vec![
            record("A", "0x1", 100.0, 2.0),
            record("B", "0x2", 100.0, 9.0),
            record("C", "0x3", 100.0, -1.0),
            record("D", "0x4", 100.0, -8.0),
        ];
        let snapshot = SnapshotAggregator::new("starknet").aggregate(&records, &[]);

        let gains: Vec<f64> = snapshot.top_gainers.iter().map(|r| r.price_change_24h).collect();
        assert_eq!(gains, vec![9.0, 2.0]);
        let losses: Vec<f64> = snapshot.top_losers.iter().map(|r| r.price_change_24h).collect();
        assert_eq!(losses, vec![-8.0, -1.0]);
    }

    #[test]
    fn test_watchlist_matching_is_case_insensitive_and_keeps_zero_volume() {
        let records = vec![
            record("eth", "0x1", 100.0, 1.0),
            record("USDC", "0x3", 0.0, 0.0),
        ];
        let watchlist = vec!["ETH".to_string(), "usdc".to_string()];
        let snapshot = SnapshotAggregator::new("starknet").aggregate(&records, &watchlist);

        let symbols: Vec<&str> = snapshot.watchlist.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["eth", "USDC"]);
    }

    #[test]
    fn test_empty_batch_yields_empty_snapshot() {
        let snapshot = SnapshotAggregator::new("starknet").aggregate(&[], &["ETH".to_string()]);

        assert_eq!(snapshot.token_count, 0);
        assert_eq!(snapshot.total_volume_24h, 0.0);
        assert!(snapshot.top_by_volume.is_empty());
        assert!(snapshot.top_gainers.is_empty());
        assert!(snapshot.top_losers.is_empty());
        assert!(snapshot.watchlist.is_empty());
    }

    #[test]
    fn test_ranking_limits_are_enforced() {
        let records: Vec<TokenRecord> = (0..30)
            .map(|i| {
                record(
                    &format!("T{}", i),
                    &format!("0x{}", i),
                    1000.0 + i as f64,
                    1.0 + i as f64,
                )
            })
            .collect();
        let snapshot = SnapshotAggregator::new("starknet").aggregate(&records, &[]);

        assert_eq!(snapshot.top_by_volume.len(), TOP_BY_VOLUME_LIMIT);
        assert_eq!(snapshot.top_gainers.len(), TOP_MOVERS_LIMIT);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let records = vec![
            record("A", "0x1", 100.0, 3.0),
            record("B", "0x2", 100.0, 3.0),
        ];
        let snapshot = SnapshotAggregator::new("starknet").aggregate(&records, &[]);

        assert_eq!(snapshot.top_by_volume[0].symbol, "A");
        assert_eq!(snapshot.top_gainers[0].symbol, "A");
    }
}
