//! Core market-data types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Point-in-time observation of one tradable asset.
///
/// `address` uniquely identifies a record within one fetch batch and is the
/// join key for cross-poll state; `symbol` may collide or be renamed and is
/// never used as a storage key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRecord {
    pub symbol: String,
    pub name: String,
    pub address: String,
    pub price_usd: f64,
    pub volume_24h: f64,
    pub price_change_24h: f64,
    pub market_cap: Option<f64>,
    pub liquidity: Option<f64>,
    pub verified: bool,
    pub last_updated: DateTime<Utc>,
}

/// Ranked view computed from one fetch batch; immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub timestamp: DateTime<Utc>,
    pub network: String,
    pub token_count: usize,
    pub total_volume_24h: f64,
    pub top_by_volume: Vec<TokenRecord>,
    pub top_gainers: Vec<TokenRecord>,
    pub top_losers: Vec<TokenRecord>,
    pub watchlist: Vec<TokenRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    PriceSurge,
    PriceDrop,
    VolumeSpike,
    NewToken,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::PriceSurge => "price_surge",
            AlertType::PriceDrop => "price_drop",
            AlertType::VolumeSpike => "volume_spike",
            AlertType::NewToken => "new_token",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

/// One detected market condition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertEvent {
    pub alert_type: AlertType,
    pub symbol: String,
    pub message: String,
    /// Measured quantity: percentage for price alerts, growth ratio in
    /// percent for volume spikes, 0 for new-token alerts
    pub value: f64,
    /// Configured threshold that triggered the alert
    pub threshold: f64,
    pub timestamp: DateTime<Utc>,
    pub severity: Severity,
}

/// Cross-poll detector state, keyed by token address.
///
/// Owned by the caller and passed into every detection call; the detector
/// reads the previous poll's values before writing the current ones. The
/// core does not persist it across restarts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectorState {
    pub last_price_by_address: HashMap<String, f64>,
    pub last_volume_by_address: HashMap<String, f64>,
    pub known_addresses: HashSet<String>,
    pub last_check: Option<DateTime<Utc>>,
}

impl DetectorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all carried-forward history
    pub fn reset(&mut self) {
        self.last_price_by_address.clear();
        self.last_volume_by_address.clear();
        self.known_addresses.clear();
        self.last_check = None;
    }

    pub fn is_empty(&self) -> bool {
        self.known_addresses.is_empty()
    }
}

/// Result of a quote lookup for one sell/buy pair.
/// `buy_amount_raw` is in the buy token's smallest unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteEstimate {
    pub buy_amount_raw: u128,
    pub fee_usd: Option<f64>,
}
