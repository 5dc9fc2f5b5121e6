//! Application configuration loaded from a TOML file

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::shared::errors::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkCfg {
    /// Network label stamped on every snapshot
    pub name: String,
    /// Base URL of the liquidity-aggregator market API
    pub market_api_url: String,
    /// Base URL of the quote API
    pub quote_api_url: String,
    /// Chain identifier used by the secondary pair feed
    pub secondary_chain_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertsCfg {
    /// Minimum abs(24h price change) in percent that raises a price alert
    pub price_change_threshold: f64,
    /// Minimum volume growth in percent that raises a volume-spike alert
    pub volume_spike_threshold: f64,
    /// When non-empty, alert scans are restricted to these symbols
    #[serde(default)]
    pub watchlist: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleCfg {
    /// Seconds between snapshot reports
    pub snapshot_interval_secs: u64,
    /// Seconds between alert scans
    pub alert_interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportCfg {
    /// Directory where generated reports are written
    pub output_dir: String,
    /// "markdown" or "json"
    pub format: String,
}

/// One entry of the token registry backing quote estimates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenCfg {
    pub symbol: String,
    pub address: String,
    pub decimals: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub network: NetworkCfg,
    /// Symbols always surfaced in the snapshot's watchlist section
    #[serde(default)]
    pub watchlist: Vec<String>,
    pub alerts: AlertsCfg,
    pub schedule: ScheduleCfg,
    pub report: ReportCfg,
    #[serde(default)]
    pub tokens: Vec<TokenCfg>,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = fs::read_to_string(path.as_ref())
            .with_context(|| format!("read {}", path.as_ref().display()))?;
        let cfg: Self = toml::from_str(&s).context("parse Config.toml")?;
        Ok(cfg)
    }

    /// Resolve a registry entry by symbol, case-insensitively.
    /// Unknown symbols fail fast rather than defaulting.
    pub fn resolve_token(&self, symbol: &str) -> Result<&TokenCfg, AppError> {
        self.tokens
            .iter()
            .find(|t| t.symbol.eq_ignore_ascii_case(symbol))
            .ok_or_else(|| AppError::ConfigError(format!("unknown token symbol: {}", symbol)))
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.network.market_api_url.is_empty() {
            return Err(AppError::ConfigError("market_api_url is empty".to_string()));
        }
        if self.alerts.price_change_threshold <= 0.0 {
            return Err(AppError::ConfigError(
                "price_change_threshold must be positive".to_string(),
            ));
        }
        if self.alerts.volume_spike_threshold <= 0.0 {
            return Err(AppError::ConfigError(
                "volume_spike_threshold must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: NetworkCfg {
                name: "starknet".to_string(),
                market_api_url: "https://starknet.impulse.avnu.fi".to_string(),
                quote_api_url: "https://starknet.api.avnu.fi".to_string(),
                secondary_chain_id: "starknet".to_string(),
            },
            watchlist: vec![
                "ETH".to_string(),
                "STRK".to_string(),
                "USDC".to_string(),
            ],
            alerts: AlertsCfg {
                price_change_threshold: 5.0,
                volume_spike_threshold: 200.0,
                watchlist: Vec::new(),
            },
            schedule: ScheduleCfg {
                snapshot_interval_secs: 3600,
                alert_interval_secs: 300,
            },
            report: ReportCfg {
                output_dir: "reports".to_string(),
                format: "markdown".to_string(),
            },
            tokens: vec![
                TokenCfg {
                    symbol: "ETH".to_string(),
                    address: "0x049d36570d4e46f48e99674bd3fcc84644ddd6b96f7c741b1562b82f9e004dc7"
                        .to_string(),
                    decimals: 18,
                },
                TokenCfg {
                    symbol: "STRK".to_string(),
                    address: "0x04718f5a0fc34cc1af16a1cdee98ffb20c31f5cd61d6ab07201858f4287c938d"
                        .to_string(),
                    decimals: 18,
                },
                TokenCfg {
                    symbol: "USDC".to_string(),
                    address: "0x053c91253bc9682c04929ca02ed00b3e423f6710d2ee7e0d5ebb06f3ecf368a8"
                        .to_string(),
                    decimals: 6,
                },
            ],
        }
    }
}
