//! Stateful alert detection over successive market polls

use chrono::Utc;

use super::model::{AlertEvent, AlertType, DetectorState, Severity, TokenRecord};
use crate::shared::utils::{calculate_percentage_change, format_percent, format_usd, format_volume};

/// Severity cut points preserved from the original policy
pub const PRICE_SEVERITY_HIGH: f64 = 20.0;
pub const PRICE_SEVERITY_MEDIUM: f64 = 10.0;
pub const VOLUME_SEVERITY_HIGH: f64 = 500.0;
pub const VOLUME_SEVERITY_MEDIUM: f64 = 300.0;

#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Minimum abs(24h price change) in percent that raises a price alert
    pub price_change_threshold: f64,
    /// Minimum volume growth in percent that raises a volume-spike alert
    pub volume_spike_threshold: f64,
    /// When non-empty, only these symbols are scanned
    pub watchlist: Vec<String>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            price_change_threshold: 5.0,
            volume_spike_threshold: 200.0,
            watchlist: Vec::new(),
        }
    }
}

/// Delta detector over successive polls.
///
/// Holds no history of its own: the caller owns the [`DetectorState`] and
/// passes it into every call, which also serializes access. Comparisons use
/// the state as left by the previous call; each record's state entries are
/// rewritten only after its alerts are computed.
pub struct AlertDetector {
    config: DetectorConfig,
}

impl AlertDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    pub fn detect(&self, records: &[TokenRecord], state: &mut DetectorState) -> Vec<AlertEvent> {
        let now = Utc::now();
        let watch_upper: Vec<String> = self
            .config
            .watchlist
            .iter()
            .map(|s| s.to_uppercase())
            .collect();

        let mut alerts = Vec::new();

        for record in records {
            if !watch_upper.is_empty() && !watch_upper.contains(&record.symbol.to_uppercase()) {
                continue;
            }

            let change = record.price_change_24h;
            if change.abs() >= self.config.price_change_threshold {
                let alert_type = if change > 0.0 {
                    AlertType::PriceSurge
                } else {
                    AlertType::PriceDrop
                };
                let verb = if change > 0.0 { "surged" } else { "dropped" };
                alerts.push(AlertEvent {
                    alert_type,
                    symbol: record.symbol.clone(),
                    message: format!(
                        "{} {} {} in 24h (price {})",
                        record.symbol,
                        verb,
                        format_percent(change),
                        format_usd(record.price_usd)
                    ),
                    value: change,
                    threshold: self.config.price_change_threshold,
                    timestamp: now,
                    severity: price_severity(change),
                });
            }

            // Volume spikes need a positive prior observation; a token's
            // first sighting can never spike. The guard stays even though
            // the helper falls back to 0.0 for a zero base: "no history"
            // must not read as "0% change".
            if let Some(&prev) = state.last_volume_by_address.get(&record.address) {
                if prev > 0.0 {
                    let volume_change = calculate_percentage_change(prev, record.volume_24h);
                    if volume_change >= self.config.volume_spike_threshold {
                        alerts.push(AlertEvent {
                            alert_type: AlertType::VolumeSpike,
                            symbol: record.symbol.clone(),
                            message: format!(
                                "{} volume jumped {} to {}",
                                record.symbol,
                                format_percent(volume_change),
                                format_volume(record.volume_24h)
                            ),
                            value: volume_change,
                            threshold: self.config.volume_spike_threshold,
                            timestamp: now,
                            severity: volume_severity(volume_change),
                        });
                    }
                }
            }

            if record.verified && !state.known_addresses.contains(&record.address) {
                alerts.push(AlertEvent {
                    alert_type: AlertType::NewToken,
                    symbol: record.symbol.clone(),
                    message: format!(
                        "New verified token listed: {} ({})",
                        record.name, record.symbol
                    ),
                    value: 0.0,
                    threshold: 0.0,
                    timestamp: now,
                    severity: Severity::Medium,
                });
            }

            state
                .last_price_by_address
                .insert(record.address.clone(), record.price_usd);
            state
                .last_volume_by_address
                .insert(record.address.clone(), record.volume_24h);
            state.known_addresses.insert(record.address.clone());
        }

        state.last_check = Some(now);
        alerts
    }
}

fn price_severity(change: f64) -> Severity {
    if change.abs() > PRICE_SEVERITY_HIGH {
        Severity::High
    } else if change.abs() > PRICE_SEVERITY_MEDIUM {
        Severity::Medium
    } else {
        Severity::Low
    }
}

fn volume_severity(volume_change: f64) -> Severity {
    if volume_change > VOLUME_SEVERITY_HIGH {
        Severity::High
    } else if volume_change > VOLUME_SEVERITY_MEDIUM {
        Severity::Medium
    } else {
        Severity::Low
    }
}
