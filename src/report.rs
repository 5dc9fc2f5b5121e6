// src/report.rs
use std::str::FromStr;

use crate::domain::model::{AlertEvent, AlertType, MarketSnapshot};
use crate::shared::errors::ReportError;
use crate::shared::utils::{format_percent, format_usd, format_volume};

/// Output shape for generated reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Markdown,
    Json,
}

impl FromStr for ReportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            "json" => Ok(ReportFormat::Json),
            other => Err(ReportError::InvalidDestination(format!(
                "unsupported report format: {}",
                other
            ))),
        }
    }
}

/// Fixed display order for alert groups
const ALERT_DISPLAY_ORDER: [AlertType; 4] = [
    AlertType::PriceSurge,
    AlertType::PriceDrop,
    AlertType::VolumeSpike,
    AlertType::NewToken,
];

fn group_heading(alert_type: AlertType) -> &'static str {
    match alert_type {
        AlertType::PriceSurge => "🚀 Price Surges",
        AlertType::PriceDrop => "📉 Price Drops",
        AlertType::VolumeSpike => "📊 Volume Spikes",
        AlertType::NewToken => "🆕 New Tokens",
    }
}

/// Formats snapshots and alert lists into reports
pub struct ReportGenerator;

impl ReportGenerator {
    pub fn snapshot_markdown(snapshot: &MarketSnapshot) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "# {} Market Snapshot\n\n",
            capitalize(&snapshot.network)
        ));
        out.push_str(&format!(
            "Generated: {}\n\n",
            snapshot.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        out.push_str(&format!("- Tokens tracked: {}\n", snapshot.token_count));
        out.push_str(&format!(
            "- Total 24h volume: {}\n\n",
            format_volume(snapshot.total_volume_24h)
        ));

        push_record_section(&mut out, "## Top by Volume", &snapshot.top_by_volume, |r| {
            format!(
                "| {} | {} | {} | {} |",
                r.symbol,
                format_usd(r.price_usd),
                format_volume(r.volume_24h),
                format_percent(r.price_change_24h)
            )
        });
        push_record_section(&mut out, "## Top Gainers", &snapshot.top_gainers, |r| {
            format!(
                "| {} | {} | {} |",
                r.symbol,
                format_usd(r.price_usd),
                format_percent(r.price_change_24h)
            )
        });
        push_record_section(&mut out, "## Top Losers", &snapshot.top_losers, |r| {
            format!(
                "| {} | {} | {} |",
                r.symbol,
                format_usd(r.price_usd),
                format_percent(r.price_change_24h)
            )
        });
        push_record_section(&mut out, "## Watchlist", &snapshot.watchlist, |r| {
            format!(
                "| {} | {} | {} | {} |",
                r.symbol,
                format_usd(r.price_usd),
                format_volume(r.volume_24h),
                format_percent(r.price_change_24h)
            )
        });

        out
    }

    pub fn alerts_markdown(alerts: &[AlertEvent]) -> String {
        let mut out = String::new();
        out.push_str("# Market Alerts\n\n");

        if alerts.is_empty() {
            out.push_str("No active alerts.\n");
            return out;
        }

        for alert_type in ALERT_DISPLAY_ORDER {
            let group: Vec<&AlertEvent> =
                alerts.iter().filter(|a| a.alert_type == alert_type).collect();
            if group.is_empty() {
                continue;
            }

            out.push_str(&format!("## {}\n\n", group_heading(alert_type)));
            for alert in group {
                out.push_str(&format!(
                    "- **{}** [{}] {} (value: {:.2}, threshold: {:.2})\n",
                    alert.symbol,
                    alert.severity.as_str(),
                    alert.message,
                    alert.value,
                    alert.threshold
                ));
            }
            out.push('\n');
        }

        out
    }

    pub fn snapshot_json(snapshot: &MarketSnapshot) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(snapshot)
    }

    pub fn alerts_json(alerts: &[AlertEvent]) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(alerts)
    }
}

fn push_record_section<F>(
    out: &mut String,
    heading: &str,
    records: &[crate::domain::model::TokenRecord],
    row: F,
) where
    F: Fn(&crate::domain::model::TokenRecord) -> String,
{
    if records.is_empty() {
        return;
    }
    out.push_str(heading);
    out.push_str("\n\n");
    for record in records {
        out.push_str(&row(record));
        out.push('\n');
    }
    out.push('\n');
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
