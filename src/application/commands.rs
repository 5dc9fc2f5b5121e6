//! CLI commands and handlers

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::application::scheduler::{MonitorConfig, MonitorLoop};
use crate::application::services::{estimate_dca, MarketService};
use crate::domain::model::DetectorState;
use crate::infrastructure::dexscreener::DexScreenerClient;
use crate::infrastructure::quote_api::AvnuQuoteClient;
use crate::infrastructure::report_store::ReportStore;
use crate::report::{ReportFormat, ReportGenerator};
use crate::shared::config::Config;
use crate::shared::errors::AppError;

#[derive(Parser)]
#[command(name = "starkpulse")]
#[command(version, about = "Starknet market-data aggregation and alerting agent")]
pub struct Cli {
    /// Path to config file (defaults are used when omitted)
    #[arg(long)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a ranked market snapshot
    Snapshot {
        /// Write the report under the configured output directory
        #[arg(long)]
        save: bool,

        /// Explicit destination path (implies --save)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Emit machine-readable JSON instead of markdown
        #[arg(long)]
        json: bool,
    },

    /// Run a one-shot alert scan against an empty baseline
    Alerts {
        /// Emit machine-readable JSON instead of markdown
        #[arg(long)]
        json: bool,
    },

    /// Poll on a timer, printing and saving snapshot/alert reports
    Watch {
        /// Seconds between alert scans (overrides config)
        #[arg(short, long)]
        interval: Option<u64>,

        /// Stop after this many seconds (runs forever when omitted)
        #[arg(short, long)]
        duration: Option<u64>,

        /// Poll the secondary pair feed instead of the aggregator API
        #[arg(long)]
        secondary: bool,

        /// Do not write reports to disk
        #[arg(long)]
        no_save: bool,
    },

    /// Estimate a recurring buy split into equal orders
    DcaEstimate {
        /// Symbol of the token to sell
        #[arg(long)]
        sell: String,

        /// Symbol of the token to buy
        #[arg(long)]
        buy: String,

        /// Sell amount per order, in whole tokens
        #[arg(long)]
        amount: f64,

        /// Number of orders in the schedule
        #[arg(long, default_value_t = 4)]
        orders: u32,
    },

    /// Show resolved configuration
    Status {
        /// Include the token registry and thresholds
        #[arg(short, long)]
        detailed: bool,
    },
}

pub struct CommandExecutor;

impl CommandExecutor {
    /// Execute the selected command
    pub async fn execute(command: Commands, config: Config) -> Result<(), AppError> {
        match command {
            Commands::Snapshot { save, output, json } => {
                Self::execute_snapshot(save, output, json, config).await
            }
            Commands::Alerts { json } => Self::execute_alerts(json, config).await,
            Commands::Watch {
                interval,
                duration,
                secondary,
                no_save,
            } => Self::execute_watch(interval, duration, secondary, no_save, config).await,
            Commands::DcaEstimate {
                sell,
                buy,
                amount,
                orders,
            } => Self::execute_dca_estimate(sell, buy, amount, orders, config).await,
            Commands::Status { detailed } => Self::execute_status(detailed, config),
        }
    }

    async fn execute_snapshot(
        save: bool,
        output: Option<PathBuf>,
        json: bool,
        config: Config,
    ) -> Result<(), AppError> {
        let format = if json {
            ReportFormat::Json
        } else {
            config.report.format.parse()?
        };
        let store = ReportStore::new(&config.report.output_dir);
        let service = MarketService::new(config);

        let snapshot = service.snapshot().await?;
        let text = match format {
            ReportFormat::Markdown => ReportGenerator::snapshot_markdown(&snapshot),
            ReportFormat::Json => ReportGenerator::snapshot_json(&snapshot)
                .map_err(|e| AppError::ReportError(e.to_string()))?,
        };
        println!("{}", text);

        if save || output.is_some() {
            let path = store.save(&text, "snapshot", format, output.as_deref())?;
            info!("Snapshot saved to {}", path.display());
        }
        Ok(())
    }

    async fn execute_alerts(json: bool, config: Config) -> Result<(), AppError> {
        let format = if json {
            ReportFormat::Json
        } else {
            config.report.format.parse()?
        };
        let service = MarketService::new(config);

        let mut state = DetectorState::new();
        let alerts = service.scan_alerts(&mut state).await?;
        let text = match format {
            ReportFormat::Markdown => ReportGenerator::alerts_markdown(&alerts),
            ReportFormat::Json => ReportGenerator::alerts_json(&alerts)
                .map_err(|e| AppError::ReportError(e.to_string()))?,
        };
        println!("{}", text);
        Ok(())
    }

    async fn execute_watch(
        interval: Option<u64>,
        duration: Option<u64>,
        secondary: bool,
        no_save: bool,
        config: Config,
    ) -> Result<(), AppError> {
        let format: ReportFormat = config.report.format.parse()?;
        let store = ReportStore::new(&config.report.output_dir);

        let monitor_config = MonitorConfig {
            alert_interval: Duration::from_secs(
                interval.unwrap_or(config.schedule.alert_interval_secs),
            ),
            snapshot_interval: Duration::from_secs(config.schedule.snapshot_interval_secs),
            save_reports: !no_save,
        };

        let service = if secondary {
            // The pair feed is polled for the registered token addresses
            let addresses: Vec<String> =
                config.tokens.iter().map(|t| t.address.clone()).collect();
            if addresses.is_empty() {
                return Err(AppError::ConfigError(
                    "secondary feed needs at least one registered token".to_string(),
                ));
            }
            let client = DexScreenerClient::new(
                config.network.secondary_chain_id.clone(),
                addresses,
            );
            MarketService::with_source(config, Arc::new(client))
        } else {
            MarketService::new(config)
        };

        let mut monitor = MonitorLoop::new(service, store, format, monitor_config);
        match duration {
            Some(secs) => {
                info!("Monitoring for {} seconds", secs);
                let run = monitor.run();
                match tokio::time::timeout(Duration::from_secs(secs), run).await {
                    Ok(result) => result,
                    Err(_) => {
                        info!("Monitoring window elapsed");
                        Ok(())
                    }
                }
            }
            None => monitor.run().await,
        }
    }

    async fn execute_dca_estimate(
        sell: String,
        buy: String,
        amount: f64,
        orders: u32,
        config: Config,
    ) -> Result<(), AppError> {
        let quotes = AvnuQuoteClient::new(config.network.quote_api_url.clone());
        let estimate = estimate_dca(&config, &quotes, &sell, &buy, amount, orders).await?;

        println!("DCA estimate: {} -> {}", estimate.sell_symbol, estimate.buy_symbol);
        println!(
            "  {} orders of {} {}",
            estimate.orders, estimate.amount_per_order, estimate.sell_symbol
        );
        println!(
            "  Expected per order: {:.6} {}",
            estimate.buy_per_order, estimate.buy_symbol
        );
        println!(
            "  Expected total:     {:.6} {}",
            estimate.buy_total, estimate.buy_symbol
        );
        match estimate.fee_total_usd {
            Some(fee) => println!("  Estimated fees:     ${:.2}", fee),
            None => warn!("Quote API reported no fee estimate"),
        }
        Ok(())
    }

    fn execute_status(detailed: bool, config: Config) -> Result<(), AppError> {
        info!("starkpulse {}", env!("CARGO_PKG_VERSION"));
        info!("Network: {}", config.network.name);
        info!("Market API: {}", config.network.market_api_url);
        info!("Quote API: {}", config.network.quote_api_url);
        info!(
            "Schedule: alerts every {}s, snapshots every {}s",
            config.schedule.alert_interval_secs, config.schedule.snapshot_interval_secs
        );

        if detailed {
            info!(
                "Thresholds: price {:.1}%, volume spike {:.1}%",
                config.alerts.price_change_threshold, config.alerts.volume_spike_threshold
            );
            info!("Watchlist: {}", config.watchlist.join(", "));
            for token in &config.tokens {
                info!("  {} ({} decimals) {}", token.symbol, token.decimals, token.address);
            }
        }
        Ok(())
    }
}
