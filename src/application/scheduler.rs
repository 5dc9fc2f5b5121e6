//! Timer adapter driving the snapshot/alert pipeline

use std::time::Duration;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{error, info};

use crate::domain::model::DetectorState;
use crate::infrastructure::report_store::ReportStore;
use crate::report::{ReportFormat, ReportGenerator};
use crate::shared::errors::AppError;

use super::services::MarketService;

/// Schedule settings for the monitoring loop
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub alert_interval: Duration,
    pub snapshot_interval: Duration,
    pub save_reports: bool,
}

/// Sequential monitoring loop.
///
/// One cycle runs at a time; a tick that fires while a cycle is still in
/// flight is skipped, which keeps the detector state single-writer. Cycle
/// errors are logged and the schedule continues.
pub struct MonitorLoop {
    service: MarketService,
    store: ReportStore,
    format: ReportFormat,
    config: MonitorConfig,
    state: DetectorState,
}

impl MonitorLoop {
    pub fn new(
        service: MarketService,
        store: ReportStore,
        format: ReportFormat,
        config: MonitorConfig,
    ) -> Self {
        Self {
            service,
            store,
            format,
            config,
            state: DetectorState::new(),
        }
    }

    pub async fn run(&mut self) -> Result<(), AppError> {
        info!(
            "Monitoring every {}s, snapshot every {}s",
            self.config.alert_interval.as_secs(),
            self.config.snapshot_interval.as_secs()
        );

        let mut ticker = interval(self.config.alert_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut last_snapshot: Option<Instant> = None;

        loop {
            ticker.tick().await;

            if let Err(e) = self.alert_cycle().await {
                error!("Alert cycle failed, skipping: {}", e);
            }

            let snapshot_due = last_snapshot
                .map(|t| t.elapsed() >= self.config.snapshot_interval)
                .unwrap_or(true);
            if snapshot_due {
                match self.snapshot_cycle().await {
                    Ok(()) => last_snapshot = Some(Instant::now()),
                    Err(e) => error!("Snapshot cycle failed, skipping: {}", e),
                }
            }
        }
    }

    async fn alert_cycle(&mut self) -> Result<(), AppError> {
        let alerts = self.service.scan_alerts(&mut self.state).await?;
        if alerts.is_empty() {
            return Ok(());
        }

        let text = match self.format {
            ReportFormat::Markdown => ReportGenerator::alerts_markdown(&alerts),
            ReportFormat::Json => ReportGenerator::alerts_json(&alerts)
                .map_err(|e| AppError::ReportError(e.to_string()))?,
        };
        println!("{}", text);

        if self.config.save_reports {
            self.store.save(&text, "alerts", self.format, None)?;
        }
        Ok(())
    }

    async fn snapshot_cycle(&mut self) -> Result<(), AppError> {
        let snapshot = self.service.snapshot().await?;
        let text = match self.format {
            ReportFormat::Markdown => ReportGenerator::snapshot_markdown(&snapshot),
            ReportFormat::Json => ReportGenerator::snapshot_json(&snapshot)
                .map_err(|e| AppError::ReportError(e.to_string()))?,
        };
        println!("{}", text);

        if self.config.save_reports {
            self.store.save(&text, "snapshot", self.format, None)?;
        }
        Ok(())
    }
}
