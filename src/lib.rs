//! Starkpulse - Starknet market-data aggregation and alerting agent

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod report;
pub mod shared;

// Re-export main types for convenience
pub use domain::alerts::AlertDetector;
pub use domain::model::{DetectorState, MarketSnapshot, TokenRecord};
pub use domain::snapshot::SnapshotAggregator;
pub use report::ReportGenerator;
