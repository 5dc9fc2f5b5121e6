//! Domain layer - market data model, aggregation, and alert detection

pub mod alerts;
pub mod model;
pub mod snapshot;

pub use alerts::{AlertDetector, DetectorConfig};
pub use model::{AlertEvent, AlertType, DetectorState, MarketSnapshot, Severity, TokenRecord};
pub use snapshot::SnapshotAggregator;
