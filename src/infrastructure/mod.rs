//! Infrastructure layer - external API clients and persistence

pub mod dexscreener;
pub mod market_api;
pub mod quote_api;
pub mod report_store;

pub use dexscreener::DexScreenerClient;
pub use market_api::{AvnuMarketClient, MarketDataSource};
pub use quote_api::{AvnuQuoteClient, QuoteSource};
pub use report_store::ReportStore;
