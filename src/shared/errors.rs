//! Error handling for the application

use thiserror::Error;

/// Market-data errors
#[derive(Error, Debug)]
pub enum MarketError {
    #[error("API request failed: {0}")]
    ApiError(String),

    #[error("Unexpected response shape: {0}")]
    InvalidResponse(String),

    #[error("Market data source returned no usable records")]
    EmptyBatch,
}

/// Quote-related errors
#[derive(Error, Debug)]
pub enum QuoteError {
    #[error("Unknown token symbol: {0}")]
    UnknownToken(String),

    #[error("No route available for pair {sell}/{buy}")]
    NoRoute { sell: String, buy: String },

    #[error("Quote API request failed: {0}")]
    ApiError(String),

    #[error("Unexpected quote response: {0}")]
    InvalidResponse(String),
}

/// Report-related errors
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to write report: {0}")]
    WriteFailed(String),

    #[error("Invalid report destination: {0}")]
    InvalidDestination(String),
}

/// General application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Market data error: {0}")]
    MarketError(String),

    #[error("Quote error: {0}")]
    QuoteError(String),

    #[error("Report error: {0}")]
    ReportError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<MarketError> for AppError {
    fn from(err: MarketError) -> Self {
        AppError::MarketError(err.to_string())
    }
}

impl From<QuoteError> for AppError {
    fn from(err: QuoteError) -> Self {
        AppError::QuoteError(err.to_string())
    }
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        AppError::ReportError(err.to_string())
    }
}
