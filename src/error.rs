//! Error types shared by the loaders and the calculation engine

use thiserror::Error;

/// Errors surfaced by the pension forecast engine
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Caller supplied values outside the accepted domain
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Parameters or indicator datasets cannot serve the request
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A numeric or textual cell could not be parsed
    #[error("parse error: {0}")]
    Parse(String),
}

impl ForecastError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        ForecastError::InvalidInput(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        ForecastError::Configuration(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, ForecastError>;
