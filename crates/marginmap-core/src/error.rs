use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MarginMapError {
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Persistence failure: {0}")]
    Persistence(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for MarginMapError {
    fn from(e: serde_json::Error) -> Self {
        MarginMapError::Serialization(e.to_string())
    }
}
