pub mod benchmark;
pub mod dataset;
pub mod error;
pub mod expenses;
pub mod margin;
pub mod profitability;
pub mod types;

#[cfg(feature = "recommend")]
pub mod recommend;

#[cfg(feature = "dashboard")]
pub mod dashboard;

pub use dataset::{Dataset, DatasetInput};
pub use error::MarginMapError;
pub use types::*;

/// Standard result type for all margin-analytics operations
pub type MarginMapResult<T> = Result<T, MarginMapError>;
