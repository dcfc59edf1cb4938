//! Heuristic recommendation engine: scans the dataset for margin problems
//! and emits dollar-quantified, prioritized improvement actions.

pub mod generator;
pub mod heuristics;
pub mod store;
pub mod thresholds;

pub use generator::{generate_recommendations, save_recommendations};
pub use store::{InMemoryRecommendationStore, RecommendationStore};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationCategory {
    Pricing,
    Discount,
    Returns,
    CostReduction,
    Manufacturing,
    Logistics,
    Marketing,
    CustomerPricing,
    Customer,
    Leakage,
    Region,
}

impl std::fmt::Display for RecommendationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pricing => "pricing",
            Self::Discount => "discount",
            Self::Returns => "returns",
            Self::CostReduction => "cost_reduction",
            Self::Manufacturing => "manufacturing",
            Self::Logistics => "logistics",
            Self::Marketing => "marketing",
            Self::CustomerPricing => "customer_pricing",
            Self::Customer => "customer",
            Self::Leakage => "leakage",
            Self::Region => "region",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationStatus {
    Open,
    Snoozed,
    Resolved,
    Archived,
}

impl std::fmt::Display for RecommendationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Open => "open",
            Self::Snoozed => "snoozed",
            Self::Resolved => "resolved",
            Self::Archived => "archived",
        };
        write!(f, "{}", s)
    }
}

/// A single generated recommendation. `id` and the timestamps are assigned by
/// the store when the batch is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub category: RecommendationCategory,
    pub issue_text: String,
    pub suggested_action: String,
    pub dollar_impact: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact_percent: Option<Percent>,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub status: RecommendationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Uniform priority tiering by dollar impact. $10,000 exactly is medium.
pub fn priority_for(dollar_impact: Decimal) -> Priority {
    if dollar_impact > thresholds::HIGH_PRIORITY_IMPACT {
        Priority::High
    } else if dollar_impact > thresholds::MEDIUM_PRIORITY_IMPACT {
        Priority::Medium
    } else {
        Priority::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_priority_boundaries() {
        assert_eq!(priority_for(dec!(10000.01)), Priority::High);
        assert_eq!(priority_for(dec!(10000)), Priority::Medium);
        assert_eq!(priority_for(dec!(5000.01)), Priority::Medium);
        assert_eq!(priority_for(dec!(5000)), Priority::Low);
        assert_eq!(priority_for(dec!(0)), Priority::Low);
    }

    #[test]
    fn test_category_wire_names() {
        assert_eq!(RecommendationCategory::CustomerPricing.to_string(), "customer_pricing");
        assert_eq!(
            serde_json::to_string(&RecommendationCategory::CostReduction).unwrap(),
            "\"cost_reduction\""
        );
    }
}
