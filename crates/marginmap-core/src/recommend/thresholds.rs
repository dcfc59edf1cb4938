//! Tuning constants for the recommendation heuristics.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::RecommendationCategory;
use crate::types::BusinessType;

// ---------------------------------------------------------------------------
// Trigger thresholds
// ---------------------------------------------------------------------------

/// Discount erosion percent above which a discount recommendation fires.
pub const DISCOUNT_EROSION_THRESHOLD: Decimal = dec!(10);

/// Return rate percent above which a returns recommendation fires.
pub const RETURN_RATE_THRESHOLD: Decimal = dec!(5);

/// Expense-to-revenue percent above which an expense recommendation fires.
pub const EXPENSE_RATIO_THRESHOLD: Decimal = dec!(15);

/// Margin points a customer must trail a SKU's average before a
/// customer-pricing recommendation fires.
pub const CUSTOMER_MARGIN_GAP_POINTS: Decimal = dec!(10);

/// Minimum customer revenue on a SKU before customer pricing is worth
/// renegotiating.
pub const CUSTOMER_PRICING_MIN_REVENUE: Decimal = dec!(1000);

/// Baseline blended customer margin used for the customer-level check.
pub const CUSTOMER_AVG_MARGIN_BASELINE: Decimal = dec!(50);

/// Points below the baseline before a customer-level recommendation fires.
pub const CUSTOMER_BLENDED_GAP_POINTS: Decimal = dec!(5);

/// Minimum total customer revenue for the blended-margin check.
pub const CUSTOMER_MIN_REVENUE: Decimal = dec!(5000);

/// Total customer leakage above which a leakage recommendation fires.
pub const LEAKAGE_THRESHOLD: Decimal = dec!(5000);

/// A region's return rate must exceed this multiple of the cross-region
/// average (strictly) to be flagged.
pub const REGION_RETURN_MULTIPLIER: Decimal = dec!(1.5);

// ---------------------------------------------------------------------------
// Recovery fractions applied to the eroded amount
// ---------------------------------------------------------------------------

pub const DISCOUNT_RECOVERY: Decimal = dec!(0.5);
pub const RETURNS_RECOVERY: Decimal = dec!(0.5);
pub const LEAKAGE_RECOVERY: Decimal = dec!(0.4);
pub const REGION_RETURNS_RECOVERY: Decimal = dec!(0.5);

// ---------------------------------------------------------------------------
// Priority tiers by dollar impact
// ---------------------------------------------------------------------------

pub const HIGH_PRIORITY_IMPACT: Decimal = dec!(10000);
pub const MEDIUM_PRIORITY_IMPACT: Decimal = dec!(5000);

/// Expense recommendations are framed per business type: which cost lever to
/// pull, and how much of the attributed expense is realistically recoverable.
pub fn expense_recovery(business_type: BusinessType) -> (RecommendationCategory, Decimal) {
    match business_type {
        BusinessType::Manufacturer => (RecommendationCategory::Manufacturing, dec!(0.30)),
        BusinessType::Wholesaler => (RecommendationCategory::Logistics, dec!(0.15)),
        BusinessType::Retailer => (RecommendationCategory::Marketing, dec!(0.20)),
        BusinessType::Other => (RecommendationCategory::CostReduction, dec!(0.20)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expense_recovery_by_business_type() {
        let (cat, frac) = expense_recovery(BusinessType::Manufacturer);
        assert_eq!(cat, RecommendationCategory::Manufacturing);
        assert_eq!(frac, dec!(0.30));

        let (cat, frac) = expense_recovery(BusinessType::Wholesaler);
        assert_eq!(cat, RecommendationCategory::Logistics);
        assert_eq!(frac, dec!(0.15));
    }
}
