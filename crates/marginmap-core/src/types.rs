use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{MarginMapError, MarginMapResult};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Percentages on a 0–100 scale (55.84 = 55.84%). Never as fractions.
pub type Percent = Decimal;

/// Unit quantities. Decimal so fractional units survive dirty source data.
pub type Qty = Decimal;

/// Business classification governing which expense categories and margin
/// benchmarks apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessType {
    #[default]
    Manufacturer,
    Wholesaler,
    Retailer,
    Other,
}

impl std::fmt::Display for BusinessType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Manufacturer => "manufacturer",
            Self::Wholesaler => "wholesaler",
            Self::Retailer => "retailer",
            Self::Other => "other",
        };
        write!(f, "{}", s)
    }
}

/// A single sales transaction. Immutable fact row once ingested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub id: u64,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_id: Option<String>,
    pub customer_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payer_name: Option<String>,
    pub sku_code: String,
    pub sku_name: String,
    pub category: String,
    pub qty_sold: Qty,
    pub unit_cost: Money,
    pub unit_price: Money,
    #[serde(default)]
    pub unit_discount: Money,
    #[serde(default)]
    pub returned_units: Qty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl Transaction {
    /// Quantity sold minus returned units. Not clamped: an over-returned row
    /// contributes a negative quantity to downstream sums.
    pub fn net_qty(&self) -> Qty {
        self.qty_sold - self.returned_units
    }

    /// Unit price minus unit discount: the realized per-unit price.
    pub fn net_price(&self) -> Money {
        self.unit_price - self.unit_discount
    }
}

/// Named classification of operating cost, scoped to a business type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseCategory {
    pub id: u64,
    pub code: String,
    pub name: String,
    pub business_type: BusinessType,
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

/// Operating expense attributed to a single transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionExpense {
    pub transaction_id: u64,
    pub category_id: u64,
    pub amount: Money,
}

/// Target margin range for a category under a given business type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarginBenchmark {
    pub category: String,
    pub business_type: BusinessType,
    pub target_margin_min: Percent,
    pub target_margin_max: Percent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry_average: Option<Percent>,
}

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> MarginMapResult<Self> {
        if start > end {
            return Err(MarginMapError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Trailing window of `days` ending at `end`, both dates inclusive.
    pub fn trailing_days(days: i64, end: NaiveDate) -> Self {
        Self {
            start: end - chrono::Duration::days(days),
            end,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Round a currency amount to 2 decimal places (banker's rounding).
pub fn round_money(value: Money) -> Money {
    value.round_dp(2)
}

/// Round a percentage to 2 decimal places.
pub fn round_percent(value: Percent) -> Percent {
    value.round_dp(2)
}

/// Round a unit total to the nearest whole unit.
pub fn round_units(value: Qty) -> Qty {
    value.round_dp(0)
}

/// `numerator / denominator × 100`, or zero when the denominator is not
/// positive. Every ratio in the engine goes through this guard so no
/// division-by-zero condition can escape into results.
pub fn pct(numerator: Decimal, denominator: Decimal) -> Percent {
    if denominator <= Decimal::ZERO {
        Decimal::ZERO
    } else {
        numerator / denominator * Decimal::ONE_HUNDRED
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_net_qty_not_clamped() {
        let t = Transaction {
            id: 1,
            date: d(2024, 3, 1),
            invoice_id: None,
            customer_name: "Acme".into(),
            payer_name: None,
            sku_code: "SKU-1".into(),
            sku_name: "Widget".into(),
            category: "Widgets".into(),
            qty_sold: dec!(3),
            unit_cost: dec!(1),
            unit_price: dec!(2),
            unit_discount: dec!(0),
            returned_units: dec!(5),
            region: None,
        };
        assert_eq!(t.net_qty(), dec!(-2));
    }

    #[test]
    fn test_date_range_rejects_inverted() {
        let err = DateRange::new(d(2024, 5, 1), d(2024, 4, 1)).unwrap_err();
        assert!(matches!(err, MarginMapError::InvalidDateRange { .. }));
    }

    #[test]
    fn test_date_range_inclusive() {
        let range = DateRange::new(d(2024, 1, 1), d(2024, 1, 31)).unwrap();
        assert!(range.contains(d(2024, 1, 1)));
        assert!(range.contains(d(2024, 1, 31)));
        assert!(!range.contains(d(2024, 2, 1)));
    }

    #[test]
    fn test_pct_zero_denominator() {
        assert_eq!(pct(dec!(10), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(pct(dec!(10), dec!(-5)), Decimal::ZERO);
    }

    #[test]
    fn test_pct_scale() {
        assert_eq!(pct(dec!(1), dec!(4)), dec!(25));
    }
}
