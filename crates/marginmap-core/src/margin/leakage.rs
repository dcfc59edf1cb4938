//! Revenue foregone through discounts and returns.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::*;

/// Discount and return leakage relative to undiscounted, no-return revenue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeakageSummary {
    pub discount_leakage: Money,
    pub return_leakage: Money,
    pub total_leakage: Money,
    pub leakage_percent: Percent,
}

/// Sum leakage over the set.
///
/// Discounts apply to every sold unit, including units later returned, so
/// discount leakage is taken over gross quantity. Returned units are valued
/// at full list price. The percent is against potential revenue: gross
/// quantity at undiscounted price.
pub fn calculate_leakage<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> LeakageSummary {
    let mut discount_leakage = Decimal::ZERO;
    let mut return_leakage = Decimal::ZERO;
    let mut potential_revenue = Decimal::ZERO;

    for t in transactions {
        discount_leakage += t.qty_sold * t.unit_discount;
        return_leakage += t.returned_units * t.unit_price;
        potential_revenue += t.qty_sold * t.unit_price;
    }

    let total_leakage = discount_leakage + return_leakage;
    let leakage_percent = pct(total_leakage, potential_revenue);

    LeakageSummary {
        discount_leakage: round_money(discount_leakage),
        return_leakage: round_money(return_leakage),
        total_leakage: round_money(total_leakage),
        leakage_percent: round_percent(leakage_percent),
    }
}
