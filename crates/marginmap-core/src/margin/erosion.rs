//! Margin erosion: how much discounts, returns, and operating expenses eat
//! into realized revenue.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::dataset::Dataset;
use crate::expenses::ExpenseLedger;
use crate::margin::enhanced::ExpenseBreakdownEntry;
use crate::types::*;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscountErosion {
    pub amount: Money,
    pub percent: Percent,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReturnErosion {
    pub amount: Money,
    pub percent: Percent,
    /// Returned units over gross units moved: returns / (net + returns).
    pub rate: Percent,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseErosion {
    pub amount: Money,
    pub percent: Percent,
    pub breakdown: BTreeMap<String, ExpenseBreakdownEntry>,
}

/// The three erosion channels over one transaction set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErosionFactors {
    pub discounts: DiscountErosion,
    pub returns: ReturnErosion,
    pub expenses: ExpenseErosion,
}

/// One ranked erosion channel in the portfolio summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErosionSource {
    pub source: String,
    pub amount: Money,
    pub percent: Percent,
}

/// Portfolio-wide erosion roll-up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErosionSummary {
    pub business_type: BusinessType,
    pub total_revenue: Money,
    pub factors: ErosionFactors,
    /// Channels ranked by dollar amount, largest first.
    pub top_sources: Vec<ErosionSource>,
}

/// Erosion channels for an entity-level subset (SKU detail reports).
///
/// Return percent here is against revenue-plus-return-value, i.e. the share
/// of recoverable revenue lost to returns.
pub fn erosion_factors<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    ledger: &ExpenseLedger,
) -> ErosionFactors {
    let mut revenue = Decimal::ZERO;
    let mut net_units = Decimal::ZERO;
    let mut discount_amount = Decimal::ZERO;
    let mut returned_units = Decimal::ZERO;
    let mut return_value = Decimal::ZERO;
    let mut expense_amount = Decimal::ZERO;
    let mut breakdown: BTreeMap<String, ExpenseBreakdownEntry> = BTreeMap::new();

    for t in transactions {
        revenue += t.net_qty() * t.net_price();
        net_units += t.net_qty();
        discount_amount += t.qty_sold * t.unit_discount;
        returned_units += t.returned_units;
        return_value += t.returned_units * t.unit_price;

        for expense in ledger.breakdown_for(t.id) {
            expense_amount += expense.amount;
            breakdown
                .entry(expense.code.clone())
                .and_modify(|e| e.total += expense.amount)
                .or_insert_with(|| ExpenseBreakdownEntry {
                    name: expense.name.clone(),
                    business_type: expense.business_type,
                    total: expense.amount,
                });
        }
    }

    for entry in breakdown.values_mut() {
        entry.total = round_money(entry.total);
    }

    ErosionFactors {
        discounts: DiscountErosion {
            amount: round_money(discount_amount),
            percent: round_percent(pct(discount_amount, revenue)),
        },
        returns: ReturnErosion {
            amount: round_money(return_value),
            percent: round_percent(pct(return_value, revenue + return_value)),
            rate: round_percent(pct(returned_units, net_units + returned_units)),
        },
        expenses: ExpenseErosion {
            amount: round_money(expense_amount),
            percent: round_percent(pct(expense_amount, revenue)),
            breakdown,
        },
    }
}

/// Cross-portfolio erosion summary: all channels against total realized
/// revenue, ranked by dollar amount.
pub fn margin_erosion_summary(dataset: &Dataset) -> ErosionSummary {
    let ledger = dataset.expense_ledger();
    let mut revenue = Decimal::ZERO;
    let mut discounts = Decimal::ZERO;
    let mut returns = Decimal::ZERO;
    let mut expenses = Decimal::ZERO;
    let mut breakdown: BTreeMap<String, ExpenseBreakdownEntry> = BTreeMap::new();

    for t in dataset.transactions() {
        revenue += t.net_qty() * t.net_price();
        discounts += t.qty_sold * t.unit_discount;
        returns += t.returned_units * t.unit_price;

        for expense in ledger.breakdown_for(t.id) {
            expenses += expense.amount;
            breakdown
                .entry(expense.code.clone())
                .and_modify(|e| e.total += expense.amount)
                .or_insert_with(|| ExpenseBreakdownEntry {
                    name: expense.name.clone(),
                    business_type: expense.business_type,
                    total: expense.amount,
                });
        }
    }

    for entry in breakdown.values_mut() {
        entry.total = round_money(entry.total);
    }

    let factors = ErosionFactors {
        discounts: DiscountErosion {
            amount: round_money(discounts),
            percent: round_percent(pct(discounts, revenue)),
        },
        returns: ReturnErosion {
            amount: round_money(returns),
            percent: round_percent(pct(returns, revenue)),
            rate: Decimal::ZERO,
        },
        expenses: ExpenseErosion {
            amount: round_money(expenses),
            percent: round_percent(pct(expenses, revenue)),
            breakdown,
        },
    };

    let mut top_sources = vec![
        ErosionSource {
            source: "Discounts".into(),
            amount: factors.discounts.amount,
            percent: factors.discounts.percent,
        },
        ErosionSource {
            source: "Returns".into(),
            amount: factors.returns.amount,
            percent: factors.returns.percent,
        },
        ErosionSource {
            source: "Operating Expenses".into(),
            amount: factors.expenses.amount,
            percent: factors.expenses.percent,
        },
    ];
    top_sources.sort_by(|a, b| b.amount.cmp(&a.amount));

    ErosionSummary {
        business_type: dataset.business_type(),
        total_revenue: round_money(revenue),
        factors,
        top_sources,
    }
}
