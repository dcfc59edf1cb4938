//! Gross margin extended with attributed operating expenses.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::expenses::ExpenseLedger;
use crate::types::*;

/// One expense category's contribution across the aggregated set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseBreakdownEntry {
    pub name: String,
    pub business_type: BusinessType,
    pub total: Money,
}

/// Margin figures net of attributed operating expenses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnhancedMarginSummary {
    pub revenue: Money,
    pub cogs: Money,
    pub total_expenses: Money,
    pub expense_breakdown: BTreeMap<String, ExpenseBreakdownEntry>,
    pub gross_profit: Money,
    pub net_profit: Money,
    pub gross_margin_percent: Percent,
    pub net_margin_percent: Percent,
    pub total_units: Qty,
}

/// Gross margin plus the expense ledger's per-transaction totals, rolled up
/// into net profit and net margin. Keyed breakdown is by category code.
pub fn calculate_enhanced_margin<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    ledger: &ExpenseLedger,
) -> EnhancedMarginSummary {
    let mut revenue = Decimal::ZERO;
    let mut cogs = Decimal::ZERO;
    let mut total_units = Decimal::ZERO;
    let mut total_expenses = Decimal::ZERO;
    let mut expense_breakdown: BTreeMap<String, ExpenseBreakdownEntry> = BTreeMap::new();

    for t in transactions {
        let net_qty = t.net_qty();
        revenue += net_qty * t.net_price();
        cogs += net_qty * t.unit_cost;
        total_units += net_qty;

        for expense in ledger.breakdown_for(t.id) {
            total_expenses += expense.amount;
            expense_breakdown
                .entry(expense.code.clone())
                .and_modify(|e| e.total += expense.amount)
                .or_insert_with(|| ExpenseBreakdownEntry {
                    name: expense.name.clone(),
                    business_type: expense.business_type,
                    total: expense.amount,
                });
        }
    }

    let gross_profit = revenue - cogs;
    let net_profit = gross_profit - total_expenses;

    for entry in expense_breakdown.values_mut() {
        entry.total = round_money(entry.total);
    }

    EnhancedMarginSummary {
        revenue: round_money(revenue),
        cogs: round_money(cogs),
        total_expenses: round_money(total_expenses),
        expense_breakdown,
        gross_profit: round_money(gross_profit),
        net_profit: round_money(net_profit),
        gross_margin_percent: round_percent(pct(gross_profit, revenue)),
        net_margin_percent: round_percent(pct(net_profit, revenue)),
        total_units: round_units(total_units),
    }
}
