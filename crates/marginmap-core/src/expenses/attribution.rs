//! Per-transaction operating-expense attribution.
//!
//! Expenses are grouped by transaction id once, up front, so the aggregation
//! passes never issue a per-row lookup against raw expense rows.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::*;

/// Expense amount attributed to one category for one transaction, already
/// summed across that category's rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryExpense {
    pub code: String,
    pub name: String,
    pub business_type: BusinessType,
    pub amount: Money,
}

/// Total attributable operating expense for a transaction, with the
/// per-category breakdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseTotal {
    pub total: Money,
    pub breakdown: Vec<CategoryExpense>,
}

/// Expenses pre-grouped by transaction id.
#[derive(Debug, Clone, Default)]
pub struct ExpenseLedger {
    by_transaction: HashMap<u64, ExpenseTotal>,
}

impl ExpenseLedger {
    /// Ledger with no expense rows. Enhanced-margin figures collapse to the
    /// gross figures against an empty ledger.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Group expense rows by transaction, resolving category metadata.
    /// Rows pointing at an unknown category are dropped; the ingestion
    /// collaborator's normalization contract treats them as dirty data.
    pub fn build(categories: &[ExpenseCategory], expenses: &[TransactionExpense]) -> Self {
        let by_id: HashMap<u64, &ExpenseCategory> =
            categories.iter().map(|c| (c.id, c)).collect();

        let mut by_transaction: HashMap<u64, ExpenseTotal> = HashMap::new();
        for row in expenses {
            let Some(category) = by_id.get(&row.category_id) else {
                continue;
            };
            let entry = by_transaction.entry(row.transaction_id).or_default();
            entry.total += row.amount;
            match entry
                .breakdown
                .iter_mut()
                .find(|b| b.code == category.code)
            {
                Some(existing) => existing.amount += row.amount,
                None => entry.breakdown.push(CategoryExpense {
                    code: category.code.clone(),
                    name: category.name.clone(),
                    business_type: category.business_type,
                    amount: row.amount,
                }),
            }
        }

        Self { by_transaction }
    }

    pub fn is_empty(&self) -> bool {
        self.by_transaction.is_empty()
    }

    /// Total attributable expense for one transaction, zero if none recorded.
    pub fn total_for(&self, transaction_id: u64) -> Money {
        self.by_transaction
            .get(&transaction_id)
            .map(|e| e.total)
            .unwrap_or(Decimal::ZERO)
    }

    /// Per-category breakdown for one transaction.
    pub fn breakdown_for(&self, transaction_id: u64) -> &[CategoryExpense] {
        self.by_transaction
            .get(&transaction_id)
            .map(|e| e.breakdown.as_slice())
            .unwrap_or(&[])
    }

    /// Total plus breakdown, as one value.
    pub fn transaction_expenses(&self, transaction_id: u64) -> ExpenseTotal {
        self.by_transaction
            .get(&transaction_id)
            .cloned()
            .unwrap_or_default()
    }
}

/// Active expense categories for a business type, sorted by display name.
pub fn expense_categories(
    categories: &[ExpenseCategory],
    business_type: BusinessType,
) -> Vec<&ExpenseCategory> {
    let mut matching: Vec<&ExpenseCategory> = categories
        .iter()
        .filter(|c| c.active && c.business_type == business_type)
        .collect();
    matching.sort_by(|a, b| a.name.cmp(&b.name));
    matching
}
