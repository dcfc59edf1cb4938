//! In-memory snapshot of the transaction store.
//!
//! Every analytics call reads from a `Dataset` snapshot; nothing in the
//! engine mutates it. The business type travels with the snapshot instead of
//! living in process-global state, so each aggregation is referentially
//! transparent.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::expenses::ExpenseLedger;
use crate::types::*;

/// Serde-friendly construction form: raw rows as the ingestion collaborator
/// hands them over.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetInput {
    #[serde(default)]
    pub business_type: BusinessType,
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub expense_categories: Vec<ExpenseCategory>,
    #[serde(default)]
    pub expenses: Vec<TransactionExpense>,
    #[serde(default)]
    pub benchmarks: Vec<MarginBenchmark>,
}

/// Snapshot the engine computes over.
#[derive(Debug, Clone)]
pub struct Dataset {
    business_type: BusinessType,
    transactions: Vec<Transaction>,
    expense_ledger: ExpenseLedger,
    benchmarks: Vec<MarginBenchmark>,
}

impl Dataset {
    /// Build the snapshot, grouping expenses by transaction once up front.
    pub fn new(
        business_type: BusinessType,
        transactions: Vec<Transaction>,
        expense_categories: Vec<ExpenseCategory>,
        expenses: Vec<TransactionExpense>,
        benchmarks: Vec<MarginBenchmark>,
    ) -> Self {
        let expense_ledger = ExpenseLedger::build(&expense_categories, &expenses);
        Self {
            business_type,
            transactions,
            expense_ledger,
            benchmarks,
        }
    }

    pub fn business_type(&self) -> BusinessType {
        self.business_type
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn expense_ledger(&self) -> &ExpenseLedger {
        &self.expense_ledger
    }

    pub fn benchmarks(&self) -> &[MarginBenchmark] {
        &self.benchmarks
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn for_sku(&self, sku_code: &str) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|t| t.sku_code == sku_code)
            .collect()
    }

    pub fn for_customer(&self, customer_name: &str) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|t| t.customer_name == customer_name)
            .collect()
    }

    pub fn in_range(&self, range: &DateRange) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|t| range.contains(t.date))
            .collect()
    }

    /// Distinct SKU codes, sorted for deterministic sweeps.
    pub fn sku_codes(&self) -> Vec<String> {
        self.transactions
            .iter()
            .map(|t| t.sku_code.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct customer names, sorted.
    pub fn customer_names(&self) -> Vec<String> {
        self.transactions
            .iter()
            .map(|t| t.customer_name.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct regions, sorted. Transactions without a region are skipped.
    pub fn regions(&self) -> Vec<String> {
        self.transactions
            .iter()
            .filter_map(|t| t.region.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl From<DatasetInput> for Dataset {
    fn from(input: DatasetInput) -> Self {
        Dataset::new(
            input.business_type,
            input.transactions,
            input.expense_categories,
            input.expenses,
            input.benchmarks,
        )
    }
}
