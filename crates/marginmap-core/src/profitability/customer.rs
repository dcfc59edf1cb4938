//! Customer-level profitability reports.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::dataset::Dataset;
use crate::margin::{
    calculate_enhanced_margin, calculate_gross_margin, calculate_leakage, EnhancedMarginSummary,
    LeakageSummary,
};
use crate::types::*;

/// A customer pays "under" a SKU when their average sits below this fraction
/// of the dataset-wide median realized price.
const UNDERPRICED_FRACTION: Decimal = dec!(0.98);

const TOP_SKU_LIMIT: usize = 5;
const UNDERPRICED_LIMIT: usize = 10;

/// Per-SKU rollup within one customer's purchases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkuRollup {
    pub sku_code: String,
    pub sku_name: String,
    pub category: String,
    pub revenue: Money,
    pub net_profit: Money,
    pub net_margin_percent: Percent,
}

/// A SKU this customer buys below the dataset-wide median realized price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnderpricedSku {
    pub sku_code: String,
    pub volume: Qty,
    pub customer_avg_paid: Money,
    pub global_avg_paid: Money,
    pub median_paid: Money,
    /// Revenue gained if this customer paid the median price.
    pub uplift_to_median: Money,
    pub margin_percent: Percent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerReport {
    pub customer_name: String,
    pub business_type: BusinessType,
    #[serde(flatten)]
    pub metrics: EnhancedMarginSummary,
    pub transaction_count: usize,
    pub leakage: LeakageSummary,
    pub top_skus_by_revenue: Vec<SkuRollup>,
    pub top_skus_by_margin: Vec<SkuRollup>,
    pub underpriced_skus: Vec<UnderpricedSku>,
    /// Uplift across every underpriced SKU, not just the listed ones.
    pub total_uplift_to_median: Money,
}

/// Median of the given observations. Zero for an empty set; the average of
/// the two middle values when the count is even.
pub fn median(mut values: Vec<Decimal>) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    values.sort();
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid]
    } else {
        (values[mid - 1] + values[mid]) / dec!(2)
    }
}

/// Full profitability report for one customer. None when the customer has no
/// transactions.
pub fn customer_profitability(dataset: &Dataset, customer_name: &str) -> Option<CustomerReport> {
    let transactions = dataset.for_customer(customer_name);
    if transactions.is_empty() {
        return None;
    }

    let ledger = dataset.expense_ledger();
    let metrics = calculate_enhanced_margin(transactions.iter().copied(), ledger);
    let leakage = calculate_leakage(transactions.iter().copied());

    let rollups = sku_rollups(&transactions, ledger);

    let mut top_skus_by_revenue = rollups.clone();
    top_skus_by_revenue.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    top_skus_by_revenue.truncate(TOP_SKU_LIMIT);

    let mut top_skus_by_margin = rollups;
    top_skus_by_margin.sort_by(|a, b| b.net_margin_percent.cmp(&a.net_margin_percent));
    top_skus_by_margin.truncate(TOP_SKU_LIMIT);

    let mut underpriced_skus = underpriced_skus(dataset, &transactions);
    let total_uplift_to_median =
        round_money(underpriced_skus.iter().map(|u| u.uplift_to_median).sum());
    underpriced_skus.truncate(UNDERPRICED_LIMIT);

    Some(CustomerReport {
        customer_name: customer_name.to_string(),
        business_type: dataset.business_type(),
        metrics,
        transaction_count: transactions.len(),
        leakage,
        top_skus_by_revenue,
        top_skus_by_margin,
        underpriced_skus,
        total_uplift_to_median,
    })
}

/// Reports for every customer, sorted by revenue descending.
pub fn all_customer_reports(dataset: &Dataset) -> Vec<CustomerReport> {
    let mut reports: Vec<CustomerReport> = dataset
        .customer_names()
        .iter()
        .filter_map(|name| customer_profitability(dataset, name))
        .collect();
    reports.sort_by(|a, b| b.metrics.revenue.cmp(&a.metrics.revenue));
    reports
}

fn sku_rollups(
    transactions: &[&Transaction],
    ledger: &crate::expenses::ExpenseLedger,
) -> Vec<SkuRollup> {
    let mut by_sku: BTreeMap<String, Vec<&Transaction>> = BTreeMap::new();
    for t in transactions {
        by_sku.entry(t.sku_code.clone()).or_default().push(t);
    }

    by_sku
        .into_iter()
        .map(|(sku_code, subset)| {
            let summary = calculate_enhanced_margin(subset.iter().copied(), ledger);
            SkuRollup {
                sku_code,
                sku_name: subset[0].sku_name.clone(),
                category: subset[0].category.clone(),
                revenue: summary.revenue,
                net_profit: summary.net_profit,
                net_margin_percent: summary.net_margin_percent,
            }
        })
        .collect()
}

/// SKUs where this customer's average realized price sits under 98% of the
/// dataset-wide median, sorted by uplift descending. Not truncated here so
/// the caller can total across the full set first.
fn underpriced_skus(dataset: &Dataset, transactions: &[&Transaction]) -> Vec<UnderpricedSku> {
    let mut by_sku: BTreeMap<String, Vec<&Transaction>> = BTreeMap::new();
    for t in transactions {
        by_sku.entry(t.sku_code.clone()).or_default().push(t);
    }

    let mut result: Vec<UnderpricedSku> = by_sku
        .into_iter()
        .filter_map(|(sku_code, subset)| {
            let all_rows = dataset.for_sku(&sku_code);
            // Each row's realized price is one observation, unweighted.
            let median_paid = median(all_rows.iter().map(|t| t.net_price()).collect());
            if median_paid <= Decimal::ZERO {
                return None;
            }

            let global_sold: Qty = all_rows.iter().map(|t| t.qty_sold).sum();
            let global_paid: Money = all_rows.iter().map(|t| t.net_price() * t.qty_sold).sum();
            let global_avg_paid = if global_sold > Decimal::ZERO {
                global_paid / global_sold
            } else {
                Decimal::ZERO
            };

            let volume: Qty = subset.iter().map(|t| t.qty_sold).sum();
            let paid: Money = subset.iter().map(|t| t.net_price() * t.qty_sold).sum();
            let customer_avg_paid = if volume > Decimal::ZERO {
                paid / volume
            } else {
                Decimal::ZERO
            };

            if customer_avg_paid >= median_paid * UNDERPRICED_FRACTION {
                return None;
            }

            let summary = calculate_gross_margin(subset.iter().copied());
            Some(UnderpricedSku {
                sku_code,
                volume,
                customer_avg_paid: round_money(customer_avg_paid),
                global_avg_paid: round_money(global_avg_paid),
                median_paid: round_money(median_paid),
                uplift_to_median: round_money((median_paid - customer_avg_paid) * volume),
                margin_percent: summary.gross_margin_percent,
            })
        })
        .collect();

    result.sort_by(|a, b| b.uplift_to_median.cmp(&a.uplift_to_median));
    result
}
