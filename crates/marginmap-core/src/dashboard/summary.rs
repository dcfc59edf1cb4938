//! Portfolio dashboard: headline KPIs, problem lists, and a margin trend.
//!
//! Every call recomputes from the snapshot; no aggregate state is carried
//! between calls.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::benchmark::resolve_benchmark;
use crate::dataset::Dataset;
use crate::margin::{
    calculate_enhanced_margin, calculate_leakage, EnhancedMarginSummary, LeakageSummary,
};
use crate::profitability::BenchmarkStatus;
use crate::types::*;

const PROBLEM_LIST_LIMIT: usize = 5;
const DEFAULT_WINDOW_DAYS: i64 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendInterval {
    Daily,
    Monthly,
}

/// One bucket of the margin trend. `period` is "YYYY-MM-DD" for daily
/// buckets and "YYYY-MM" for monthly ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub period: String,
    pub revenue: Money,
    pub cogs: Money,
    pub gross_margin_percent: Percent,
    pub net_margin_percent: Percent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkuKpi {
    pub sku_code: String,
    pub sku_name: String,
    pub category: String,
    pub net_margin_percent: Percent,
    pub revenue: Money,
    pub total_expenses: Money,
    pub performance_status: BenchmarkStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerKpi {
    pub customer_name: String,
    pub net_margin_percent: Percent,
    pub revenue: Money,
    pub total_expenses: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardReport {
    pub business_type: BusinessType,
    pub range: DateRange,
    pub overview: EnhancedMarginSummary,
    pub leakage: LeakageSummary,
    pub worst_margin_skus: Vec<SkuKpi>,
    pub top_expense_skus: Vec<SkuKpi>,
    pub worst_margin_customers: Vec<CustomerKpi>,
    pub margin_trend: Vec<TrendPoint>,
}

/// Dashboard over the given window (default trailing 90 days ending today).
/// Every sub-aggregate is computed over the filtered subset only.
pub fn dashboard_summary(
    dataset: &Dataset,
    range: Option<DateRange>,
    trend: TrendInterval,
) -> DashboardReport {
    let range =
        range.unwrap_or_else(|| DateRange::trailing_days(DEFAULT_WINDOW_DAYS, Utc::now().date_naive()));
    let transactions = dataset.in_range(&range);
    let ledger = dataset.expense_ledger();

    debug!(
        transactions = transactions.len(),
        start = %range.start,
        end = %range.end,
        "dashboard pass"
    );

    let overview = calculate_enhanced_margin(transactions.iter().copied(), ledger);
    let leakage = calculate_leakage(transactions.iter().copied());

    let sku_kpis = sku_kpis(dataset, &transactions);
    let mut worst_margin_skus = sku_kpis.clone();
    worst_margin_skus.sort_by(|a, b| a.net_margin_percent.cmp(&b.net_margin_percent));
    worst_margin_skus.truncate(PROBLEM_LIST_LIMIT);

    let mut top_expense_skus = sku_kpis;
    top_expense_skus.sort_by(|a, b| b.total_expenses.cmp(&a.total_expenses));
    top_expense_skus.truncate(PROBLEM_LIST_LIMIT);

    let mut worst_margin_customers = customer_kpis(dataset, &transactions);
    worst_margin_customers.sort_by(|a, b| a.net_margin_percent.cmp(&b.net_margin_percent));
    worst_margin_customers.truncate(PROBLEM_LIST_LIMIT);

    DashboardReport {
        business_type: dataset.business_type(),
        range,
        overview,
        leakage,
        worst_margin_skus,
        top_expense_skus,
        worst_margin_customers,
        margin_trend: margin_trend(dataset, &transactions, trend),
    }
}

fn sku_kpis(dataset: &Dataset, transactions: &[&Transaction]) -> Vec<SkuKpi> {
    let ledger = dataset.expense_ledger();
    let mut by_sku: BTreeMap<String, Vec<&Transaction>> = BTreeMap::new();
    for t in transactions {
        by_sku.entry(t.sku_code.clone()).or_default().push(t);
    }

    by_sku
        .into_iter()
        .map(|(sku_code, subset)| {
            let metrics = calculate_enhanced_margin(subset.iter().copied(), ledger);
            let category = subset[0].category.clone();
            let band = resolve_benchmark(dataset.benchmarks(), &category, dataset.business_type());
            let performance_status = if metrics.net_margin_percent >= band.target {
                BenchmarkStatus::Excellent
            } else if metrics.net_margin_percent >= band.min {
                BenchmarkStatus::Acceptable
            } else {
                BenchmarkStatus::BelowTarget
            };
            SkuKpi {
                sku_code,
                sku_name: subset[0].sku_name.clone(),
                category,
                net_margin_percent: metrics.net_margin_percent,
                revenue: metrics.revenue,
                total_expenses: metrics.total_expenses,
                performance_status,
            }
        })
        .collect()
}

fn customer_kpis(dataset: &Dataset, transactions: &[&Transaction]) -> Vec<CustomerKpi> {
    let ledger = dataset.expense_ledger();
    let mut by_customer: BTreeMap<String, Vec<&Transaction>> = BTreeMap::new();
    for t in transactions {
        by_customer.entry(t.customer_name.clone()).or_default().push(t);
    }

    by_customer
        .into_iter()
        .map(|(customer_name, subset)| {
            let metrics = calculate_enhanced_margin(subset.iter().copied(), ledger);
            CustomerKpi {
                customer_name,
                net_margin_percent: metrics.net_margin_percent,
                revenue: metrics.revenue,
                total_expenses: metrics.total_expenses,
            }
        })
        .collect()
}

fn margin_trend(
    dataset: &Dataset,
    transactions: &[&Transaction],
    interval: TrendInterval,
) -> Vec<TrendPoint> {
    let ledger = dataset.expense_ledger();
    let mut buckets: BTreeMap<String, Vec<&Transaction>> = BTreeMap::new();
    for t in transactions {
        let key = match interval {
            TrendInterval::Daily => t.date.format("%Y-%m-%d").to_string(),
            TrendInterval::Monthly => t.date.format("%Y-%m").to_string(),
        };
        buckets.entry(key).or_default().push(t);
    }

    buckets
        .into_iter()
        .map(|(period, subset)| {
            let metrics = calculate_enhanced_margin(subset.iter().copied(), ledger);
            TrendPoint {
                period,
                revenue: metrics.revenue,
                cogs: metrics.cogs,
                gross_margin_percent: metrics.gross_margin_percent,
                net_margin_percent: metrics.net_margin_percent,
            }
        })
        .collect()
}
