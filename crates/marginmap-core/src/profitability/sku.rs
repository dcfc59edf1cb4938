//! SKU-level profitability reports.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::benchmark::{calculate_internal_benchmark, resolve_benchmark, BenchmarkBand};
use crate::benchmark::internal::{InternalBenchmark, SkuMarginView};
use crate::dataset::Dataset;
use crate::margin::{calculate_enhanced_margin, erosion_factors, EnhancedMarginSummary, ErosionFactors};
use crate::types::*;

/// A payer's average realized price must fall below this fraction of the
/// SKU-wide average to be flagged as an outlier.
const PAYER_OUTLIER_FRACTION: Decimal = dec!(0.9);

/// Margin position against the resolved benchmark band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BenchmarkStatus {
    Excellent,
    Acceptable,
    BelowTarget,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkPerformance {
    pub net_margin: Percent,
    pub target_margin: Percent,
    pub min_margin: Percent,
    pub max_margin: Percent,
    /// Positive when below target.
    pub gap: Percent,
    pub status: BenchmarkStatus,
}

/// Per-group (customer or region) margin sub-aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMargin {
    pub name: String,
    pub revenue: Money,
    pub units: Qty,
    pub margin_percent: Percent,
}

/// A payer reimbursing this SKU well below the overall average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayerOutlier {
    pub payer_name: String,
    pub avg_paid: Money,
    pub overall_avg: Money,
    pub delta_percent: Percent,
    pub leakage_dollars: Money,
}

/// Uplift available if a customer matched the SKU's average realized price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerPressure {
    pub customer_name: String,
    pub avg_paid: Money,
    pub volume: Qty,
    pub uplift_if_matched_avg: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkuReport {
    pub sku_code: String,
    pub sku_name: String,
    pub category: String,
    pub business_type: BusinessType,
    #[serde(flatten)]
    pub metrics: EnhancedMarginSummary,
    pub avg_cost: Money,
    pub avg_billed: Money,
    pub avg_paid: Money,
    pub return_rate: Percent,
    pub erosion_factors: ErosionFactors,
    pub benchmark: BenchmarkBand,
    pub performance_vs_benchmark: BenchmarkPerformance,
    pub customer_breakdown: Vec<GroupMargin>,
    pub region_breakdown: Vec<GroupMargin>,
    pub payer_outliers: Vec<PayerOutlier>,
    pub customer_pressure: Vec<CustomerPressure>,
    /// Filled by `all_sku_reports`; a single-SKU lookup has no peer set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal_benchmark: Option<InternalBenchmark>,
}

impl From<&SkuReport> for SkuMarginView {
    fn from(report: &SkuReport) -> Self {
        SkuMarginView {
            sku_code: report.sku_code.clone(),
            sku_name: report.sku_name.clone(),
            category: report.category.clone(),
            net_margin_percent: report.metrics.net_margin_percent,
            revenue: report.metrics.revenue,
        }
    }
}

/// Full profitability report for one SKU. None when the SKU has no
/// transactions; the caller translates that into its own not-found
/// condition.
pub fn sku_profitability(dataset: &Dataset, sku_code: &str) -> Option<SkuReport> {
    let transactions = dataset.for_sku(sku_code);
    if transactions.is_empty() {
        return None;
    }

    let sku_name = transactions[0].sku_name.clone();
    let category = transactions[0].category.clone();
    let business_type = dataset.business_type();
    let ledger = dataset.expense_ledger();

    let metrics = calculate_enhanced_margin(transactions.iter().copied(), ledger);
    let erosion = erosion_factors(transactions.iter().copied(), ledger);
    let return_rate = erosion.returns.rate;

    // Volume-weighted averages over gross quantity sold; discounts apply to
    // every sold unit, so realized-price averages weight by gross volume.
    let total_sold: Qty = transactions.iter().map(|t| t.qty_sold).sum();
    let paid_amount: Money = transactions.iter().map(|t| t.net_price() * t.qty_sold).sum();
    let billed_amount: Money = transactions.iter().map(|t| t.unit_price * t.qty_sold).sum();
    let cost_amount: Money = transactions.iter().map(|t| t.unit_cost * t.qty_sold).sum();
    let weighted_avg = |amount: Money| {
        if total_sold > Decimal::ZERO {
            round_money(amount / total_sold)
        } else {
            Decimal::ZERO
        }
    };
    let avg_paid = weighted_avg(paid_amount);
    let avg_billed = weighted_avg(billed_amount);
    let avg_cost = weighted_avg(cost_amount);

    let benchmark = resolve_benchmark(dataset.benchmarks(), &category, business_type);
    let net_margin = metrics.net_margin_percent;
    let status = if net_margin >= benchmark.target {
        BenchmarkStatus::Excellent
    } else if net_margin >= benchmark.min {
        BenchmarkStatus::Acceptable
    } else {
        BenchmarkStatus::BelowTarget
    };
    let performance_vs_benchmark = BenchmarkPerformance {
        net_margin,
        target_margin: benchmark.target,
        min_margin: benchmark.min,
        max_margin: benchmark.max,
        gap: round_percent(benchmark.target - net_margin),
        status,
    };

    let customer_breakdown = group_margins(&transactions, |t| Some(t.customer_name.clone()));
    let region_breakdown = group_margins(&transactions, |t| t.region.clone());
    let payer_outliers = payer_outliers(&transactions, avg_paid);
    let customer_pressure = customer_pressure(&transactions, avg_paid);

    Some(SkuReport {
        sku_code: sku_code.to_string(),
        sku_name,
        category,
        business_type,
        metrics,
        avg_cost,
        avg_billed,
        avg_paid,
        return_rate,
        erosion_factors: erosion,
        benchmark,
        performance_vs_benchmark,
        customer_breakdown,
        region_breakdown,
        payer_outliers,
        customer_pressure,
        internal_benchmark: None,
    })
}

/// Reports for every SKU in the dataset, sorted by revenue descending, with
/// internal benchmarks attached.
pub fn all_sku_reports(dataset: &Dataset) -> Vec<SkuReport> {
    let mut reports: Vec<SkuReport> = dataset
        .sku_codes()
        .iter()
        .filter_map(|code| sku_profitability(dataset, code))
        .collect();
    reports.sort_by(|a, b| b.metrics.revenue.cmp(&a.metrics.revenue));

    let views: Vec<SkuMarginView> = reports.iter().map(SkuMarginView::from).collect();
    for (report, view) in reports.iter_mut().zip(&views) {
        report.internal_benchmark = calculate_internal_benchmark(view, &views);
    }

    reports
}

fn group_margins(
    transactions: &[&Transaction],
    key: impl Fn(&Transaction) -> Option<String>,
) -> Vec<GroupMargin> {
    let mut groups: BTreeMap<String, Vec<&Transaction>> = BTreeMap::new();
    for t in transactions {
        if let Some(k) = key(t) {
            groups.entry(k).or_default().push(t);
        }
    }

    let mut margins: Vec<GroupMargin> = groups
        .into_iter()
        .map(|(name, subset)| {
            let summary = crate::margin::calculate_gross_margin(subset.iter().copied());
            GroupMargin {
                name,
                revenue: summary.revenue,
                units: summary.total_units,
                margin_percent: summary.gross_margin_percent,
            }
        })
        .collect();
    margins.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    margins
}

fn payer_outliers(transactions: &[&Transaction], overall_avg: Money) -> Vec<PayerOutlier> {
    let mut by_payer: BTreeMap<String, (Money, Qty)> = BTreeMap::new();
    for t in transactions {
        let Some(payer) = &t.payer_name else { continue };
        let entry = by_payer.entry(payer.clone()).or_default();
        entry.0 += t.net_price() * t.qty_sold;
        entry.1 += t.qty_sold;
    }

    let mut outliers: Vec<PayerOutlier> = by_payer
        .into_iter()
        .filter_map(|(payer_name, (paid, volume))| {
            let avg_paid = if volume > Decimal::ZERO {
                paid / volume
            } else {
                Decimal::ZERO
            };
            if avg_paid >= overall_avg * PAYER_OUTLIER_FRACTION {
                return None;
            }
            let delta_percent = if overall_avg > Decimal::ZERO {
                (avg_paid - overall_avg) / overall_avg * Decimal::ONE_HUNDRED
            } else {
                Decimal::ZERO
            };
            let leakage =
                volume * Decimal::max(Decimal::ZERO, overall_avg - avg_paid);
            Some(PayerOutlier {
                payer_name,
                avg_paid: round_money(avg_paid),
                overall_avg,
                delta_percent: round_percent(delta_percent),
                leakage_dollars: round_money(leakage),
            })
        })
        .collect();
    outliers.sort_by(|a, b| b.leakage_dollars.cmp(&a.leakage_dollars));
    outliers
}

fn customer_pressure(transactions: &[&Transaction], overall_avg: Money) -> Vec<CustomerPressure> {
    let mut by_customer: BTreeMap<String, (Money, Qty)> = BTreeMap::new();
    for t in transactions {
        let entry = by_customer.entry(t.customer_name.clone()).or_default();
        entry.0 += t.net_price() * t.qty_sold;
        entry.1 += t.qty_sold;
    }

    let mut pressure: Vec<CustomerPressure> = by_customer
        .into_iter()
        .map(|(customer_name, (paid, volume))| {
            let avg_paid = if volume > Decimal::ZERO {
                paid / volume
            } else {
                Decimal::ZERO
            };
            CustomerPressure {
                customer_name,
                avg_paid: round_money(avg_paid),
                volume,
                uplift_if_matched_avg: round_money(
                    Decimal::max(Decimal::ZERO, overall_avg - avg_paid) * volume,
                ),
            }
        })
        .collect();
    pressure.sort_by(|a, b| b.uplift_if_matched_avg.cmp(&a.uplift_if_matched_avg));
    pressure
}
