//! The heuristic catalog. Each function inspects one entity's report and
//! emits zero or more recommendations; entities with no revenue are skipped
//! silently.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;

use super::thresholds::*;
use super::{priority_for, Recommendation, RecommendationCategory, RecommendationStatus};
use crate::dataset::Dataset;
use crate::margin::calculate_leakage;
use crate::profitability::{CustomerReport, SkuReport};
use crate::types::*;

fn recommendation(
    category: RecommendationCategory,
    issue_text: String,
    suggested_action: String,
    dollar_impact: Money,
    impact_percent: Percent,
) -> Recommendation {
    let dollar_impact = round_money(dollar_impact);
    Recommendation {
        id: None,
        category,
        issue_text,
        suggested_action,
        dollar_impact,
        impact_percent: Some(round_percent(impact_percent)),
        priority: priority_for(dollar_impact),
        sku_code: None,
        customer_name: None,
        region: None,
        status: RecommendationStatus::Open,
        created_at: None,
        updated_at: None,
    }
}

/// SKU-level checks: pricing vs benchmark, discount erosion, return rate,
/// expense ratio, and customers buying well below the SKU's average margin.
pub fn sku_recommendations(dataset: &Dataset, report: &SkuReport) -> Vec<Recommendation> {
    let mut out = Vec::new();
    let revenue = report.metrics.revenue;
    if revenue <= Decimal::ZERO {
        return out;
    }

    let units = report.metrics.total_units;
    let perf = &report.performance_vs_benchmark;

    // Margin below the resolved benchmark target.
    if perf.net_margin < perf.target_margin {
        let gap = perf.target_margin - perf.net_margin;
        let dollar_impact = gap / Decimal::ONE_HUNDRED * revenue;
        let price_increase = if units > Decimal::ZERO {
            round_money(dollar_impact / units)
        } else {
            Decimal::ZERO
        };
        let mut rec = recommendation(
            RecommendationCategory::Pricing,
            format!(
                "SKU {} ({}) margin is {:.1}%, below target {:.1}%",
                report.sku_code, report.sku_name, perf.net_margin, perf.target_margin
            ),
            format!(
                "Increase price by ${:.2} per unit to reach target margin. This affects {} units.",
                price_increase, units
            ),
            dollar_impact,
            gap,
        );
        rec.sku_code = Some(report.sku_code.clone());
        out.push(rec);
    }

    // Heavy promotional discounting.
    let discounts = &report.erosion_factors.discounts;
    if discounts.percent > DISCOUNT_EROSION_THRESHOLD {
        let dollar_impact = discounts.amount * DISCOUNT_RECOVERY;
        let mut rec = recommendation(
            RecommendationCategory::Discount,
            format!(
                "SKU {} ({}) has {:.1}% average discount rate, eroding ${:.0} in margin",
                report.sku_code, report.sku_name, discounts.percent, discounts.amount
            ),
            format!(
                "Reduce promotional discounting or implement tiered pricing. \
                 Halving the discount recovers ${:.0}.",
                dollar_impact
            ),
            dollar_impact,
            discounts.percent * DISCOUNT_RECOVERY,
        );
        rec.sku_code = Some(report.sku_code.clone());
        out.push(rec);
    }

    // Excessive returns. Costed at this SKU's average unit COGS.
    if report.return_rate > RETURN_RATE_THRESHOLD {
        let returned_units: Qty = dataset
            .for_sku(&report.sku_code)
            .iter()
            .map(|t| t.returned_units)
            .sum();
        let unit_cogs = if units > Decimal::ZERO {
            report.metrics.cogs / units
        } else {
            Decimal::ZERO
        };
        let return_cost = returned_units * unit_cogs;
        let dollar_impact = return_cost * RETURNS_RECOVERY;
        let mut rec = recommendation(
            RecommendationCategory::Returns,
            format!(
                "SKU {} ({}) has {:.1}% return rate ({} units returned)",
                report.sku_code, report.sku_name, report.return_rate, returned_units
            ),
            format!(
                "Investigate quality issues, packaging, or fulfillment. \
                 Reducing returns by 50% saves ${:.0}.",
                dollar_impact
            ),
            dollar_impact,
            report.return_rate * RETURNS_RECOVERY,
        );
        rec.sku_code = Some(report.sku_code.clone());
        out.push(rec);
    }

    // Expense ratio out of line for the business type.
    let expense_ratio = pct(report.metrics.total_expenses, revenue);
    if expense_ratio > EXPENSE_RATIO_THRESHOLD {
        let (category, recovery) = expense_recovery(report.business_type);
        let dollar_impact = report.metrics.total_expenses * recovery;
        let mut rec = recommendation(
            category,
            format!(
                "SKU {} ({}) carries {:.1}% operating expense ratio (${:.0} attributed)",
                report.sku_code, report.sku_name, expense_ratio, report.metrics.total_expenses
            ),
            format!(
                "Review {} cost drivers for this SKU. Recovering {:.0}% of attributed \
                 expenses adds ${:.0}.",
                category,
                recovery * Decimal::ONE_HUNDRED,
                dollar_impact
            ),
            dollar_impact,
            expense_ratio * recovery,
        );
        rec.sku_code = Some(report.sku_code.clone());
        out.push(rec);
    }

    // Customers buying this SKU far below its average margin.
    let avg_margin = report.metrics.gross_margin_percent;
    for entry in &report.customer_breakdown {
        if entry.margin_percent < avg_margin - CUSTOMER_MARGIN_GAP_POINTS
            && entry.revenue > CUSTOMER_PRICING_MIN_REVENUE
        {
            let diff = avg_margin - entry.margin_percent;
            let dollar_impact = diff / Decimal::ONE_HUNDRED * entry.revenue;
            let mut rec = recommendation(
                RecommendationCategory::CustomerPricing,
                format!(
                    "{} purchases {} ({}) at {:.1}% margin vs. {:.1}% average",
                    entry.name, report.sku_code, report.sku_name, entry.margin_percent, avg_margin
                ),
                format!(
                    "Renegotiate pricing with {} or reduce customer-specific discounts. \
                     Aligning to average margin adds ${:.0}.",
                    entry.name, dollar_impact
                ),
                dollar_impact,
                diff,
            );
            rec.sku_code = Some(report.sku_code.clone());
            rec.customer_name = Some(entry.name.clone());
            out.push(rec);
        }
    }

    out
}

/// Customer-level checks: blended margin against the baseline, and total
/// leakage.
pub fn customer_recommendations(report: &CustomerReport) -> Vec<Recommendation> {
    let mut out = Vec::new();
    let revenue = report.metrics.revenue;
    if revenue <= Decimal::ZERO {
        return out;
    }

    let blended = report.metrics.gross_margin_percent;
    if blended < CUSTOMER_AVG_MARGIN_BASELINE - CUSTOMER_BLENDED_GAP_POINTS
        && revenue > CUSTOMER_MIN_REVENUE
    {
        let gap = CUSTOMER_AVG_MARGIN_BASELINE - blended;
        // Half the gap is treated as realistically closable.
        let dollar_impact = gap / Decimal::ONE_HUNDRED * revenue / dec!(2);
        let mut rec = recommendation(
            RecommendationCategory::Customer,
            format!(
                "{} has {:.1}% blended margin, below average of {}%",
                report.customer_name, blended, CUSTOMER_AVG_MARGIN_BASELINE
            ),
            format!(
                "Review overall pricing strategy with {}. Improving margin by {:.1}% \
                 adds ${:.0}.",
                report.customer_name,
                gap / dec!(2),
                dollar_impact
            ),
            dollar_impact,
            gap / dec!(2),
        );
        rec.customer_name = Some(report.customer_name.clone());
        out.push(rec);
    }

    if report.leakage.total_leakage > LEAKAGE_THRESHOLD {
        let dollar_impact = report.leakage.total_leakage * LEAKAGE_RECOVERY;
        let mut rec = recommendation(
            RecommendationCategory::Leakage,
            format!(
                "{} accounts for ${:.0} in margin leakage ({:.1}% of potential revenue)",
                report.customer_name,
                report.leakage.total_leakage,
                report.leakage.leakage_percent
            ),
            format!(
                "Reduce discounts (${:.0}) and investigate high returns (${:.0}) with {}.",
                report.leakage.discount_leakage,
                report.leakage.return_leakage,
                report.customer_name
            ),
            dollar_impact,
            report.leakage.leakage_percent * LEAKAGE_RECOVERY,
        );
        rec.customer_name = Some(report.customer_name.clone());
        out.push(rec);
    }

    out
}

struct RegionMetrics {
    region: String,
    return_rate: Percent,
    return_leakage: Money,
}

/// Region-level check: return rates far above the cross-region average.
pub fn region_recommendations(dataset: &Dataset) -> Vec<Recommendation> {
    let mut by_region: BTreeMap<String, Vec<&Transaction>> = BTreeMap::new();
    for t in dataset.transactions() {
        if let Some(region) = &t.region {
            by_region.entry(region.clone()).or_default().push(t);
        }
    }
    if by_region.is_empty() {
        return Vec::new();
    }

    let metrics: Vec<RegionMetrics> = by_region
        .into_iter()
        .map(|(region, txns)| {
            let returned: Qty = txns.iter().map(|t| t.returned_units).sum();
            let sold: Qty = txns.iter().map(|t| t.qty_sold).sum();
            let leakage = calculate_leakage(txns.iter().copied());
            RegionMetrics {
                region,
                return_rate: pct(returned, sold),
                return_leakage: leakage.return_leakage,
            }
        })
        .collect();

    let avg_return_rate = metrics.iter().map(|m| m.return_rate).sum::<Decimal>()
        / Decimal::from(metrics.len() as u64);

    metrics
        .into_iter()
        .filter(|m| {
            m.return_rate > avg_return_rate * REGION_RETURN_MULTIPLIER
                && m.return_rate > RETURN_RATE_THRESHOLD
        })
        .map(|m| {
            let dollar_impact = m.return_leakage * REGION_RETURNS_RECOVERY;
            let mut rec = recommendation(
                RecommendationCategory::Region,
                format!(
                    "{} region has {:.1}% return rate vs. {:.1}% national average",
                    m.region, m.return_rate, avg_return_rate
                ),
                format!(
                    "Investigate fulfillment, packaging, or product-market fit in {}. \
                     Reducing returns to average saves ${:.0}.",
                    m.region, dollar_impact
                ),
                dollar_impact,
                m.return_rate - avg_return_rate,
            );
            rec.region = Some(m.region);
            rec
        })
        .collect()
}
