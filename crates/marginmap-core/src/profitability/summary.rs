//! Flat per-SKU and per-customer summary listings over a date range.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::dataset::Dataset;
use crate::margin::{calculate_gross_margin, calculate_leakage};
use crate::types::*;

/// Margin below this marks a customer as needing attention on the summary
/// listing.
const ACTION_MARGIN_FLOOR: Decimal = dec!(55);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkuSummaryRow {
    pub sku_code: String,
    /// Gross units sold in the window, before returns.
    pub volume: Qty,
    pub avg_cost: Money,
    pub avg_billed: Money,
    pub avg_paid: Money,
    pub total_margin: Money,
    pub leakage: Money,
    pub margin_percent: Percent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSummaryRow {
    pub customer_name: String,
    pub revenue: Money,
    pub margin_percent: Percent,
    pub leakage: Money,
    pub action_needed: bool,
}

/// One row per SKU transacted inside the range, sorted by revenue descending.
pub fn list_sku_summary(dataset: &Dataset, range: &DateRange) -> Vec<SkuSummaryRow> {
    let mut by_sku: BTreeMap<String, Vec<&Transaction>> = BTreeMap::new();
    for t in dataset.in_range(range) {
        by_sku.entry(t.sku_code.clone()).or_default().push(t);
    }

    let mut rows: Vec<(Money, SkuSummaryRow)> = by_sku
        .into_iter()
        .map(|(sku_code, subset)| {
            let summary = calculate_gross_margin(subset.iter().copied());
            let leakage = calculate_leakage(subset.iter().copied());

            let volume: Qty = subset.iter().map(|t| t.qty_sold).sum();
            let cost: Money = subset.iter().map(|t| t.unit_cost * t.qty_sold).sum();
            let billed: Money = subset.iter().map(|t| t.unit_price * t.qty_sold).sum();
            let paid: Money = subset.iter().map(|t| t.net_price() * t.qty_sold).sum();
            let avg = |amount: Money| {
                if volume > Decimal::ZERO {
                    round_money(amount / volume)
                } else {
                    Decimal::ZERO
                }
            };

            let row = SkuSummaryRow {
                sku_code,
                volume,
                avg_cost: avg(cost),
                avg_billed: avg(billed),
                avg_paid: avg(paid),
                total_margin: summary.gross_profit,
                leakage: leakage.total_leakage,
                margin_percent: summary.gross_margin_percent,
            };
            (summary.revenue, row)
        })
        .collect();

    rows.sort_by(|a, b| b.0.cmp(&a.0));
    rows.into_iter().map(|(_, row)| row).collect()
}

/// One row per customer transacted inside the range, sorted by revenue
/// descending. `action_needed` flags thin margins or any leakage.
pub fn list_customer_summary(dataset: &Dataset, range: &DateRange) -> Vec<CustomerSummaryRow> {
    let mut by_customer: BTreeMap<String, Vec<&Transaction>> = BTreeMap::new();
    for t in dataset.in_range(range) {
        by_customer.entry(t.customer_name.clone()).or_default().push(t);
    }

    let mut rows: Vec<CustomerSummaryRow> = by_customer
        .into_iter()
        .map(|(customer_name, subset)| {
            let summary = calculate_gross_margin(subset.iter().copied());
            let leakage = calculate_leakage(subset.iter().copied());
            let action_needed = summary.revenue > Decimal::ZERO
                && (summary.gross_margin_percent < ACTION_MARGIN_FLOOR
                    || leakage.total_leakage > Decimal::ZERO);
            CustomerSummaryRow {
                customer_name,
                revenue: summary.revenue,
                margin_percent: summary.gross_margin_percent,
                leakage: leakage.total_leakage,
                action_needed,
            }
        })
        .collect();

    rows.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn tx(
        sku: &str,
        customer: &str,
        day: u32,
        qty: Decimal,
        cost: Decimal,
        price: Decimal,
        discount: Decimal,
    ) -> Transaction {
        Transaction {
            id: 0,
            date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
            invoice_id: None,
            customer_name: customer.into(),
            payer_name: None,
            sku_code: sku.into(),
            sku_name: format!("{sku} name"),
            category: "Widgets".into(),
            qty_sold: qty,
            unit_cost: cost,
            unit_price: price,
            unit_discount: discount,
            returned_units: dec!(0),
            region: None,
        }
    }

    fn june() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        )
        .unwrap()
    }

    fn dataset(transactions: Vec<Transaction>) -> Dataset {
        Dataset::new(
            BusinessType::Manufacturer,
            transactions,
            Vec::new(),
            Vec::new(),
            Vec::new(),
        )
    }

    #[test]
    fn test_sku_rows_exclude_out_of_range() {
        let ds = dataset(vec![
            tx("A", "Acme", 10, dec!(10), dec!(1), dec!(5), dec!(0)),
            tx("B", "Acme", 10, dec!(10), dec!(1), dec!(2), dec!(0)),
        ]);
        let july = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 7, 31).unwrap(),
        )
        .unwrap();
        assert!(list_sku_summary(&ds, &july).is_empty());

        let rows = list_sku_summary(&ds, &june());
        assert_eq!(rows.len(), 2);
        // A's revenue 50 outranks B's 20.
        assert_eq!(rows[0].sku_code, "A");
    }

    #[test]
    fn test_sku_row_averages() {
        let ds = dataset(vec![
            tx("A", "Acme", 5, dec!(10), dec!(2), dec!(6), dec!(1)),
            tx("A", "Zenith", 6, dec!(30), dec!(2), dec!(10), dec!(0)),
        ]);
        let rows = list_sku_summary(&ds, &june());
        let row = &rows[0];
        assert_eq!(row.volume, dec!(40));
        assert_eq!(row.avg_cost, dec!(2.00));
        // (10×6 + 30×10) / 40
        assert_eq!(row.avg_billed, dec!(9.00));
        // (10×5 + 30×10) / 40
        assert_eq!(row.avg_paid, dec!(8.75));
        assert_eq!(row.leakage, dec!(10.00));
    }

    #[test]
    fn test_customer_action_flags() {
        let ds = dataset(vec![
            // 80% margin, no leakage: healthy.
            tx("A", "Healthy", 5, dec!(10), dec!(1), dec!(5), dec!(0)),
            // 50% margin: below the floor.
            tx("A", "ThinMargin", 5, dec!(10), dec!(1), dec!(2), dec!(0)),
            // High margin but discounted: leakage flag.
            tx("A", "Discounted", 5, dec!(10), dec!(1), dec!(10), dec!(1)),
        ]);
        let rows = list_customer_summary(&ds, &june());
        let by_name = |name: &str| rows.iter().find(|r| r.customer_name == name).unwrap();
        assert!(!by_name("Healthy").action_needed);
        assert!(by_name("ThinMargin").action_needed);
        assert!(by_name("Discounted").action_needed);
    }
}
