//! Gross margin over a set of transactions.
//!
//! All arithmetic uses `rust_decimal::Decimal`. No `f64`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::*;

/// Revenue, cost and gross margin over a transaction set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarginSummary {
    pub revenue: Money,
    pub cogs: Money,
    pub gross_profit: Money,
    pub gross_margin_percent: Percent,
    pub total_units: Qty,
}

/// Sum revenue, COGS and units over the set.
///
/// Net quantity is algebraic: a row with more returns than sales contributes
/// negatively, by contract with the ingestion collaborator. Empty input
/// yields the all-zero summary.
pub fn calculate_gross_margin<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> MarginSummary {
    let mut revenue = Decimal::ZERO;
    let mut cogs = Decimal::ZERO;
    let mut total_units = Decimal::ZERO;

    for t in transactions {
        let net_qty = t.net_qty();
        revenue += net_qty * t.net_price();
        cogs += net_qty * t.unit_cost;
        total_units += net_qty;
    }

    let gross_profit = revenue - cogs;
    let gross_margin_percent = pct(gross_profit, revenue);

    MarginSummary {
        revenue: round_money(revenue),
        cogs: round_money(cogs),
        gross_profit: round_money(gross_profit),
        gross_margin_percent: round_percent(gross_margin_percent),
        total_units: round_units(total_units),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn tx(qty: Decimal, cost: Decimal, price: Decimal, discount: Decimal, ret: Decimal) -> Transaction {
        Transaction {
            id: 0,
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            invoice_id: None,
            customer_name: "Acme".into(),
            payer_name: None,
            sku_code: "SKU-1".into(),
            sku_name: "Widget".into(),
            category: "Widgets".into(),
            qty_sold: qty,
            unit_cost: cost,
            unit_price: price,
            unit_discount: discount,
            returned_units: ret,
            region: None,
        }
    }

    #[test]
    fn test_worked_example() {
        // 240 sold at 7.50 list, 0.25 discount, 3.20 cost, 5 returned.
        let t = tx(dec!(240), dec!(3.20), dec!(7.50), dec!(0.25), dec!(5));
        let m = calculate_gross_margin([&t]);
        assert_eq!(m.revenue, dec!(1703.75));
        assert_eq!(m.cogs, dec!(752.00));
        assert_eq!(m.gross_profit, dec!(951.75));
        assert_eq!(m.gross_margin_percent, dec!(55.86));
        assert_eq!(m.total_units, dec!(235));
    }

    #[test]
    fn test_empty_input_all_zero() {
        let transactions: Vec<Transaction> = Vec::new();
        let m = calculate_gross_margin(&transactions);
        assert_eq!(m, MarginSummary::default());
    }

    #[test]
    fn test_zero_revenue_zero_percent() {
        let t = tx(dec!(10), dec!(2), dec!(0), dec!(0), dec!(0));
        let m = calculate_gross_margin([&t]);
        assert_eq!(m.revenue, Decimal::ZERO);
        assert_eq!(m.gross_margin_percent, Decimal::ZERO);
    }

    #[test]
    fn test_over_return_contributes_negatively() {
        let good = tx(dec!(10), dec!(1), dec!(5), dec!(0), dec!(0));
        let over = tx(dec!(2), dec!(1), dec!(5), dec!(0), dec!(6));
        let m = calculate_gross_margin([&good, &over]);
        // 10 net units at 5 minus 4 over-returned units at 5.
        assert_eq!(m.revenue, dec!(30.00));
        assert_eq!(m.total_units, dec!(6));
    }

    #[test]
    fn test_discount_reduces_revenue_not_cogs() {
        let t = tx(dec!(100), dec!(2), dec!(10), dec!(1), dec!(0));
        let m = calculate_gross_margin([&t]);
        assert_eq!(m.revenue, dec!(900.00));
        assert_eq!(m.cogs, dec!(200.00));
    }
}
