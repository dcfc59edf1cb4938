use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use marginmap_core::margin::calculate_gross_margin;
use marginmap_core::profitability::{
    all_customer_reports, all_sku_reports, customer_profitability, list_customer_summary,
    list_sku_summary, median, sku_profitability,
};
use marginmap_core::{BusinessType, DateRange, Dataset, Transaction};

fn tx(
    id: u64,
    sku: &str,
    customer: &str,
    date: (i32, u32, u32),
    qty: Decimal,
    cost: Decimal,
    price: Decimal,
    discount: Decimal,
    ret: Decimal,
) -> Transaction {
    Transaction {
        id,
        date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
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
        returned_units: ret,
        region: None,
    }
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
fn worked_example_240_units() {
    // 240 sold at $7.50 list with $0.25 unit discount, $3.20 cost, 5 returned.
    let t = tx(1, "A", "Acme", (2024, 6, 1), dec!(240), dec!(3.20), dec!(7.50), dec!(0.25), dec!(5));
    let m = calculate_gross_margin([&t]);

    assert_eq!(m.total_units, dec!(235));
    assert_eq!(m.revenue, dec!(1703.75));
    assert_eq!(m.cogs, dec!(752.00));
    assert_eq!(m.gross_profit, dec!(951.75));
    assert_eq!(m.gross_margin_percent, dec!(55.86));
}

#[test]
fn median_of_four_averages_middles() {
    assert_eq!(median(vec![dec!(4), dec!(5), dec!(6), dec!(7)]), dec!(5.5));
}

#[test]
fn reads_are_idempotent() {
    let ds = dataset(vec![
        tx(1, "A", "Acme", (2024, 6, 1), dec!(240), dec!(3.20), dec!(7.50), dec!(0.25), dec!(5)),
        tx(2, "B", "Zenith", (2024, 6, 2), dec!(100), dec!(2), dec!(4), dec!(0), dec!(10)),
        tx(3, "A", "Zenith", (2024, 6, 3), dec!(50), dec!(3.20), dec!(7.00), dec!(0), dec!(0)),
    ]);

    let first = serde_json::to_value(all_sku_reports(&ds)).unwrap();
    let second = serde_json::to_value(all_sku_reports(&ds)).unwrap();
    assert_eq!(first, second);

    let first = serde_json::to_value(all_customer_reports(&ds)).unwrap();
    let second = serde_json::to_value(all_customer_reports(&ds)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn missing_entities_return_none() {
    let ds = dataset(vec![tx(
        1, "A", "Acme", (2024, 6, 1), dec!(1), dec!(1), dec!(2), dec!(0), dec!(0),
    )]);
    assert!(sku_profitability(&ds, "ZZZ").is_none());
    assert!(customer_profitability(&ds, "Nobody").is_none());
}

#[test]
fn summaries_respect_the_range() {
    let ds = dataset(vec![
        tx(1, "A", "Acme", (2024, 6, 1), dec!(10), dec!(1), dec!(5), dec!(0), dec!(0)),
        tx(2, "A", "Acme", (2024, 8, 1), dec!(10), dec!(1), dec!(5), dec!(0), dec!(0)),
    ]);
    let june = DateRange::new(
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
    )
    .unwrap();

    let sku_rows = list_sku_summary(&ds, &june);
    assert_eq!(sku_rows.len(), 1);
    assert_eq!(sku_rows[0].volume, dec!(10));

    let customer_rows = list_customer_summary(&ds, &june);
    assert_eq!(customer_rows.len(), 1);
    assert_eq!(customer_rows[0].revenue, dec!(50.00));
}

#[test]
fn over_returned_rows_flow_through_negative() {
    // 3 sold, 5 returned: net quantity -2 contributes negative revenue.
    let ds = dataset(vec![
        tx(1, "A", "Acme", (2024, 6, 1), dec!(3), dec!(1), dec!(10), dec!(0), dec!(5)),
        tx(2, "A", "Acme", (2024, 6, 2), dec!(10), dec!(1), dec!(10), dec!(0), dec!(0)),
    ]);
    let report = sku_profitability(&ds, "A").unwrap();
    // (3-5)×10 + 10×10 = 80
    assert_eq!(report.metrics.revenue, dec!(80.00));
    assert_eq!(report.metrics.total_units, dec!(8));
}
