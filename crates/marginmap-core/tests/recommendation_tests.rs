use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use marginmap_core::recommend::{
    generate_recommendations, save_recommendations, InMemoryRecommendationStore, Recommendation,
    RecommendationStatus, RecommendationStore,
};
use marginmap_core::{BusinessType, Dataset, MarginMapError, MarginMapResult, Transaction};

fn tx(
    sku: &str,
    customer: &str,
    region: Option<&str>,
    qty: Decimal,
    cost: Decimal,
    price: Decimal,
    discount: Decimal,
    ret: Decimal,
) -> Transaction {
    Transaction {
        id: 0,
        date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
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
        region: region.map(String::from),
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

fn problem_dataset() -> Dataset {
    dataset(vec![
        // Low margin, heavy discount, high returns.
        tx("A", "Acme", Some("East"), dec!(500), dec!(8), dec!(10), dec!(1.5), dec!(60)),
        // Healthy SKU, quiet region.
        tx("B", "Zenith", Some("West"), dec!(500), dec!(1), dec!(10), dec!(0), dec!(0)),
    ])
}

#[test]
fn generation_is_sorted_and_deterministic() {
    let ds = problem_dataset();
    let recs = generate_recommendations(&ds);
    assert!(!recs.is_empty());
    for pair in recs.windows(2) {
        assert!(pair[0].dollar_impact >= pair[1].dollar_impact);
    }

    let again = generate_recommendations(&ds);
    assert_eq!(
        serde_json::to_value(&recs).unwrap(),
        serde_json::to_value(&again).unwrap()
    );
}

#[test]
fn double_generation_leaves_one_open_batch() {
    let ds = problem_dataset();
    let mut store = InMemoryRecommendationStore::new();

    save_recommendations(&ds, &mut store).unwrap();
    let second = save_recommendations(&ds, &mut store).unwrap();

    let open = store.open_recommendations().unwrap();
    assert_eq!(open.len(), second.len());

    // Everything outside the latest batch is archived.
    let second_ids: Vec<_> = second.iter().map(|r| r.id).collect();
    for rec in store.all_recommendations().unwrap() {
        if second_ids.contains(&rec.id) {
            assert_eq!(rec.status, RecommendationStatus::Open);
        } else {
            assert_eq!(rec.status, RecommendationStatus::Archived);
        }
    }
}

#[test]
fn status_transitions_and_unknown_ids() {
    let ds = problem_dataset();
    let mut store = InMemoryRecommendationStore::new();
    let saved = save_recommendations(&ds, &mut store).unwrap();
    let id = saved[0].id.unwrap();

    assert!(store.set_status(id, RecommendationStatus::Resolved).unwrap());
    assert!(!store.set_status(999_999, RecommendationStatus::Resolved).unwrap());
    assert_eq!(store.open_recommendations().unwrap().len(), saved.len() - 1);
}

struct FailingStore;

impl RecommendationStore for FailingStore {
    fn replace_open_batch(
        &mut self,
        _batch: &[Recommendation],
    ) -> MarginMapResult<Vec<Recommendation>> {
        Err(MarginMapError::Persistence("connection reset".into()))
    }

    fn open_recommendations(&self) -> MarginMapResult<Vec<Recommendation>> {
        Ok(Vec::new())
    }

    fn all_recommendations(&self) -> MarginMapResult<Vec<Recommendation>> {
        Ok(Vec::new())
    }

    fn set_status(&mut self, _id: u64, _status: RecommendationStatus) -> MarginMapResult<bool> {
        Ok(false)
    }
}

#[test]
fn persistence_failure_propagates_untouched() {
    let ds = problem_dataset();
    let err = save_recommendations(&ds, &mut FailingStore).unwrap_err();
    assert!(matches!(err, MarginMapError::Persistence(msg) if msg == "connection reset"));
}

#[test]
fn empty_dataset_saves_empty_open_batch() {
    let ds = dataset(Vec::new());
    let mut store = InMemoryRecommendationStore::new();
    let saved = save_recommendations(&ds, &mut store).unwrap();
    assert!(saved.is_empty());
    assert!(store.open_recommendations().unwrap().is_empty());
}

#[test]
fn zero_revenue_entities_are_skipped_silently() {
    // All units returned: zero revenue, no division errors, no output for
    // that SKU's pricing heuristic.
    let ds = dataset(vec![tx(
        "A", "Acme", None, dec!(10), dec!(1), dec!(10), dec!(0), dec!(10),
    )]);
    let recs = generate_recommendations(&ds);
    assert!(recs.iter().all(|r| r.dollar_impact.is_sign_positive() || r.dollar_impact == Decimal::ZERO));
}
