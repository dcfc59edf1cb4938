//! Full-dataset recommendation sweep.

use tracing::{debug, info};

use super::heuristics::{customer_recommendations, region_recommendations, sku_recommendations};
use super::store::RecommendationStore;
use super::Recommendation;
use crate::dataset::Dataset;
use crate::profitability::{all_customer_reports, all_sku_reports};
use crate::MarginMapResult;

/// Run every heuristic over the dataset. Output is sorted by dollar impact
/// descending; an empty dataset yields an empty list.
pub fn generate_recommendations(dataset: &Dataset) -> Vec<Recommendation> {
    if dataset.is_empty() {
        return Vec::new();
    }

    let mut recommendations = Vec::new();

    for report in all_sku_reports(dataset) {
        recommendations.extend(sku_recommendations(dataset, &report));
    }
    for report in all_customer_reports(dataset) {
        recommendations.extend(customer_recommendations(&report));
    }
    recommendations.extend(region_recommendations(dataset));

    recommendations.sort_by(|a, b| b.dollar_impact.cmp(&a.dollar_impact));

    debug!(
        count = recommendations.len(),
        transactions = dataset.transactions().len(),
        "recommendation sweep complete"
    );
    recommendations
}

/// Generate a fresh batch and persist it, archiving the prior open set. A
/// store failure propagates untouched; the caller owns retry policy.
pub fn save_recommendations(
    dataset: &Dataset,
    store: &mut dyn RecommendationStore,
) -> MarginMapResult<Vec<Recommendation>> {
    let batch = generate_recommendations(dataset);
    let saved = store.replace_open_batch(&batch)?;
    info!(count = saved.len(), "saved recommendation batch");
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MarginMapError;
    use crate::recommend::{InMemoryRecommendationStore, RecommendationStatus};
    use crate::types::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn tx(sku: &str, customer: &str, qty: Decimal, cost: Decimal, price: Decimal) -> Transaction {
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
            unit_discount: dec!(0),
            returned_units: dec!(0),
            region: None,
        }
    }

    fn low_margin_dataset() -> Dataset {
        // 20% margin against the 45% default target.
        Dataset::new(
            BusinessType::Manufacturer,
            vec![tx("A", "Acme", dec!(100), dec!(8), dec!(10))],
            Vec::new(),
            Vec::new(),
            Vec::new(),
        )
    }

    #[test]
    fn test_empty_dataset_yields_nothing() {
        let ds = Dataset::new(
            BusinessType::Manufacturer,
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
        );
        assert!(generate_recommendations(&ds).is_empty());
    }

    #[test]
    fn test_sorted_by_dollar_impact() {
        let ds = Dataset::new(
            BusinessType::Manufacturer,
            vec![
                tx("A", "Acme", dec!(100), dec!(8), dec!(10)),
                tx("B", "Acme", dec!(1000), dec!(8), dec!(10)),
            ],
            Vec::new(),
            Vec::new(),
            Vec::new(),
        );
        let recs = generate_recommendations(&ds);
        assert!(!recs.is_empty());
        for pair in recs.windows(2) {
            assert!(pair[0].dollar_impact >= pair[1].dollar_impact);
        }
    }

    #[test]
    fn test_double_save_leaves_one_open_batch() {
        let ds = low_margin_dataset();
        let mut store = InMemoryRecommendationStore::new();

        let first = save_recommendations(&ds, &mut store).unwrap();
        let second = save_recommendations(&ds, &mut store).unwrap();
        assert_eq!(first.len(), second.len());

        let open = store.open_recommendations().unwrap();
        assert_eq!(open.len(), second.len());
        let open_ids: Vec<_> = open.iter().map(|r| r.id).collect();
        for rec in &second {
            assert!(open_ids.contains(&rec.id));
        }

        // Nothing from the first batch is still open.
        for rec in &first {
            let stored = store
                .all_recommendations()
                .unwrap()
                .into_iter()
                .find(|r| r.id == rec.id)
                .unwrap();
            assert_eq!(stored.status, RecommendationStatus::Archived);
        }
    }

    struct FailingStore;

    impl RecommendationStore for FailingStore {
        fn replace_open_batch(
            &mut self,
            _batch: &[Recommendation],
        ) -> crate::MarginMapResult<Vec<Recommendation>> {
            Err(MarginMapError::Persistence("disk full".into()))
        }

        fn open_recommendations(&self) -> crate::MarginMapResult<Vec<Recommendation>> {
            Ok(Vec::new())
        }

        fn all_recommendations(&self) -> crate::MarginMapResult<Vec<Recommendation>> {
            Ok(Vec::new())
        }

        fn set_status(
            &mut self,
            _id: u64,
            _status: RecommendationStatus,
        ) -> crate::MarginMapResult<bool> {
            Ok(false)
        }
    }

    #[test]
    fn test_store_failure_propagates() {
        let ds = low_margin_dataset();
        let err = save_recommendations(&ds, &mut FailingStore).unwrap_err();
        assert!(matches!(err, MarginMapError::Persistence(_)));
    }
}
