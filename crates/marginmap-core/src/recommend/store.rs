//! Recommendation persistence seam.
//!
//! The engine only ever writes through `replace_open_batch`, which archives
//! the prior open set and inserts the new batch as one logical operation. A
//! failing store must leave the previous state visible, never a half-applied
//! batch.

use chrono::Utc;

use super::{Recommendation, RecommendationStatus};
use crate::error::MarginMapError;
use crate::MarginMapResult;

pub trait RecommendationStore {
    /// Archive every currently open recommendation and insert `batch` as the
    /// new open set, atomically. Returns the inserted records with ids and
    /// timestamps assigned.
    fn replace_open_batch(
        &mut self,
        batch: &[Recommendation],
    ) -> MarginMapResult<Vec<Recommendation>>;

    /// Open recommendations, ordered by dollar impact descending, then
    /// creation time descending.
    fn open_recommendations(&self) -> MarginMapResult<Vec<Recommendation>>;

    /// Every stored recommendation regardless of status.
    fn all_recommendations(&self) -> MarginMapResult<Vec<Recommendation>>;

    /// Update one recommendation's status. `Ok(false)` when the id is
    /// unknown. Archived is reserved for batch replacement and is rejected
    /// as a target.
    fn set_status(&mut self, id: u64, status: RecommendationStatus) -> MarginMapResult<bool>;
}

/// Vec-backed store. Mutations build the next state fully before swapping it
/// in, so a panic mid-build cannot expose a partial batch.
#[derive(Debug, Default)]
pub struct InMemoryRecommendationStore {
    records: Vec<Recommendation>,
    next_id: u64,
}

impl InMemoryRecommendationStore {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
        }
    }

    /// Seed the store with existing records, e.g. loaded from a file.
    /// Records without an id are assigned one.
    pub fn with_records(records: Vec<Recommendation>) -> Self {
        let mut store = Self::new();
        store.next_id = records
            .iter()
            .filter_map(|r| r.id)
            .max()
            .map_or(1, |max| max + 1);
        for mut record in records {
            if record.id.is_none() {
                record.id = Some(store.next_id);
                store.next_id += 1;
            }
            store.records.push(record);
        }
        store
    }

    pub fn records(&self) -> &[Recommendation] {
        &self.records
    }
}

impl RecommendationStore for InMemoryRecommendationStore {
    fn replace_open_batch(
        &mut self,
        batch: &[Recommendation],
    ) -> MarginMapResult<Vec<Recommendation>> {
        let now = Utc::now();

        let mut next = self.records.clone();
        for record in &mut next {
            if record.status == RecommendationStatus::Open {
                record.status = RecommendationStatus::Archived;
                record.updated_at = Some(now);
            }
        }

        let mut next_id = self.next_id;
        let mut inserted = Vec::with_capacity(batch.len());
        for rec in batch {
            let mut stored = rec.clone();
            stored.id = Some(next_id);
            stored.status = RecommendationStatus::Open;
            stored.created_at = Some(now);
            stored.updated_at = Some(now);
            next_id += 1;
            next.push(stored.clone());
            inserted.push(stored);
        }

        self.records = next;
        self.next_id = next_id;
        Ok(inserted)
    }

    fn open_recommendations(&self) -> MarginMapResult<Vec<Recommendation>> {
        let mut open: Vec<Recommendation> = self
            .records
            .iter()
            .filter(|r| r.status == RecommendationStatus::Open)
            .cloned()
            .collect();
        open.sort_by(|a, b| {
            b.dollar_impact
                .cmp(&a.dollar_impact)
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(open)
    }

    fn all_recommendations(&self) -> MarginMapResult<Vec<Recommendation>> {
        Ok(self.records.clone())
    }

    fn set_status(&mut self, id: u64, status: RecommendationStatus) -> MarginMapResult<bool> {
        if status == RecommendationStatus::Archived {
            return Err(MarginMapError::InvalidInput {
                field: "status".into(),
                reason: "archived is reserved for batch replacement".into(),
            });
        }
        match self.records.iter_mut().find(|r| r.id == Some(id)) {
            Some(record) => {
                record.status = status;
                record.updated_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommend::{Priority, RecommendationCategory};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn rec(impact: Decimal) -> Recommendation {
        Recommendation {
            id: None,
            category: RecommendationCategory::Pricing,
            issue_text: "issue".into(),
            suggested_action: "action".into(),
            dollar_impact: impact,
            impact_percent: None,
            priority: Priority::Low,
            sku_code: None,
            customer_name: None,
            region: None,
            status: RecommendationStatus::Open,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_replace_archives_prior_open_set() {
        let mut store = InMemoryRecommendationStore::new();
        store.replace_open_batch(&[rec(dec!(100)), rec(dec!(200))]).unwrap();
        store.replace_open_batch(&[rec(dec!(300))]).unwrap();

        let open = store.open_recommendations().unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].dollar_impact, dec!(300));

        let archived = store
            .all_recommendations()
            .unwrap()
            .into_iter()
            .filter(|r| r.status == RecommendationStatus::Archived)
            .count();
        assert_eq!(archived, 2);
    }

    #[test]
    fn test_ids_are_unique_across_batches() {
        let mut store = InMemoryRecommendationStore::new();
        let first = store.replace_open_batch(&[rec(dec!(1))]).unwrap();
        let second = store.replace_open_batch(&[rec(dec!(2))]).unwrap();
        assert_eq!(first[0].id, Some(1));
        assert_eq!(second[0].id, Some(2));
    }

    #[test]
    fn test_open_ordered_by_impact() {
        let mut store = InMemoryRecommendationStore::new();
        store
            .replace_open_batch(&[rec(dec!(50)), rec(dec!(500)), rec(dec!(5))])
            .unwrap();
        let open = store.open_recommendations().unwrap();
        let impacts: Vec<Decimal> = open.iter().map(|r| r.dollar_impact).collect();
        assert_eq!(impacts, vec![dec!(500), dec!(50), dec!(5)]);
    }

    #[test]
    fn test_set_status_transitions() {
        let mut store = InMemoryRecommendationStore::new();
        let inserted = store.replace_open_batch(&[rec(dec!(1))]).unwrap();
        let id = inserted[0].id.unwrap();

        assert!(store.set_status(id, RecommendationStatus::Snoozed).unwrap());
        assert_eq!(store.open_recommendations().unwrap().len(), 0);

        assert!(store.set_status(id, RecommendationStatus::Open).unwrap());
        assert_eq!(store.open_recommendations().unwrap().len(), 1);
    }

    #[test]
    fn test_set_status_unknown_id() {
        let mut store = InMemoryRecommendationStore::new();
        assert!(!store.set_status(999, RecommendationStatus::Resolved).unwrap());
    }

    #[test]
    fn test_set_status_rejects_archived() {
        let mut store = InMemoryRecommendationStore::new();
        let inserted = store.replace_open_batch(&[rec(dec!(1))]).unwrap();
        let err = store
            .set_status(inserted[0].id.unwrap(), RecommendationStatus::Archived)
            .unwrap_err();
        assert!(matches!(err, MarginMapError::InvalidInput { .. }));
    }

    #[test]
    fn test_with_records_continues_id_sequence() {
        let mut seeded = rec(dec!(1));
        seeded.id = Some(7);
        let mut store = InMemoryRecommendationStore::with_records(vec![seeded]);
        let inserted = store.replace_open_batch(&[rec(dec!(2))]).unwrap();
        assert_eq!(inserted[0].id, Some(8));
    }
}
