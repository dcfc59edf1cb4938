//! Internal benchmarking: a SKU against the top performers of its own
//! category, with percentile ranking.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::*;

/// Most peers considered "top performers" regardless of category size.
const TOP_PERFORMER_CAP: usize = 5;

/// The slice of a SKU report internal benchmarking needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkuMarginView {
    pub sku_code: String,
    pub sku_name: String,
    pub category: String,
    pub net_margin_percent: Percent,
    pub revenue: Money,
}

/// Best single peer in the category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestInCategory {
    pub sku_code: String,
    pub sku_name: String,
    pub net_margin: Percent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternalBenchmark {
    pub best_in_category: BestInCategory,
    pub top_performer_avg: Percent,
    pub your_margin: Percent,
    pub gap: Percent,
    /// Profit gained if this SKU matched the top-performer average margin.
    pub potential_profit: Money,
    pub sample_size: usize,
    /// Share of same-category peers with strictly lower net margin.
    pub percentile_rank: Percent,
}

/// Compare a SKU against same-category peers. Returns None when the category
/// has no other SKU to compare against.
pub fn calculate_internal_benchmark(
    sku: &SkuMarginView,
    all_skus: &[SkuMarginView],
) -> Option<InternalBenchmark> {
    let mut peers: Vec<&SkuMarginView> = all_skus
        .iter()
        .filter(|s| s.category == sku.category && s.sku_code != sku.sku_code)
        .collect();

    if peers.is_empty() {
        return None;
    }

    peers.sort_by(|a, b| b.net_margin_percent.cmp(&a.net_margin_percent));

    // Top ceil(10%) performers, at least 1, at most 5.
    let top_count = peers.len().div_ceil(10).clamp(1, TOP_PERFORMER_CAP);
    let top_performers = &peers[..top_count];

    let top_performer_avg = top_performers
        .iter()
        .map(|s| s.net_margin_percent)
        .sum::<Decimal>()
        / Decimal::from(top_count as u64);

    let best = peers[0];
    let gap = top_performer_avg - sku.net_margin_percent;
    let potential_profit = sku.revenue * gap / Decimal::ONE_HUNDRED;

    let below = peers
        .iter()
        .filter(|s| s.net_margin_percent < sku.net_margin_percent)
        .count();
    let percentile_rank =
        (Decimal::from(below as u64) / Decimal::from(peers.len() as u64) * Decimal::ONE_HUNDRED)
            .round_dp(0);

    Some(InternalBenchmark {
        best_in_category: BestInCategory {
            sku_code: best.sku_code.clone(),
            sku_name: best.sku_name.clone(),
            net_margin: best.net_margin_percent,
        },
        top_performer_avg: round_percent(top_performer_avg),
        your_margin: sku.net_margin_percent,
        gap: round_percent(gap),
        potential_profit: round_money(potential_profit),
        sample_size: peers.len(),
        percentile_rank,
    })
}
