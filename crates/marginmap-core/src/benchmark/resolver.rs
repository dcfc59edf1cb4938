//! Target-margin benchmark lookup by (category, business type).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::*;

/// Default band used when no benchmark row matches.
const DEFAULT_MIN: Decimal = dec!(35);
const DEFAULT_MAX: Decimal = dec!(55);
const DEFAULT_TARGET: Decimal = dec!(45);

/// Resolved target margin range. `target` is the point to aim for; the
/// min/max pair bounds the acceptable band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkBand {
    pub min: Percent,
    pub max: Percent,
    pub target: Percent,
    pub industry_average: Percent,
}

impl Default for BenchmarkBand {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN,
            max: DEFAULT_MAX,
            target: DEFAULT_TARGET,
            industry_average: DEFAULT_TARGET,
        }
    }
}

/// Exact-match lookup. No fuzzy matching, no category hierarchy: a miss
/// returns the fixed default band. When a row has no industry average the
/// target falls back to the band midpoint.
pub fn resolve_benchmark(
    table: &[MarginBenchmark],
    category: &str,
    business_type: BusinessType,
) -> BenchmarkBand {
    let row = table
        .iter()
        .find(|b| b.category == category && b.business_type == business_type);

    match row {
        Some(b) => {
            let midpoint = (b.target_margin_min + b.target_margin_max) / dec!(2);
            let target = b.industry_average.unwrap_or(midpoint);
            BenchmarkBand {
                min: b.target_margin_min,
                max: b.target_margin_max,
                target,
                industry_average: b.industry_average.unwrap_or(target),
            }
        }
        None => BenchmarkBand::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Vec<MarginBenchmark> {
        vec![
            MarginBenchmark {
                category: "Widgets".into(),
                business_type: BusinessType::Manufacturer,
                target_margin_min: dec!(40),
                target_margin_max: dec!(60),
                industry_average: Some(dec!(52)),
            },
            MarginBenchmark {
                category: "Gadgets".into(),
                business_type: BusinessType::Manufacturer,
                target_margin_min: dec!(30),
                target_margin_max: dec!(50),
                industry_average: None,
            },
        ]
    }

    #[test]
    fn test_exact_match_uses_industry_average() {
        let band = resolve_benchmark(&table(), "Widgets", BusinessType::Manufacturer);
        assert_eq!(band.target, dec!(52));
        assert_eq!(band.min, dec!(40));
        assert_eq!(band.max, dec!(60));
    }

    #[test]
    fn test_missing_industry_average_uses_midpoint() {
        let band = resolve_benchmark(&table(), "Gadgets", BusinessType::Manufacturer);
        assert_eq!(band.target, dec!(40));
        assert_eq!(band.industry_average, dec!(40));
    }

    #[test]
    fn test_miss_returns_default_band() {
        let band = resolve_benchmark(&table(), "Sprockets", BusinessType::Manufacturer);
        assert_eq!(band, BenchmarkBand::default());
        assert_eq!(band.min, dec!(35));
        assert_eq!(band.max, dec!(55));
        assert_eq!(band.target, dec!(45));
    }

    #[test]
    fn test_business_type_mismatch_is_a_miss() {
        let band = resolve_benchmark(&table(), "Widgets", BusinessType::Retailer);
        assert_eq!(band, BenchmarkBand::default());
    }
}
