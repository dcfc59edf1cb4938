pub mod customer;
pub mod dashboard;
pub mod erosion;
pub mod margin;
pub mod recommend;
pub mod sku;

use chrono::{NaiveDate, Utc};
use marginmap_core::DateRange;

const DEFAULT_WINDOW_DAYS: i64 = 90;

/// Parse optional --start/--end flags into a range. With neither flag the
/// range covers the trailing 90 days; a lone flag is an error.
pub(crate) fn parse_range(
    start: &Option<String>,
    end: &Option<String>,
) -> Result<DateRange, Box<dyn std::error::Error>> {
    match (start, end) {
        (Some(s), Some(e)) => {
            let start = parse_date(s)?;
            let end = parse_date(e)?;
            Ok(DateRange::new(start, end)?)
        }
        (None, None) => Ok(DateRange::trailing_days(
            DEFAULT_WINDOW_DAYS,
            Utc::now().date_naive(),
        )),
        _ => Err("--start and --end must be given together".into()),
    }
}

pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| format!("Invalid date '{}' (expected YYYY-MM-DD): {}", s, e).into())
}
