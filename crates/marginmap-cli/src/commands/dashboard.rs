use clap::{Args, ValueEnum};
use serde_json::Value;

use marginmap_core::dashboard::{dashboard_summary, TrendInterval};

use crate::input::{self, DataArgs};

#[derive(Debug, Clone, ValueEnum)]
pub enum Interval {
    Daily,
    Monthly,
}

/// Arguments for the dashboard report
#[derive(Args)]
pub struct DashboardArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Range start (YYYY-MM-DD); defaults to the trailing 90 days
    #[arg(long)]
    pub start: Option<String>,

    /// Range end (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<String>,

    /// Trend bucketing interval
    #[arg(long, default_value = "monthly")]
    pub interval: Interval,
}

pub fn run_dashboard(args: DashboardArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let dataset = input::load_dataset(&args.data)?;
    let range = super::parse_range(&args.start, &args.end)?;
    let interval = match args.interval {
        Interval::Daily => TrendInterval::Daily,
        Interval::Monthly => TrendInterval::Monthly,
    };

    let report = dashboard_summary(&dataset, Some(range), interval);
    Ok(serde_json::to_value(report)?)
}
