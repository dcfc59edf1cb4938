use clap::Args;
use serde_json::Value;

use marginmap_core::profitability::{
    all_customer_reports, customer_profitability, list_customer_summary,
};

use crate::input::{self, DataArgs};

/// Arguments for the customer profitability report
#[derive(Args)]
pub struct CustomerArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Customer name; omit to report on every customer
    #[arg(long)]
    pub name: Option<String>,
}

/// Arguments for the per-customer date-range roll-up
#[derive(Args)]
pub struct CustomerSummaryArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Range start (YYYY-MM-DD); defaults to the trailing 90 days
    #[arg(long)]
    pub start: Option<String>,

    /// Range end (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<String>,
}

pub fn run_customer(args: CustomerArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let dataset = input::load_dataset(&args.data)?;

    match args.name {
        Some(name) => {
            let report = customer_profitability(&dataset, &name)
                .ok_or_else(|| format!("Customer '{}' has no transactions", name))?;
            Ok(serde_json::to_value(report)?)
        }
        None => Ok(serde_json::to_value(all_customer_reports(&dataset))?),
    }
}

pub fn run_customer_summary(
    args: CustomerSummaryArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let dataset = input::load_dataset(&args.data)?;
    let range = super::parse_range(&args.start, &args.end)?;
    Ok(serde_json::to_value(list_customer_summary(&dataset, &range))?)
}
