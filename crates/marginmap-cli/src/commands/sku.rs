use clap::Args;
use serde_json::Value;

use marginmap_core::benchmark::resolve_benchmark;
use marginmap_core::profitability::{all_sku_reports, list_sku_summary, sku_profitability};

use crate::input::{self, DataArgs};

/// Arguments for the SKU profitability report
#[derive(Args)]
pub struct SkuArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// SKU code; omit to report on every SKU
    #[arg(long)]
    pub code: Option<String>,
}

/// Arguments for the per-SKU date-range roll-up
#[derive(Args)]
pub struct SkuSummaryArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Range start (YYYY-MM-DD); defaults to the trailing 90 days
    #[arg(long)]
    pub start: Option<String>,

    /// Range end (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<String>,
}

/// Arguments for benchmark resolution
#[derive(Args)]
pub struct BenchmarkArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Product category to resolve
    #[arg(long)]
    pub category: String,
}

pub fn run_sku(args: SkuArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let dataset = input::load_dataset(&args.data)?;

    match args.code {
        Some(code) => {
            let report = sku_profitability(&dataset, &code)
                .ok_or_else(|| format!("SKU '{}' has no transactions", code))?;
            Ok(serde_json::to_value(report)?)
        }
        None => Ok(serde_json::to_value(all_sku_reports(&dataset))?),
    }
}

pub fn run_sku_summary(args: SkuSummaryArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let dataset = input::load_dataset(&args.data)?;
    let range = super::parse_range(&args.start, &args.end)?;
    Ok(serde_json::to_value(list_sku_summary(&dataset, &range))?)
}

pub fn run_benchmark(args: BenchmarkArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let dataset = input::load_dataset(&args.data)?;
    let band = resolve_benchmark(
        dataset.benchmarks(),
        &args.category,
        dataset.business_type(),
    );
    Ok(serde_json::to_value(band)?)
}
