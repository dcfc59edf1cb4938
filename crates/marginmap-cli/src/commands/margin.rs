use clap::Args;
use serde_json::{json, Value};

use marginmap_core::margin::{calculate_gross_margin, calculate_leakage};

use crate::input::{self, DataArgs};

/// Arguments for portfolio margin totals
#[derive(Args)]
pub struct MarginArgs {
    #[command(flatten)]
    pub data: DataArgs,
}

pub fn run_margin(args: MarginArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let dataset = input::load_dataset(&args.data)?;
    let margin = calculate_gross_margin(dataset.transactions());
    let leakage = calculate_leakage(dataset.transactions());

    Ok(json!({
        "business_type": dataset.business_type(),
        "revenue": margin.revenue,
        "cogs": margin.cogs,
        "gross_profit": margin.gross_profit,
        "gross_margin_percent": margin.gross_margin_percent,
        "total_units": margin.total_units,
        "discount_leakage": leakage.discount_leakage,
        "return_leakage": leakage.return_leakage,
        "total_leakage": leakage.total_leakage,
        "leakage_percent": leakage.leakage_percent,
    }))
}
