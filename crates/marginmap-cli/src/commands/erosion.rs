use clap::Args;
use serde_json::Value;

use marginmap_core::margin::margin_erosion_summary;

use crate::input::{self, DataArgs};

/// Arguments for the margin erosion summary
#[derive(Args)]
pub struct ErosionArgs {
    #[command(flatten)]
    pub data: DataArgs,
}

pub fn run_erosion(args: ErosionArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let dataset = input::load_dataset(&args.data)?;
    Ok(serde_json::to_value(margin_erosion_summary(&dataset))?)
}
