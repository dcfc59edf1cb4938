pub mod csv_in;
pub mod file;
pub mod stdin;

use clap::Args;
use marginmap_core::{BusinessType, Dataset, DatasetInput};

/// Dataset source flags shared by every subcommand.
#[derive(Args)]
pub struct DataArgs {
    /// Path to a JSON dataset file (transactions, expenses, benchmarks)
    #[arg(long)]
    pub input: Option<String>,

    /// Path to a transactions CSV file
    #[arg(long)]
    pub csv: Option<String>,

    /// Business type, used with --csv (JSON datasets carry their own)
    #[arg(long, default_value = "manufacturer")]
    pub business_type: String,
}

/// Load the dataset from --input, --csv, or piped stdin JSON, in that order.
pub fn load_dataset(args: &DataArgs) -> Result<Dataset, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        let input: DatasetInput = file::read_json(path)?;
        return Ok(Dataset::from(input));
    }

    if let Some(ref path) = args.csv {
        let transactions = csv_in::read_transactions(path)?;
        let business_type = parse_business_type(&args.business_type)?;
        return Ok(Dataset::new(
            business_type,
            transactions,
            Vec::new(),
            Vec::new(),
            Vec::new(),
        ));
    }

    if let Some(value) = stdin::read_stdin()? {
        let input: DatasetInput = serde_json::from_value(value)?;
        return Ok(Dataset::from(input));
    }

    Err("no dataset: provide --input, --csv, or pipe JSON on stdin".into())
}

fn parse_business_type(s: &str) -> Result<BusinessType, Box<dyn std::error::Error>> {
    match s {
        "manufacturer" => Ok(BusinessType::Manufacturer),
        "wholesaler" => Ok(BusinessType::Wholesaler),
        "retailer" => Ok(BusinessType::Retailer),
        "other" => Ok(BusinessType::Other),
        _ => Err(format!(
            "unknown business type '{}' (expected manufacturer, wholesaler, retailer, or other)",
            s
        )
        .into()),
    }
}
