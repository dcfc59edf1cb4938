use clap::Args;
use serde_json::Value;
use std::fs;
use std::path::Path;

use marginmap_core::recommend::{
    generate_recommendations, save_recommendations, InMemoryRecommendationStore, Recommendation,
    RecommendationStore,
};

use crate::input::{self, DataArgs};

/// Arguments for recommendation generation
#[derive(Args)]
pub struct RecommendArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// JSON file holding the recommendation store; when given, the prior
    /// open batch is archived and the new one persisted there
    #[arg(long)]
    pub store: Option<String>,
}

pub fn run_recommend(args: RecommendArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let dataset = input::load_dataset(&args.data)?;

    let Some(ref store_path) = args.store else {
        // Dry run: generate without persisting.
        return Ok(serde_json::to_value(generate_recommendations(&dataset))?);
    };

    let mut store = load_store(store_path)?;
    let saved = save_recommendations(&dataset, &mut store)?;
    write_store(store_path, &store)?;
    Ok(serde_json::to_value(saved)?)
}

fn load_store(path: &str) -> Result<InMemoryRecommendationStore, Box<dyn std::error::Error>> {
    if !Path::new(path).exists() {
        return Ok(InMemoryRecommendationStore::new());
    }
    let records: Vec<Recommendation> = input::file::read_json(path)?;
    Ok(InMemoryRecommendationStore::with_records(records))
}

fn write_store(
    path: &str,
    store: &InMemoryRecommendationStore,
) -> Result<(), Box<dyn std::error::Error>> {
    let records = store.all_recommendations()?;
    let contents = serde_json::to_string_pretty(&records)?;
    fs::write(path, contents).map_err(|e| format!("Failed to write '{}': {}", path, e))?;
    Ok(())
}
