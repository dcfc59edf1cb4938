use napi::Result as NapiResult;
use napi_derive::napi;

use marginmap_core::dashboard::{dashboard_summary, TrendInterval};
use marginmap_core::margin::{
    calculate_gross_margin, calculate_leakage, margin_erosion_summary,
};
use marginmap_core::profitability::{
    all_customer_reports, all_sku_reports, customer_profitability, sku_profitability,
};
use marginmap_core::recommend::generate_recommendations;
use marginmap_core::{Dataset, DatasetInput};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_dataset(dataset_json: &str) -> NapiResult<Dataset> {
    let input: DatasetInput = serde_json::from_str(dataset_json).map_err(to_napi_error)?;
    Ok(Dataset::from(input))
}

// ---------------------------------------------------------------------------
// Margin
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_margin(dataset_json: String) -> NapiResult<String> {
    let dataset = parse_dataset(&dataset_json)?;
    let output = calculate_gross_margin(dataset.transactions());
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compute_leakage(dataset_json: String) -> NapiResult<String> {
    let dataset = parse_dataset(&dataset_json)?;
    let output = calculate_leakage(dataset.transactions());
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn erosion_summary(dataset_json: String) -> NapiResult<String> {
    let dataset = parse_dataset(&dataset_json)?;
    let output = margin_erosion_summary(&dataset);
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Profitability
// ---------------------------------------------------------------------------

#[napi]
pub fn sku_report(dataset_json: String, sku_code: String) -> NapiResult<String> {
    let dataset = parse_dataset(&dataset_json)?;
    let output = sku_profitability(&dataset, &sku_code)
        .ok_or_else(|| to_napi_error(format!("SKU '{}' has no transactions", sku_code)))?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn all_sku_profitability(dataset_json: String) -> NapiResult<String> {
    let dataset = parse_dataset(&dataset_json)?;
    serde_json::to_string(&all_sku_reports(&dataset)).map_err(to_napi_error)
}

#[napi]
pub fn customer_report(dataset_json: String, customer_name: String) -> NapiResult<String> {
    let dataset = parse_dataset(&dataset_json)?;
    let output = customer_profitability(&dataset, &customer_name).ok_or_else(|| {
        to_napi_error(format!("Customer '{}' has no transactions", customer_name))
    })?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn all_customer_profitability(dataset_json: String) -> NapiResult<String> {
    let dataset = parse_dataset(&dataset_json)?;
    serde_json::to_string(&all_customer_reports(&dataset)).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

#[napi]
pub fn resolve_category_benchmark(dataset_json: String, category: String) -> NapiResult<String> {
    let dataset = parse_dataset(&dataset_json)?;
    let band = marginmap_core::benchmark::resolve_benchmark(
        dataset.benchmarks(),
        &category,
        dataset.business_type(),
    );
    serde_json::to_string(&band).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Recommendations and dashboard
// ---------------------------------------------------------------------------

#[napi]
pub fn recommendations(dataset_json: String) -> NapiResult<String> {
    let dataset = parse_dataset(&dataset_json)?;
    serde_json::to_string(&generate_recommendations(&dataset)).map_err(to_napi_error)
}

#[napi]
pub fn dashboard(dataset_json: String, monthly: bool) -> NapiResult<String> {
    let dataset = parse_dataset(&dataset_json)?;
    let interval = if monthly {
        TrendInterval::Monthly
    } else {
        TrendInterval::Daily
    };
    let report = dashboard_summary(&dataset, None, interval);
    serde_json::to_string(&report).map_err(to_napi_error)
}
