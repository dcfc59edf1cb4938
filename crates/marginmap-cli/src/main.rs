mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::customer::{CustomerArgs, CustomerSummaryArgs};
use commands::dashboard::DashboardArgs;
use commands::erosion::ErosionArgs;
use commands::margin::MarginArgs;
use commands::recommend::RecommendArgs;
use commands::sku::{BenchmarkArgs, SkuArgs, SkuSummaryArgs};

/// Margin analytics over sales-transaction data
#[derive(Parser)]
#[command(
    name = "mmap",
    version,
    about = "Margin analytics over sales-transaction data",
    long_about = "Computes gross-margin, leakage, and expense-erosion metrics per \
                  SKU/customer/region from transaction data, compares them against \
                  benchmarks, and generates dollar-quantified pricing recommendations. \
                  All arithmetic is decimal-exact."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Portfolio dashboard: KPIs, problem lists, margin trend
    Dashboard(DashboardArgs),
    /// Portfolio gross margin and leakage totals
    Margin(MarginArgs),
    /// Full profitability report for one SKU (or all SKUs)
    Sku(SkuArgs),
    /// Full profitability report for one customer (or all customers)
    Customer(CustomerArgs),
    /// Per-SKU roll-up over a date range
    SkuSummary(SkuSummaryArgs),
    /// Per-customer roll-up over a date range
    CustomerSummary(CustomerSummaryArgs),
    /// Cross-portfolio margin erosion summary
    Erosion(ErosionArgs),
    /// Generate and persist pricing recommendations
    Recommend(RecommendArgs),
    /// Resolve the margin benchmark for a category
    Benchmark(BenchmarkArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Dashboard(args) => commands::dashboard::run_dashboard(args),
        Commands::Margin(args) => commands::margin::run_margin(args),
        Commands::Sku(args) => commands::sku::run_sku(args),
        Commands::Customer(args) => commands::customer::run_customer(args),
        Commands::SkuSummary(args) => commands::sku::run_sku_summary(args),
        Commands::CustomerSummary(args) => commands::customer::run_customer_summary(args),
        Commands::Erosion(args) => commands::erosion::run_erosion(args),
        Commands::Recommend(args) => commands::recommend::run_recommend(args),
        Commands::Benchmark(args) => commands::sku::run_benchmark(args),
        Commands::Version => {
            println!("mmap {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
