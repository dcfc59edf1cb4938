pub mod internal;
pub mod resolver;

pub use internal::{calculate_internal_benchmark, InternalBenchmark, SkuMarginView};
pub use resolver::{resolve_benchmark, BenchmarkBand};
