pub mod customer;
pub mod sku;
pub mod summary;

pub use customer::{
    all_customer_reports, customer_profitability, median, CustomerReport, SkuRollup,
    UnderpricedSku,
};
pub use sku::{
    all_sku_reports, sku_profitability, BenchmarkPerformance, BenchmarkStatus, CustomerPressure,
    GroupMargin, PayerOutlier, SkuReport,
};
pub use summary::{
    list_customer_summary, list_sku_summary, CustomerSummaryRow, SkuSummaryRow,
};
