pub mod summary;

pub use summary::{
    dashboard_summary, CustomerKpi, DashboardReport, SkuKpi, TrendInterval, TrendPoint,
};
