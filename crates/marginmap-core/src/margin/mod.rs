pub mod enhanced;
pub mod erosion;
pub mod gross;
pub mod leakage;

pub use enhanced::{calculate_enhanced_margin, EnhancedMarginSummary, ExpenseBreakdownEntry};
pub use erosion::{erosion_factors, margin_erosion_summary, ErosionFactors, ErosionSummary};
pub use gross::{calculate_gross_margin, MarginSummary};
pub use leakage::{calculate_leakage, LeakageSummary};
