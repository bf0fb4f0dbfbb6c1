//! Reporting / aggregation
//!
//! Derived, read-only rollups over the order collection:
//!
//! - [`analytics`] - revenue, top products, categories, locations
//! - [`category`] - product name to category inference heuristic
//! - [`export`] - the fixed-sheet workbook export

pub mod analytics;
pub mod category;
pub mod export;

pub use analytics::{SalesAnalytics, build};
pub use export::export_workbook;
