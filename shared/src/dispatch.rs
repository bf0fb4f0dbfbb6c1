//! Dispatch wire DTOs

use serde::{Deserialize, Serialize};

/// One requested dispatch line: ship `quantity` units of `product` now
///
/// Lines with `quantity == 0` are dropped by the server before
/// validation, never rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchLine {
    /// Product reference ("product:<id>")
    pub product: String,
    pub quantity: i64,
}

/// One recorded dispatch event on an order
///
/// Distinct from the per-item cumulative `dispatched_quantity` counter:
/// records accumulate one per dispatch action and are only cleared by a
/// dispatch reversal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DispatchRecord {
    pub product: String,
    pub quantity: i64,
    /// Unix millis
    pub timestamp: i64,
}
