//! Stock ledger types
//!
//! Every mutation of a product's `stock` appends exactly one ledger
//! entry in the same store operation. Replaying `change` from the first
//! entry must always reproduce the current `stock`.

use serde::{Deserialize, Serialize};

/// Why a stock quantity changed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockChangeType {
    /// 建档时的初始库存
    Initial,
    /// 手工修改库存
    ManualUpdate,
    /// 订单确认扣减
    OrderConfirmation,
    /// 撤销发货回补
    DispatchReversal,
}

/// One append-only stock ledger entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockEntry {
    /// Unix millis
    pub timestamp: i64,
    /// Signed delta applied to the stock quantity
    pub change: i64,
    /// Resulting quantity after the change
    pub stock: i64,
    pub change_type: StockChangeType,
    /// Order reference ("order:<id>") for confirmation / reversal entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
}

impl StockEntry {
    pub fn new(timestamp: i64, change: i64, stock: i64, change_type: StockChangeType) -> Self {
        Self {
            timestamp,
            change,
            stock,
            change_type,
            order: None,
        }
    }

    pub fn with_order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }
}

/// Replay a ledger and return the resulting quantity
///
/// Used by tests and consistency checks; entries are insertion-ordered.
pub fn replay(entries: &[StockEntry]) -> i64 {
    entries.iter().map(|e| e.change).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replay_matches_running_stock() {
        let entries = vec![
            StockEntry::new(1, 10, 10, StockChangeType::Initial),
            StockEntry::new(2, -4, 6, StockChangeType::OrderConfirmation).with_order("order:a"),
            StockEntry::new(3, 4, 10, StockChangeType::DispatchReversal).with_order("order:a"),
            StockEntry::new(4, -2, 8, StockChangeType::ManualUpdate),
        ];
        assert_eq!(replay(&entries), 8);
        assert_eq!(entries.last().unwrap().stock, 8);
    }

    #[test]
    fn test_order_reference_only_where_set() {
        let e = StockEntry::new(1, 5, 5, StockChangeType::Initial);
        let json = serde_json::to_value(&e).unwrap();
        assert!(json.get("order").is_none());
    }
}
