//! Order status state machine
//!
//! 订单状态机:
//!
//! ```text
//! Unconfirmed ──confirm──▶ Confirmed ──dispatch──▶ PartialDispatch ⟲
//!                              │                        │
//!                              │                 dispatch_all
//!                              │                        ▼
//!                              ◀────reverse──── FullDispatch ──▶ Delivered
//!
//! Cancelled: reachable from Unconfirmed / Confirmed only
//! ```
//!
//! Transition guards live here; the actual effects (stock debits and
//! credits, dispatch records) are applied by the server's dispatch engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Order lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// 新订单，库存尚未扣减
    #[default]
    Unconfirmed,
    /// 已确认，库存已按订购数量扣减
    Confirmed,
    /// 部分发货
    PartialDispatch,
    /// 全部发货
    FullDispatch,
    /// 已送达 (终态)
    Delivered,
    /// 已取消 (终态)
    Cancelled,
}

/// Attempted transition is not allowed from the current status
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("cannot {operation} an order in status {current:?}")]
pub struct TransitionError {
    pub current: OrderStatus,
    pub operation: &'static str,
}

impl OrderStatus {
    /// Confirm is only allowed on a fresh order
    pub fn can_confirm(&self) -> bool {
        matches!(self, OrderStatus::Unconfirmed)
    }

    /// Partial and full dispatch require reserved stock
    pub fn can_dispatch(&self) -> bool {
        matches!(self, OrderStatus::Confirmed | OrderStatus::PartialDispatch)
    }

    /// Reversal undoes dispatch progress, so there must be some
    pub fn can_reverse(&self) -> bool {
        matches!(
            self,
            OrderStatus::PartialDispatch | OrderStatus::FullDispatch
        )
    }

    /// Cancel is a pre-dispatch bookkeeping transition
    pub fn can_cancel(&self) -> bool {
        matches!(self, OrderStatus::Unconfirmed | OrderStatus::Confirmed)
    }

    /// Deliver closes out a fully dispatched order
    pub fn can_deliver(&self) -> bool {
        matches!(self, OrderStatus::FullDispatch)
    }

    /// Terminal states accept no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Guard helper: error naming the rejected operation
    pub fn guard(&self, allowed: bool, operation: &'static str) -> Result<(), TransitionError> {
        if allowed {
            Ok(())
        } else {
            Err(TransitionError {
                current: *self,
                operation,
            })
        }
    }

    /// Display label (matches the wire form used by clients)
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Unconfirmed => "Unconfirmed",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::PartialDispatch => "Partial Dispatch",
            OrderStatus::FullDispatch => "Full Dispatch",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_only_from_unconfirmed() {
        assert!(OrderStatus::Unconfirmed.can_confirm());
        assert!(!OrderStatus::Confirmed.can_confirm());
        assert!(!OrderStatus::FullDispatch.can_confirm());
        assert!(!OrderStatus::Cancelled.can_confirm());
    }

    #[test]
    fn test_dispatch_requires_confirmation() {
        assert!(!OrderStatus::Unconfirmed.can_dispatch());
        assert!(OrderStatus::Confirmed.can_dispatch());
        // Repeat partial dispatch is allowed
        assert!(OrderStatus::PartialDispatch.can_dispatch());
        assert!(!OrderStatus::FullDispatch.can_dispatch());
    }

    #[test]
    fn test_reverse_requires_dispatch_progress() {
        assert!(OrderStatus::PartialDispatch.can_reverse());
        assert!(OrderStatus::FullDispatch.can_reverse());
        assert!(!OrderStatus::Unconfirmed.can_reverse());
        assert!(!OrderStatus::Confirmed.can_reverse());
        assert!(!OrderStatus::Delivered.can_reverse());
    }

    #[test]
    fn test_guard_reports_operation() {
        let err = OrderStatus::Unconfirmed
            .guard(OrderStatus::Unconfirmed.can_reverse(), "reverse dispatch")
            .unwrap_err();
        assert_eq!(err.current, OrderStatus::Unconfirmed);
        assert_eq!(err.operation, "reverse dispatch");
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_string(&OrderStatus::PartialDispatch).unwrap();
        assert_eq!(json, r#""PARTIAL_DISPATCH""#);
        let back: OrderStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, OrderStatus::PartialDispatch);
    }
}
