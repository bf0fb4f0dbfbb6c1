//! Order Model
//!
//! 订单 + 内嵌明细行。发货进度有两份记录：
//! - `items[].dispatched_quantity` — 每行累计发货数
//! - `dispatched_items` — 逐次发货事件日志 (append-only，撤销时清空)

use super::serde_helpers;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{DispatchRecord, OrderStatus};
use surrealdb::RecordId;

/// Order ID type
pub type OrderId = RecordId;

/// One product line within an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    /// Product reference ("product:<id>")
    pub product: String,
    /// Name snapshot at order time
    pub product_name: String,
    pub unit: String,
    /// Ordered amount
    pub quantity: i64,
    /// Unit price snapshot
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Cumulative amount already dispatched
    #[serde(default)]
    pub dispatched_quantity: i64,
}

impl OrderItem {
    /// Amount still waiting to be dispatched
    pub fn outstanding(&self) -> i64 {
        self.quantity - self.dispatched_quantity
    }

    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<OrderId>,
    // Customer identity snapshot: denormalized, not a record link
    pub customer_name: String,
    #[serde(default)]
    pub customer_city: String,
    #[serde(default)]
    pub customer_phone: String,
    #[serde(default)]
    pub delivery_location: String,
    #[serde(default)]
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    /// Dispatch event log, cleared by reversal
    #[serde(default)]
    pub dispatched_items: Vec<DispatchRecord>,
    /// Transport names associated with dispatches (duplicate-free)
    #[serde(default)]
    pub delivered_by: Vec<String>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl Order {
    /// Order revenue: Σ quantity × price over all items
    pub fn total(&self) -> Decimal {
        self.items.iter().map(|i| i.line_total()).sum()
    }

    /// True when every item is fully dispatched
    pub fn fully_dispatched(&self) -> bool {
        self.items.iter().all(|i| i.outstanding() == 0)
    }

    /// Record id as "order:<id>" string (empty for unsaved orders)
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|t| t.to_string()).unwrap_or_default()
    }
}

/// Item line in a create payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemCreate {
    pub product: String,
    pub quantity: i64,
}

/// Create order payload
///
/// Product name, unit and price are snapshotted from the product table at
/// creation, not trusted from the client.
#[derive(Debug, Clone, Deserialize, validator::Validate)]
pub struct OrderCreate {
    #[validate(length(min = 1, message = "customer_name is required"))]
    pub customer_name: String,
    #[serde(default)]
    pub customer_city: String,
    #[serde(default)]
    pub customer_phone: String,
    #[serde(default)]
    pub delivery_location: String,
    #[validate(length(min = 1, message = "order needs at least one item"))]
    pub items: Vec<OrderItemCreate>,
}

/// Update order payload (customer fields only; items are immutable after
/// creation and progress is driven by the dispatch operations)
#[derive(Debug, Clone, Deserialize)]
pub struct OrderUpdate {
    pub customer_name: Option<String>,
    pub customer_city: Option<String>,
    pub customer_phone: Option<String>,
    pub delivery_location: Option<String>,
}
