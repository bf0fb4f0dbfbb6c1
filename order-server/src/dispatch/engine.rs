//! DispatchEngine - order workflow transitions and their inventory effects
//!
//! # Operation flow
//!
//! ```text
//! confirm / dispatch / reverse(order_id)
//!     ├─ 1. Load order, check the status guard
//!     ├─ 2. Load the affected products
//!     ├─ 3. Compute the plan (pure, see `plan`)
//!     ├─ 4. Apply every write in one database transaction
//!     └─ 5. Reload and return the order
//! ```
//!
//! Multi-record mutations (confirm debits N products, reversal credits
//! them back) run as a single SurrealDB transaction, so a failure leaves
//! neither stock nor status half-applied. Statement order inside the
//! transaction still matches the operation contract: confirm writes the
//! order status last, reversal writes the order first.

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::models::Order;
use crate::db::repository::{OrderRepository, ProductRepository, RepoError, parse_id};
use crate::utils::time::now_millis;
use shared::{DispatchLine, DispatchRecord, OrderStatus, StockChangeType, StockEntry};

use super::error::{DispatchError, DispatchResult};
use super::plan::{self, StockChange};

/// Order workflow engine
///
/// Stateless besides the store handle; cheap to construct per request.
#[derive(Clone)]
pub struct DispatchEngine {
    db: Surreal<Db>,
    orders: OrderRepository,
    products: ProductRepository,
}

impl DispatchEngine {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            orders: OrderRepository::new(db.clone()),
            products: ProductRepository::new(db.clone()),
            db,
        }
    }

    async fn load_order(&self, order_id: &str) -> DispatchResult<Order> {
        self.orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| DispatchError::OrderNotFound(order_id.to_string()))
    }

    /// Confirm an order: reserve stock for every item
    ///
    /// Rejected with the full shortage list if any item exceeds current
    /// stock, with no partial effect. On success every product is debited,
    /// gets an ORDER_CONFIRMATION ledger entry, and the order becomes
    /// Confirmed (status is the last write in the transaction).
    pub async fn confirm(&self, order_id: &str) -> DispatchResult<Order> {
        let order = self.load_order(order_id).await?;
        order.status.guard(order.status.can_confirm(), "confirm")?;

        let refs: Vec<String> = order.items.iter().map(|i| i.product.clone()).collect();
        let products = self.products.find_by_ids(&refs).await?;
        let debits = plan::plan_confirm(&order.items, &products)?;

        let now = now_millis();
        let order_ref = order.id_string();

        let mut statements = vec!["BEGIN TRANSACTION".to_string()];
        for i in 0..debits.len() {
            statements.push(format!(
                "UPDATE $p{i} SET stock_history += $h{i}, stock = $s{i}, updated_at = $now"
            ));
        }
        statements.push("UPDATE $order SET status = $status, updated_at = $now".to_string());
        statements.push("COMMIT TRANSACTION".to_string());

        let mut query = self
            .db
            .query(statements.join(";\n"))
            .bind(("now", now))
            .bind(("order", parse_id("order", &order_ref)?))
            .bind(("status", OrderStatus::Confirmed));
        for (i, debit) in debits.iter().enumerate() {
            let entry = StockEntry::new(now, debit.change, debit.new_stock, StockChangeType::OrderConfirmation)
                .with_order(order_ref.clone());
            query = query
                .bind((format!("p{}", i), parse_id("product", &debit.product)?))
                .bind((format!("h{}", i), entry))
                .bind((format!("s{}", i), debit.new_stock));
        }
        query
            .await
            .map_err(RepoError::from)?
            .check()
            .map_err(RepoError::from)?;

        tracing::info!(
            order_id = %order_ref,
            products = debits.len(),
            "Order confirmed, stock reserved"
        );

        self.load_order(order_id).await
    }

    /// Partially dispatch an order
    ///
    /// Zero-quantity lines are dropped; an empty request is a no-op that
    /// returns the unchanged order. Dispatching the same product again
    /// accumulates. Product stock is untouched: it was already reserved
    /// at confirm time; dispatch only tracks fulfillment progress.
    pub async fn dispatch(
        &self,
        order_id: &str,
        lines: Vec<DispatchLine>,
        transport: Option<String>,
    ) -> DispatchResult<Order> {
        let order = self.load_order(order_id).await?;
        order.status.guard(order.status.can_dispatch(), "dispatch")?;

        let lines = plan::normalize_lines(lines)?;
        if lines.is_empty() {
            tracing::debug!(order_id = %order.id_string(), "Dispatch request with no effective lines, nothing to do");
            return Ok(order);
        }

        let allocations = plan::plan_dispatch(&order.items, &lines)?;
        self.apply_dispatch(order, allocations, transport, OrderStatus::PartialDispatch)
            .await
    }

    /// Dispatch everything outstanding and mark the order fully dispatched
    pub async fn dispatch_all(
        &self,
        order_id: &str,
        transport: Option<String>,
    ) -> DispatchResult<Order> {
        let order = self.load_order(order_id).await?;
        order.status.guard(order.status.can_dispatch(), "dispatch")?;

        let allocations = plan::plan_full_dispatch(&order.items);
        self.apply_dispatch(order, allocations, transport, OrderStatus::FullDispatch)
            .await
    }

    async fn apply_dispatch(
        &self,
        order: Order,
        allocations: Vec<plan::Allocation>,
        transport: Option<String>,
        status: OrderStatus,
    ) -> DispatchResult<Order> {
        let now = now_millis();
        let order_ref = order.id_string();

        let mut items = order.items;
        let mut records = Vec::with_capacity(allocations.len());
        for allocation in &allocations {
            items[allocation.item_index].dispatched_quantity += allocation.quantity;
            records.push(DispatchRecord {
                product: allocation.product.clone(),
                quantity: allocation.quantity,
                timestamp: now,
            });
        }

        let mut delivered_by = order.delivered_by;
        if let Some(name) = transport.filter(|n| !n.is_empty())
            && !delivered_by.contains(&name)
        {
            delivered_by.push(name);
        }

        let orders: Vec<Order> = self
            .db
            .query(
                "UPDATE $order SET items = $items, dispatched_items += $records, \
                 delivered_by = $delivered_by, status = $status, updated_at = $now RETURN AFTER",
            )
            .bind(("order", parse_id("order", &order_ref)?))
            .bind(("items", items))
            .bind(("records", records))
            .bind(("delivered_by", delivered_by))
            .bind(("status", status))
            .bind(("now", now))
            .await
            .map_err(RepoError::from)?
            .take(0)
            .map_err(RepoError::from)?;

        tracing::info!(
            order_id = %order_ref,
            lines = allocations.len(),
            status = ?status,
            "Order dispatched"
        );

        orders
            .into_iter()
            .next()
            .ok_or_else(|| DispatchError::OrderNotFound(order_ref))
    }

    /// Reverse an order's dispatches back to Confirmed
    ///
    /// Every dispatched amount is credited back to its product with a
    /// DISPATCH_REVERSAL ledger entry, dispatch progress and the event
    /// log are reset, and the order returns to Confirmed. All of it in
    /// one transaction, order record first.
    pub async fn reverse(&self, order_id: &str) -> DispatchResult<Order> {
        let order = self.load_order(order_id).await?;
        order
            .status
            .guard(order.status.can_reverse(), "reverse dispatch")?;

        let refs: Vec<String> = order
            .items
            .iter()
            .filter(|i| i.dispatched_quantity > 0)
            .map(|i| i.product.clone())
            .collect();
        let products = self.products.find_by_ids(&refs).await?;
        let credits = plan::plan_reversal(&order.items, &products)?;

        let now = now_millis();
        let order_ref = order.id_string();

        let mut items = order.items.clone();
        for item in &mut items {
            item.dispatched_quantity = 0;
        }

        let mut statements = vec![
            "BEGIN TRANSACTION".to_string(),
            "UPDATE $order SET status = $status, items = $items, dispatched_items = [], \
             updated_at = $now"
                .to_string(),
        ];
        for i in 0..credits.len() {
            statements.push(format!(
                "UPDATE $p{i} SET stock_history += $h{i}, stock = $s{i}, updated_at = $now"
            ));
        }
        statements.push("COMMIT TRANSACTION".to_string());

        let mut query = self
            .db
            .query(statements.join(";\n"))
            .bind(("now", now))
            .bind(("order", parse_id("order", &order_ref)?))
            .bind(("status", OrderStatus::Confirmed))
            .bind(("items", items));
        for (i, credit) in credits.iter().enumerate() {
            let entry = StockEntry::new(now, credit.change, credit.new_stock, StockChangeType::DispatchReversal)
                .with_order(order_ref.clone());
            query = query
                .bind((format!("p{}", i), parse_id("product", &credit.product)?))
                .bind((format!("h{}", i), entry))
                .bind((format!("s{}", i), credit.new_stock));
        }
        query
            .await
            .map_err(RepoError::from)?
            .check()
            .map_err(RepoError::from)?;

        tracing::info!(
            order_id = %order_ref,
            products = credits.len(),
            restored = credits.iter().map(|c: &StockChange| c.change).sum::<i64>(),
            "Dispatch reversed, stock restored"
        );

        self.load_order(order_id).await
    }

    /// Mark a fully dispatched order as delivered (bookkeeping only)
    pub async fn deliver(&self, order_id: &str) -> DispatchResult<Order> {
        let order = self.load_order(order_id).await?;
        order.status.guard(order.status.can_deliver(), "deliver")?;
        Ok(self.orders.set_status(order_id, OrderStatus::Delivered).await?)
    }

    /// Cancel a pre-dispatch order (bookkeeping only, no inventory effect)
    pub async fn cancel(&self, order_id: &str) -> DispatchResult<Order> {
        let order = self.load_order(order_id).await?;
        order.status.guard(order.status.can_cancel(), "cancel")?;
        Ok(self.orders.set_status(order_id, OrderStatus::Cancelled).await?)
    }
}
