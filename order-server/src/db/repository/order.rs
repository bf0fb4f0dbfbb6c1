//! Order Repository
//!
//! CRUD access to the `order` table. Status transitions and every write
//! that touches dispatch progress go through the dispatch engine, which
//! owns the multi-record transactions.

use super::{BaseRepository, RepoError, RepoResult, parse_id};
use crate::db::models::{Order, OrderUpdate};
use crate::utils::time::now_millis;
use shared::OrderStatus;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const ORDER_TABLE: &str = "order";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// List all orders, newest first
    pub async fn find_all(&self, limit: i64, offset: i64) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order ORDER BY created_at DESC LIMIT $limit START $offset")
            .bind(("limit", limit))
            .bind(("offset", offset))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Find orders by status
    pub async fn find_by_status(&self, status: OrderStatus) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE status = $status ORDER BY created_at DESC")
            .bind(("status", status))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Orders created inside `[start, end)`, or every order when no
    /// window is given (the reporting input set)
    pub async fn find_in_range(&self, window: Option<(i64, i64)>) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = match window {
            Some((start, end)) => {
                self.base
                    .db()
                    .query(
                        "SELECT * FROM order WHERE created_at >= $start AND created_at < $end \
                         ORDER BY created_at",
                    )
                    .bind(("start", start))
                    .bind(("end", end))
                    .await?
                    .take(0)?
            }
            None => {
                self.base
                    .db()
                    .query("SELECT * FROM order ORDER BY created_at")
                    .await?
                    .take(0)?
            }
        };
        Ok(orders)
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let record_id = parse_id(ORDER_TABLE, id)?;
        let order: Option<Order> = self.base.db().select(record_id).await?;
        Ok(order)
    }

    /// Create a new order (already snapshotted and validated)
    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        let created: Option<Order> = self.base.db().create(ORDER_TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Update customer identity fields
    pub async fn update(&self, id: &str, data: OrderUpdate) -> RepoResult<Order> {
        let thing = parse_id(ORDER_TABLE, id)?;

        let mut set_parts: Vec<&str> = vec!["updated_at = $updated_at"];
        if data.customer_name.is_some() {
            set_parts.push("customer_name = $customer_name");
        }
        if data.customer_city.is_some() {
            set_parts.push("customer_city = $customer_city");
        }
        if data.customer_phone.is_some() {
            set_parts.push("customer_phone = $customer_phone");
        }
        if data.delivery_location.is_some() {
            set_parts.push("delivery_location = $delivery_location");
        }

        let query_str = format!("UPDATE $thing SET {} RETURN AFTER", set_parts.join(", "));

        let mut query = self
            .base
            .db()
            .query(&query_str)
            .bind(("thing", thing))
            .bind(("updated_at", now_millis()));
        if let Some(v) = data.customer_name {
            query = query.bind(("customer_name", v));
        }
        if let Some(v) = data.customer_city {
            query = query.bind(("customer_city", v));
        }
        if let Some(v) = data.customer_phone {
            query = query.bind(("customer_phone", v));
        }
        if let Some(v) = data.delivery_location {
            query = query.bind(("delivery_location", v));
        }

        let orders: Vec<Order> = query.await?.take(0)?;
        orders
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// Set status only (bookkeeping transitions: deliver / cancel)
    pub async fn set_status(&self, id: &str, status: OrderStatus) -> RepoResult<Order> {
        let thing = parse_id(ORDER_TABLE, id)?;
        let orders: Vec<Order> = self
            .base
            .db()
            .query("UPDATE $thing SET status = $status, updated_at = $now RETURN AFTER")
            .bind(("thing", thing))
            .bind(("status", status))
            .bind(("now", now_millis()))
            .await?
            .take(0)?;
        orders
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// Hard delete an order
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let record_id = parse_id(ORDER_TABLE, id)?;
        let result: Option<Order> = self.base.db().delete(record_id).await?;
        if result.is_none() {
            return Err(RepoError::NotFound(format!("Order {} not found", id)));
        }
        Ok(())
    }
}
