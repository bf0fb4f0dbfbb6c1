//! Product Repository
//!
//! Stock writes always append their ledger entry in the same UPDATE
//! statement: `stock_history` first (so the expression still sees the
//! previous quantity), then `stock`.

use super::{BaseRepository, RepoError, RepoResult, parse_id};
use crate::db::models::{Product, ProductCreate, ProductUpdate};
use crate::utils::time::now_millis;
use shared::{StockChangeType, StockEntry};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const PRODUCT_TABLE: &str = "product";

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all active products
    pub async fn find_all(&self) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product WHERE is_active = true ORDER BY name")
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Find product by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let record_id = parse_id(PRODUCT_TABLE, id)?;
        let product: Option<Product> = self.base.db().select(record_id).await?;
        Ok(product)
    }

    /// Find several products at once ("product:<id>" references)
    ///
    /// Used by the dispatch engine to load every product an order touches
    /// in one round trip. Missing references are simply absent from the
    /// result; the caller decides whether that is an error.
    pub async fn find_by_ids(&self, ids: &[String]) -> RepoResult<Vec<Product>> {
        let things = ids
            .iter()
            .map(|id| parse_id(PRODUCT_TABLE, id))
            .collect::<RepoResult<Vec<_>>>()?;
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product WHERE id IN $ids")
            .bind(("ids", things))
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Create a new product with its initial stock ledger entry
    pub async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        if data.stock < 0 {
            return Err(RepoError::Validation("stock cannot be negative".into()));
        }

        let product = Product::new(data.name, data.unit, data.price, data.stock, now_millis());
        let created: Option<Product> = self
            .base
            .db()
            .create(PRODUCT_TABLE)
            .content(product)
            .await?;

        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Update descriptive fields of a product
    pub async fn update(&self, id: &str, data: ProductUpdate) -> RepoResult<Product> {
        let thing = parse_id(PRODUCT_TABLE, id)?;

        // Build dynamic SET clauses with proper type bindings
        let mut set_parts: Vec<&str> = vec!["updated_at = $updated_at"];
        if data.name.is_some() {
            set_parts.push("name = $name");
        }
        if data.unit.is_some() {
            set_parts.push("unit = $unit");
        }
        if data.price.is_some() {
            set_parts.push("price = $price");
        }
        if data.is_active.is_some() {
            set_parts.push("is_active = $is_active");
        }

        let query_str = format!("UPDATE $thing SET {} RETURN AFTER", set_parts.join(", "));

        let mut query = self
            .base
            .db()
            .query(&query_str)
            .bind(("thing", thing))
            .bind(("updated_at", now_millis()));
        if let Some(v) = data.name {
            query = query.bind(("name", v));
        }
        if let Some(v) = data.unit {
            query = query.bind(("unit", v));
        }
        if let Some(v) = data.price {
            query = query.bind(("price", v));
        }
        if let Some(v) = data.is_active {
            query = query.bind(("is_active", v));
        }

        let products: Vec<Product> = query.await?.take(0)?;
        products
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    /// Manual stock update. Trusted input; appends a MANUAL_UPDATE
    /// ledger entry and sets the quantity in one statement
    pub async fn update_stock(&self, id: &str, new_stock: i64) -> RepoResult<Product> {
        if new_stock < 0 {
            return Err(RepoError::Validation("stock cannot be negative".into()));
        }

        let thing = parse_id(PRODUCT_TABLE, id)?;
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))?;

        let entry = StockEntry::new(
            now_millis(),
            new_stock - current.stock,
            new_stock,
            StockChangeType::ManualUpdate,
        );

        let products: Vec<Product> = self
            .base
            .db()
            .query("UPDATE $thing SET stock_history += $entry, stock = $stock, updated_at = $now RETURN AFTER")
            .bind(("thing", thing))
            .bind(("entry", entry))
            .bind(("stock", new_stock))
            .bind(("now", now_millis()))
            .await?
            .take(0)?;

        products
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    /// Hard delete a product
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let record_id = parse_id(PRODUCT_TABLE, id)?;
        let result: Option<Product> = self.base.db().delete(record_id).await?;
        if result.is_none() {
            return Err(RepoError::NotFound(format!("Product {} not found", id)));
        }
        Ok(())
    }
}
