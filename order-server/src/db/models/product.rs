//! Product Model

use super::serde_helpers;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{StockChangeType, StockEntry};
use surrealdb::RecordId;

/// Product ID type
pub type ProductId = RecordId;

/// Product model
///
/// `stock` is the single authoritative quantity; `stock_history` is the
/// append-only ledger that must replay to the same value. Both are
/// written in the same store statement by every mutator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<ProductId>,
    pub name: String,
    /// Display unit, e.g. "pcs", "kg"
    pub unit: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock: i64,
    #[serde(default)]
    pub stock_history: Vec<StockEntry>,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

fn default_true() -> bool {
    true
}

impl Product {
    /// New product with its initial ledger entry
    pub fn new(name: String, unit: String, price: Decimal, stock: i64, now: i64) -> Self {
        Self {
            id: None,
            name,
            unit,
            price,
            stock,
            stock_history: vec![StockEntry::new(now, stock, stock, StockChangeType::Initial)],
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Create product payload
#[derive(Debug, Clone, Deserialize, validator::Validate)]
pub struct ProductCreate {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "unit is required"))]
    pub unit: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[validate(range(min = 0, message = "stock cannot be negative"))]
    #[serde(default)]
    pub stock: i64,
}

/// Update product payload (descriptive fields only; stock goes through
/// the dedicated stock endpoint so the ledger stays consistent)
#[derive(Debug, Clone, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub unit: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    pub is_active: Option<bool>,
}

/// Manual stock update payload
#[derive(Debug, Clone, Deserialize, validator::Validate)]
pub struct StockUpdate {
    #[validate(range(min = 0, message = "stock cannot be negative"))]
    pub stock: i64,
}
