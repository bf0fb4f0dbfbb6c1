//! Customer Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

pub type CustomerId = RecordId;

/// Customer model, a flat contact record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<CustomerId>,
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub phone: String,
    /// Default delivery location copied onto new orders
    #[serde(default)]
    pub delivery_location: String,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

/// Create customer payload
#[derive(Debug, Clone, Deserialize, validator::Validate)]
pub struct CustomerCreate {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub delivery_location: String,
}

/// Update customer payload
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerUpdate {
    pub name: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub delivery_location: Option<String>,
}
