//! Transport Provider Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

pub type TransportId = RecordId;

/// Transport company, a flat contact record; the name is what gets
/// stamped into an order's `delivered_by` set on dispatch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transport {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<TransportId>,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

/// Create transport payload
#[derive(Debug, Clone, Deserialize, validator::Validate)]
pub struct TransportCreate {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub city: String,
}

/// Update transport payload
#[derive(Debug, Clone, Deserialize)]
pub struct TransportUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
}
