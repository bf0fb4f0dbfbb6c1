use crate::db::repository::RepoError;
use crate::utils::AppError;
use shared::TransitionError;
use thiserror::Error;

/// One order line that cannot be confirmed against current stock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockShortage {
    /// Product reference ("product:<id>")
    pub product: String,
    pub product_name: String,
    pub requested: i64,
    pub available: i64,
}

/// Render every failing product into one message; the whole confirm is
/// rejected, so the caller sees the full list at once
fn shortage_summary(shortages: &[StockShortage]) -> String {
    let parts: Vec<String> = shortages
        .iter()
        .map(|s| {
            format!(
                "{} (requested {}, available {})",
                s.product_name, s.requested, s.available
            )
        })
        .collect();
    parts.join(", ")
}

/// Dispatch engine errors
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error(transparent)]
    InvalidState(#[from] TransitionError),

    #[error("Insufficient stock: {}", shortage_summary(.0))]
    InsufficientStock(Vec<StockShortage>),

    #[error("Cannot dispatch {requested} x {product_name}: at most {available} undispatched")]
    OverDispatch {
        product_name: String,
        requested: i64,
        available: i64,
    },

    #[error("Product {0} is not part of this order")]
    UnknownLine(String),

    #[error("Invalid dispatch quantity {quantity} for {product}")]
    InvalidQuantity { product: String, quantity: i64 },

    #[error("Storage error: {0}")]
    Storage(#[from] RepoError),
}

impl From<DispatchError> for AppError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::OrderNotFound(msg) => AppError::NotFound(msg),
            DispatchError::ProductNotFound(msg) => AppError::NotFound(msg),
            DispatchError::InvalidState(e) => AppError::BusinessRule(e.to_string()),
            e @ DispatchError::InsufficientStock(_) => AppError::BusinessRule(e.to_string()),
            e @ DispatchError::OverDispatch { .. } => AppError::BusinessRule(e.to_string()),
            e @ DispatchError::UnknownLine(_) => AppError::Validation(e.to_string()),
            e @ DispatchError::InvalidQuantity { .. } => AppError::Validation(e.to_string()),
            DispatchError::Storage(e) => e.into(),
        }
    }
}

pub type DispatchResult<T> = Result<T, DispatchError>;
