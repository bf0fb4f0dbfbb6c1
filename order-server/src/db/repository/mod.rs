//! Repository Module
//!
//! Provides CRUD operations for the SurrealDB tables.
//!
//! ID convention: 全栈统一使用 "table:id" 格式。
//! 使用 surrealdb::RecordId 处理所有 ID：
//!   - 解析: let id: RecordId = "product:abc".parse()?;
//!   - 获取纯ID: id.key().to_string()
//!   - CRUD: db.select(id) / db.delete(id) 直接使用 RecordId

pub mod customer;
pub mod order;
pub mod product;
pub mod transport;
pub mod user;

// Re-exports
pub use customer::CustomerRepository;
pub use order::OrderRepository;
pub use product::ProductRepository;
pub use transport::TransportRepository;
pub use user::UserRepository;

use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use thiserror::Error;

use crate::utils::AppError;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Database(msg) => AppError::Database(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Parse an id that may or may not carry its "table:" prefix
pub fn parse_id(table: &str, id: &str) -> RepoResult<RecordId> {
    let full = if id.contains(':') {
        id.to_string()
    } else {
        format!("{}:{}", table, id)
    };
    full.parse::<RecordId>()
        .map_err(|_| RepoError::Validation(format!("Invalid {} id: {}", table, id)))
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
