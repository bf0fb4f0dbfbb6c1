//! Database Module
//!
//! Embedded SurrealDB (RocksDB backend), the store of record for all
//! tables. Opened once at startup and shared through [`ServerState`].
//!
//! [`ServerState`]: crate::core::ServerState

pub mod models;
pub mod repository;

use std::path::Path;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

use crate::utils::AppError;

const NAMESPACE: &str = "tally";
const DATABASE: &str = "main";

/// Open the embedded database under the given directory
pub async fn open(db_dir: &Path) -> Result<Surreal<Db>, AppError> {
    let db_path = db_dir.join("tally.db");
    let db = Surreal::new::<RocksDb>(db_path.as_path())
        .await
        .map_err(|e| AppError::database(format!("Failed to open database: {}", e)))?;

    db.use_ns(NAMESPACE)
        .use_db(DATABASE)
        .await
        .map_err(|e| AppError::database(format!("Failed to select namespace: {}", e)))?;

    tracing::info!(path = %db_path.display(), "Database opened (SurrealDB embedded)");
    Ok(db)
}
