//! Transport Repository

use super::{BaseRepository, RepoError, RepoResult, parse_id};
use crate::db::models::{Transport, TransportCreate, TransportUpdate};
use crate::utils::time::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TRANSPORT_TABLE: &str = "transport";

#[derive(Clone)]
pub struct TransportRepository {
    base: BaseRepository,
}

impl TransportRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Transport>> {
        let transports: Vec<Transport> = self
            .base
            .db()
            .query("SELECT * FROM transport ORDER BY name")
            .await?
            .take(0)?;
        Ok(transports)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Transport>> {
        let record_id = parse_id(TRANSPORT_TABLE, id)?;
        let transport: Option<Transport> = self.base.db().select(record_id).await?;
        Ok(transport)
    }

    pub async fn create(&self, data: TransportCreate) -> RepoResult<Transport> {
        let now = now_millis();
        let transport = Transport {
            id: None,
            name: data.name,
            phone: data.phone,
            city: data.city,
            created_at: now,
            updated_at: now,
        };

        let created: Option<Transport> = self
            .base
            .db()
            .create(TRANSPORT_TABLE)
            .content(transport)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create transport".to_string()))
    }

    pub async fn update(&self, id: &str, data: TransportUpdate) -> RepoResult<Transport> {
        let thing = parse_id(TRANSPORT_TABLE, id)?;

        let mut set_parts: Vec<&str> = vec!["updated_at = $updated_at"];
        if data.name.is_some() {
            set_parts.push("name = $name");
        }
        if data.phone.is_some() {
            set_parts.push("phone = $phone");
        }
        if data.city.is_some() {
            set_parts.push("city = $city");
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
        if let Some(v) = data.phone {
            query = query.bind(("phone", v));
        }
        if let Some(v) = data.city {
            query = query.bind(("city", v));
        }

        let transports: Vec<Transport> = query.await?.take(0)?;
        transports
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Transport {} not found", id)))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let record_id = parse_id(TRANSPORT_TABLE, id)?;
        let result: Option<Transport> = self.base.db().delete(record_id).await?;
        if result.is_none() {
            return Err(RepoError::NotFound(format!("Transport {} not found", id)));
        }
        Ok(())
    }
}
