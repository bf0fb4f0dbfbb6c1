//! Customer Repository

use super::{BaseRepository, RepoError, RepoResult, parse_id};
use crate::db::models::{Customer, CustomerCreate, CustomerUpdate};
use crate::utils::time::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const CUSTOMER_TABLE: &str = "customer";

#[derive(Clone)]
pub struct CustomerRepository {
    base: BaseRepository,
}

impl CustomerRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Customer>> {
        let customers: Vec<Customer> = self
            .base
            .db()
            .query("SELECT * FROM customer ORDER BY name")
            .await?
            .take(0)?;
        Ok(customers)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Customer>> {
        let record_id = parse_id(CUSTOMER_TABLE, id)?;
        let customer: Option<Customer> = self.base.db().select(record_id).await?;
        Ok(customer)
    }

    pub async fn create(&self, data: CustomerCreate) -> RepoResult<Customer> {
        let now = now_millis();
        let customer = Customer {
            id: None,
            name: data.name,
            city: data.city,
            phone: data.phone,
            delivery_location: data.delivery_location,
            created_at: now,
            updated_at: now,
        };

        let created: Option<Customer> = self
            .base
            .db()
            .create(CUSTOMER_TABLE)
            .content(customer)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create customer".to_string()))
    }

    pub async fn update(&self, id: &str, data: CustomerUpdate) -> RepoResult<Customer> {
        let thing = parse_id(CUSTOMER_TABLE, id)?;

        let mut set_parts: Vec<&str> = vec!["updated_at = $updated_at"];
        if data.name.is_some() {
            set_parts.push("name = $name");
        }
        if data.city.is_some() {
            set_parts.push("city = $city");
        }
        if data.phone.is_some() {
            set_parts.push("phone = $phone");
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
        if let Some(v) = data.name {
            query = query.bind(("name", v));
        }
        if let Some(v) = data.city {
            query = query.bind(("city", v));
        }
        if let Some(v) = data.phone {
            query = query.bind(("phone", v));
        }
        if let Some(v) = data.delivery_location {
            query = query.bind(("delivery_location", v));
        }

        let customers: Vec<Customer> = query.await?.take(0)?;
        customers
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Customer {} not found", id)))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let record_id = parse_id(CUSTOMER_TABLE, id)?;
        let result: Option<Customer> = self.base.db().delete(record_id).await?;
        if result.is_none() {
            return Err(RepoError::NotFound(format!("Customer {} not found", id)));
        }
        Ok(())
    }
}
