//! User Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{User, UserCreate};
use crate::utils::time::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const USER_TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find user by email
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let user: Option<User> = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email.to_string()))
            .await?
            .take(0)?;
        Ok(user)
    }

    /// Create a new user with an argon2 password hash
    pub async fn create(&self, data: UserCreate) -> RepoResult<User> {
        if self.find_by_email(&data.email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "User {} already exists",
                data.email
            )));
        }

        let hash_pass = User::hash_password(&data.password)
            .map_err(|e| RepoError::Database(format!("Password hashing failed: {}", e)))?;
        let display_name = data.display_name.unwrap_or_else(|| data.email.clone());

        let user = User {
            id: None,
            email: data.email,
            display_name,
            hash_pass,
            role: data.role,
            is_active: true,
            created_at: now_millis(),
        };

        let created: Option<User> = self.base.db().create(USER_TABLE).content(user).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Seed the default admin account when the user table is empty
    ///
    /// Credentials come from ADMIN_EMAIL / ADMIN_PASSWORD; development
    /// defaults are logged loudly so they never survive into production
    /// unnoticed.
    pub async fn ensure_default_admin(&self) -> RepoResult<()> {
        let count: Option<i64> = self
            .base
            .db()
            .query("RETURN count(SELECT VALUE id FROM user)")
            .await?
            .take(0)?;

        if count.unwrap_or(0) > 0 {
            return Ok(());
        }

        let email =
            std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@localhost".to_string());
        let password = match std::env::var("ADMIN_PASSWORD") {
            Ok(p) => p,
            Err(_) => {
                tracing::warn!(
                    "ADMIN_PASSWORD not set, seeding default admin with password 'admin1234'; \
                     change it immediately"
                );
                "admin1234".to_string()
            }
        };

        self.create(UserCreate {
            email: email.clone(),
            password,
            display_name: Some("Administrator".to_string()),
            role: "admin".to_string(),
        })
        .await?;

        tracing::info!(email = %email, "Seeded default admin user");
        Ok(())
    }
}
