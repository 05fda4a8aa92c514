//! User persistence.

use async_trait::async_trait;
use haptic_models::User;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::store::PgStore;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, password_hash, created_at";

/// Account creation and lookup.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new account. Fails with [`StoreError::Duplicate`] when the
    /// email is already registered.
    async fn create_user(&self, email: &str, password_hash: &str) -> StoreResult<User>;

    /// Find an account by email (case-sensitive).
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Find an account by id.
    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, email: &str, password_hash: &str) -> StoreResult<User> {
        let query = format!(
            "INSERT INTO users (email, password_hash)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .bind(password_hash)
            .fetch_one(self.pool())
            .await
            .map_err(|e| StoreError::from_unique(e, "email"))
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        Ok(sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(self.pool())
            .await?)
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        Ok(sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(self.pool())
            .await?)
    }
}
