use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::models::UserModel;
use crate::shared::AppError;

/// Lookup contract the authentication layer needs from the user store
///
/// Email lookups ignore case in every implementation.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_by_email(&self, email: &str) -> Result<Option<UserModel>, AppError>;
    async fn get_by_id(&self, id: i64) -> Result<Option<UserModel>, AppError>;

    async fn password_matches(&self, user: &UserModel, plaintext: &str) -> bool {
        user.password_matches(plaintext)
    }
}

/// In-memory implementation of UserRepository for development and testing
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<i64, UserModel>>,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }

    /// Creates an in-memory repository with pre-populated users
    pub fn with_users(users: Vec<UserModel>) -> Self {
        let user_map = users.into_iter().map(|u| (u.id, u)).collect();

        Self {
            users: RwLock::new(user_map),
        }
    }

    #[cfg(test)]
    pub async fn insert(&self, user: UserModel) {
        self.users.write().await.insert(user.id, user);
    }

    pub async fn remove(&self, id: i64) -> Option<UserModel> {
        self.users.write().await.remove(&id)
    }

    #[cfg(test)]
    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip_all)]
    async fn get_by_email(&self, email: &str) -> Result<Option<UserModel>, AppError> {
        let wanted = email.to_lowercase();
        let users = self.users.read().await;
        let user = users
            .values()
            .find(|u| u.email.to_lowercase() == wanted)
            .cloned();

        debug!(found = user.is_some(), "Looked up user by email in memory");
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: i64) -> Result<Option<UserModel>, AppError> {
        let user = self.users.read().await.get(&id).cloned();

        debug!(found = user.is_some(), "Looked up user by id in memory");
        Ok(user)
    }
}

/// PostgreSQL implementation of user repository
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    #[instrument(skip_all)]
    async fn get_by_email(&self, email: &str) -> Result<Option<UserModel>, AppError> {
        debug!("Fetching user by email from database");

        sqlx::query_as::<_, UserModel>(
            "SELECT id::int8 AS id, email, first_name, last_name, password, \
             created_at::timestamptz AS created_at, updated_at::timestamptz AS updated_at \
             FROM users WHERE lower(email) = lower($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to fetch user by email");
            AppError::DatabaseError(e.to_string())
        })
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: i64) -> Result<Option<UserModel>, AppError> {
        debug!("Fetching user by id from database");

        sqlx::query_as::<_, UserModel>(
            "SELECT id::int8 AS id, email, first_name, last_name, password, \
             created_at::timestamptz AS created_at, updated_at::timestamptz AS updated_at \
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, user_id = id, "Failed to fetch user by id");
            AppError::DatabaseError(e.to_string())
        })
    }
}
