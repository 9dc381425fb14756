//! PostgreSQL implementation of token repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::User;
use crate::domain::repositories::TokenRepository;
use crate::error::AppError;

/// PostgreSQL repository for authentication tokens.
///
/// Stores HMAC-SHA256 hashes of tokens. Raw tokens are never persisted.
pub struct PgTokenRepository {
    pool: Arc<PgPool>,
}

impl PgTokenRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenRepository for PgTokenRepository {
    async fn create_token(&self, user_id: i64, token_hash: &str) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO auth_tokens (user_id, token_hash)
            VALUES ($1, $2)
            "#,
        )
        .bind(user_id)
        .bind(token_hash)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn find_user_by_token(&self, token_hash: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.email, u.username, u.first_name, u.last_name,
                   u.password_hash, u.avatar, u.is_staff, u.created_at
            FROM auth_tokens t
            JOIN users u ON u.id = t.user_id
            WHERE t.token_hash = $1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(user)
    }

    async fn update_last_used(&self, token_hash: &str) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE auth_tokens
            SET last_used_at = NOW()
            WHERE token_hash = $1
            "#,
        )
        .bind(token_hash)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn delete_user_tokens(&self, user_id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM auth_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }
}
