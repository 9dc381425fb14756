//! PostgreSQL implementation of subscription repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::User;
use crate::domain::repositories::SubscriptionRepository;
use crate::error::AppError;

/// PostgreSQL repository for author subscriptions.
pub struct PgSubscriptionRepository {
    pool: Arc<PgPool>,
}

impl PgSubscriptionRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionRepository for PgSubscriptionRepository {
    async fn subscribe(&self, user_id: i64, author_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO subscriptions (user_id, author_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, author_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(author_id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn unsubscribe(&self, user_id: i64, author_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM subscriptions WHERE user_id = $1 AND author_id = $2")
            .bind(user_id)
            .bind(author_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn subscribed_author_ids(
        &self,
        user_id: i64,
        author_ids: &[i64],
    ) -> Result<Vec<i64>, AppError> {
        if author_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids = sqlx::query_scalar::<_, i64>(
            "SELECT author_id FROM subscriptions WHERE user_id = $1 AND author_id = ANY($2)",
        )
        .bind(user_id)
        .bind(author_ids)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(ids)
    }

    async fn list_authors(
        &self,
        user_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<User>, AppError> {
        let authors = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.email, u.username, u.first_name, u.last_name,
                   u.password_hash, u.avatar, u.is_staff, u.created_at
            FROM subscriptions s
            JOIN users u ON u.id = s.author_id
            WHERE s.user_id = $1
            ORDER BY s.created_at DESC, s.id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(authors)
    }

    async fn count_authors(&self, user_id: i64) -> Result<i64, AppError> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM subscriptions WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(count)
    }
}
