//! PostgreSQL implementation of short link repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::ShortLink;
use crate::domain::repositories::ShortLinkRepository;
use crate::error::AppError;

/// PostgreSQL repository for short link mappings.
///
/// Uniqueness of `full_path` and `short_token` is enforced by the
/// `short_links_full_path_key` and `short_links_short_token_key` constraints.
pub struct PgShortLinkRepository {
    pool: Arc<PgPool>,
}

impl PgShortLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShortLinkRepository for PgShortLinkRepository {
    async fn create(&self, full_path: &str, short_token: &str) -> Result<ShortLink, AppError> {
        let link = sqlx::query_as::<_, ShortLink>(
            r#"
            INSERT INTO short_links (full_path, short_token)
            VALUES ($1, $2)
            RETURNING id, full_path, short_token, created_at
            "#,
        )
        .bind(full_path)
        .bind(short_token)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn find_by_full_path(&self, full_path: &str) -> Result<Option<ShortLink>, AppError> {
        let link = sqlx::query_as::<_, ShortLink>(
            r#"
            SELECT id, full_path, short_token, created_at
            FROM short_links
            WHERE full_path = $1
            "#,
        )
        .bind(full_path)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn find_by_token(&self, short_token: &str) -> Result<Option<ShortLink>, AppError> {
        let link = sqlx::query_as::<_, ShortLink>(
            r#"
            SELECT id, full_path, short_token, created_at
            FROM short_links
            WHERE short_token = $1
            "#,
        )
        .bind(short_token)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn token_exists(&self, short_token: &str) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM short_links WHERE short_token = $1)",
        )
        .bind(short_token)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(exists)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM short_links")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
