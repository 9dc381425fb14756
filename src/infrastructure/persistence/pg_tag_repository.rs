//! PostgreSQL implementation of tag repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewTag, Tag};
use crate::domain::repositories::TagRepository;
use crate::error::AppError;

pub struct PgTagRepository {
    pool: Arc<PgPool>,
}

impl PgTagRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TagRepository for PgTagRepository {
    async fn create(&self, new_tag: NewTag) -> Result<Tag, AppError> {
        let tag = sqlx::query_as::<_, Tag>(
            "INSERT INTO tags (name, slug) VALUES ($1, $2) RETURNING id, name, slug",
        )
        .bind(new_tag.name)
        .bind(new_tag.slug)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(tag)
    }

    async fn list(&self) -> Result<Vec<Tag>, AppError> {
        let tags = sqlx::query_as::<_, Tag>("SELECT id, name, slug FROM tags ORDER BY name")
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(tags)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Tag>, AppError> {
        let tag = sqlx::query_as::<_, Tag>("SELECT id, name, slug FROM tags WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(tag)
    }

    async fn existing_ids(&self, ids: &[i64]) -> Result<Vec<i64>, AppError> {
        let found = sqlx::query_scalar::<_, i64>("SELECT id FROM tags WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(found)
    }

    async fn existing_slugs(&self, slugs: &[String]) -> Result<Vec<String>, AppError> {
        let found = sqlx::query_scalar::<_, String>("SELECT slug FROM tags WHERE slug = ANY($1)")
            .bind(slugs)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(found)
    }
}
