//! PostgreSQL implementation of ingredient repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Ingredient, NewIngredient};
use crate::domain::repositories::IngredientRepository;
use crate::error::AppError;

pub struct PgIngredientRepository {
    pool: Arc<PgPool>,
}

impl PgIngredientRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IngredientRepository for PgIngredientRepository {
    async fn create(&self, new_ingredient: NewIngredient) -> Result<Ingredient, AppError> {
        let ingredient = sqlx::query_as::<_, Ingredient>(
            r#"
            INSERT INTO ingredients (name, measurement_unit)
            VALUES ($1, $2)
            RETURNING id, name, measurement_unit
            "#,
        )
        .bind(new_ingredient.name)
        .bind(new_ingredient.measurement_unit)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(ingredient)
    }

    async fn list(&self, name_contains: Option<String>) -> Result<Vec<Ingredient>, AppError> {
        // POSITION avoids escaping LIKE wildcards in user input.
        let ingredients = sqlx::query_as::<_, Ingredient>(
            r#"
            SELECT id, name, measurement_unit
            FROM ingredients
            WHERE ($1::text IS NULL OR POSITION(LOWER($1) IN LOWER(name)) > 0)
            ORDER BY name
            "#,
        )
        .bind(name_contains)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(ingredients)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Ingredient>, AppError> {
        let ingredient = sqlx::query_as::<_, Ingredient>(
            "SELECT id, name, measurement_unit FROM ingredients WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(ingredient)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Ingredient>, AppError> {
        let ingredient = sqlx::query_as::<_, Ingredient>(
            "SELECT id, name, measurement_unit FROM ingredients WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(ingredient)
    }

    async fn existing_ids(&self, ids: &[i64]) -> Result<Vec<i64>, AppError> {
        let found = sqlx::query_scalar::<_, i64>("SELECT id FROM ingredients WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(found)
    }
}
