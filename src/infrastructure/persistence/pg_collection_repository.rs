//! PostgreSQL implementation of the favorites / shopping cart repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::repositories::{CollectionRepository, RecipeCollection};
use crate::domain::shopping_list::UsageRow;
use crate::error::AppError;

/// PostgreSQL repository for per-user recipe collections.
///
/// Both collections share one schema shape, so the table name is chosen
/// from [`RecipeCollection::table`]; it is never taken from user input.
pub struct PgCollectionRepository {
    pool: Arc<PgPool>,
}

impl PgCollectionRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CollectionRepository for PgCollectionRepository {
    async fn add(
        &self,
        collection: RecipeCollection,
        user_id: i64,
        recipe_id: i64,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(&format!(
            r#"
            INSERT INTO {} (user_id, recipe_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, recipe_id) DO NOTHING
            "#,
            collection.table()
        ))
        .bind(user_id)
        .bind(recipe_id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn remove(
        &self,
        collection: RecipeCollection,
        user_id: i64,
        recipe_id: i64,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE user_id = $1 AND recipe_id = $2",
            collection.table()
        ))
        .bind(user_id)
        .bind(recipe_id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn contained_ids(
        &self,
        collection: RecipeCollection,
        user_id: i64,
        recipe_ids: &[i64],
    ) -> Result<Vec<i64>, AppError> {
        if recipe_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT recipe_id FROM {} WHERE user_id = $1 AND recipe_id = ANY($2)",
            collection.table()
        ))
        .bind(user_id)
        .bind(recipe_ids)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(ids)
    }

    async fn shopping_cart_rows(&self, user_id: i64) -> Result<Vec<UsageRow>, AppError> {
        let rows = sqlx::query_as::<_, UsageRow>(
            r#"
            SELECT i.name, i.measurement_unit, ri.amount
            FROM shopping_cart sc
            JOIN recipe_ingredients ri ON ri.recipe_id = sc.recipe_id
            JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE sc.user_id = $1
            ORDER BY sc.id, ri.id
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows)
    }
}
