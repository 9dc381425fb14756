//! PostgreSQL implementation of recipe repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use std::sync::Arc;

use crate::domain::entities::{
    IngredientAmount, MembershipFilter, NewRecipe, Recipe, RecipeFilter, RecipeIngredient,
    RecipeUpdate, Tag,
};
use crate::domain::repositories::RecipeRepository;
use crate::error::AppError;

const RECIPE_COLUMNS: &str = "r.id, r.author_id, r.name, r.text, r.cooking_time, r.image, r.pub_date";

/// PostgreSQL repository for recipes.
///
/// List queries are assembled with [`QueryBuilder`] because every filter
/// is optional.
pub struct PgRecipeRepository {
    pool: Arc<PgPool>,
}

impl PgRecipeRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &RecipeFilter) {
    if let Some(author_id) = filter.author_id {
        builder.push(" AND r.author_id = ").push_bind(author_id);
    }

    if !filter.tag_slugs.is_empty() {
        builder
            .push(
                " AND EXISTS (SELECT 1 FROM recipe_tags rt JOIN tags t ON t.id = rt.tag_id \
                 WHERE rt.recipe_id = r.id AND t.slug = ANY(",
            )
            .push_bind(filter.tag_slugs.clone())
            .push("))");
    }

    push_membership(builder, "favorites", filter.favorited);
    push_membership(builder, "shopping_cart", filter.in_shopping_cart);
}

fn push_membership(
    builder: &mut QueryBuilder<'_, Postgres>,
    table: &'static str,
    membership: Option<MembershipFilter>,
) {
    let Some(membership) = membership else {
        return;
    };

    builder.push(if membership.included {
        " AND EXISTS ("
    } else {
        " AND NOT EXISTS ("
    });
    builder
        .push(format!(
            "SELECT 1 FROM {table} c WHERE c.recipe_id = r.id AND c.user_id = "
        ))
        .push_bind(membership.user_id)
        .push(")");
}

async fn insert_links(
    tx: &mut Transaction<'_, Postgres>,
    recipe_id: i64,
    tag_ids: &[i64],
    ingredients: &[IngredientAmount],
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO recipe_tags (recipe_id, tag_id)
        SELECT $1, UNNEST($2::bigint[])
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(recipe_id)
    .bind(tag_ids)
    .execute(&mut **tx)
    .await?;

    // One insert per row keeps the submitted ingredient order in the ids.
    for ingredient in ingredients {
        sqlx::query(
            r#"
            INSERT INTO recipe_ingredients (recipe_id, ingredient_id, amount)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(recipe_id)
        .bind(ingredient.ingredient_id)
        .bind(ingredient.amount)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

#[async_trait]
impl RecipeRepository for PgRecipeRepository {
    async fn create(&self, new_recipe: NewRecipe) -> Result<Recipe, AppError> {
        let mut tx = self.pool.begin().await?;

        let recipe = sqlx::query_as::<_, Recipe>(
            r#"
            INSERT INTO recipes (author_id, name, text, cooking_time, image)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, author_id, name, text, cooking_time, image, pub_date
            "#,
        )
        .bind(new_recipe.author_id)
        .bind(&new_recipe.name)
        .bind(&new_recipe.text)
        .bind(new_recipe.cooking_time)
        .bind(&new_recipe.image)
        .fetch_one(&mut *tx)
        .await?;

        insert_links(&mut tx, recipe.id, &new_recipe.tag_ids, &new_recipe.ingredients).await?;

        tx.commit().await?;

        Ok(recipe)
    }

    async fn update(&self, id: i64, update: RecipeUpdate) -> Result<Recipe, AppError> {
        let mut tx = self.pool.begin().await?;

        let recipe = sqlx::query_as::<_, Recipe>(
            r#"
            UPDATE recipes
            SET name = $2, text = $3, cooking_time = $4, image = COALESCE($5, image)
            WHERE id = $1
            RETURNING id, author_id, name, text, cooking_time, image, pub_date
            "#,
        )
        .bind(id)
        .bind(&update.name)
        .bind(&update.text)
        .bind(update.cooking_time)
        .bind(&update.image)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found("Recipe not found", json!({ "id": id })))?;

        sqlx::query("DELETE FROM recipe_tags WHERE recipe_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        insert_links(&mut tx, id, &update.tag_ids, &update.ingredients).await?;

        tx.commit().await?;

        Ok(recipe)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Recipe>, AppError> {
        let recipe = sqlx::query_as::<_, Recipe>(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes r WHERE r.id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(recipe)
    }

    async fn list(
        &self,
        filter: RecipeFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Recipe>, AppError> {
        let mut builder =
            QueryBuilder::<Postgres>::new(format!("SELECT {RECIPE_COLUMNS} FROM recipes r WHERE TRUE"));
        push_filters(&mut builder, &filter);
        builder
            .push(" ORDER BY r.pub_date DESC, r.id DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let recipes = builder
            .build_query_as::<Recipe>()
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(recipes)
    }

    async fn count(&self, filter: RecipeFilter) -> Result<i64, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM recipes r WHERE TRUE");
        push_filters(&mut builder, &filter);

        let count = builder
            .build_query_scalar::<i64>()
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn tags_for(&self, recipe_ids: &[i64]) -> Result<Vec<(i64, Tag)>, AppError> {
        if recipe_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, (i64, i64, String, String)>(
            r#"
            SELECT rt.recipe_id, t.id, t.name, t.slug
            FROM recipe_tags rt
            JOIN tags t ON t.id = rt.tag_id
            WHERE rt.recipe_id = ANY($1)
            ORDER BY rt.recipe_id, t.name
            "#,
        )
        .bind(recipe_ids)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|(recipe_id, id, name, slug)| (recipe_id, Tag { id, name, slug }))
            .collect())
    }

    async fn ingredients_for(
        &self,
        recipe_ids: &[i64],
    ) -> Result<Vec<(i64, RecipeIngredient)>, AppError> {
        if recipe_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, (i64, i64, String, String, i32)>(
            r#"
            SELECT ri.recipe_id, i.id, i.name, i.measurement_unit, ri.amount
            FROM recipe_ingredients ri
            JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE ri.recipe_id = ANY($1)
            ORDER BY ri.recipe_id, ri.id
            "#,
        )
        .bind(recipe_ids)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|(recipe_id, id, name, measurement_unit, amount)| {
                (
                    recipe_id,
                    RecipeIngredient {
                        id,
                        name,
                        measurement_unit,
                        amount,
                    },
                )
            })
            .collect())
    }

    async fn list_by_author(
        &self,
        author_id: i64,
        limit: Option<i64>,
    ) -> Result<Vec<Recipe>, AppError> {
        // LIMIT NULL means no limit in PostgreSQL.
        let recipes = sqlx::query_as::<_, Recipe>(&format!(
            r#"
            SELECT {RECIPE_COLUMNS}
            FROM recipes r
            WHERE r.author_id = $1
            ORDER BY r.pub_date DESC, r.id DESC
            LIMIT $2
            "#
        ))
        .bind(author_id)
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(recipes)
    }

    async fn count_by_authors(&self, author_ids: &[i64]) -> Result<Vec<(i64, i64)>, AppError> {
        if author_ids.is_empty() {
            return Ok(Vec::new());
        }

        let counts = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT author_id, COUNT(*)
            FROM recipes
            WHERE author_id = ANY($1)
            GROUP BY author_id
            "#,
        )
        .bind(author_ids)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(counts)
    }
}
