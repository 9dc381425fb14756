//! Tags and ingredients.

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use crate::domain::entities::{Ingredient, NewIngredient, NewTag, Tag};
use crate::domain::repositories::{IngredientRepository, TagRepository};
use crate::error::AppError;

/// Outcome of an ingredient import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub created: usize,
    pub skipped: usize,
}

/// Read access to the catalog plus the admin-side writes.
pub struct CatalogService<T: TagRepository, I: IngredientRepository> {
    tags: Arc<T>,
    ingredients: Arc<I>,
}

impl<T: TagRepository, I: IngredientRepository> CatalogService<T, I> {
    pub fn new(tags: Arc<T>, ingredients: Arc<I>) -> Self {
        Self { tags, ingredients }
    }

    pub async fn list_tags(&self) -> Result<Vec<Tag>, AppError> {
        self.tags.list().await
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the tag does not exist.
    pub async fn get_tag(&self, id: i64) -> Result<Tag, AppError> {
        self.tags
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Tag not found", json!({ "id": id })))
    }

    /// Lists ingredients, keeping names that contain `name` when given.
    /// An empty filter is ignored.
    pub async fn list_ingredients(&self, name: Option<String>) -> Result<Vec<Ingredient>, AppError> {
        let name = name.filter(|n| !n.trim().is_empty());
        self.ingredients.list(name).await
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the ingredient does not exist.
    pub async fn get_ingredient(&self, id: i64) -> Result<Ingredient, AppError> {
        self.ingredients
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Ingredient not found", json!({ "id": id })))
    }

    /// Creates a tag.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the name or slug is taken.
    pub async fn create_tag(&self, new_tag: NewTag) -> Result<Tag, AppError> {
        let tag = self.tags.create(new_tag).await?;
        info!(tag_id = tag.id, slug = %tag.slug, "Tag created");
        Ok(tag)
    }

    /// Imports ingredients, skipping names that already exist.
    pub async fn import_ingredients(
        &self,
        records: Vec<NewIngredient>,
    ) -> Result<ImportReport, AppError> {
        let mut report = ImportReport::default();

        for record in records {
            if self.ingredients.find_by_name(&record.name).await?.is_some() {
                report.skipped += 1;
                continue;
            }

            self.ingredients.create(record).await?;
            report.created += 1;
        }

        info!(created = report.created, skipped = report.skipped, "Ingredients imported");
        Ok(report)
    }
}
