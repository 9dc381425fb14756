//! DTOs for tag and ingredient endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::entities::{Ingredient, Tag};

#[derive(Debug, Serialize)]
pub struct TagResponse {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

impl From<Tag> for TagResponse {
    fn from(t: Tag) -> Self {
        Self {
            id: t.id,
            name: t.name,
            slug: t.slug,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IngredientResponse {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
}

impl From<Ingredient> for IngredientResponse {
    fn from(i: Ingredient) -> Self {
        Self {
            id: i.id,
            name: i.name,
            measurement_unit: i.measurement_unit,
        }
    }
}

/// `GET /api/ingredients/?name=` filter.
#[derive(Debug, Default, Deserialize)]
pub struct IngredientSearchParams {
    pub name: Option<String>,
}
