//! Ingredient entity.

use serde::Deserialize;

/// A catalog ingredient with its measurement unit.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
}

/// Input data for creating an ingredient, also the import file record format.
#[derive(Debug, Clone, Deserialize)]
pub struct NewIngredient {
    pub name: String,
    pub measurement_unit: String,
}
