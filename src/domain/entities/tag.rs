//! Tag entity.

use serde::Deserialize;

/// A recipe tag such as "Breakfast" (`breakfast`).
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

/// Input data for creating a tag.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTag {
    pub name: String,
    pub slug: String,
}
