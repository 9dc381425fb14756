//! Short link entity.

use chrono::{DateTime, Utc};

/// Mapping between a resource path and its short token.
///
/// Both `full_path` and `short_token` are unique. A mapping is created once
/// and never updated.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ShortLink {
    pub id: i64,
    pub full_path: String,
    pub short_token: String,
    pub created_at: DateTime<Utc>,
}

impl ShortLink {
    /// Public path under which the token is served.
    pub fn public_path(&self) -> String {
        format!("/s/{}/", self.short_token)
    }
}
