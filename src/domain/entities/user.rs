//! User entity.

use chrono::{DateTime, Utc};

/// A registered user.
///
/// `avatar` holds a media storage path relative to the media root.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub avatar: Option<String>,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Returns true if the user may modify content owned by `owner_id`.
    pub fn can_modify(&self, owner_id: i64) -> bool {
        self.is_staff || self.id == owner_id
    }
}

/// Input data for registering a user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub is_staff: bool,
}
