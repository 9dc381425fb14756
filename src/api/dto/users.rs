//! DTOs for user, password, avatar and subscription endpoints.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::Validate;

use crate::api::dto::recipes::ShortRecipeResponse;
use crate::application::services::{AuthorWithRecipes, Registration};
use crate::domain::entities::User;
use crate::infrastructure::media::MediaStorage;

/// Letters, digits and `@ . + - _`.
static USERNAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.@+-]+$").expect("valid username regex"));

/// Body of `POST /api/users/`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Enter a valid email address"), length(max = 254))]
    pub email: String,

    #[validate(length(min = 1, max = 150))]
    #[validate(regex(path = "*USERNAME_REGEX", message = "Enter a valid username"))]
    pub username: String,

    #[validate(length(min = 1, max = 150))]
    pub first_name: String,

    #[validate(length(min = 1, max = 150))]
    pub last_name: String,

    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

impl From<RegisterRequest> for Registration {
    fn from(r: RegisterRequest) -> Self {
        Registration {
            email: r.email,
            username: r.username,
            first_name: r.first_name,
            last_name: r.last_name,
            password: r.password,
        }
    }
}

/// Response of a successful registration.
#[derive(Debug, Serialize)]
pub struct RegisteredUserResponse {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<User> for RegisteredUserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            username: u.username,
            first_name: u.first_name,
            last_name: u.last_name,
        }
    }
}

/// Public user representation.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
    pub avatar: Option<String>,
}

impl UserResponse {
    pub fn new(user: User, is_subscribed: bool, media: &dyn MediaStorage) -> Self {
        Self {
            avatar: user.avatar.as_deref().map(|path| media.url(path)),
            id: user.id,
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            is_subscribed,
        }
    }
}

/// Body of `POST /api/users/set_password/`.
#[derive(Debug, Deserialize, Validate)]
pub struct SetPasswordRequest {
    #[validate(length(min = 1, max = 128))]
    pub new_password: String,

    #[validate(length(min = 1, max = 128))]
    pub current_password: String,
}

/// Body of `PUT /api/users/me/avatar/`.
#[derive(Debug, Deserialize, Validate)]
pub struct AvatarRequest {
    #[validate(length(min = 1))]
    pub avatar: String,
}

#[derive(Debug, Serialize)]
pub struct AvatarResponse {
    pub avatar: String,
}

/// `recipes_limit` query parameter of subscription endpoints.
///
/// Kept raw: a value that is not a plain non-negative integer is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct RecipesLimitParams {
    #[serde(default)]
    pub recipes_limit: Option<String>,
}

impl RecipesLimitParams {
    /// The limit, if given as ASCII digits only.
    pub fn limit(&self) -> Option<i64> {
        self.recipes_limit
            .as_deref()
            .filter(|s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|s| s.parse().ok())
    }
}

/// An author with a preview of their recipes.
#[derive(Debug, Serialize)]
pub struct SubscriptionResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub recipes: Vec<ShortRecipeResponse>,
    pub recipes_count: i64,
}

impl SubscriptionResponse {
    /// Builds the representation as seen by a subscriber of `entry.author`.
    pub fn new(entry: AuthorWithRecipes, media: &dyn MediaStorage) -> Self {
        Self {
            user: UserResponse::new(entry.author, true, media),
            recipes: entry
                .recipes
                .iter()
                .map(|r| ShortRecipeResponse::new(r, media))
                .collect(),
            recipes_count: entry.recipes_count,
        }
    }
}
