//! DTOs for recipe endpoints.

use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_with::{DisplayFromStr, serde_as};
use validator::Validate;

use crate::api::dto::catalog::TagResponse;
use crate::api::dto::pagination::PaginationParams;
use crate::api::dto::users::UserResponse;
use crate::application::services::{RecipeDraft, RecipeQuery};
use crate::domain::entities::{IngredientAmount, Recipe, RecipeDetails, RecipeIngredient};
use crate::error::AppError;
use crate::infrastructure::media::MediaStorage;

/// Body of `POST /api/recipes/` and `PATCH /api/recipes/{id}/`.
///
/// Missing fields fall back to empty values so that they are reported as
/// validation errors rather than JSON rejections.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct RecipeWriteRequest {
    #[validate(nested)]
    pub ingredients: Vec<IngredientAmountRequest>,

    pub tags: Vec<i64>,

    /// Base64 `data:image/...` URI.
    pub image: Option<String>,

    #[validate(length(min = 1, max = 256))]
    pub name: String,

    #[validate(length(min = 1))]
    pub text: String,

    pub cooking_time: i32,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct IngredientAmountRequest {
    pub id: i64,
    pub amount: i32,
}

impl From<RecipeWriteRequest> for RecipeDraft {
    fn from(r: RecipeWriteRequest) -> Self {
        RecipeDraft {
            name: r.name,
            text: r.text,
            cooking_time: r.cooking_time,
            image: r.image.filter(|image| !image.is_empty()),
            tags: r.tags,
            ingredients: r
                .ingredients
                .into_iter()
                .map(|i| IngredientAmount {
                    ingredient_id: i.id,
                    amount: i.amount,
                })
                .collect(),
        }
    }
}

/// Recipe list query: pagination and filters.
///
/// `tags` may repeat and is read separately from the raw query string.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct RecipeListParams {
    #[serde(flatten)]
    pub pagination: PaginationParams,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub author: Option<i64>,

    #[serde(default)]
    pub is_favorited: Option<String>,

    #[serde(default)]
    pub is_in_shopping_cart: Option<String>,
}

impl RecipeListParams {
    /// Converts the filters into a service query.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if a collection flag is not `0` or `1`.
    pub fn to_query(&self, tag_slugs: Vec<String>) -> Result<RecipeQuery, AppError> {
        Ok(RecipeQuery {
            author_id: self.author,
            tag_slugs,
            is_favorited: parse_flag("is_favorited", self.is_favorited.as_deref())?,
            is_in_shopping_cart: parse_flag(
                "is_in_shopping_cart",
                self.is_in_shopping_cart.as_deref(),
            )?,
        })
    }
}

/// `1` selects members, `0` non-members.
fn parse_flag(field: &str, value: Option<&str>) -> Result<Option<bool>, AppError> {
    match value {
        None => Ok(None),
        Some("1") => Ok(Some(true)),
        Some("0") => Ok(Some(false)),
        Some(other) => Err(AppError::bad_request(
            "Invalid filter",
            json!({ field: [format!("Select a valid choice. {} is not one of 0, 1.", other)] }),
        )),
    }
}

/// Collects every `tags=<slug>` pair of a query string.
pub fn tag_slugs(raw_query: Option<&str>) -> Vec<String> {
    raw_query
        .map(|query| {
            url::form_urlencoded::parse(query.as_bytes())
                .filter(|(key, value)| key == "tags" && !value.is_empty())
                .map(|(_, value)| value.into_owned())
                .collect()
        })
        .unwrap_or_default()
}

#[derive(Debug, Serialize)]
pub struct RecipeIngredientResponse {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

impl From<RecipeIngredient> for RecipeIngredientResponse {
    fn from(i: RecipeIngredient) -> Self {
        Self {
            id: i.id,
            name: i.name,
            measurement_unit: i.measurement_unit,
            amount: i.amount,
        }
    }
}

/// Full recipe representation.
#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    pub id: i64,
    pub tags: Vec<TagResponse>,
    pub author: UserResponse,
    pub ingredients: Vec<RecipeIngredientResponse>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
}

impl RecipeResponse {
    pub fn new(details: RecipeDetails, media: &dyn MediaStorage) -> Self {
        let RecipeDetails {
            recipe,
            author,
            author_subscribed,
            tags,
            ingredients,
            is_favorited,
            is_in_shopping_cart,
        } = details;

        Self {
            id: recipe.id,
            tags: tags.into_iter().map(TagResponse::from).collect(),
            author: UserResponse::new(author, author_subscribed, media),
            ingredients: ingredients
                .into_iter()
                .map(RecipeIngredientResponse::from)
                .collect(),
            is_favorited,
            is_in_shopping_cart,
            image: media.url(&recipe.image),
            name: recipe.name,
            text: recipe.text,
            cooking_time: recipe.cooking_time,
        }
    }
}

/// Compact recipe used in favorites, cart and subscription responses.
#[derive(Debug, Serialize)]
pub struct ShortRecipeResponse {
    pub id: i64,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

impl ShortRecipeResponse {
    pub fn new(recipe: &Recipe, media: &dyn MediaStorage) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            image: media.url(&recipe.image),
            cooking_time: recipe.cooking_time,
        }
    }
}

/// Response of `GET /api/recipes/{id}/get-link/`.
#[derive(Debug, Serialize)]
pub struct ShortLinkResponse {
    #[serde(rename = "short-link")]
    pub short_link: String,
}
