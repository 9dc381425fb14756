//! Recipes, favorites and the shopping cart.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde_json::{Map, Value, json};
use tracing::{info, warn};

use crate::domain::entities::{
    IngredientAmount, MembershipFilter, NewRecipe, Recipe, RecipeDetails, RecipeFilter,
    RecipeIngredient, RecipeUpdate, Tag, User,
};
use crate::domain::repositories::{
    CollectionRepository, IngredientRepository, RecipeCollection, RecipeRepository,
    SubscriptionRepository, TagRepository, UserRepository,
};
use crate::domain::shopping_list::build_shopping_list;
use crate::error::AppError;
use crate::infrastructure::media::MediaStorage;
use crate::utils::duplicates::contains_duplicates;
use crate::utils::image::decode_data_uri;

/// Folder for recipe images inside media storage.
pub const RECIPE_IMAGE_FOLDER: &str = "recipes/images";

/// Recipe content submitted by a client.
///
/// `image` is a base64 data URI. It is required on create and optional on
/// update, where `None` keeps the current image.
#[derive(Debug, Clone)]
pub struct RecipeDraft {
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    pub image: Option<String>,
    pub tags: Vec<i64>,
    pub ingredients: Vec<IngredientAmount>,
}

/// List filters as requested by the client.
#[derive(Debug, Clone, Default)]
pub struct RecipeQuery {
    pub author_id: Option<i64>,
    pub tag_slugs: Vec<String>,
    pub is_favorited: Option<bool>,
    pub is_in_shopping_cart: Option<bool>,
}

/// Service for recipe CRUD and per-user recipe collections.
pub struct RecipeService<R, T, I, C, U, S>
where
    R: RecipeRepository,
    T: TagRepository,
    I: IngredientRepository,
    C: CollectionRepository,
    U: UserRepository,
    S: SubscriptionRepository,
{
    recipes: Arc<R>,
    tags: Arc<T>,
    ingredients: Arc<I>,
    collections: Arc<C>,
    users: Arc<U>,
    subscriptions: Arc<S>,
    media: Arc<dyn MediaStorage>,
}

impl<R, T, I, C, U, S> RecipeService<R, T, I, C, U, S>
where
    R: RecipeRepository,
    T: TagRepository,
    I: IngredientRepository,
    C: CollectionRepository,
    U: UserRepository,
    S: SubscriptionRepository,
{
    /// Creates a new recipe service.
    pub fn new(
        recipes: Arc<R>,
        tags: Arc<T>,
        ingredients: Arc<I>,
        collections: Arc<C>,
        users: Arc<U>,
        subscriptions: Arc<S>,
        media: Arc<dyn MediaStorage>,
    ) -> Self {
        Self {
            recipes,
            tags,
            ingredients,
            collections,
            users,
            subscriptions,
            media,
        }
    }

    /// Loads a recipe without viewer-specific data.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the recipe does not exist.
    pub async fn find(&self, id: i64) -> Result<Recipe, AppError> {
        self.recipes
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Recipe not found", json!({ "id": id })))
    }

    /// Loads a recipe as seen by `viewer`.
    pub async fn get(&self, viewer: Option<&User>, id: i64) -> Result<RecipeDetails, AppError> {
        let recipe = self.find(id).await?;
        self.details(viewer, recipe).await
    }

    /// Returns one page of recipes and the total count.
    ///
    /// Collection filters require a viewer; an anonymous request using them
    /// matches nothing.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if a tag slug does not exist.
    pub async fn list(
        &self,
        viewer: Option<&User>,
        query: RecipeQuery,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<RecipeDetails>, i64), AppError> {
        self.check_tag_slugs(&query.tag_slugs).await?;

        let Some(filter) = build_filter(viewer, query) else {
            return Ok((Vec::new(), 0));
        };

        let count = self.recipes.count(filter.clone()).await?;
        let recipes = self.recipes.list(filter, offset, limit).await?;

        Ok((self.hydrate(viewer, recipes).await?, count))
    }

    /// Publishes a recipe authored by `author`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the draft is invalid, references
    /// unknown tags or ingredients, or has no valid image.
    pub async fn create(&self, author: &User, draft: RecipeDraft) -> Result<RecipeDetails, AppError> {
        validate_draft(&draft)?;
        self.check_references(&draft).await?;

        let data_uri = draft
            .image
            .as_deref()
            .ok_or_else(|| field_error("image", "This field is required"))?;
        let image = decode_data_uri("image", data_uri)?;
        let image_path = self.media.save(RECIPE_IMAGE_FOLDER, image).await?;

        let new_recipe = NewRecipe {
            author_id: author.id,
            name: draft.name,
            text: draft.text,
            cooking_time: draft.cooking_time,
            image: image_path.clone(),
            tag_ids: draft.tags,
            ingredients: draft.ingredients,
        };

        let recipe = match self.recipes.create(new_recipe).await {
            Ok(recipe) => recipe,
            Err(err) => {
                self.discard_file(&image_path).await;
                return Err(err);
            }
        };

        info!(recipe_id = recipe.id, author_id = author.id, "Recipe created");
        self.details(Some(author), recipe).await
    }

    /// Replaces a recipe's content.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the recipe does not exist.
    /// Returns [`AppError::Forbidden`] unless `user` is the author or staff.
    /// Returns [`AppError::Validation`] if the draft is invalid.
    pub async fn update(
        &self,
        user: &User,
        id: i64,
        draft: RecipeDraft,
    ) -> Result<RecipeDetails, AppError> {
        let existing = self.find(id).await?;
        ensure_can_modify(user, &existing)?;

        validate_draft(&draft)?;
        self.check_references(&draft).await?;

        let new_image = match draft.image.as_deref() {
            Some(data_uri) => {
                let image = decode_data_uri("image", data_uri)?;
                Some(self.media.save(RECIPE_IMAGE_FOLDER, image).await?)
            }
            None => None,
        };

        let update = RecipeUpdate {
            name: draft.name,
            text: draft.text,
            cooking_time: draft.cooking_time,
            image: new_image.clone(),
            tag_ids: draft.tags,
            ingredients: draft.ingredients,
        };

        let recipe = match self.recipes.update(id, update).await {
            Ok(recipe) => recipe,
            Err(err) => {
                if let Some(path) = &new_image {
                    self.discard_file(path).await;
                }
                return Err(err);
            }
        };

        if new_image.is_some() {
            self.discard_file(&existing.image).await;
        }

        info!(recipe_id = id, user_id = user.id, "Recipe updated");
        self.details(Some(user), recipe).await
    }

    /// Deletes a recipe and its image.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the recipe does not exist.
    /// Returns [`AppError::Forbidden`] unless `user` is the author or staff.
    pub async fn delete(&self, user: &User, id: i64) -> Result<(), AppError> {
        let existing = self.find(id).await?;
        ensure_can_modify(user, &existing)?;

        if !self.recipes.delete(id).await? {
            return Err(AppError::not_found("Recipe not found", json!({ "id": id })));
        }
        self.discard_file(&existing.image).await;

        info!(recipe_id = id, user_id = user.id, "Recipe deleted");
        Ok(())
    }

    /// Adds a recipe to the user's favorites or shopping cart.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the recipe does not exist.
    /// Returns [`AppError::Validation`] if it is already there.
    pub async fn add_to(
        &self,
        collection: RecipeCollection,
        user: &User,
        recipe_id: i64,
    ) -> Result<Recipe, AppError> {
        let recipe = self.find(recipe_id).await?;

        if !self.collections.add(collection, user.id, recipe.id).await? {
            let message = format!("Recipe is already in {}", collection.label());
            return Err(AppError::bad_request(
                message.clone(),
                json!({ "recipe": [message] }),
            ));
        }

        Ok(recipe)
    }

    /// Removes a recipe from the user's favorites or shopping cart.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the recipe does not exist.
    /// Returns [`AppError::Validation`] if it was not there.
    pub async fn remove_from(
        &self,
        collection: RecipeCollection,
        user: &User,
        recipe_id: i64,
    ) -> Result<(), AppError> {
        let recipe = self.find(recipe_id).await?;

        if !self.collections.remove(collection, user.id, recipe.id).await? {
            let message = format!("Recipe is not in {}", collection.label());
            return Err(AppError::bad_request(
                message.clone(),
                json!({ "recipe": [message] }),
            ));
        }

        Ok(())
    }

    /// Renders the user's shopping list as plain text.
    pub async fn shopping_list(&self, user: &User) -> Result<String, AppError> {
        let rows = self.collections.shopping_cart_rows(user.id).await?;
        Ok(build_shopping_list(rows))
    }

    async fn check_tag_slugs(&self, slugs: &[String]) -> Result<(), AppError> {
        if slugs.is_empty() {
            return Ok(());
        }

        let found: HashSet<String> = self.tags.existing_slugs(slugs).await?.into_iter().collect();
        let unknown: Vec<&String> = slugs.iter().filter(|slug| !found.contains(*slug)).collect();

        if unknown.is_empty() {
            return Ok(());
        }

        let messages: Vec<String> = unknown
            .iter()
            .map(|slug| format!("Unknown tag: {}", slug))
            .collect();

        Err(AppError::bad_request("Invalid filter", json!({ "tags": messages })))
    }

    async fn check_references(&self, draft: &RecipeDraft) -> Result<(), AppError> {
        let found: HashSet<i64> = self
            .tags
            .existing_ids(&draft.tags)
            .await?
            .into_iter()
            .collect();
        let missing: Vec<i64> = draft
            .tags
            .iter()
            .copied()
            .filter(|id| !found.contains(id))
            .collect();
        if !missing.is_empty() {
            return Err(AppError::bad_request(
                "Unknown tags",
                json!({ "tags": [format!("Unknown tag ids: {:?}", missing)] }),
            ));
        }

        let ingredient_ids: Vec<i64> = draft.ingredients.iter().map(|i| i.ingredient_id).collect();
        let found: HashSet<i64> = self
            .ingredients
            .existing_ids(&ingredient_ids)
            .await?
            .into_iter()
            .collect();
        let missing: Vec<i64> = ingredient_ids
            .into_iter()
            .filter(|id| !found.contains(id))
            .collect();
        if !missing.is_empty() {
            return Err(AppError::bad_request(
                "Unknown ingredients",
                json!({ "ingredients": [format!("Unknown ingredient ids: {:?}", missing)] }),
            ));
        }

        Ok(())
    }

    async fn details(&self, viewer: Option<&User>, recipe: Recipe) -> Result<RecipeDetails, AppError> {
        self.hydrate(viewer, vec![recipe])
            .await?
            .pop()
            .ok_or_else(|| AppError::internal("Recipe vanished", json!({})))
    }

    /// Loads tags, ingredients, authors and viewer flags for a batch of
    /// recipes with one query per kind.
    async fn hydrate(
        &self,
        viewer: Option<&User>,
        recipes: Vec<Recipe>,
    ) -> Result<Vec<RecipeDetails>, AppError> {
        if recipes.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = recipes.iter().map(|r| r.id).collect();
        let mut author_ids: Vec<i64> = recipes.iter().map(|r| r.author_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();

        let mut tags: HashMap<i64, Vec<Tag>> = HashMap::new();
        for (recipe_id, tag) in self.recipes.tags_for(&ids).await? {
            tags.entry(recipe_id).or_default().push(tag);
        }

        let mut ingredients: HashMap<i64, Vec<RecipeIngredient>> = HashMap::new();
        for (recipe_id, ingredient) in self.recipes.ingredients_for(&ids).await? {
            ingredients.entry(recipe_id).or_default().push(ingredient);
        }

        let authors: HashMap<i64, User> = self
            .users
            .find_by_ids(&author_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let (favorited, in_cart, subscribed) = match viewer {
            Some(viewer) => (
                self.collections
                    .contained_ids(RecipeCollection::Favorites, viewer.id, &ids)
                    .await?
                    .into_iter()
                    .collect::<HashSet<_>>(),
                self.collections
                    .contained_ids(RecipeCollection::ShoppingCart, viewer.id, &ids)
                    .await?
                    .into_iter()
                    .collect::<HashSet<_>>(),
                self.subscriptions
                    .subscribed_author_ids(viewer.id, &author_ids)
                    .await?
                    .into_iter()
                    .collect::<HashSet<_>>(),
            ),
            None => (HashSet::new(), HashSet::new(), HashSet::new()),
        };

        recipes
            .into_iter()
            .map(|recipe| {
                let author = authors.get(&recipe.author_id).cloned().ok_or_else(|| {
                    AppError::internal(
                        "Recipe author missing",
                        json!({ "recipe_id": recipe.id, "author_id": recipe.author_id }),
                    )
                })?;

                Ok(RecipeDetails {
                    author_subscribed: subscribed.contains(&author.id),
                    tags: tags.remove(&recipe.id).unwrap_or_default(),
                    ingredients: ingredients.remove(&recipe.id).unwrap_or_default(),
                    is_favorited: favorited.contains(&recipe.id),
                    is_in_shopping_cart: in_cart.contains(&recipe.id),
                    author,
                    recipe,
                })
            })
            .collect()
    }

    async fn discard_file(&self, path: &str) {
        if let Err(e) = self.media.delete(path).await {
            warn!(path = %path, error = %e, "Failed to remove media file");
        }
    }
}

/// Builds the repository filter, or `None` if the query can match nothing.
fn build_filter(viewer: Option<&User>, query: RecipeQuery) -> Option<RecipeFilter> {
    Some(RecipeFilter {
        author_id: query.author_id,
        tag_slugs: query.tag_slugs,
        favorited: membership_filter(viewer, query.is_favorited)?,
        in_shopping_cart: membership_filter(viewer, query.is_in_shopping_cart)?,
    })
}

/// Resolves a collection flag against the viewer.
///
/// The outer `None` means an anonymous viewer asked for a collection, which
/// matches no recipe.
fn membership_filter(
    viewer: Option<&User>,
    included: Option<bool>,
) -> Option<Option<MembershipFilter>> {
    match (included, viewer) {
        (None, _) => Some(None),
        (Some(included), Some(viewer)) => Some(Some(MembershipFilter {
            user_id: viewer.id,
            included,
        })),
        (Some(_), None) => None,
    }
}

fn ensure_can_modify(user: &User, recipe: &Recipe) -> Result<(), AppError> {
    if user.can_modify(recipe.author_id) {
        return Ok(());
    }

    Err(AppError::forbidden(
        "You do not have permission to modify this recipe",
        json!({ "recipe_id": recipe.id }),
    ))
}

fn field_error(field: &str, message: &str) -> AppError {
    AppError::bad_request("Invalid recipe", json!({ field: [message] }))
}

fn validate_draft(draft: &RecipeDraft) -> Result<(), AppError> {
    let mut errors = Map::new();

    if draft.name.trim().is_empty() {
        errors.insert("name".into(), json!(["This field may not be blank"]));
    }
    if draft.text.trim().is_empty() {
        errors.insert("text".into(), json!(["This field may not be blank"]));
    }
    if draft.cooking_time < 1 {
        errors.insert(
            "cooking_time".into(),
            json!(["Cooking time must be at least 1 minute"]),
        );
    }

    if draft.tags.is_empty() {
        errors.insert("tags".into(), json!(["At least one tag is required"]));
    } else if contains_duplicates(&draft.tags, |id| **id) {
        errors.insert("tags".into(), json!(["Tags must not repeat"]));
    }

    if draft.ingredients.is_empty() {
        errors.insert(
            "ingredients".into(),
            json!(["At least one ingredient is required"]),
        );
    } else if contains_duplicates(&draft.ingredients, |i| i.ingredient_id) {
        errors.insert("ingredients".into(), json!(["Ingredients must not repeat"]));
    } else if draft.ingredients.iter().any(|i| i.amount < 1) {
        errors.insert(
            "ingredients".into(),
            json!(["Ingredient amount must be at least 1"]),
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::bad_request("Invalid recipe", Value::Object(errors)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{
        MockCollectionRepository, MockIngredientRepository, MockRecipeRepository,
        MockSubscriptionRepository, MockTagRepository, MockUserRepository,
    };
    use crate::domain::shopping_list::UsageRow;
    use crate::infrastructure::media::MockMediaStorage;
    use chrono::Utc;

    const GIF: &str =
        "data:image/gif;base64,R0lGODlhAQABAAAAACH5BAEKAAEALAAAAAABAAEAAAICTAEAOw==";

    type TestService = RecipeService<
        MockRecipeRepository,
        MockTagRepository,
        MockIngredientRepository,
        MockCollectionRepository,
        MockUserRepository,
        MockSubscriptionRepository,
    >;

    #[derive(Default)]
    struct Mocks {
        recipes: MockRecipeRepository,
        tags: MockTagRepository,
        ingredients: MockIngredientRepository,
        collections: MockCollectionRepository,
        users: MockUserRepository,
        subscriptions: MockSubscriptionRepository,
        media: MockMediaStorage,
    }

    impl Mocks {
        fn into_service(self) -> TestService {
            RecipeService::new(
                Arc::new(self.recipes),
                Arc::new(self.tags),
                Arc::new(self.ingredients),
                Arc::new(self.collections),
                Arc::new(self.users),
                Arc::new(self.subscriptions),
                Arc::new(self.media),
            )
        }

        /// Expectations needed to hydrate a single recipe for an anonymous viewer.
        fn expect_hydrate(&mut self) {
            self.recipes
                .expect_tags_for()
                .returning(|ids| {
                    Ok(vec![(
                        ids[0],
                        Tag {
                            id: 1,
                            name: "Breakfast".to_string(),
                            slug: "breakfast".to_string(),
                        },
                    )])
                });
            self.recipes.expect_ingredients_for().returning(|ids| {
                Ok(vec![(
                    ids[0],
                    RecipeIngredient {
                        id: 1,
                        name: "flour".to_string(),
                        measurement_unit: "g".to_string(),
                        amount: 100,
                    },
                )])
            });
            self.users
                .expect_find_by_ids()
                .returning(|ids| Ok(ids.iter().map(|id| create_test_user(*id, false)).collect()));
        }

        fn expect_viewer_flags(&mut self) {
            self.collections
                .expect_contained_ids()
                .returning(|_, _, _| Ok(Vec::new()));
            self.subscriptions
                .expect_subscribed_author_ids()
                .returning(|_, _| Ok(Vec::new()));
        }

        fn expect_known_references(&mut self) {
            self.tags
                .expect_existing_ids()
                .returning(|ids| Ok(ids.to_vec()));
            self.ingredients
                .expect_existing_ids()
                .returning(|ids| Ok(ids.to_vec()));
        }
    }

    fn create_test_user(id: i64, is_staff: bool) -> User {
        User {
            id,
            email: format!("user{id}@foodgram.test"),
            username: format!("user{id}"),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            avatar: None,
            is_staff,
            created_at: Utc::now(),
        }
    }

    fn create_test_recipe(id: i64, author_id: i64) -> Recipe {
        Recipe {
            id,
            author_id,
            name: "Pancakes".to_string(),
            text: "Mix and fry".to_string(),
            cooking_time: 20,
            image: "recipes/images/old.png".to_string(),
            pub_date: Utc::now(),
        }
    }

    fn draft() -> RecipeDraft {
        RecipeDraft {
            name: "Pancakes".to_string(),
            text: "Mix and fry".to_string(),
            cooking_time: 20,
            image: Some(GIF.to_string()),
            tags: vec![1, 2],
            ingredients: vec![
                IngredientAmount {
                    ingredient_id: 1,
                    amount: 100,
                },
                IngredientAmount {
                    ingredient_id: 2,
                    amount: 2,
                },
            ],
        }
    }

    fn details_field(err: &AppError, field: &str) -> bool {
        err.to_error_info().details.get(field).is_some()
    }

    #[test]
    fn test_validate_rejects_duplicate_tags() {
        let mut d = draft();
        d.tags = vec![1, 1];

        let err = validate_draft(&d).unwrap_err();
        assert!(details_field(&err, "tags"));
    }

    #[test]
    fn test_validate_rejects_duplicate_ingredients() {
        let mut d = draft();
        d.ingredients[1].ingredient_id = 1;

        let err = validate_draft(&d).unwrap_err();
        assert!(details_field(&err, "ingredients"));
        assert!(!details_field(&err, "tags"));
    }

    #[test]
    fn test_validate_rejects_empty_lists() {
        let mut d = draft();
        d.tags.clear();
        d.ingredients.clear();

        let err = validate_draft(&d).unwrap_err();
        assert!(details_field(&err, "tags"));
        assert!(details_field(&err, "ingredients"));
    }

    #[test]
    fn test_validate_rejects_zero_amount_and_time() {
        let mut d = draft();
        d.ingredients[0].amount = 0;
        d.cooking_time = 0;

        let err = validate_draft(&d).unwrap_err();
        assert!(details_field(&err, "ingredients"));
        assert!(details_field(&err, "cooking_time"));
    }

    #[test]
    fn test_validate_accepts_valid_draft() {
        assert!(validate_draft(&draft()).is_ok());
    }

    #[test]
    fn test_build_filter_anonymous_with_flag_matches_nothing() {
        let query = RecipeQuery {
            is_favorited: Some(false),
            ..Default::default()
        };
        assert!(build_filter(None, query).is_none());
    }

    #[test]
    fn test_build_filter_with_viewer() {
        let viewer = create_test_user(3, false);
        let query = RecipeQuery {
            author_id: Some(1),
            tag_slugs: vec!["lunch".to_string()],
            is_in_shopping_cart: Some(true),
            ..Default::default()
        };

        let filter = build_filter(Some(&viewer), query).unwrap();
        assert_eq!(filter.author_id, Some(1));
        assert_eq!(filter.tag_slugs, vec!["lunch".to_string()]);
        assert!(filter.favorited.is_none());
        assert_eq!(
            filter.in_shopping_cart,
            Some(MembershipFilter {
                user_id: 3,
                included: true
            })
        );
    }

    #[tokio::test]
    async fn test_list_anonymous_with_flag_skips_database() {
        let mut mocks = Mocks::default();
        mocks.recipes.expect_count().times(0);
        mocks.recipes.expect_list().times(0);

        let query = RecipeQuery {
            is_in_shopping_cart: Some(true),
            ..Default::default()
        };
        let (recipes, count) = mocks.into_service().list(None, query, 0, 10).await.unwrap();

        assert!(recipes.is_empty());
        assert_eq!(count, 0);
    }

    #[test]
    fn test_membership_filter() {
        let viewer = create_test_user(4, false);

        assert_eq!(membership_filter(None, None), Some(None));
        assert_eq!(membership_filter(Some(&viewer), None), Some(None));
        assert_eq!(membership_filter(None, Some(true)), None);
        assert_eq!(
            membership_filter(Some(&viewer), Some(false)),
            Some(Some(MembershipFilter {
                user_id: 4,
                included: false
            }))
        );
    }

    #[tokio::test]
    async fn test_list_rejects_unknown_tag_slug() {
        let mut mocks = Mocks::default();
        mocks
            .tags
            .expect_existing_slugs()
            .times(1)
            .returning(|_| Ok(vec!["lunch".to_string()]));
        mocks.recipes.expect_count().times(0);
        mocks.recipes.expect_list().times(0);

        let query = RecipeQuery {
            tag_slugs: vec!["lunch".to_string(), "brunch".to_string()],
            ..Default::default()
        };
        let err = mocks
            .into_service()
            .list(None, query, 0, 10)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
        assert!(details_field(&err, "tags"));
    }

    #[tokio::test]
    async fn test_create_stores_image_and_recipe() {
        let mut mocks = Mocks::default();
        mocks.expect_known_references();
        mocks.expect_hydrate();
        mocks.expect_viewer_flags();

        mocks
            .media
            .expect_save()
            .withf(|folder, image| folder == RECIPE_IMAGE_FOLDER && image.extension == "gif")
            .times(1)
            .returning(|_, _| Ok("recipes/images/New.gif".to_string()));
        mocks
            .recipes
            .expect_create()
            .withf(|new_recipe| {
                new_recipe.author_id == 5
                    && new_recipe.image == "recipes/images/New.gif"
                    && new_recipe.tag_ids == vec![1, 2]
            })
            .times(1)
            .returning(|new_recipe| {
                let mut recipe = create_test_recipe(11, new_recipe.author_id);
                recipe.image = new_recipe.image;
                Ok(recipe)
            });

        let author = create_test_user(5, false);
        let details = mocks.into_service().create(&author, draft()).await.unwrap();

        assert_eq!(details.recipe.id, 11);
        assert_eq!(details.author.id, 5);
        assert_eq!(details.tags.len(), 1);
        assert_eq!(details.ingredients[0].name, "flour");
        assert!(!details.is_favorited);
    }

    #[tokio::test]
    async fn test_create_requires_image() {
        let mut mocks = Mocks::default();
        mocks.expect_known_references();
        mocks.media.expect_save().times(0);

        let mut d = draft();
        d.image = None;

        let author = create_test_user(5, false);
        let err = mocks.into_service().create(&author, d).await.unwrap_err();
        assert!(details_field(&err, "image"));
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_tags() {
        let mut mocks = Mocks::default();
        mocks
            .tags
            .expect_existing_ids()
            .returning(|_| Ok(vec![1]));
        mocks.recipes.expect_create().times(0);

        let author = create_test_user(5, false);
        let err = mocks.into_service().create(&author, draft()).await.unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
        assert!(details_field(&err, "tags"));
    }

    #[tokio::test]
    async fn test_create_removes_image_when_insert_fails() {
        let mut mocks = Mocks::default();
        mocks.expect_known_references();

        mocks
            .media
            .expect_save()
            .returning(|_, _| Ok("recipes/images/Orphan.gif".to_string()));
        mocks
            .media
            .expect_delete()
            .withf(|path| path == "recipes/images/Orphan.gif")
            .times(1)
            .returning(|_| Ok(()));
        mocks
            .recipes
            .expect_create()
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let author = create_test_user(5, false);
        let result = mocks.into_service().create(&author, draft()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_update_by_other_user_is_forbidden() {
        let mut mocks = Mocks::default();
        mocks
            .recipes
            .expect_find_by_id()
            .returning(|id| Ok(Some(create_test_recipe(id, 1))));
        mocks.recipes.expect_update().times(0);

        let intruder = create_test_user(2, false);
        let err = mocks
            .into_service()
            .update(&intruder, 10, draft())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Forbidden { .. }));
    }

    #[tokio::test]
    async fn test_update_keeps_image_when_absent() {
        let mut mocks = Mocks::default();
        mocks.expect_known_references();
        mocks.expect_hydrate();
        mocks.expect_viewer_flags();

        mocks
            .recipes
            .expect_find_by_id()
            .returning(|id| Ok(Some(create_test_recipe(id, 1))));
        mocks
            .recipes
            .expect_update()
            .withf(|id, update| *id == 10 && update.image.is_none())
            .times(1)
            .returning(|id, _| Ok(create_test_recipe(id, 1)));
        mocks.media.expect_save().times(0);
        mocks.media.expect_delete().times(0);

        let mut d = draft();
        d.image = None;

        let author = create_test_user(1, false);
        let details = mocks.into_service().update(&author, 10, d).await.unwrap();
        assert_eq!(details.recipe.image, "recipes/images/old.png");
    }

    #[tokio::test]
    async fn test_staff_can_delete_and_image_is_removed() {
        let mut mocks = Mocks::default();
        mocks
            .recipes
            .expect_find_by_id()
            .returning(|id| Ok(Some(create_test_recipe(id, 1))));
        mocks
            .recipes
            .expect_delete()
            .times(1)
            .returning(|_| Ok(true));
        mocks
            .media
            .expect_delete()
            .withf(|path| path == "recipes/images/old.png")
            .times(1)
            .returning(|_| Ok(()));

        let staff = create_test_user(9, true);
        assert!(mocks.into_service().delete(&staff, 10).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_missing_recipe() {
        let mut mocks = Mocks::default();
        mocks.recipes.expect_find_by_id().returning(|_| Ok(None));

        let user = create_test_user(1, false);
        let err = mocks.into_service().delete(&user, 404).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_add_to_favorites_twice() {
        let mut mocks = Mocks::default();
        mocks
            .recipes
            .expect_find_by_id()
            .returning(|id| Ok(Some(create_test_recipe(id, 1))));
        mocks
            .collections
            .expect_add()
            .withf(|collection, user_id, recipe_id| {
                *collection == RecipeCollection::Favorites && *user_id == 2 && *recipe_id == 10
            })
            .returning(|_, _, _| Ok(false));

        let user = create_test_user(2, false);
        let err = mocks
            .into_service()
            .add_to(RecipeCollection::Favorites, &user, 10)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_add_to_missing_recipe() {
        let mut mocks = Mocks::default();
        mocks.recipes.expect_find_by_id().returning(|_| Ok(None));
        mocks.collections.expect_add().times(0);

        let user = create_test_user(2, false);
        let err = mocks
            .into_service()
            .add_to(RecipeCollection::ShoppingCart, &user, 10)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_remove_absent_entry() {
        let mut mocks = Mocks::default();
        mocks
            .recipes
            .expect_find_by_id()
            .returning(|id| Ok(Some(create_test_recipe(id, 1))));
        mocks
            .collections
            .expect_remove()
            .returning(|_, _, _| Ok(false));

        let user = create_test_user(2, false);
        let err = mocks
            .into_service()
            .remove_from(RecipeCollection::ShoppingCart, &user, 10)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_shopping_list_aggregates_rows() {
        let mut mocks = Mocks::default();
        mocks
            .collections
            .expect_shopping_cart_rows()
            .withf(|user_id| *user_id == 2)
            .returning(|_| {
                Ok(vec![
                    UsageRow::new("flour", "g", 100),
                    UsageRow::new("egg", "pc", 2),
                    UsageRow::new("flour", "g", 50),
                ])
            });

        let user = create_test_user(2, false);
        let text = mocks.into_service().shopping_list(&user).await.unwrap();
        assert_eq!(text, "flour (g) - 150\negg (pc) - 2");
    }

    #[tokio::test]
    async fn test_get_sets_viewer_flags() {
        let mut mocks = Mocks::default();
        mocks.expect_hydrate();
        mocks
            .recipes
            .expect_find_by_id()
            .returning(|id| Ok(Some(create_test_recipe(id, 1))));
        mocks
            .collections
            .expect_contained_ids()
            .returning(|collection, _, ids| match collection {
                RecipeCollection::Favorites => Ok(ids.to_vec()),
                RecipeCollection::ShoppingCart => Ok(Vec::new()),
            });
        mocks
            .subscriptions
            .expect_subscribed_author_ids()
            .returning(|_, ids| Ok(ids.to_vec()));

        let viewer = create_test_user(2, false);
        let details = mocks.into_service().get(Some(&viewer), 10).await.unwrap();

        assert!(details.is_favorited);
        assert!(!details.is_in_shopping_cart);
        assert!(details.author_subscribed);
    }
}
