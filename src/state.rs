//! Shared application state injected into every handler.

use std::sync::Arc;

use sqlx::PgPool;

use crate::application::services::{
    AuthService, CatalogService, RecipeService, ShortLinkService, UserService,
};
use crate::infrastructure::media::MediaStorage;
use crate::infrastructure::persistence::{
    PgCollectionRepository, PgIngredientRepository, PgRecipeRepository, PgShortLinkRepository,
    PgSubscriptionRepository, PgTagRepository, PgTokenRepository, PgUserRepository,
};
use crate::utils::token::DEFAULT_TOKEN_LENGTH;

pub type PgAuthService = AuthService<PgUserRepository, PgTokenRepository>;
pub type PgUserService = UserService<PgUserRepository, PgSubscriptionRepository, PgRecipeRepository>;
pub type PgCatalogService = CatalogService<PgTagRepository, PgIngredientRepository>;
pub type PgRecipeService = RecipeService<
    PgRecipeRepository,
    PgTagRepository,
    PgIngredientRepository,
    PgCollectionRepository,
    PgUserRepository,
    PgSubscriptionRepository,
>;
pub type PgShortLinkService = ShortLinkService<PgShortLinkRepository>;

/// Tunables used while wiring services.
#[derive(Debug, Clone)]
pub struct StateOptions {
    pub token_signing_secret: String,
    pub short_link_token_length: usize,
    pub short_link_max_attempts: usize,
    pub behind_proxy: bool,
}

impl Default for StateOptions {
    fn default() -> Self {
        Self {
            token_signing_secret: String::new(),
            short_link_token_length: DEFAULT_TOKEN_LENGTH,
            short_link_max_attempts: 10,
            behind_proxy: false,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<PgPool>,
    pub auth_service: Arc<PgAuthService>,
    pub user_service: Arc<PgUserService>,
    pub catalog_service: Arc<PgCatalogService>,
    pub recipe_service: Arc<PgRecipeService>,
    pub short_link_service: Arc<PgShortLinkService>,
    pub media: Arc<dyn MediaStorage>,
    /// Trust `X-Forwarded-*` headers when rebuilding request URLs.
    pub behind_proxy: bool,
}

impl AppState {
    pub fn new(pool: Arc<PgPool>, media: Arc<dyn MediaStorage>, options: StateOptions) -> Self {
        let users = Arc::new(PgUserRepository::new(pool.clone()));
        let tokens = Arc::new(PgTokenRepository::new(pool.clone()));
        let subscriptions = Arc::new(PgSubscriptionRepository::new(pool.clone()));
        let tags = Arc::new(PgTagRepository::new(pool.clone()));
        let ingredients = Arc::new(PgIngredientRepository::new(pool.clone()));
        let recipes = Arc::new(PgRecipeRepository::new(pool.clone()));
        let collections = Arc::new(PgCollectionRepository::new(pool.clone()));
        let short_links = Arc::new(PgShortLinkRepository::new(pool.clone()));

        let auth_service = Arc::new(AuthService::new(
            users.clone(),
            tokens,
            options.token_signing_secret,
        ));
        let user_service = Arc::new(UserService::new(
            users.clone(),
            subscriptions.clone(),
            recipes.clone(),
            media.clone(),
        ));
        let catalog_service = Arc::new(CatalogService::new(tags.clone(), ingredients.clone()));
        let recipe_service = Arc::new(RecipeService::new(
            recipes,
            tags,
            ingredients,
            collections,
            users,
            subscriptions,
            media.clone(),
        ));
        let short_link_service = Arc::new(ShortLinkService::new(
            short_links,
            options.short_link_token_length,
            options.short_link_max_attempts,
        ));

        Self {
            pool,
            auth_service,
            user_service,
            catalog_service,
            recipe_service,
            short_link_service,
            media,
            behind_proxy: options.behind_proxy,
        }
    }
}
