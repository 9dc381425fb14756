#![allow(dead_code)]

use axum_test::TestServer;
use foodgram::domain::entities::{IngredientAmount, NewRecipe, NewUser, Recipe, User};
use foodgram::domain::repositories::{RecipeRepository, UserRepository};
use foodgram::infrastructure::media::{LocalMediaStorage, MediaStorage};
use foodgram::infrastructure::persistence::{PgRecipeRepository, PgUserRepository};
use foodgram::state::{AppState, StateOptions};
use foodgram::utils::password::hash_password;
use sqlx::PgPool;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const TEST_HOST: &str = "foodgram.test";
pub const TEST_PASSWORD: &str = "s3cret-pass";
pub const SIGNING_SECRET: &str = "test-signing-secret";

/// 1x1 transparent PNG.
pub const PNG_DATA_URI: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

static MEDIA_DIRS: AtomicUsize = AtomicUsize::new(0);

pub fn test_media_root() -> PathBuf {
    let n = MEDIA_DIRS.fetch_add(1, Ordering::SeqCst);
    std::env::temp_dir().join(format!("foodgram-test-{}-{}", std::process::id(), n))
}

pub fn create_test_state(pool: PgPool) -> AppState {
    let root = test_media_root();
    std::fs::create_dir_all(&root).unwrap();
    let media: Arc<dyn MediaStorage> = Arc::new(LocalMediaStorage::new(root, "/media/"));

    AppState::new(
        Arc::new(pool),
        media,
        StateOptions {
            token_signing_secret: SIGNING_SECRET.to_string(),
            ..StateOptions::default()
        },
    )
}

pub fn create_test_server(pool: PgPool) -> TestServer {
    TestServer::new(foodgram::routes::api_router(create_test_state(pool))).unwrap()
}

pub async fn create_test_user(pool: &PgPool, username: &str) -> User {
    let repo = PgUserRepository::new(Arc::new(pool.clone()));
    repo.create(NewUser {
        email: format!("{}@foodgram.test", username),
        username: username.to_string(),
        first_name: "Test".to_string(),
        last_name: "Cook".to_string(),
        password_hash: hash_password(TEST_PASSWORD).unwrap(),
        is_staff: false,
    })
    .await
    .unwrap()
}

pub async fn create_staff_user(pool: &PgPool, username: &str) -> User {
    let user = create_test_user(pool, username).await;
    sqlx::query("UPDATE users SET is_staff = TRUE WHERE id = $1")
        .bind(user.id)
        .execute(pool)
        .await
        .unwrap();
    User {
        is_staff: true,
        ..user
    }
}

/// Logs `user` in through the auth service and returns the raw token.
pub async fn login(pool: &PgPool, user: &User) -> String {
    let state = create_test_state(pool.clone());
    state
        .auth_service
        .login(&user.email, TEST_PASSWORD)
        .await
        .unwrap()
}

pub fn auth_header(token: &str) -> String {
    format!("Token {}", token)
}

pub async fn create_test_tag(pool: &PgPool, name: &str, slug: &str) -> i64 {
    sqlx::query_scalar::<_, i64>("INSERT INTO tags (name, slug) VALUES ($1, $2) RETURNING id")
        .bind(name)
        .bind(slug)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn create_test_ingredient(pool: &PgPool, name: &str, unit: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO ingredients (name, measurement_unit) VALUES ($1, $2) RETURNING id",
    )
    .bind(name)
    .bind(unit)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Inserts a recipe directly, bypassing image storage.
pub async fn create_test_recipe(
    pool: &PgPool,
    author_id: i64,
    name: &str,
    tag_ids: Vec<i64>,
    ingredients: Vec<(i64, i32)>,
) -> Recipe {
    let repo = PgRecipeRepository::new(Arc::new(pool.clone()));
    repo.create(NewRecipe {
        author_id,
        name: name.to_string(),
        text: format!("How to cook {}", name),
        cooking_time: 15,
        image: "recipes/images/test.png".to_string(),
        tag_ids,
        ingredients: ingredients
            .into_iter()
            .map(|(ingredient_id, amount)| IngredientAmount {
                ingredient_id,
                amount,
            })
            .collect(),
    })
    .await
    .unwrap()
}

pub async fn add_to_collection(pool: &PgPool, table: &str, user_id: i64, recipe_id: i64) {
    sqlx::query(&format!(
        "INSERT INTO {} (user_id, recipe_id) VALUES ($1, $2)",
        table
    ))
    .bind(user_id)
    .bind(recipe_id)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn count_rows(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn token_count(pool: &PgPool, user_id: i64) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM auth_tokens WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .unwrap()
}
