mod common;

use foodgram::domain::repositories::TokenRepository;
use foodgram::infrastructure::persistence::PgTokenRepository;
use sqlx::PgPool;
use std::sync::Arc;

fn hash(c: char) -> String {
    std::iter::repeat_n(c, 64).collect()
}

#[sqlx::test]
async fn test_create_and_resolve_token(pool: PgPool) {
    let user = common::create_test_user(&pool, "cook").await;
    let repo = PgTokenRepository::new(Arc::new(pool));

    repo.create_token(user.id, &hash('a')).await.unwrap();

    let owner = repo.find_user_by_token(&hash('a')).await.unwrap();
    assert_eq!(owner.unwrap().id, user.id);
}

#[sqlx::test]
async fn test_unknown_token(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));

    assert!(repo.find_user_by_token(&hash('z')).await.unwrap().is_none());
}

#[sqlx::test]
async fn test_update_last_used(pool: PgPool) {
    let user = common::create_test_user(&pool, "cook").await;
    let repo = PgTokenRepository::new(Arc::new(pool.clone()));

    repo.create_token(user.id, &hash('b')).await.unwrap();
    repo.update_last_used(&hash('b')).await.unwrap();

    let last_used: Option<chrono::DateTime<chrono::Utc>> =
        sqlx::query_scalar("SELECT last_used_at FROM auth_tokens WHERE token_hash = $1")
            .bind(hash('b'))
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(last_used.is_some());
}

#[sqlx::test]
async fn test_delete_user_tokens(pool: PgPool) {
    let user = common::create_test_user(&pool, "cook").await;
    let other = common::create_test_user(&pool, "other").await;
    let repo = PgTokenRepository::new(Arc::new(pool.clone()));

    repo.create_token(user.id, &hash('c')).await.unwrap();
    repo.create_token(user.id, &hash('d')).await.unwrap();
    repo.create_token(other.id, &hash('e')).await.unwrap();

    assert_eq!(repo.delete_user_tokens(user.id).await.unwrap(), 2);
    assert!(repo.find_user_by_token(&hash('c')).await.unwrap().is_none());
    assert_eq!(common::token_count(&pool, other.id).await, 1);
}
