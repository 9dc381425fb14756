mod common;

use serde_json::json;
use sqlx::PgPool;

fn registration(username: &str) -> serde_json::Value {
    json!({
        "email": format!("{}@foodgram.test", username),
        "username": username,
        "first_name": "Ivan",
        "last_name": "Petrov",
        "password": common::TEST_PASSWORD,
    })
}

#[sqlx::test]
async fn test_register_and_login(pool: PgPool) {
    let server = common::create_test_server(pool);

    let response = server.post("/api/users").json(&registration("ivan")).await;

    response.assert_status(axum::http::StatusCode::CREATED);
    let user = response.json::<serde_json::Value>();
    assert_eq!(user["username"], "ivan");
    assert!(user.get("password").is_none());
    assert!(user.get("password_hash").is_none());

    let response = server
        .post("/api/auth/token/login")
        .json(&json!({ "email": "ivan@foodgram.test", "password": common::TEST_PASSWORD }))
        .await;

    response.assert_status_ok();
    let token = response.json::<serde_json::Value>()["auth_token"]
        .as_str()
        .unwrap()
        .to_string();

    let response = server
        .get("/api/users/me")
        .add_header("Authorization", common::auth_header(&token))
        .await;

    response.assert_status_ok();
    let me = response.json::<serde_json::Value>();
    assert_eq!(me["email"], "ivan@foodgram.test");
    assert_eq!(me["is_subscribed"], false);
    assert!(me["avatar"].is_null());
}

#[sqlx::test]
async fn test_register_duplicate_username(pool: PgPool) {
    common::create_test_user(&pool, "ivan").await;
    let server = common::create_test_server(pool);

    let mut body = registration("ivan");
    body["email"] = json!("another@foodgram.test");

    let response = server.post("/api/users").json(&body).await;

    response.assert_status_bad_request();
}

#[sqlx::test]
async fn test_register_invalid_fields(pool: PgPool) {
    let server = common::create_test_server(pool);

    let response = server
        .post("/api/users")
        .json(&json!({
            "email": "not-an-email",
            "username": "bad name!",
            "first_name": "Ivan",
            "last_name": "Petrov",
            "password": common::TEST_PASSWORD,
        }))
        .await;

    response.assert_status_bad_request();
}

#[sqlx::test]
async fn test_login_wrong_password(pool: PgPool) {
    let user = common::create_test_user(&pool, "ivan").await;
    let server = common::create_test_server(pool);

    let response = server
        .post("/api/auth/token/login")
        .json(&json!({ "email": user.email, "password": "wrong-password" }))
        .await;

    response.assert_status_bad_request();
}

#[sqlx::test]
async fn test_me_requires_token(pool: PgPool) {
    let server = common::create_test_server(pool);

    let response = server.get("/api/users/me").await;

    response.assert_status_unauthorized();
}

#[sqlx::test]
async fn test_invalid_token_is_rejected(pool: PgPool) {
    let server = common::create_test_server(pool);

    let response = server
        .get("/api/recipes")
        .add_header("Authorization", "Token not-a-real-token")
        .await;

    response.assert_status_unauthorized();
}

#[sqlx::test]
async fn test_logout_revokes_token(pool: PgPool) {
    let user = common::create_test_user(&pool, "ivan").await;
    let token = common::login(&pool, &user).await;
    let server = common::create_test_server(pool.clone());

    let response = server
        .post("/api/auth/token/logout")
        .add_header("Authorization", common::auth_header(&token))
        .await;

    response.assert_status(axum::http::StatusCode::NO_CONTENT);
    assert_eq!(common::token_count(&pool, user.id).await, 0);

    let response = server
        .get("/api/users/me")
        .add_header("Authorization", common::auth_header(&token))
        .await;

    response.assert_status_unauthorized();
}

#[sqlx::test]
async fn test_set_password(pool: PgPool) {
    let user = common::create_test_user(&pool, "ivan").await;
    let token = common::login(&pool, &user).await;
    let server = common::create_test_server(pool);

    let response = server
        .post("/api/users/set_password")
        .add_header("Authorization", common::auth_header(&token))
        .json(&json!({ "current_password": "wrong-password", "new_password": "fresh-pass-42" }))
        .await;
    response.assert_status_bad_request();

    let response = server
        .post("/api/users/set_password")
        .add_header("Authorization", common::auth_header(&token))
        .json(&json!({ "current_password": common::TEST_PASSWORD, "new_password": "fresh-pass-42" }))
        .await;
    response.assert_status(axum::http::StatusCode::NO_CONTENT);

    let response = server
        .post("/api/auth/token/login")
        .json(&json!({ "email": user.email, "password": "fresh-pass-42" }))
        .await;
    response.assert_status_ok();
}

#[sqlx::test]
async fn test_avatar_upload_and_delete(pool: PgPool) {
    let user = common::create_test_user(&pool, "ivan").await;
    let token = common::login(&pool, &user).await;
    let server = common::create_test_server(pool);

    let response = server
        .put("/api/users/me/avatar")
        .add_header("Authorization", common::auth_header(&token))
        .json(&json!({ "avatar": common::PNG_DATA_URI }))
        .await;

    response.assert_status_ok();
    let avatar = response.json::<serde_json::Value>()["avatar"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(avatar.starts_with("/media/users/"));
    assert!(avatar.ends_with(".png"));

    let response = server
        .delete("/api/users/me/avatar")
        .add_header("Authorization", common::auth_header(&token))
        .await;
    response.assert_status(axum::http::StatusCode::NO_CONTENT);

    let me = server
        .get("/api/users/me")
        .add_header("Authorization", common::auth_header(&token))
        .await
        .json::<serde_json::Value>();
    assert!(me["avatar"].is_null());
}

#[sqlx::test]
async fn test_user_list_is_paginated(pool: PgPool) {
    for name in ["a", "b", "c"] {
        common::create_test_user(&pool, name).await;
    }
    let server = common::create_test_server(pool);

    let response = server
        .get("/api/users?page=2&limit=2")
        .add_header("Host", common::TEST_HOST)
        .await;

    response.assert_status_ok();
    let page = response.json::<serde_json::Value>();
    assert_eq!(page["count"], 3);
    assert!(page["next"].is_null());
    assert_eq!(page["previous"], "http://foodgram.test/api/users?limit=2");
    assert_eq!(page["results"].as_array().unwrap().len(), 1);
    assert_eq!(page["results"][0]["username"], "c");
}

#[sqlx::test]
async fn test_user_list_page_out_of_range(pool: PgPool) {
    common::create_test_user(&pool, "a").await;
    let server = common::create_test_server(pool);

    let response = server
        .get("/api/users?page=5")
        .add_header("Host", common::TEST_HOST)
        .await;

    response.assert_status_not_found();
}

#[sqlx::test]
async fn test_subscribe_flow(pool: PgPool) {
    let fan = common::create_test_user(&pool, "fan").await;
    let author = common::create_test_user(&pool, "author").await;
    for name in ["One", "Two", "Three"] {
        common::create_test_recipe(&pool, author.id, name, vec![], vec![]).await;
    }
    let token = common::login(&pool, &fan).await;
    let server = common::create_test_server(pool);

    let path = format!("/api/users/{}/subscribe?recipes_limit=2", author.id);
    let response = server
        .post(&path)
        .add_header("Authorization", common::auth_header(&token))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["username"], "author");
    assert_eq!(body["is_subscribed"], true);
    assert_eq!(body["recipes_count"], 3);
    assert_eq!(body["recipes"].as_array().unwrap().len(), 2);

    let response = server
        .post(&path)
        .add_header("Authorization", common::auth_header(&token))
        .await;
    response.assert_status_bad_request();

    let response = server
        .get("/api/users/subscriptions")
        .add_header("Host", common::TEST_HOST)
        .add_header("Authorization", common::auth_header(&token))
        .await;
    response.assert_status_ok();
    let page = response.json::<serde_json::Value>();
    assert_eq!(page["count"], 1);
    assert_eq!(page["results"][0]["id"], author.id);

    let detail = server
        .get(&format!("/api/users/{}", author.id))
        .add_header("Authorization", common::auth_header(&token))
        .await
        .json::<serde_json::Value>();
    assert_eq!(detail["is_subscribed"], true);

    let response = server
        .delete(&format!("/api/users/{}/subscribe", author.id))
        .add_header("Authorization", common::auth_header(&token))
        .await;
    response.assert_status(axum::http::StatusCode::NO_CONTENT);

    let response = server
        .delete(&format!("/api/users/{}/subscribe", author.id))
        .add_header("Authorization", common::auth_header(&token))
        .await;
    response.assert_status_bad_request();
}

#[sqlx::test]
async fn test_malformed_recipes_limit_is_ignored(pool: PgPool) {
    let fan = common::create_test_user(&pool, "fan").await;
    let author = common::create_test_user(&pool, "author").await;
    for name in ["One", "Two", "Three"] {
        common::create_test_recipe(&pool, author.id, name, vec![], vec![]).await;
    }
    sqlx::query("INSERT INTO subscriptions (user_id, author_id) VALUES ($1, $2)")
        .bind(fan.id)
        .bind(author.id)
        .execute(&pool)
        .await
        .unwrap();
    let token = common::login(&pool, &fan).await;
    let server = common::create_test_server(pool);

    for raw in ["abc", "-1", "2.5"] {
        let response = server
            .get(&format!("/api/users/subscriptions?recipes_limit={}", raw))
            .add_header("Host", common::TEST_HOST)
            .add_header("Authorization", common::auth_header(&token))
            .await;

        response.assert_status_ok();
        let page = response.json::<serde_json::Value>();
        assert_eq!(page["count"], 1);
        assert_eq!(page["results"][0]["recipes"].as_array().unwrap().len(), 3);
        assert_eq!(page["results"][0]["recipes_count"], 3);
    }

    let response = server
        .get("/api/users/subscriptions?recipes_limit=1")
        .add_header("Host", common::TEST_HOST)
        .add_header("Authorization", common::auth_header(&token))
        .await;
    response.assert_status_ok();
    let page = response.json::<serde_json::Value>();
    assert_eq!(page["results"][0]["recipes"].as_array().unwrap().len(), 1);
}

#[sqlx::test]
async fn test_cannot_subscribe_to_self(pool: PgPool) {
    let user = common::create_test_user(&pool, "narcissus").await;
    let token = common::login(&pool, &user).await;
    let server = common::create_test_server(pool);

    let response = server
        .post(&format!("/api/users/{}/subscribe", user.id))
        .add_header("Authorization", common::auth_header(&token))
        .await;

    response.assert_status_bad_request();
}

#[sqlx::test]
async fn test_subscribe_unknown_author(pool: PgPool) {
    let user = common::create_test_user(&pool, "fan").await;
    let token = common::login(&pool, &user).await;
    let server = common::create_test_server(pool);

    let response = server
        .post("/api/users/999999/subscribe")
        .add_header("Authorization", common::auth_header(&token))
        .await;

    response.assert_status_not_found();
}
