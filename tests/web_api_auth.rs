//! Web API authentication tests.

mod common;

use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use bhub::db::Role;
use serde_json::{json, Value};

use common::{create_test_server, create_user, login};

#[tokio::test]
async fn test_login_success() {
    let (server, db) = create_test_server().await;
    create_user(&db, "alice", "password123", Role::Member).await;

    let response = server
        .post("/api/auth/login")
        .json(&json!({ "username": "alice", "password": "password123" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["success"], true);
    assert!(body["data"]["access_token"].as_str().is_some());
    assert!(body["data"]["refresh_token"].as_str().is_some());
    assert_eq!(body["data"]["user"]["username"], "alice");
    assert_eq!(body["data"]["user"]["role"], "member");
}

#[tokio::test]
async fn test_login_wrong_password() {
    let (server, db) = create_test_server().await;
    create_user(&db, "alice", "password123", Role::Member).await;

    let response = server
        .post("/api/auth/login")
        .json(&json!({ "username": "alice", "password": "wrong-password" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body = response.json::<Value>();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_login_unknown_user() {
    let (server, _db) = create_test_server().await;

    let response = server
        .post("/api/auth/login")
        .json(&json!({ "username": "ghost", "password": "password123" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_empty_fields_rejected() {
    let (server, _db) = create_test_server().await;

    let response = server
        .post("/api/auth/login")
        .json(&json!({ "username": "", "password": "" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_me_requires_token() {
    let (server, _db) = create_test_server().await;

    let response = server.get("/api/auth/me").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_with_token() {
    let (server, db) = create_test_server().await;
    create_user(&db, "alice", "password123", Role::Member).await;
    let token = login(&server, "alice", "password123").await;

    let response = server
        .get("/api/auth/me")
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["data"]["username"], "alice");
}

#[tokio::test]
async fn test_me_rejects_garbage_token() {
    let (server, _db) = create_test_server().await;

    let response = server
        .get("/api/auth/me")
        .add_header(AUTHORIZATION, "Bearer not-a-jwt")
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_rotates_token() {
    let (server, db) = create_test_server().await;
    create_user(&db, "alice", "password123", Role::Member).await;

    let login_response = server
        .post("/api/auth/login")
        .json(&json!({ "username": "alice", "password": "password123" }))
        .await;
    let refresh_token = login_response.json::<Value>()["data"]["refresh_token"]
        .as_str()
        .unwrap()
        .to_string();

    let response = server
        .post("/api/auth/refresh")
        .json(&json!({ "refresh_token": refresh_token }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let new_refresh = response.json::<Value>()["data"]["refresh_token"]
        .as_str()
        .unwrap()
        .to_string();
    assert_ne!(new_refresh, refresh_token);

    // The old token was revoked by rotation
    let replay = server
        .post("/api/auth/refresh")
        .json(&json!({ "refresh_token": refresh_token }))
        .await;
    assert_eq!(replay.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_revokes_refresh_token() {
    let (server, db) = create_test_server().await;
    create_user(&db, "alice", "password123", Role::Member).await;

    let login_response = server
        .post("/api/auth/login")
        .json(&json!({ "username": "alice", "password": "password123" }))
        .await;
    let refresh_token = login_response.json::<Value>()["data"]["refresh_token"]
        .as_str()
        .unwrap()
        .to_string();

    let logout = server
        .post("/api/auth/logout")
        .json(&json!({ "refresh_token": refresh_token }))
        .await;
    assert_eq!(logout.status_code(), StatusCode::OK);

    let refresh = server
        .post("/api/auth/refresh")
        .json(&json!({ "refresh_token": refresh_token }))
        .await;
    assert_eq!(refresh.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_disabled_account_cannot_login() {
    let (server, db) = create_test_server().await;
    let user_id = create_user(&db, "alice", "password123", Role::Member).await;

    bhub::UserRepository::new(db.pool())
        .update(user_id, &bhub::UserUpdate::new().is_active(false))
        .await
        .unwrap();

    let response = server
        .post("/api/auth/login")
        .json(&json!({ "username": "alice", "password": "password123" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}
