//! Web API admin tests: permission checks, feed management, curation,
//! cleanup, banners, categories.

mod common;

use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use bhub::content::{ArticleRepository, AuthorRepository};
use bhub::db::Role;
use serde_json::{json, Value};

use common::{
    add_author, admin_token, backdate_article, create_article, create_feed, create_test_server,
    create_user, login,
};

// ============================================================================
// Permission checks
// ============================================================================

#[tokio::test]
async fn test_admin_routes_require_authentication() {
    let (server, _db) = create_test_server().await;

    for path in [
        "/api/admin/feeds",
        "/api/admin/articles",
        "/api/admin/banners",
    ] {
        let response = server.get(path).await;
        assert_eq!(
            response.status_code(),
            StatusCode::UNAUTHORIZED,
            "{path} should require auth"
        );
    }

    let response = server.post("/api/admin/sync-all").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = server.post("/api/admin/repository/clean").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_routes_reject_members() {
    let (server, db) = create_test_server().await;
    create_user(&db, "member", "password123", Role::Member).await;
    let token = login(&server, "member", "password123").await;

    let response = server
        .get("/api/admin/feeds")
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    let body = response.json::<Value>();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "FORBIDDEN");

    let response = server
        .post("/api/admin/repository/clean")
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .json(&json!({ "retention_days": 30 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

// ============================================================================
// Feed management
// ============================================================================

#[tokio::test]
async fn test_admin_list_feeds() {
    let (server, db) = create_test_server().await;
    let token = admin_token(&server, &db).await;
    create_feed(&db, "https://example.com/jaba.xml", "JABA").await;
    create_feed(&db, "https://example.com/jeab.xml", "JEAB").await;

    let response = server
        .get("/api/admin/feeds")
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"][0]["title"], "JABA");
    assert_eq!(body["data"][0]["error_count"], 0);
}

#[tokio::test]
async fn test_admin_create_feed_rejects_invalid_url() {
    let (server, db) = create_test_server().await;
    let token = admin_token(&server, &db).await;

    let response = server
        .post("/api/admin/feeds")
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .json(&json!({ "url": "not a url" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_create_feed_rejects_internal_host() {
    let (server, db) = create_test_server().await;
    let token = admin_token(&server, &db).await;

    let response = server
        .post("/api/admin/feeds")
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .json(&json!({ "url": "http://localhost/feed.xml" }))
        .await;
    // SSRF validation fails before any network I/O
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_create_feed_conflict_on_duplicate() {
    let (server, db) = create_test_server().await;
    let token = admin_token(&server, &db).await;
    create_feed(&db, "https://example.com/jaba.xml", "JABA").await;

    let response = server
        .post("/api/admin/feeds")
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .json(&json!({ "url": "https://example.com/jaba.xml" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_admin_update_feed() {
    let (server, db) = create_test_server().await;
    let token = admin_token(&server, &db).await;
    let feed_id = create_feed(&db, "https://example.com/jaba.xml", "JABA").await;

    let response = server
        .put(&format!("/api/admin/feeds/{feed_id}"))
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .json(&json!({ "title": "JABA (renamed)", "country": "US", "is_active": false }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["data"]["title"], "JABA (renamed)");
    assert_eq!(body["data"]["country"], "US");
    assert_eq!(body["data"]["is_active"], false);
}

#[tokio::test]
async fn test_admin_update_feed_not_found() {
    let (server, db) = create_test_server().await;
    let token = admin_token(&server, &db).await;

    let response = server
        .put("/api/admin/feeds/999")
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .json(&json!({ "title": "Nope" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_delete_feed_cascades_articles() {
    let (server, db) = create_test_server().await;
    let token = admin_token(&server, &db).await;
    let feed_id = create_feed(&db, "https://example.com/jaba.xml", "JABA").await;
    let article_id = create_article(&db, feed_id, "g1", "Article").await;
    add_author(&db, article_id, "Solo Author", 0).await;

    let response = server
        .delete(&format!("/api/admin/feeds/{feed_id}"))
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let articles = ArticleRepository::new(db.pool());
    assert!(articles.get_by_id(article_id).await.unwrap().is_none());
    // Author garbage-collected with the cascade
    assert_eq!(AuthorRepository::new(db.pool()).count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_admin_verify_feed_reports_invalid_url() {
    let (server, db) = create_test_server().await;
    let token = admin_token(&server, &db).await;

    let response = server
        .post("/api/admin/feeds/verify")
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .json(&json!({ "url": "http://192.168.1.10/feed.xml" }))
        .await;
    // Verification failures are data, not error statuses
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["data"]["valid"], false);
    assert!(body["data"]["error"]
        .as_str()
        .unwrap()
        .contains("private IP"));
}

#[tokio::test]
async fn test_admin_sync_missing_feed() {
    let (server, db) = create_test_server().await;
    let token = admin_token(&server, &db).await;

    let response = server
        .post("/api/admin/feeds/999/sync")
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_sync_all_collects_failures() {
    let (server, db) = create_test_server().await;
    let token = admin_token(&server, &db).await;
    // Fails at SSRF validation without touching the network
    create_feed(&db, "http://localhost/feed.xml", "Internal").await;

    let response = server
        .post("/api/admin/sync-all")
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["data"]["feeds_processed"], 1);
    assert_eq!(body["data"]["articles_added"], 0);
    assert_eq!(body["data"]["failures"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["failures"][0]["feed_title"], "Internal");
}

// ============================================================================
// Repository cleanup
// ============================================================================

#[tokio::test]
async fn test_admin_clean_repository() {
    let (server, db) = create_test_server().await;
    let token = admin_token(&server, &db).await;
    let feed_id = create_feed(&db, "https://example.com/jaba.xml", "JABA").await;

    let old = create_article(&db, feed_id, "old", "Old").await;
    add_author(&db, old, "Orphaned Author", 0).await;
    backdate_article(&db, old, 100).await;
    let fresh = create_article(&db, feed_id, "fresh", "Fresh").await;
    add_author(&db, fresh, "Kept Author", 0).await;

    let response = server
        .post("/api/admin/repository/clean")
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .json(&json!({ "retention_days": 30 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["data"]["articles_affected"], 1);
    assert_eq!(body["data"]["authors_removed"], 1);
    assert_eq!(body["data"]["archived"], false);

    let articles = ArticleRepository::new(db.pool());
    assert!(articles.get_by_id(old).await.unwrap().is_none());
    assert!(articles.get_by_id(fresh).await.unwrap().is_some());
}

#[tokio::test]
async fn test_admin_clean_repository_archive_mode() {
    let (server, db) = create_test_server().await;
    let token = admin_token(&server, &db).await;
    let feed_id = create_feed(&db, "https://example.com/jaba.xml", "JABA").await;
    let old = create_article(&db, feed_id, "old", "Old").await;
    backdate_article(&db, old, 100).await;

    let response = server
        .post("/api/admin/repository/clean")
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .json(&json!({ "retention_days": 30, "archive": true }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["data"]["articles_affected"], 1);
    assert_eq!(body["data"]["archived"], true);

    let article = ArticleRepository::new(db.pool())
        .get_by_id(old)
        .await
        .unwrap()
        .unwrap();
    assert!(article.is_archived);
}

#[tokio::test]
async fn test_admin_clean_repository_defaults_from_config() {
    let (server, db) = create_test_server().await;
    let token = admin_token(&server, &db).await;
    let feed_id = create_feed(&db, "https://example.com/jaba.xml", "JABA").await;
    // Test config retention is 30 days
    let old = create_article(&db, feed_id, "old", "Old").await;
    backdate_article(&db, old, 60).await;

    // Empty body uses configured defaults
    let response = server
        .post("/api/admin/repository/clean")
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["data"]["articles_affected"], 1);
}

#[tokio::test]
async fn test_admin_clean_repository_rejects_bad_horizon() {
    let (server, db) = create_test_server().await;
    let token = admin_token(&server, &db).await;

    let response = server
        .post("/api/admin/repository/clean")
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .json(&json!({ "retention_days": 0 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Article curation
// ============================================================================

#[tokio::test]
async fn test_admin_list_articles_includes_archived() {
    let (server, db) = create_test_server().await;
    let token = admin_token(&server, &db).await;
    let feed_id = create_feed(&db, "https://example.com/jaba.xml", "JABA").await;
    create_article(&db, feed_id, "visible", "Visible").await;
    let archived = create_article(&db, feed_id, "archived", "Archived").await;
    ArticleRepository::new(db.pool())
        .set_archived(archived, true)
        .await
        .unwrap();

    let response = server
        .get("/api/admin/articles")
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["meta"]["total"], 2);
}

#[tokio::test]
async fn test_admin_highlight_toggle() {
    let (server, db) = create_test_server().await;
    let token = admin_token(&server, &db).await;
    let feed_id = create_feed(&db, "https://example.com/jaba.xml", "JABA").await;
    let article_id = create_article(&db, feed_id, "g1", "Article").await;

    let response = server
        .put(&format!("/api/admin/articles/{article_id}/highlight"))
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .json(&json!({ "highlighted": true }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["data"]["highlighted"], true);

    let response = server
        .put(&format!("/api/admin/articles/{article_id}/highlight"))
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .json(&json!({ "highlighted": false }))
        .await;
    assert_eq!(response.json::<Value>()["data"]["highlighted"], false);
}

#[tokio::test]
async fn test_admin_highlight_missing_article() {
    let (server, db) = create_test_server().await;
    let token = admin_token(&server, &db).await;

    let response = server
        .put("/api/admin/articles/999/highlight")
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .json(&json!({ "highlighted": true }))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_archive_article() {
    let (server, db) = create_test_server().await;
    let token = admin_token(&server, &db).await;
    let feed_id = create_feed(&db, "https://example.com/jaba.xml", "JABA").await;
    let article_id = create_article(&db, feed_id, "g1", "Article").await;

    let response = server
        .put(&format!("/api/admin/articles/{article_id}/archive"))
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .json(&json!({ "archived": true }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["data"]["is_archived"], true);
}

#[tokio::test]
async fn test_admin_delete_article_removes_orphans() {
    let (server, db) = create_test_server().await;
    let token = admin_token(&server, &db).await;
    let feed_id = create_feed(&db, "https://example.com/jaba.xml", "JABA").await;
    let article_id = create_article(&db, feed_id, "g1", "Article").await;
    add_author(&db, article_id, "Solo Author", 0).await;

    let response = server
        .delete(&format!("/api/admin/articles/{article_id}"))
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(AuthorRepository::new(db.pool()).count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_admin_assign_article_category() {
    let (server, db) = create_test_server().await;
    let token = admin_token(&server, &db).await;
    let feed_id = create_feed(&db, "https://example.com/jaba.xml", "JABA").await;
    let article_id = create_article(&db, feed_id, "g1", "Article").await;

    let category = server
        .post("/api/admin/categories")
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .json(&json!({ "name": "Verbal Behavior" }))
        .await
        .json::<Value>();
    let category_id = category["data"]["id"].as_i64().unwrap();

    let response = server
        .put(&format!("/api/admin/articles/{article_id}/category"))
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .json(&json!({ "category_id": category_id }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>()["data"]["category_id"].as_i64(),
        Some(category_id)
    );

    // Unknown category is a validation error
    let response = server
        .put(&format!("/api/admin/articles/{article_id}/category"))
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .json(&json!({ "category_id": 9999 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Categories
// ============================================================================

#[tokio::test]
async fn test_admin_create_category_derives_slug() {
    let (server, db) = create_test_server().await;
    let token = admin_token(&server, &db).await;

    let response = server
        .post("/api/admin/categories")
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .json(&json!({ "name": "Applied Behavior Analysis", "color": "#2a9d8f" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["data"]["slug"], "applied-behavior-analysis");
    assert_eq!(body["data"]["color"], "#2a9d8f");
}

#[tokio::test]
async fn test_admin_create_category_duplicate_slug() {
    let (server, db) = create_test_server().await;
    let token = admin_token(&server, &db).await;

    server
        .post("/api/admin/categories")
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .json(&json!({ "name": "Ethics" }))
        .await;

    let response = server
        .post("/api/admin/categories")
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .json(&json!({ "name": "ethics" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_admin_update_and_delete_category() {
    let (server, db) = create_test_server().await;
    let token = admin_token(&server, &db).await;

    let created = server
        .post("/api/admin/categories")
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .json(&json!({ "name": "Ethics" }))
        .await
        .json::<Value>();
    let category_id = created["data"]["id"].as_i64().unwrap();

    let response = server
        .put(&format!("/api/admin/categories/{category_id}"))
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .json(&json!({ "name": "Professional Ethics" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["data"]["name"], "Professional Ethics");
    // Slug is immutable
    assert_eq!(body["data"]["slug"], "ethics");

    let response = server
        .delete(&format!("/api/admin/categories/{category_id}"))
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = server
        .delete(&format!("/api/admin/categories/{category_id}"))
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Banners
// ============================================================================

#[tokio::test]
async fn test_admin_banner_crud() {
    let (server, db) = create_test_server().await;
    let token = admin_token(&server, &db).await;

    let response = server
        .post("/api/admin/banners")
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .json(&json!({
            "title": "Conference 2026",
            "image_url": "https://cdn.example.com/banner.png",
            "target_url": "https://conference.example.com",
            "position": "header",
            "starts_at": "2020-01-01 00:00:00",
            "ends_at": "2099-01-01 00:00:00",
            "priority": 5
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    let banner_id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["position"], "header");
    assert_eq!(body["data"]["priority"], 5);
    assert_eq!(body["data"]["click_count"], 0);

    let response = server
        .put(&format!("/api/admin/banners/{banner_id}"))
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .json(&json!({ "position": "sidebar", "is_active": false }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["data"]["position"], "sidebar");
    assert_eq!(body["data"]["is_active"], false);

    let response = server
        .get("/api/admin/banners")
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .await;
    assert_eq!(response.json::<Value>()["data"].as_array().unwrap().len(), 1);

    let response = server
        .delete(&format!("/api/admin/banners/{banner_id}"))
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_admin_banner_rejects_bad_dates() {
    let (server, db) = create_test_server().await;
    let token = admin_token(&server, &db).await;

    let response = server
        .post("/api/admin/banners")
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .json(&json!({
            "title": "Bad",
            "image_url": "https://cdn.example.com/banner.png",
            "position": "header",
            "starts_at": "not a date",
            "ends_at": "2099-01-01 00:00:00"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    // Window ends before it starts
    let response = server
        .post("/api/admin/banners")
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .json(&json!({
            "title": "Inverted",
            "image_url": "https://cdn.example.com/banner.png",
            "position": "header",
            "starts_at": "2099-01-01 00:00:00",
            "ends_at": "2020-01-01 00:00:00"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}
