//! Shared helpers for API integration tests.

use std::sync::Arc;

use axum_test::TestServer;
use serde_json::{json, Value};

use bhub::config::Config;
use bhub::content::{ArticleRepository, AuthorRepository, NewArticle};
use bhub::db::{NewUser, Role, UserRepository};
use bhub::feed::{FeedFetcher, FeedRepository, NewFeed};
use bhub::web::handlers::AppState;
use bhub::web::middleware::JwtState;
use bhub::web::router::create_router;
use bhub::Database;

/// Cron secret used by the test configuration.
pub const TEST_CRON_SECRET: &str = "test-cron-secret";

/// Create a test configuration.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.server.host = "127.0.0.1".to_string();
    config.server.port = 0;
    config.auth.jwt_secret = "test-secret-key-for-testing-only".to_string();
    config.cron.secret = TEST_CRON_SECRET.to_string();
    config.retention.days = 30;
    config
}

/// Create a test server with an in-memory database.
pub async fn create_test_server() -> (TestServer, Arc<Database>) {
    create_test_server_with_config(test_config()).await
}

/// Create a test server with a custom configuration.
pub async fn create_test_server_with_config(config: Config) -> (TestServer, Arc<Database>) {
    let db = Arc::new(
        Database::open_in_memory()
            .await
            .expect("Failed to create test database"),
    );
    let fetcher = Arc::new(FeedFetcher::new().expect("Failed to create fetcher"));

    let app_state = Arc::new(AppState::new(db.clone(), &config, fetcher));
    let jwt_state = Arc::new(JwtState::new(&config.auth.jwt_secret));

    let router = create_router(app_state, jwt_state, &config.server.cors_origins);
    let server = TestServer::new(router).expect("Failed to create test server");

    (server, db)
}

/// Create a user directly in the database and return its ID.
pub async fn create_user(db: &Database, username: &str, password: &str, role: Role) -> i64 {
    let hash = bhub::hash_password(password).expect("Failed to hash password");
    let user = NewUser::new(username, hash, username).with_role(role);
    UserRepository::new(db.pool())
        .create(&user)
        .await
        .expect("Failed to create user")
        .id
}

/// Log a user in and return the access token.
pub async fn login(server: &TestServer, username: &str, password: &str) -> String {
    let response = server
        .post("/api/auth/login")
        .json(&json!({ "username": username, "password": password }))
        .await;
    let body = response.json::<Value>();
    body["data"]["access_token"]
        .as_str()
        .expect("No access token in login response")
        .to_string()
}

/// Create an admin user and log in, returning the access token.
pub async fn admin_token(server: &TestServer, db: &Database) -> String {
    create_user(db, "admin", "admin-password", Role::Admin).await;
    login(server, "admin", "admin-password").await
}

/// Create a feed directly in the database and return its ID.
pub async fn create_feed(db: &Database, url: &str, title: &str) -> i64 {
    FeedRepository::new(db.pool())
        .create(&NewFeed::new(url, title))
        .await
        .expect("Failed to create feed")
        .id
}

/// Create an article directly in the database and return its ID.
pub async fn create_article(db: &Database, feed_id: i64, guid: &str, title: &str) -> i64 {
    ArticleRepository::new(db.pool())
        .create_or_ignore(&NewArticle::new(feed_id, guid, title))
        .await
        .expect("Failed to create article")
        .expect("Article already existed")
}

/// Link an author to an article, creating the author on demand.
pub async fn add_author(db: &Database, article_id: i64, name: &str, position: i32) {
    let repo = AuthorRepository::new(db.pool());
    let author = repo.get_or_create(name).await.expect("Failed to create author");
    repo.link(article_id, author.id, position)
        .await
        .expect("Failed to link author");
}

/// Rewrite an article's created_at so retention tests can age it.
pub async fn backdate_article(db: &Database, article_id: i64, days_back: i64) {
    let created_at = (chrono::Utc::now() - chrono::Duration::days(days_back))
        .format("%Y-%m-%d %H:%M:%S")
        .to_string();
    sqlx::query("UPDATE articles SET created_at = $2 WHERE id = $1")
        .bind(article_id)
        .bind(created_at)
        .execute(db.pool())
        .await
        .expect("Failed to backdate article");
}
