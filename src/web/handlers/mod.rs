//! API handlers for bhub.

pub mod admin;
pub mod articles;
pub mod auth;
pub mod banners;
pub mod categories;
pub mod cron;
pub mod feeds;

pub use auth::{login, logout, me, refresh};

use jsonwebtoken::EncodingKey;
use std::sync::Arc;

use crate::config::Config;
use crate::db::{Database, Role};
use crate::feed::FeedFetcher;
use crate::similarity::EmbeddingProvider;
use crate::web::error::ApiError;
use crate::web::middleware::JwtClaims;

/// Thread-safe database handle shared across handlers.
pub type SharedDatabase = Arc<Database>;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database handle.
    pub db: SharedDatabase,
    /// JWT encoding key.
    pub encoding_key: EncodingKey,
    /// Access token expiry in seconds.
    pub access_token_expiry: u64,
    /// Refresh token expiry in days.
    pub refresh_token_expiry: u64,
    /// Shared secret for cron endpoints (empty disables them).
    pub cron_secret: String,
    /// Maximum entries ingested per feed per sync.
    pub max_items_per_feed: usize,
    /// Default retention horizon in days.
    pub retention_days: i64,
    /// Default cleanup mode: archive instead of delete.
    pub retention_archives: bool,
    /// Candidate pool size for similarity ranking.
    pub similarity_candidates: usize,
    /// Shared feed fetcher.
    pub fetcher: Arc<FeedFetcher>,
    /// Optional embedding provider.
    pub embedder: Option<Arc<dyn EmbeddingProvider>>,
}

impl AppState {
    /// Create application state from configuration.
    pub fn new(db: SharedDatabase, config: &Config, fetcher: Arc<FeedFetcher>) -> Self {
        Self {
            db,
            encoding_key: EncodingKey::from_secret(config.auth.jwt_secret.as_bytes()),
            access_token_expiry: config.auth.access_token_expiry_secs,
            refresh_token_expiry: config.auth.refresh_token_expiry_days,
            cron_secret: config.cron.secret.clone(),
            max_items_per_feed: config.sync.max_items_per_feed,
            retention_days: config.retention.days,
            retention_archives: config.retention.archive_instead_of_delete,
            similarity_candidates: config.embedding.similarity_candidates,
            fetcher,
            embedder: None,
        }
    }

    /// Attach an embedding provider.
    pub fn with_embedder(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Generate an access token for a user.
    pub fn generate_access_token(
        &self,
        user_id: i64,
        username: &str,
        role: &Role,
    ) -> Result<String, ApiError> {
        let now = chrono::Utc::now().timestamp() as u64;
        let claims = JwtClaims {
            sub: user_id,
            username: username.to_string(),
            role: role.as_str().to_string(),
            iat: now,
            exp: now + self.access_token_expiry,
            jti: uuid::Uuid::new_v4().to_string(),
        };

        jsonwebtoken::encode(&jsonwebtoken::Header::default(), &claims, &self.encoding_key)
            .map_err(|e| {
                tracing::error!("Failed to encode JWT: {}", e);
                ApiError::internal("Failed to generate token")
            })
    }

    /// Generate an opaque refresh token.
    pub fn generate_refresh_token(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}
