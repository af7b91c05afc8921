use std::sync::Arc;

use tracing::{info, warn};

use bhub::db::{NewUser, Role, UserRepository};
use bhub::feed::FeedFetcher;
use bhub::similarity::{EmbeddingProvider, HttpEmbeddingProvider};
use bhub::sync::start_background_sync;
use bhub::web::WebServer;
use bhub::{Config, Database};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = match Config::load("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    // Initialize logging
    if let Err(e) = bhub::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        bhub::logging::init_console_only(&config.logging.level);
    }

    config.validate()?;

    info!("bhub - behavior analysis content repository");

    // Open database
    #[cfg(feature = "sqlite")]
    let db = Arc::new(Database::open(&config.database.path).await?);
    #[cfg(feature = "postgres")]
    let db = Arc::new(Database::connect(&config.database.path).await?);

    // Bootstrap the admin account on first run
    ensure_admin_account(&db, &config).await?;

    // Shared feed fetcher
    let fetcher = Arc::new(FeedFetcher::new()?);

    // Optional embedding provider
    let embedder: Option<Arc<dyn EmbeddingProvider>> = if config.embedding.service_url.is_empty() {
        info!("No embedding service configured; similar-articles disabled");
        None
    } else {
        Some(Arc::new(HttpEmbeddingProvider::new(
            &config.embedding.service_url,
        )?))
    };

    // Optional in-process sync loop (external cron is the default driver)
    if config.sync.background_enabled {
        start_background_sync(
            db.clone(),
            fetcher.clone(),
            config.sync.clone(),
            config.retention.clone(),
        );
    }

    let server = WebServer::new(&config, db, fetcher, embedder);
    info!(
        "Serving on {}:{}",
        config.server.host, config.server.port
    );
    server.run().await?;

    Ok(())
}

/// Create the initial admin account when the users table is empty.
async fn ensure_admin_account(db: &Database, config: &Config) -> bhub::Result<()> {
    let repo = UserRepository::new(db.pool());
    if repo.count().await? > 0 {
        return Ok(());
    }

    if config.auth.admin_password.is_empty() {
        warn!("No users exist and auth.admin_password is unset; admin API will be unreachable");
        return Ok(());
    }

    let hash = bhub::hash_password(&config.auth.admin_password)
        .map_err(|e| bhub::BhubError::Config(format!("invalid admin password: {e}")))?;
    let user = NewUser::new(&config.auth.admin_username, hash, "Administrator")
        .with_role(Role::Admin);
    repo.create(&user).await?;

    info!(username = %config.auth.admin_username, "Bootstrap admin account created");
    Ok(())
}
