//! Database module for bhub.
//!
//! Provides pooled database connectivity and migration management.
//! SQLite is the default backend; the `postgres` feature switches the pool
//! type and SQL dialect constants.

mod refresh_token;
mod repository;
mod schema;
mod user;

pub use refresh_token::{NewRefreshToken, RefreshToken, RefreshTokenRepository};
pub use repository::UserRepository;
pub use schema::MIGRATIONS;
pub use user::{NewUser, Role, User, UserUpdate};

use tracing::{debug, info};

use crate::Result;

/// Connection pool type for the active backend.
#[cfg(feature = "sqlite")]
pub type DbPool = sqlx::SqlitePool;
#[cfg(feature = "postgres")]
pub type DbPool = sqlx::PgPool;

/// Database driver type for the active backend (for `QueryBuilder`).
#[cfg(feature = "sqlite")]
pub type DbBackend = sqlx::Sqlite;
#[cfg(feature = "postgres")]
pub type DbBackend = sqlx::Postgres;

/// SQL literal for boolean true on the active backend.
#[cfg(feature = "sqlite")]
pub const SQL_TRUE: &str = "1";
#[cfg(feature = "postgres")]
pub const SQL_TRUE: &str = "TRUE";

/// SQL literal for boolean false on the active backend.
#[cfg(feature = "sqlite")]
pub const SQL_FALSE: &str = "0";
#[cfg(feature = "postgres")]
pub const SQL_FALSE: &str = "FALSE";

/// SQL expression for the current UTC timestamp in storage format.
#[cfg(feature = "sqlite")]
pub const SQL_NOW: &str = "datetime('now')";
#[cfg(feature = "postgres")]
pub const SQL_NOW: &str = "TO_CHAR(NOW() AT TIME ZONE 'UTC', 'YYYY-MM-DD HH24:MI:SS')";

/// Database wrapper managing the connection pool and migrations.
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Open a SQLite database at the specified path.
    ///
    /// The file and parent directories are created if missing.
    /// Migrations are applied automatically.
    #[cfg(feature = "sqlite")]
    pub async fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        use sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions,
        };
        use std::time::Duration;

        let path = path.as_ref();
        info!("Opening database at {:?}", path);

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| crate::BhubError::Database(e.to_string()))?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Open an in-memory SQLite database for testing.
    #[cfg(feature = "sqlite")]
    pub async fn open_in_memory() -> Result<Self> {
        use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
        use std::str::FromStr;

        debug!("Opening in-memory database");

        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| crate::BhubError::Database(e.to_string()))?
            .foreign_keys(true);

        // A single connection keeps every query on the same in-memory database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| crate::BhubError::Database(e.to_string()))?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Connect to a PostgreSQL database by URL.
    #[cfg(feature = "postgres")]
    pub async fn connect(url: &str) -> Result<Self> {
        use sqlx::postgres::PgPoolOptions;

        info!("Connecting to database");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await
            .map_err(|e| crate::BhubError::Database(e.to_string()))?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Get a reference to the underlying pool.
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Get the current schema version.
    pub async fn schema_version(&self) -> Result<i64> {
        if !self.table_exists("schema_version").await? {
            return Ok(0);
        }

        let version: Option<i32> =
            sqlx::query_scalar("SELECT MAX(version) FROM schema_version")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| crate::BhubError::Database(e.to_string()))?;

        Ok(i64::from(version.unwrap_or(0)))
    }

    /// Check if a table exists.
    pub async fn table_exists(&self, table_name: &str) -> Result<bool> {
        #[cfg(feature = "sqlite")]
        let sql = "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name=$1)";
        #[cfg(feature = "postgres")]
        let sql =
            "SELECT EXISTS(SELECT 1 FROM information_schema.tables WHERE table_name=$1)";

        let exists: bool = sqlx::query_scalar(sql)
            .bind(table_name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| crate::BhubError::Database(e.to_string()))?;

        Ok(exists)
    }

    /// Apply pending migrations.
    pub async fn migrate(&self) -> Result<()> {
        let current_version = self.schema_version().await?;
        let migrations = MIGRATIONS;

        if current_version as usize >= migrations.len() {
            debug!("Database is up to date (version {})", current_version);
            return Ok(());
        }

        info!(
            "Migrating database from version {} to {}",
            current_version,
            migrations.len()
        );

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS schema_version (
                version     INTEGER PRIMARY KEY,
                applied_at  TEXT NOT NULL DEFAULT ''
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| crate::BhubError::Database(e.to_string()))?;

        for (i, migration) in migrations.iter().enumerate().skip(current_version as usize) {
            let version = (i + 1) as i32;
            info!("Applying migration v{}", version);

            let mut tx = self
                .pool
                .begin()
                .await
                .map_err(|e| crate::BhubError::Database(e.to_string()))?;

            sqlx::raw_sql(migration)
                .execute(&mut *tx)
                .await
                .map_err(|e| crate::BhubError::Database(e.to_string()))?;

            let applied_at = crate::datetime::now_storage();
            sqlx::query("INSERT INTO schema_version (version, applied_at) VALUES ($1, $2)")
                .bind(version)
                .bind(applied_at)
                .execute(&mut *tx)
                .await
                .map_err(|e| crate::BhubError::Database(e.to_string()))?;

            tx.commit()
                .await
                .map_err(|e| crate::BhubError::Database(e.to_string()))?;
            debug!("Migration v{} applied successfully", version);
        }

        info!(
            "Database migration complete (now at version {})",
            migrations.len()
        );
        Ok(())
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish()
    }
}
