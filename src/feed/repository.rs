//! Feed repository for bhub.

use sqlx::QueryBuilder;

use super::types::{Feed, FeedUpdate, NewFeed};
use crate::datetime::parse_datetime;
use crate::db::{DbBackend, DbPool, SQL_NOW, SQL_TRUE};
use crate::{BhubError, Result};
use chrono::Utc;

/// Row type for feeds from the database.
#[derive(Debug, Clone, sqlx::FromRow)]
struct FeedRow {
    id: i64,
    url: String,
    title: String,
    description: Option<String>,
    site_url: Option<String>,
    country: Option<String>,
    is_active: bool,
    last_sync_at: Option<String>,
    error_count: i32,
    last_error: Option<String>,
    created_at: String,
    updated_at: String,
}

impl From<FeedRow> for Feed {
    fn from(row: FeedRow) -> Self {
        Feed {
            id: row.id,
            url: row.url,
            title: row.title,
            description: row.description,
            site_url: row.site_url,
            country: row.country,
            is_active: row.is_active,
            last_sync_at: row.last_sync_at.and_then(|s| parse_datetime(&s)),
            error_count: row.error_count,
            last_error: row.last_error,
            created_at: parse_datetime(&row.created_at).unwrap_or_else(Utc::now),
            updated_at: parse_datetime(&row.updated_at).unwrap_or_else(Utc::now),
        }
    }
}

const FEED_COLUMNS: &str = "id, url, title, description, site_url, country, is_active, \
                            last_sync_at, error_count, last_error, created_at, updated_at";

/// Repository for feed operations.
pub struct FeedRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> FeedRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new feed.
    pub async fn create(&self, feed: &NewFeed) -> Result<Feed> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO feeds (url, title, description, site_url, country)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(&feed.url)
        .bind(&feed.title)
        .bind(&feed.description)
        .bind(&feed.site_url)
        .bind(&feed.country)
        .fetch_one(self.pool)
        .await
        .map_err(|e| BhubError::Database(e.to_string()))?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| BhubError::NotFound("feed".into()))
    }

    /// Get a feed by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Feed>> {
        let sql = format!("SELECT {FEED_COLUMNS} FROM feeds WHERE id = $1");
        let row = sqlx::query_as::<_, FeedRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| BhubError::Database(e.to_string()))?;

        Ok(row.map(Feed::from))
    }

    /// Get a feed by URL.
    pub async fn get_by_url(&self, url: &str) -> Result<Option<Feed>> {
        let sql = format!("SELECT {FEED_COLUMNS} FROM feeds WHERE url = $1");
        let row = sqlx::query_as::<_, FeedRow>(&sql)
            .bind(url)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| BhubError::Database(e.to_string()))?;

        Ok(row.map(Feed::from))
    }

    /// List all active feeds (ordered by registration order).
    pub async fn list_active(&self) -> Result<Vec<Feed>> {
        let sql = format!(
            "SELECT {FEED_COLUMNS} FROM feeds WHERE is_active = {SQL_TRUE} ORDER BY id ASC"
        );
        let rows = sqlx::query_as::<_, FeedRow>(&sql)
            .fetch_all(self.pool)
            .await
            .map_err(|e| BhubError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(Feed::from).collect())
    }

    /// List all feeds including inactive ones.
    pub async fn list_all(&self) -> Result<Vec<Feed>> {
        let sql = format!("SELECT {FEED_COLUMNS} FROM feeds ORDER BY id ASC");
        let rows = sqlx::query_as::<_, FeedRow>(&sql)
            .fetch_all(self.pool)
            .await
            .map_err(|e| BhubError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(Feed::from).collect())
    }

    /// Update a feed.
    ///
    /// Only fields set in the update are modified.
    pub async fn update(&self, id: i64, update: &FeedUpdate) -> Result<()> {
        if update.is_empty() {
            return Ok(());
        }

        let mut query: QueryBuilder<DbBackend> = QueryBuilder::new("UPDATE feeds SET ");
        let mut separated = query.separated(", ");

        if let Some(ref title) = update.title {
            separated.push("title = ");
            separated.push_bind_unseparated(title.clone());
        }
        if let Some(ref description) = update.description {
            separated.push("description = ");
            separated.push_bind_unseparated(description.clone());
        }
        if let Some(ref country) = update.country {
            separated.push("country = ");
            separated.push_bind_unseparated(country.clone());
        }
        if let Some(is_active) = update.is_active {
            separated.push("is_active = ");
            separated.push_bind_unseparated(is_active);
        }
        separated.push(format!("updated_at = {SQL_NOW}"));

        query.push(" WHERE id = ");
        query.push_bind(id);

        query
            .build()
            .execute(self.pool)
            .await
            .map_err(|e| BhubError::Database(e.to_string()))?;

        Ok(())
    }

    /// Delete a feed (cascades to its articles).
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM feeds WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| BhubError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    /// Record a successful sync: stamp last_sync_at and clear the error state.
    pub async fn mark_synced(&self, id: i64) -> Result<()> {
        let sql = format!(
            "UPDATE feeds
             SET last_sync_at = {SQL_NOW}, error_count = 0, last_error = NULL,
                 updated_at = {SQL_NOW}
             WHERE id = $1"
        );
        sqlx::query(&sql)
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| BhubError::Database(e.to_string()))?;
        Ok(())
    }

    /// Record a failed sync: stamp last_sync_at, bump error_count, store the message.
    pub async fn record_error(&self, id: i64, message: &str) -> Result<()> {
        let sql = format!(
            "UPDATE feeds
             SET last_sync_at = {SQL_NOW}, error_count = error_count + 1, last_error = $2,
                 updated_at = {SQL_NOW}
             WHERE id = $1"
        );
        sqlx::query(&sql)
            .bind(id)
            .bind(message)
            .execute(self.pool)
            .await
            .map_err(|e| BhubError::Database(e.to_string()))?;
        Ok(())
    }
}
