//! Banner repository for bhub.

use sqlx::QueryBuilder;

use super::types::{Banner, BannerUpdate, NewBanner};
use crate::datetime::now_storage;
use crate::db::{DbBackend, DbPool, SQL_TRUE};
use crate::{BhubError, Result};

const BANNER_COLUMNS: &str = "id, title, image_url, target_url, position, starts_at, ends_at, \
                              priority, click_count, is_active, created_at";

/// Repository for banner operations.
pub struct BannerRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> BannerRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new banner.
    pub async fn create(&self, banner: &NewBanner) -> Result<Banner> {
        if banner.ends_at < banner.starts_at {
            return Err(BhubError::Validation(
                "banner display window ends before it starts".to_string(),
            ));
        }

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO banners (title, image_url, target_url, position, starts_at, ends_at, priority)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id",
        )
        .bind(&banner.title)
        .bind(&banner.image_url)
        .bind(&banner.target_url)
        .bind(&banner.position)
        .bind(&banner.starts_at)
        .bind(&banner.ends_at)
        .bind(banner.priority)
        .fetch_one(self.pool)
        .await
        .map_err(|e| BhubError::Database(e.to_string()))?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| BhubError::NotFound("banner".into()))
    }

    /// Get a banner by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Banner>> {
        let sql = format!("SELECT {BANNER_COLUMNS} FROM banners WHERE id = $1");
        let banner = sqlx::query_as::<_, Banner>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| BhubError::Database(e.to_string()))?;

        Ok(banner)
    }

    /// List all banners (admin view), newest first.
    pub async fn list_all(&self) -> Result<Vec<Banner>> {
        let sql = format!("SELECT {BANNER_COLUMNS} FROM banners ORDER BY id DESC");
        let banners = sqlx::query_as::<_, Banner>(&sql)
            .fetch_all(self.pool)
            .await
            .map_err(|e| BhubError::Database(e.to_string()))?;

        Ok(banners)
    }

    /// List banners currently displayable at a position.
    ///
    /// A banner is displayable when it is active and now falls inside its
    /// window. Ordered by priority descending, then id.
    pub async fn list_active_for_position(&self, position: &str) -> Result<Vec<Banner>> {
        let now = now_storage();
        let sql = format!(
            "SELECT {BANNER_COLUMNS} FROM banners
             WHERE position = $1
               AND is_active = {SQL_TRUE}
               AND starts_at <= $2
               AND ends_at >= $2
             ORDER BY priority DESC, id ASC"
        );
        let banners = sqlx::query_as::<_, Banner>(&sql)
            .bind(position)
            .bind(now)
            .fetch_all(self.pool)
            .await
            .map_err(|e| BhubError::Database(e.to_string()))?;

        Ok(banners)
    }

    /// Update a banner.
    pub async fn update(&self, id: i64, update: &BannerUpdate) -> Result<Option<Banner>> {
        if update.is_empty() {
            return self.get_by_id(id).await;
        }

        let mut query: QueryBuilder<DbBackend> = QueryBuilder::new("UPDATE banners SET ");
        let mut separated = query.separated(", ");

        if let Some(ref title) = update.title {
            separated.push("title = ");
            separated.push_bind_unseparated(title.clone());
        }
        if let Some(ref image_url) = update.image_url {
            separated.push("image_url = ");
            separated.push_bind_unseparated(image_url.clone());
        }
        if let Some(ref target_url) = update.target_url {
            separated.push("target_url = ");
            separated.push_bind_unseparated(target_url.clone());
        }
        if let Some(ref position) = update.position {
            separated.push("position = ");
            separated.push_bind_unseparated(position.clone());
        }
        if let Some(ref starts_at) = update.starts_at {
            separated.push("starts_at = ");
            separated.push_bind_unseparated(starts_at.clone());
        }
        if let Some(ref ends_at) = update.ends_at {
            separated.push("ends_at = ");
            separated.push_bind_unseparated(ends_at.clone());
        }
        if let Some(priority) = update.priority {
            separated.push("priority = ");
            separated.push_bind_unseparated(priority);
        }
        if let Some(is_active) = update.is_active {
            separated.push("is_active = ");
            separated.push_bind_unseparated(is_active);
        }

        query.push(" WHERE id = ");
        query.push_bind(id);

        let result = query
            .build()
            .execute(self.pool)
            .await
            .map_err(|e| BhubError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(id).await
    }

    /// Delete a banner.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM banners WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| BhubError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    /// Record a click. Returns false when the banner does not exist.
    pub async fn increment_click_count(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("UPDATE banners SET click_count = click_count + 1 WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| BhubError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(all(test, feature = "sqlite"))]
mod tests {
    use super::*;
    use crate::banner::types::NewBanner;
    use crate::datetime::to_storage;
    use crate::db::Database;
    use chrono::{Duration, Utc};

    async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    fn window(days_back: i64, days_forward: i64) -> (String, String) {
        let now = Utc::now();
        (
            to_storage(&(now - Duration::days(days_back))),
            to_storage(&(now + Duration::days(days_forward))),
        )
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let db = setup_db().await;
        let repo = BannerRepository::new(db.pool());
        let (starts, ends) = window(1, 30);

        let banner = repo
            .create(
                &NewBanner::new("Promo", "https://cdn.example.com/b.png", "header", starts, ends)
                    .with_priority(5),
            )
            .await
            .unwrap();
        assert_eq!(banner.priority, 5);
        assert_eq!(banner.click_count, 0);
        assert!(banner.is_active);
    }

    #[tokio::test]
    async fn test_inverted_window_rejected() {
        let db = setup_db().await;
        let repo = BannerRepository::new(db.pool());

        let result = repo
            .create(&NewBanner::new(
                "Bad",
                "https://cdn.example.com/b.png",
                "header",
                "2026-02-01 00:00:00",
                "2026-01-01 00:00:00",
            ))
            .await;
        assert!(matches!(result, Err(BhubError::Validation(_))));
    }

    #[tokio::test]
    async fn test_active_for_position_filters_and_orders() {
        let db = setup_db().await;
        let repo = BannerRepository::new(db.pool());
        let (starts, ends) = window(1, 30);

        let low = repo
            .create(
                &NewBanner::new("Low", "https://c/l.png", "header", &starts, &ends)
                    .with_priority(1),
            )
            .await
            .unwrap();
        let high = repo
            .create(
                &NewBanner::new("High", "https://c/h.png", "header", &starts, &ends)
                    .with_priority(9),
            )
            .await
            .unwrap();
        // Other position
        repo.create(&NewBanner::new("Side", "https://c/s.png", "sidebar", &starts, &ends))
            .await
            .unwrap();
        // Expired window
        let (old_start, old_end) = (
            "2020-01-01 00:00:00".to_string(),
            "2020-02-01 00:00:00".to_string(),
        );
        repo.create(&NewBanner::new("Past", "https://c/p.png", "header", old_start, old_end))
            .await
            .unwrap();
        // Deactivated
        let off = repo
            .create(&NewBanner::new("Off", "https://c/o.png", "header", &starts, &ends))
            .await
            .unwrap();
        repo.update(
            off.id,
            &BannerUpdate {
                is_active: Some(false),
                ..BannerUpdate::new()
            },
        )
        .await
        .unwrap();

        let active = repo.list_active_for_position("header").await.unwrap();
        let ids: Vec<_> = active.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![high.id, low.id]);
    }

    #[tokio::test]
    async fn test_increment_click_count() {
        let db = setup_db().await;
        let repo = BannerRepository::new(db.pool());
        let (starts, ends) = window(1, 30);

        let banner = repo
            .create(&NewBanner::new("B", "https://c/b.png", "header", starts, ends))
            .await
            .unwrap();

        assert!(repo.increment_click_count(banner.id).await.unwrap());
        assert!(repo.increment_click_count(banner.id).await.unwrap());
        assert!(!repo.increment_click_count(9999).await.unwrap());

        let banner = repo.get_by_id(banner.id).await.unwrap().unwrap();
        assert_eq!(banner.click_count, 2);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let db = setup_db().await;
        let repo = BannerRepository::new(db.pool());
        let (starts, ends) = window(1, 30);

        let banner = repo
            .create(&NewBanner::new("B", "https://c/b.png", "header", starts, ends))
            .await
            .unwrap();

        let updated = repo
            .update(
                banner.id,
                &BannerUpdate {
                    position: Some("footer".to_string()),
                    priority: Some(3),
                    ..BannerUpdate::new()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.position, "footer");
        assert_eq!(updated.priority, 3);

        assert!(repo.delete(banner.id).await.unwrap());
        assert!(repo.get_by_id(banner.id).await.unwrap().is_none());
        assert!(repo.update(banner.id, &BannerUpdate::new()).await.unwrap().is_none());
    }
}
