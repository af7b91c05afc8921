//! Category repository for bhub.

use super::types::{Category, NewCategory};
use crate::db::DbPool;
use crate::{BhubError, Result};

const CATEGORY_COLUMNS: &str = "id, name, slug, color, created_at";

/// Repository for category operations.
pub struct CategoryRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new category.
    ///
    /// Rejects empty slugs; duplicate slugs surface as database errors.
    pub async fn create(&self, category: &NewCategory) -> Result<Category> {
        if category.slug.trim().is_empty() {
            return Err(BhubError::Validation(
                "category slug must not be empty".to_string(),
            ));
        }

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO categories (name, slug, color) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&category.name)
        .bind(&category.slug)
        .bind(&category.color)
        .fetch_one(self.pool)
        .await
        .map_err(|e| BhubError::Database(e.to_string()))?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| BhubError::NotFound("category".into()))
    }

    /// Get a category by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Category>> {
        let sql = format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1");
        let category = sqlx::query_as::<_, Category>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| BhubError::Database(e.to_string()))?;

        Ok(category)
    }

    /// Get a category by slug.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        let sql = format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE slug = $1");
        let category = sqlx::query_as::<_, Category>(&sql)
            .bind(slug)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| BhubError::Database(e.to_string()))?;

        Ok(category)
    }

    /// List all categories ordered by name.
    pub async fn list_all(&self) -> Result<Vec<Category>> {
        let sql = format!("SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY name ASC");
        let categories = sqlx::query_as::<_, Category>(&sql)
            .fetch_all(self.pool)
            .await
            .map_err(|e| BhubError::Database(e.to_string()))?;

        Ok(categories)
    }

    /// Update name and/or color of a category.
    ///
    /// Slugs are immutable once created (they appear in public URLs).
    pub async fn update(
        &self,
        id: i64,
        name: Option<&str>,
        color: Option<Option<&str>>,
    ) -> Result<Option<Category>> {
        if let Some(name) = name {
            if name.trim().is_empty() {
                return Err(BhubError::Validation(
                    "category name must not be empty".to_string(),
                ));
            }
            sqlx::query("UPDATE categories SET name = $2 WHERE id = $1")
                .bind(id)
                .bind(name)
                .execute(self.pool)
                .await
                .map_err(|e| BhubError::Database(e.to_string()))?;
        }
        if let Some(color) = color {
            sqlx::query("UPDATE categories SET color = $2 WHERE id = $1")
                .bind(id)
                .bind(color)
                .execute(self.pool)
                .await
                .map_err(|e| BhubError::Database(e.to_string()))?;
        }

        self.get_by_id(id).await
    }

    /// Delete a category. Articles keep existing with a cleared category.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
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
    use crate::db::Database;

    async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let db = setup_db().await;
        let repo = CategoryRepository::new(db.pool());

        let category = repo
            .create(&NewCategory::new("Verbal Behavior").with_color("#2a9d8f"))
            .await
            .unwrap();
        assert_eq!(category.slug, "verbal-behavior");
        assert_eq!(category.color, Some("#2a9d8f".to_string()));

        let by_slug = repo.get_by_slug("verbal-behavior").await.unwrap().unwrap();
        assert_eq!(by_slug.id, category.id);
    }

    #[tokio::test]
    async fn test_empty_slug_rejected() {
        let db = setup_db().await;
        let repo = CategoryRepository::new(db.pool());

        let result = repo.create(&NewCategory::new("!!!")).await;
        assert!(matches!(result, Err(BhubError::Validation(_))));
    }

    #[tokio::test]
    async fn test_duplicate_slug_rejected() {
        let db = setup_db().await;
        let repo = CategoryRepository::new(db.pool());

        repo.create(&NewCategory::new("Ethics")).await.unwrap();
        let result = repo.create(&NewCategory::new("ethics")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_list_ordered_by_name() {
        let db = setup_db().await;
        let repo = CategoryRepository::new(db.pool());

        repo.create(&NewCategory::new("Verbal Behavior")).await.unwrap();
        repo.create(&NewCategory::new("Autism")).await.unwrap();

        let all = repo.list_all().await.unwrap();
        let names: Vec<_> = all.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Autism", "Verbal Behavior"]);
    }

    #[tokio::test]
    async fn test_update_keeps_slug() {
        let db = setup_db().await;
        let repo = CategoryRepository::new(db.pool());

        let category = repo.create(&NewCategory::new("Ethics")).await.unwrap();
        let updated = repo
            .update(category.id, Some("Professional Ethics"), Some(Some("#111")))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Professional Ethics");
        assert_eq!(updated.slug, "ethics");
        assert_eq!(updated.color, Some("#111".to_string()));
    }

    #[tokio::test]
    async fn test_delete_clears_article_category() {
        let db = setup_db().await;
        let repo = CategoryRepository::new(db.pool());
        let category = repo.create(&NewCategory::new("Ethics")).await.unwrap();

        let feed = crate::feed::FeedRepository::new(db.pool())
            .create(&crate::feed::NewFeed::new("https://example.com/f.xml", "F"))
            .await
            .unwrap();
        let articles = crate::content::ArticleRepository::new(db.pool());
        let article_id = articles
            .create_or_ignore(
                &crate::content::NewArticle::new(feed.id, "g1", "T").with_category(category.id),
            )
            .await
            .unwrap()
            .unwrap();

        assert!(repo.delete(category.id).await.unwrap());

        let article = articles.get_by_id(article_id).await.unwrap().unwrap();
        assert!(article.category_id.is_none());
    }
}
