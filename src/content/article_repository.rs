//! Article and author repositories for bhub.

use sqlx::QueryBuilder;

use super::types::{Article, ArticleQuery, Author, NewArticle};
use crate::db::{DbBackend, DbPool, SQL_FALSE, SQL_TRUE};
use crate::{BhubError, Result};

/// Row type for articles from the database.
#[derive(Debug, Clone, sqlx::FromRow)]
struct ArticleRow {
    id: i64,
    feed_id: i64,
    category_id: Option<i64>,
    guid: String,
    title: String,
    #[sqlx(rename = "abstract")]
    abstract_text: Option<String>,
    original_url: Option<String>,
    published_at: Option<String>,
    created_at: String,
    highlighted: bool,
    is_archived: bool,
    view_count: i64,
    embedding: Option<String>,
}

impl From<ArticleRow> for Article {
    fn from(row: ArticleRow) -> Self {
        Article {
            id: row.id,
            feed_id: row.feed_id,
            category_id: row.category_id,
            guid: row.guid,
            title: row.title,
            abstract_text: row.abstract_text,
            original_url: row.original_url,
            published_at: row.published_at,
            created_at: row.created_at,
            highlighted: row.highlighted,
            is_archived: row.is_archived,
            view_count: row.view_count,
            embedding: row.embedding,
        }
    }
}

const ARTICLE_COLUMNS: &str = "id, feed_id, category_id, guid, title, abstract, original_url, \
                               published_at, created_at, highlighted, is_archived, view_count, \
                               embedding";

/// Repository for article operations.
pub struct ArticleRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> ArticleRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Insert an article unless its (feed, guid) pair already exists.
    ///
    /// Returns the new article ID, or None when the entry was already stored.
    pub async fn create_or_ignore(&self, article: &NewArticle) -> Result<Option<i64>> {
        let id: Option<i64> = sqlx::query_scalar(
            "INSERT INTO articles
                 (feed_id, category_id, guid, title, abstract, original_url, published_at, embedding)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             ON CONFLICT (feed_id, guid) DO NOTHING
             RETURNING id",
        )
        .bind(article.feed_id)
        .bind(article.category_id)
        .bind(&article.guid)
        .bind(&article.title)
        .bind(&article.abstract_text)
        .bind(&article.original_url)
        .bind(&article.published_at)
        .bind(&article.embedding)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| BhubError::Database(e.to_string()))?;

        Ok(id)
    }

    /// Check whether any article already carries the given original URL.
    pub async fn exists_by_original_url(&self, url: &str) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM articles WHERE original_url = $1)")
                .bind(url)
                .fetch_one(self.pool)
                .await
                .map_err(|e| BhubError::Database(e.to_string()))?;
        Ok(exists)
    }

    /// Get an article by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Article>> {
        let sql = format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE id = $1");
        let row = sqlx::query_as::<_, ArticleRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| BhubError::Database(e.to_string()))?;

        Ok(row.map(Article::from))
    }

    /// Get an article by its per-feed GUID.
    pub async fn get_by_guid(&self, feed_id: i64, guid: &str) -> Result<Option<Article>> {
        let sql = format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE feed_id = $1 AND guid = $2");
        let row = sqlx::query_as::<_, ArticleRow>(&sql)
            .bind(feed_id)
            .bind(guid)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| BhubError::Database(e.to_string()))?;

        Ok(row.map(Article::from))
    }

    fn apply_filters(qb: &mut QueryBuilder<'_, DbBackend>, query: &ArticleQuery) {
        if !query.include_archived {
            qb.push(format!(" AND is_archived = {SQL_FALSE}"));
        }
        if query.highlighted_only {
            qb.push(format!(" AND highlighted = {SQL_TRUE}"));
        }
        if let Some(feed_id) = query.feed_id {
            qb.push(" AND feed_id = ");
            qb.push_bind(feed_id);
        }
        if let Some(category_id) = query.category_id {
            qb.push(" AND category_id = ");
            qb.push_bind(category_id);
        }
        if let Some(ref search) = query.search {
            let pattern = format!("%{search}%");
            qb.push(" AND (title LIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR abstract LIKE ");
            qb.push_bind(pattern);
            qb.push(")");
        }
    }

    /// List articles matching the query, newest first.
    pub async fn list(&self, query: &ArticleQuery) -> Result<Vec<Article>> {
        let mut qb: QueryBuilder<DbBackend> =
            QueryBuilder::new(format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE 1=1"));
        Self::apply_filters(&mut qb, query);

        qb.push(" ORDER BY created_at DESC, id DESC LIMIT ");
        qb.push_bind(query.limit);
        qb.push(" OFFSET ");
        qb.push_bind(query.offset);

        let rows = qb
            .build_query_as::<ArticleRow>()
            .fetch_all(self.pool)
            .await
            .map_err(|e| BhubError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(Article::from).collect())
    }

    /// Count articles matching the query (ignoring the page window).
    pub async fn count(&self, query: &ArticleQuery) -> Result<i64> {
        let mut qb: QueryBuilder<DbBackend> =
            QueryBuilder::new("SELECT COUNT(*) FROM articles WHERE 1=1");
        Self::apply_filters(&mut qb, query);

        let count: i64 = qb
            .build_query_scalar()
            .fetch_one(self.pool)
            .await
            .map_err(|e| BhubError::Database(e.to_string()))?;

        Ok(count)
    }

    /// List highlighted, non-archived articles, newest first.
    pub async fn list_highlighted(&self, limit: i64) -> Result<Vec<Article>> {
        let query = ArticleQuery {
            highlighted_only: true,
            limit,
            ..ArticleQuery::default()
        };
        self.list(&query).await
    }

    /// Set the highlight flag. Returns false when the article does not exist.
    pub async fn set_highlighted(&self, id: i64, highlighted: bool) -> Result<bool> {
        let result = sqlx::query("UPDATE articles SET highlighted = $2 WHERE id = $1")
            .bind(id)
            .bind(highlighted)
            .execute(self.pool)
            .await
            .map_err(|e| BhubError::Database(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }

    /// Set the archive flag. Returns false when the article does not exist.
    pub async fn set_archived(&self, id: i64, archived: bool) -> Result<bool> {
        let result = sqlx::query("UPDATE articles SET is_archived = $2 WHERE id = $1")
            .bind(id)
            .bind(archived)
            .execute(self.pool)
            .await
            .map_err(|e| BhubError::Database(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }

    /// Assign or clear an article's category.
    pub async fn set_category(&self, id: i64, category_id: Option<i64>) -> Result<bool> {
        let result = sqlx::query("UPDATE articles SET category_id = $2 WHERE id = $1")
            .bind(id)
            .bind(category_id)
            .execute(self.pool)
            .await
            .map_err(|e| BhubError::Database(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete an article.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| BhubError::Database(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }

    /// Increment the view counter.
    pub async fn increment_view_count(&self, id: i64) -> Result<()> {
        sqlx::query("UPDATE articles SET view_count = view_count + 1 WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| BhubError::Database(e.to_string()))?;
        Ok(())
    }

    /// Store an embedding vector (JSON) for an article.
    pub async fn update_embedding(&self, id: i64, embedding: &str) -> Result<()> {
        sqlx::query("UPDATE articles SET embedding = $2 WHERE id = $1")
            .bind(id)
            .bind(embedding)
            .execute(self.pool)
            .await
            .map_err(|e| BhubError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete articles created strictly before the cutoff.
    ///
    /// Returns the number of deleted rows.
    pub async fn delete_older_than(&self, cutoff: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM articles WHERE created_at < $1")
            .bind(cutoff)
            .execute(self.pool)
            .await
            .map_err(|e| BhubError::Database(e.to_string()))?;
        Ok(result.rows_affected())
    }

    /// Archive articles created strictly before the cutoff.
    ///
    /// Returns the number of newly archived rows.
    pub async fn archive_older_than(&self, cutoff: &str) -> Result<u64> {
        let sql = format!(
            "UPDATE articles SET is_archived = {SQL_TRUE}
             WHERE created_at < $1 AND is_archived = {SQL_FALSE}"
        );
        let result = sqlx::query(&sql)
            .bind(cutoff)
            .execute(self.pool)
            .await
            .map_err(|e| BhubError::Database(e.to_string()))?;
        Ok(result.rows_affected())
    }

    /// List recent non-archived articles that carry an embedding.
    ///
    /// Used as the candidate pool for similarity ranking.
    pub async fn list_recent_with_embeddings(
        &self,
        limit: i64,
        exclude_id: i64,
    ) -> Result<Vec<Article>> {
        let sql = format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles
             WHERE embedding IS NOT NULL AND is_archived = {SQL_FALSE} AND id != $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2"
        );
        let rows = sqlx::query_as::<_, ArticleRow>(&sql)
            .bind(exclude_id)
            .bind(limit)
            .fetch_all(self.pool)
            .await
            .map_err(|e| BhubError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(Article::from).collect())
    }
}

/// Repository for author operations.
pub struct AuthorRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> AuthorRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Get an author by name, creating the row if missing.
    pub async fn get_or_create(&self, name: &str) -> Result<Author> {
        sqlx::query("INSERT INTO authors (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
            .bind(name)
            .execute(self.pool)
            .await
            .map_err(|e| BhubError::Database(e.to_string()))?;

        let author = sqlx::query_as::<_, Author>("SELECT id, name FROM authors WHERE name = $1")
            .bind(name)
            .fetch_one(self.pool)
            .await
            .map_err(|e| BhubError::Database(e.to_string()))?;

        Ok(author)
    }

    /// Link an author to an article at the given position.
    pub async fn link(&self, article_id: i64, author_id: i64, position: i32) -> Result<()> {
        sqlx::query(
            "INSERT INTO article_authors (article_id, author_id, position)
             VALUES ($1, $2, $3)
             ON CONFLICT (article_id, author_id) DO NOTHING",
        )
        .bind(article_id)
        .bind(author_id)
        .bind(position)
        .execute(self.pool)
        .await
        .map_err(|e| BhubError::Database(e.to_string()))?;
        Ok(())
    }

    /// List an article's authors in their stored order.
    pub async fn for_article(&self, article_id: i64) -> Result<Vec<Author>> {
        let authors = sqlx::query_as::<_, Author>(
            "SELECT a.id, a.name
             FROM authors a
             JOIN article_authors aa ON aa.author_id = a.id
             WHERE aa.article_id = $1
             ORDER BY aa.position ASC",
        )
        .bind(article_id)
        .fetch_all(self.pool)
        .await
        .map_err(|e| BhubError::Database(e.to_string()))?;

        Ok(authors)
    }

    /// Delete authors with no remaining article links.
    ///
    /// Returns the number of deleted rows.
    pub async fn delete_orphans(&self) -> Result<u64> {
        let result = sqlx::query(
            "DELETE FROM authors
             WHERE id NOT IN (SELECT DISTINCT author_id FROM article_authors)",
        )
        .execute(self.pool)
        .await
        .map_err(|e| BhubError::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }

    /// Count all authors.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(self.pool)
            .await
            .map_err(|e| BhubError::Database(e.to_string()))?;
        Ok(count)
    }
}
