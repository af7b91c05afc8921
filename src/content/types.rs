//! Content types for bhub: articles, authors, categories.

use crate::feed::MAX_ABSTRACT_LENGTH;

/// An ingested article.
#[derive(Debug, Clone)]
pub struct Article {
    /// Article ID.
    pub id: i64,
    /// Feed the article was ingested from.
    pub feed_id: i64,
    /// Assigned category (optional).
    pub category_id: Option<i64>,
    /// Unique identifier within the feed (RSS guid or Atom id).
    pub guid: String,
    /// Article title.
    pub title: String,
    /// Abstract text (HTML stripped, truncated).
    pub abstract_text: Option<String>,
    /// Link to the original article.
    pub original_url: Option<String>,
    /// When the article was published upstream.
    pub published_at: Option<String>,
    /// When the article was ingested.
    pub created_at: String,
    /// Admin-curated highlight flag.
    pub highlighted: bool,
    /// Soft-removal flag (hidden from public queries).
    pub is_archived: bool,
    /// Number of public detail views.
    pub view_count: i64,
    /// Embedding vector as JSON (optional).
    pub embedding: Option<String>,
}

/// New article for creation.
#[derive(Debug, Clone)]
pub struct NewArticle {
    /// Feed ID.
    pub feed_id: i64,
    /// Unique identifier within the feed.
    pub guid: String,
    /// Article title.
    pub title: String,
    /// Abstract text.
    pub abstract_text: Option<String>,
    /// Link to the original article.
    pub original_url: Option<String>,
    /// Upstream publication timestamp (storage format).
    pub published_at: Option<String>,
    /// Assigned category.
    pub category_id: Option<i64>,
    /// Embedding vector as JSON.
    pub embedding: Option<String>,
}

impl NewArticle {
    /// Create a new article.
    pub fn new(feed_id: i64, guid: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            feed_id,
            guid: guid.into(),
            title: title.into(),
            abstract_text: None,
            original_url: None,
            published_at: None,
            category_id: None,
            embedding: None,
        }
    }

    /// Set the abstract, truncating to the stored maximum.
    pub fn with_abstract(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        if text.len() > MAX_ABSTRACT_LENGTH {
            self.abstract_text = Some(text.chars().take(MAX_ABSTRACT_LENGTH).collect());
        } else {
            self.abstract_text = Some(text);
        }
        self
    }

    /// Set the original URL.
    pub fn with_original_url(mut self, url: impl Into<String>) -> Self {
        self.original_url = Some(url.into());
        self
    }

    /// Set the publication timestamp.
    pub fn with_published_at(mut self, published_at: impl Into<String>) -> Self {
        self.published_at = Some(published_at.into());
        self
    }

    /// Set the category.
    pub fn with_category(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Set the embedding vector (JSON).
    pub fn with_embedding(mut self, embedding: impl Into<String>) -> Self {
        self.embedding = Some(embedding.into());
        self
    }
}

/// Query parameters for listing articles.
#[derive(Debug, Clone, Default)]
pub struct ArticleQuery {
    /// Free-text search over title and abstract.
    pub search: Option<String>,
    /// Restrict to a category.
    pub category_id: Option<i64>,
    /// Restrict to a feed.
    pub feed_id: Option<i64>,
    /// Include archived articles (admin listings).
    pub include_archived: bool,
    /// Only highlighted articles.
    pub highlighted_only: bool,
    /// Maximum number of rows.
    pub limit: i64,
    /// Offset for pagination.
    pub offset: i64,
}

impl ArticleQuery {
    /// Create a query with the given page window.
    pub fn page(limit: i64, offset: i64) -> Self {
        Self {
            limit,
            offset,
            ..Self::default()
        }
    }
}

/// An author of one or more articles.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Author {
    /// Author ID.
    pub id: i64,
    /// Author name (unique).
    pub name: String,
}

/// An article category.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Category {
    /// Category ID.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// URL-safe slug (unique, non-empty).
    pub slug: String,
    /// Display color (hex code).
    pub color: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
}

/// New category for creation.
#[derive(Debug, Clone)]
pub struct NewCategory {
    /// Display name.
    pub name: String,
    /// URL-safe slug; derived from the name when empty.
    pub slug: String,
    /// Display color.
    pub color: Option<String>,
}

impl NewCategory {
    /// Create a new category, deriving the slug from the name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let slug = slugify(&name);
        Self {
            name,
            slug,
            color: None,
        }
    }

    /// Use an explicit slug.
    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = slug.into();
        self
    }

    /// Set the display color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Derive a URL-safe slug from a name.
///
/// Lowercases, maps non-alphanumeric runs to single hyphens, trims hyphens.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_hyphen = true;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    slug.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_article_builder() {
        let article = NewArticle::new(1, "doi-1", "Functional Analysis")
            .with_abstract("Study abstract")
            .with_original_url("https://example.com/1")
            .with_category(3);
        assert_eq!(article.feed_id, 1);
        assert_eq!(article.guid, "doi-1");
        assert_eq!(article.abstract_text, Some("Study abstract".to_string()));
        assert_eq!(article.category_id, Some(3));
    }

    #[test]
    fn test_new_article_truncates_long_abstract() {
        let long = "a".repeat(MAX_ABSTRACT_LENGTH + 50);
        let article = NewArticle::new(1, "g", "T").with_abstract(long);
        assert_eq!(
            article.abstract_text.unwrap().len(),
            MAX_ABSTRACT_LENGTH
        );
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Applied Behavior Analysis"), "applied-behavior-analysis");
        assert_eq!(slugify("  Verbal   Behavior  "), "verbal-behavior");
        assert_eq!(slugify("OBM & Ethics!"), "obm-ethics");
        assert_eq!(slugify("ABA"), "aba");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_new_category_derives_slug() {
        let cat = NewCategory::new("Verbal Behavior");
        assert_eq!(cat.slug, "verbal-behavior");

        let cat = NewCategory::new("Verbal Behavior").with_slug("vb");
        assert_eq!(cat.slug, "vb");
    }

    #[test]
    fn test_article_query_page() {
        let query = ArticleQuery::page(20, 40);
        assert_eq!(query.limit, 20);
        assert_eq!(query.offset, 40);
        assert!(!query.include_archived);
        assert!(!query.highlighted_only);
    }
}
