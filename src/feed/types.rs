//! Feed types for bhub.

use chrono::{DateTime, Utc};

/// Maximum length for an article abstract.
pub const MAX_ABSTRACT_LENGTH: usize = 10000;

/// Maximum feed size in bytes (5MB).
pub const MAX_FEED_SIZE: u64 = 5 * 1024 * 1024;

/// Maximum consecutive errors before a feed is flagged.
pub const MAX_CONSECUTIVE_ERRORS: i32 = 5;

/// A configured RSS/Atom feed.
#[derive(Debug, Clone)]
pub struct Feed {
    /// Feed ID.
    pub id: i64,
    /// Feed URL.
    pub url: String,
    /// Feed title.
    pub title: String,
    /// Feed description.
    pub description: Option<String>,
    /// Site URL (the website the feed belongs to).
    pub site_url: Option<String>,
    /// ISO country code of the publisher.
    pub country: Option<String>,
    /// Whether the feed is synced.
    pub is_active: bool,
    /// Last time the feed was synced.
    pub last_sync_at: Option<DateTime<Utc>>,
    /// Number of consecutive sync errors.
    pub error_count: i32,
    /// Last error message.
    pub last_error: Option<String>,
    /// When the feed was created.
    pub created_at: DateTime<Utc>,
    /// When the feed was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Feed {
    /// Check if the feed has exceeded the error threshold.
    pub fn has_exceeded_error_threshold(&self) -> bool {
        self.error_count >= MAX_CONSECUTIVE_ERRORS
    }
}

/// New feed for creation.
#[derive(Debug, Clone)]
pub struct NewFeed {
    /// Feed URL.
    pub url: String,
    /// Feed title.
    pub title: String,
    /// Feed description.
    pub description: Option<String>,
    /// Site URL.
    pub site_url: Option<String>,
    /// ISO country code of the publisher.
    pub country: Option<String>,
}

impl NewFeed {
    /// Create a new feed.
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            description: None,
            site_url: None,
            country: None,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the site URL.
    pub fn with_site_url(mut self, site_url: impl Into<String>) -> Self {
        self.site_url = Some(site_url.into());
        self
    }

    /// Set the country code.
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }
}

/// Feed update request.
#[derive(Debug, Clone, Default)]
pub struct FeedUpdate {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<Option<String>>,
    /// New country code.
    pub country: Option<Option<String>>,
    /// Whether the feed is active.
    pub is_active: Option<bool>,
}

impl FeedUpdate {
    /// Create a new update request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    /// Set the country code.
    pub fn with_country(mut self, country: Option<String>) -> Self {
        self.country = Some(country);
        self
    }

    /// Enable the feed.
    pub fn enable(mut self) -> Self {
        self.is_active = Some(true);
        self
    }

    /// Disable the feed.
    pub fn disable(mut self) -> Self {
        self.is_active = Some(false);
        self
    }

    /// Check if the update is empty.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.country.is_none()
            && self.is_active.is_none()
    }
}

/// Parsed feed data from an external source.
#[derive(Debug, Clone)]
pub struct ParsedFeed {
    /// Feed title.
    pub title: String,
    /// Feed description.
    pub description: Option<String>,
    /// Site URL.
    pub site_url: Option<String>,
    /// Parsed entries.
    pub entries: Vec<ParsedEntry>,
}

/// Parsed entry data from an external source.
#[derive(Debug, Clone)]
pub struct ParsedEntry {
    /// Unique identifier (RSS guid or Atom id).
    pub guid: String,
    /// Entry title.
    pub title: String,
    /// Link to the original article.
    pub link: Option<String>,
    /// Entry summary (HTML tags stripped, truncated).
    pub summary: Option<String>,
    /// Author names in document order.
    pub authors: Vec<String>,
    /// When the entry was published.
    pub published_at: Option<DateTime<Utc>>,
}
