//! Feed aggregation service.
//!
//! Pulls configured feeds, filters already-seen entries and persists new
//! articles with their ordered author lists. One feed's failure never
//! aborts a bulk sync; failures are collected per feed.

use tracing::{debug, info, warn};

use crate::content::{ArticleRepository, AuthorRepository, NewArticle};
use crate::datetime::to_storage;
use crate::db::Database;
use crate::feed::{Feed, FeedFetcher, FeedRepository, ParsedFeed, MAX_CONSECUTIVE_ERRORS};
use crate::similarity::{encode_embedding, EmbeddingProvider};
use crate::{BhubError, Result};

/// Counters for a single feed ingest pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Newly persisted articles.
    pub added: u32,
    /// Entries skipped as duplicates.
    pub skipped: u32,
}

/// Result of syncing one feed.
#[derive(Debug, Clone)]
pub struct FeedSyncSummary {
    /// Feed ID.
    pub feed_id: i64,
    /// Feed title at sync time.
    pub feed_title: String,
    /// Newly persisted articles.
    pub added: u32,
    /// Entries skipped as duplicates.
    pub skipped: u32,
}

/// A feed that failed during a bulk sync.
#[derive(Debug, Clone)]
pub struct FeedSyncFailure {
    /// Feed ID.
    pub feed_id: i64,
    /// Feed title.
    pub feed_title: String,
    /// Error message.
    pub error: String,
}

/// Aggregate result of a bulk sync.
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    /// Number of feeds attempted.
    pub feeds_processed: u32,
    /// Total newly persisted articles.
    pub articles_added: u32,
    /// Per-feed failures.
    pub failures: Vec<FeedSyncFailure>,
}

/// Service driving feed ingestion.
pub struct FeedAggregatorService<'a> {
    db: &'a Database,
    fetcher: &'a FeedFetcher,
    max_items: usize,
    embedder: Option<&'a dyn EmbeddingProvider>,
}

impl<'a> FeedAggregatorService<'a> {
    /// Create a new aggregator.
    pub fn new(db: &'a Database, fetcher: &'a FeedFetcher, max_items: usize) -> Self {
        Self {
            db,
            fetcher,
            max_items,
            embedder: None,
        }
    }

    /// Attach an embedding provider; new articles get vectors at ingest.
    pub fn with_embedder(mut self, embedder: &'a dyn EmbeddingProvider) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Sync a single feed by ID.
    ///
    /// On success the feed's sync timestamp is stamped and its error state
    /// cleared; on failure the error counter is bumped and the error
    /// propagated.
    pub async fn sync_feed(&self, feed_id: i64) -> Result<FeedSyncSummary> {
        let feed_repo = FeedRepository::new(self.db.pool());
        let feed = feed_repo
            .get_by_id(feed_id)
            .await?
            .ok_or_else(|| BhubError::NotFound("feed".into()))?;

        debug!("Syncing feed {}: {}", feed.id, feed.url);

        match self.fetcher.fetch(&feed.url).await {
            Ok(parsed) => {
                let stats = self.ingest(&feed, &parsed).await?;
                feed_repo.mark_synced(feed.id).await?;

                if stats.added > 0 {
                    info!(
                        feed_id = feed.id,
                        added = stats.added,
                        skipped = stats.skipped,
                        "Feed synced"
                    );
                } else {
                    debug!(feed_id = feed.id, "Feed synced: no new articles");
                }

                Ok(FeedSyncSummary {
                    feed_id: feed.id,
                    feed_title: feed.title,
                    added: stats.added,
                    skipped: stats.skipped,
                })
            }
            Err(e) => {
                warn!(feed_id = feed.id, error = %e, "Feed sync failed");
                feed_repo.record_error(feed.id, &e.to_string()).await?;

                if let Some(updated) = feed_repo.get_by_id(feed.id).await? {
                    if updated.error_count >= MAX_CONSECUTIVE_ERRORS {
                        warn!(
                            feed_id = feed.id,
                            error_count = updated.error_count,
                            "Feed keeps failing; consider disabling it"
                        );
                    }
                }

                Err(e)
            }
        }
    }

    /// Sync all active feeds, collecting per-feed failures.
    pub async fn sync_all(&self) -> Result<SyncReport> {
        let feed_repo = FeedRepository::new(self.db.pool());
        let feeds = feed_repo.list_active().await?;

        let mut report = SyncReport::default();

        for feed in feeds {
            report.feeds_processed += 1;
            match self.sync_feed(feed.id).await {
                Ok(summary) => {
                    report.articles_added += summary.added;
                }
                Err(BhubError::NotFound(_)) => {
                    // Feed deleted between listing and sync
                }
                Err(e) => {
                    report.failures.push(FeedSyncFailure {
                        feed_id: feed.id,
                        feed_title: feed.title.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            feeds = report.feeds_processed,
            added = report.articles_added,
            failed = report.failures.len(),
            "Bulk sync finished"
        );

        Ok(report)
    }

    /// Persist the new entries of a parsed feed.
    ///
    /// Entries are deduplicated by per-feed GUID and by original URL
    /// across all feeds. Ingest order preserves each entry's author order.
    pub async fn ingest(&self, feed: &Feed, parsed: &ParsedFeed) -> Result<IngestStats> {
        let article_repo = ArticleRepository::new(self.db.pool());
        let author_repo = AuthorRepository::new(self.db.pool());

        let mut stats = IngestStats::default();

        for entry in parsed.entries.iter().take(self.max_items) {
            if article_repo.get_by_guid(feed.id, &entry.guid).await?.is_some() {
                stats.skipped += 1;
                continue;
            }
            if let Some(ref link) = entry.link {
                if article_repo.exists_by_original_url(link).await? {
                    stats.skipped += 1;
                    continue;
                }
            }

            let mut article = NewArticle::new(feed.id, &entry.guid, &entry.title);
            if let Some(ref summary) = entry.summary {
                article = article.with_abstract(summary.clone());
            }
            if let Some(ref link) = entry.link {
                article = article.with_original_url(link.clone());
            }
            if let Some(published_at) = entry.published_at {
                article = article.with_published_at(to_storage(&published_at));
            }

            if let Some(embedder) = self.embedder {
                let text = match &entry.summary {
                    Some(summary) => format!("{}\n{}", entry.title, summary),
                    None => entry.title.clone(),
                };
                match embedder.embed(&text).await {
                    Ok(vector) => {
                        article = article.with_embedding(encode_embedding(&vector));
                    }
                    Err(e) => {
                        warn!(feed_id = feed.id, error = %e, "Embedding failed, storing article without vector");
                    }
                }
            }

            match article_repo.create_or_ignore(&article).await? {
                Some(article_id) => {
                    for (position, name) in entry.authors.iter().enumerate() {
                        let author = author_repo.get_or_create(name).await?;
                        author_repo
                            .link(article_id, author.id, position as i32)
                            .await?;
                    }
                    stats.added += 1;
                }
                None => {
                    stats.skipped += 1;
                }
            }
        }

        Ok(stats)
    }
}
