//! Background sync loop.
//!
//! Optional in-process alternative to an external scheduler hitting the
//! cron endpoints: syncs all active feeds at a fixed interval and runs the
//! retention pass roughly once a day.

use std::sync::Arc;

use tokio::time::{interval, Duration};
use tracing::{debug, error, info};

use crate::config::{RetentionConfig, SyncConfig};
use crate::db::Database;
use crate::feed::FeedFetcher;
use crate::sync::aggregator::FeedAggregatorService;
use crate::sync::retention::{archive_old_articles, clean_repository};

/// Seconds per retention pass.
const RETENTION_PERIOD_SECS: u64 = 24 * 3600;

/// Background updater driving periodic sync and retention.
pub struct SyncScheduler {
    db: Arc<Database>,
    fetcher: Arc<FeedFetcher>,
    sync_config: SyncConfig,
    retention_config: RetentionConfig,
}

impl SyncScheduler {
    /// Create a new scheduler.
    pub fn new(
        db: Arc<Database>,
        fetcher: Arc<FeedFetcher>,
        sync_config: SyncConfig,
        retention_config: RetentionConfig,
    ) -> Self {
        Self {
            db,
            fetcher,
            sync_config,
            retention_config,
        }
    }

    /// Run the scheduler loop indefinitely.
    pub async fn run(&self) {
        let period = self.sync_config.interval_secs.max(60);
        info!("Background sync started (interval: {period} seconds)");

        // Retention runs every Nth tick, at least daily
        let ticks_per_retention = (RETENTION_PERIOD_SECS / period).max(1);

        let mut timer = interval(Duration::from_secs(period));
        // The first tick fires immediately; skip it so startup stays quick
        timer.tick().await;

        let mut tick: u64 = 0;
        loop {
            timer.tick().await;
            tick += 1;

            self.run_sync().await;

            if tick % ticks_per_retention == 0 {
                self.run_retention().await;
            }
        }
    }

    async fn run_sync(&self) {
        debug!("Background sync tick");
        let service = FeedAggregatorService::new(
            &self.db,
            &self.fetcher,
            self.sync_config.max_items_per_feed,
        );
        if let Err(e) = service.sync_all().await {
            error!(error = %e, "Background sync failed");
        }
    }

    async fn run_retention(&self) {
        let days = self.retention_config.days;
        let result = if self.retention_config.archive_instead_of_delete {
            archive_old_articles(&self.db, days).await
        } else {
            clean_repository(&self.db, days).await
        };
        if let Err(e) = result {
            error!(error = %e, "Background retention pass failed");
        }
    }
}

/// Spawn the scheduler as a background task.
pub fn start_background_sync(
    db: Arc<Database>,
    fetcher: Arc<FeedFetcher>,
    sync_config: SyncConfig,
    retention_config: RetentionConfig,
) {
    let scheduler = SyncScheduler::new(db, fetcher, sync_config, retention_config);
    tokio::spawn(async move {
        scheduler.run().await;
    });
}
