//! Retention jobs: cleanup and archival of old content.
//!
//! Both jobs compute a cutoff of "now minus N days", act on articles with
//! `created_at` strictly before it, then garbage-collect authors left
//! without any article link.

use tracing::info;

use crate::content::{ArticleRepository, AuthorRepository};
use crate::datetime::cutoff_days_ago;
use crate::db::Database;
use crate::{BhubError, Result};

/// Result of a retention pass.
#[derive(Debug, Clone)]
pub struct CleanupReport {
    /// Cutoff used (storage format).
    pub cutoff: String,
    /// Articles deleted or archived.
    pub articles_affected: u64,
    /// Orphaned authors removed.
    pub authors_removed: u64,
    /// Whether articles were archived instead of deleted.
    pub archived: bool,
}

fn validate_days(days: i64) -> Result<()> {
    if days <= 0 {
        return Err(BhubError::Validation(
            "retention days must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Hard-delete articles older than the retention horizon.
pub async fn clean_repository(db: &Database, retention_days: i64) -> Result<CleanupReport> {
    validate_days(retention_days)?;
    let cutoff = cutoff_days_ago(retention_days);

    let article_repo = ArticleRepository::new(db.pool());
    let author_repo = AuthorRepository::new(db.pool());

    let articles_affected = article_repo.delete_older_than(&cutoff).await?;
    let authors_removed = author_repo.delete_orphans().await?;

    info!(
        cutoff = %cutoff,
        articles_deleted = articles_affected,
        authors_removed,
        "Repository cleanup finished"
    );

    Ok(CleanupReport {
        cutoff,
        articles_affected,
        authors_removed,
        archived: false,
    })
}

/// Soft-archive articles older than the retention horizon.
///
/// Archived articles keep their author links; the orphan pass only removes
/// authors already dangling from earlier hard deletes.
pub async fn archive_old_articles(db: &Database, retention_days: i64) -> Result<CleanupReport> {
    validate_days(retention_days)?;
    let cutoff = cutoff_days_ago(retention_days);

    let article_repo = ArticleRepository::new(db.pool());
    let author_repo = AuthorRepository::new(db.pool());

    let articles_affected = article_repo.archive_older_than(&cutoff).await?;
    let authors_removed = author_repo.delete_orphans().await?;

    info!(
        cutoff = %cutoff,
        articles_archived = articles_affected,
        authors_removed,
        "Archive pass finished"
    );

    Ok(CleanupReport {
        cutoff,
        articles_affected,
        authors_removed,
        archived: true,
    })
}
