//! Cron-trigger handlers.
//!
//! Driven by an external scheduler; authenticated with the `x-cron-secret`
//! header instead of a session.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::datetime::to_rfc3339;
use crate::sync::{archive_old_articles, clean_repository, FeedAggregatorService};
use crate::web::dto::{ApiResponse, CleanupReportResponse, SyncFailureResponse, SyncReportResponse};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::CronAuth;

pub(super) fn sync_report_response(report: crate::sync::SyncReport) -> SyncReportResponse {
    SyncReportResponse {
        feeds_processed: report.feeds_processed,
        articles_added: report.articles_added,
        failures: report
            .failures
            .into_iter()
            .map(|f| SyncFailureResponse {
                feed_id: f.feed_id,
                feed_title: f.feed_title,
                error: f.error,
            })
            .collect(),
    }
}

pub(super) fn cleanup_report_response(report: crate::sync::CleanupReport) -> CleanupReportResponse {
    CleanupReportResponse {
        cutoff: to_rfc3339(&report.cutoff),
        articles_affected: report.articles_affected,
        authors_removed: report.authors_removed,
        archived: report.archived,
    }
}

/// Run a bulk sync with the state's fetcher and optional embedder.
pub(super) async fn run_sync_all(state: &AppState) -> Result<SyncReportResponse, ApiError> {
    let mut service =
        FeedAggregatorService::new(&state.db, &state.fetcher, state.max_items_per_feed);
    if let Some(ref embedder) = state.embedder {
        service = service.with_embedder(embedder.as_ref());
    }

    let report = service.sync_all().await.map_err(ApiError::from)?;
    Ok(sync_report_response(report))
}

/// POST /api/cron/sync - Scheduler-driven bulk sync.
#[utoipa::path(
    post,
    path = "/api/cron/sync",
    tag = "cron",
    responses(
        (status = 200, description = "Sync report", body = SyncReportResponse),
        (status = 401, description = "Missing or invalid cron secret")
    )
)]
pub async fn cron_sync(
    State(state): State<Arc<AppState>>,
    _auth: CronAuth,
) -> Result<Json<ApiResponse<SyncReportResponse>>, ApiError> {
    let report = run_sync_all(&state).await?;
    Ok(Json(ApiResponse::with_message("Sync finished", report)))
}

/// POST /api/cron/clean - Scheduler-driven retention pass.
#[utoipa::path(
    post,
    path = "/api/cron/clean",
    tag = "cron",
    responses(
        (status = 200, description = "Cleanup report", body = CleanupReportResponse),
        (status = 401, description = "Missing or invalid cron secret")
    )
)]
pub async fn cron_clean(
    State(state): State<Arc<AppState>>,
    _auth: CronAuth,
) -> Result<Json<ApiResponse<CleanupReportResponse>>, ApiError> {
    let report = if state.retention_archives {
        archive_old_articles(&state.db, state.retention_days).await
    } else {
        clean_repository(&state.db, state.retention_days).await
    }
    .map_err(ApiError::from)?;

    Ok(Json(ApiResponse::with_message(
        "Cleanup finished",
        cleanup_report_response(report),
    )))
}
