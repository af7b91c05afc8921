//! Public feed handlers.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::feed::FeedRepository;
use crate::web::dto::{ApiResponse, FeedResponse};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// GET /api/feeds - List active sources for public browsing.
pub async fn list_feeds(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<FeedResponse>>>, ApiError> {
    let feeds = FeedRepository::new(state.db.pool())
        .list_active()
        .await
        .map_err(|e| {
            tracing::error!("Failed to list feeds: {}", e);
            ApiError::internal("Failed to list feeds")
        })?;

    let responses: Vec<_> = feeds
        .into_iter()
        .map(|f| FeedResponse {
            id: f.id,
            title: f.title,
            description: f.description,
            site_url: f.site_url,
            country: f.country,
        })
        .collect();

    Ok(Json(ApiResponse::new(responses)))
}
