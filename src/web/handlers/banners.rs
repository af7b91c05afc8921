//! Public banner handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::banner::BannerRepository;
use crate::web::dto::{ApiResponse, BannerResponse};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// GET /api/banners/position/:position - Banners in rotation for a slot.
pub async fn banners_for_position(
    State(state): State<Arc<AppState>>,
    Path(position): Path<String>,
) -> Result<Json<ApiResponse<Vec<BannerResponse>>>, ApiError> {
    let banners = BannerRepository::new(state.db.pool())
        .list_active_for_position(&position)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list banners: {}", e);
            ApiError::internal("Failed to list banners")
        })?;

    let responses: Vec<_> = banners
        .into_iter()
        .map(|b| BannerResponse {
            id: b.id,
            image_url: b.image_url,
            target_url: b.target_url,
            position: b.position,
            priority: b.priority,
        })
        .collect();

    Ok(Json(ApiResponse::new(responses)))
}

/// POST /api/banners/:id/click - Record a banner click.
pub async fn record_click(
    State(state): State<Arc<AppState>>,
    Path(banner_id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let clicked = BannerRepository::new(state.db.pool())
        .increment_click_count(banner_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to record click: {}", e);
            ApiError::internal("Failed to record click")
        })?;

    if !clicked {
        return Err(ApiError::not_found("Banner not found"));
    }

    Ok(Json(ApiResponse::new(())))
}
