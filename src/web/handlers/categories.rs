//! Public category handlers.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::content::CategoryRepository;
use crate::web::dto::{ApiResponse, CategoryResponse};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// GET /api/categories - List all categories.
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<CategoryResponse>>>, ApiError> {
    let categories = CategoryRepository::new(state.db.pool())
        .list_all()
        .await
        .map_err(|e| {
            tracing::error!("Failed to list categories: {}", e);
            ApiError::internal("Failed to list categories")
        })?;

    let responses: Vec<_> = categories
        .into_iter()
        .map(|c| CategoryResponse {
            id: c.id,
            name: c.name,
            slug: c.slug,
            color: c.color,
        })
        .collect();

    Ok(Json(ApiResponse::new(responses)))
}
