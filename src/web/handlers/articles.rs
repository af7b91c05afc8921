//! Public article handlers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::collections::HashMap;
use std::sync::Arc;

use crate::content::{
    Article, ArticleQuery, ArticleRepository, AuthorRepository, Category, CategoryRepository,
};
use crate::datetime::to_rfc3339;
use crate::similarity::find_similar;
use crate::web::dto::{
    ApiResponse, ArticleListQuery, ArticleResponse, CategoryResponse, PaginatedResponse,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// Number of articles returned by the highlighted endpoint.
const HIGHLIGHTED_LIMIT: i64 = 12;

/// Number of similar articles returned.
const SIMILAR_LIMIT: usize = 6;

fn category_response(category: &Category) -> CategoryResponse {
    CategoryResponse {
        id: category.id,
        name: category.name.clone(),
        slug: category.slug.clone(),
        color: category.color.clone(),
    }
}

/// Map an article plus its context into the public response shape.
async fn article_response(
    state: &AppState,
    article: Article,
    categories: &HashMap<i64, Category>,
) -> Result<ArticleResponse, ApiError> {
    let authors = AuthorRepository::new(state.db.pool())
        .for_article(article.id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load authors: {}", e);
            ApiError::internal("Failed to load article authors")
        })?;

    let category = article
        .category_id
        .and_then(|id| categories.get(&id))
        .map(category_response);

    Ok(ArticleResponse {
        id: article.id,
        feed_id: article.feed_id,
        category,
        title: article.title,
        abstract_text: article.abstract_text,
        original_url: article.original_url,
        published_at: article.published_at.as_deref().map(to_rfc3339),
        created_at: to_rfc3339(&article.created_at),
        highlighted: article.highlighted,
        view_count: article.view_count,
        authors: authors.into_iter().map(|a| a.name).collect(),
    })
}

async fn category_map(state: &AppState) -> Result<HashMap<i64, Category>, ApiError> {
    let categories = CategoryRepository::new(state.db.pool())
        .list_all()
        .await
        .map_err(|e| {
            tracing::error!("Failed to list categories: {}", e);
            ApiError::internal("Failed to list categories")
        })?;
    Ok(categories.into_iter().map(|c| (c.id, c)).collect())
}

/// GET /api/articles - Browse/search published articles.
pub async fn list_articles(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ArticleListQuery>,
) -> Result<Json<PaginatedResponse<ArticleResponse>>, ApiError> {
    let pagination = query.pagination();
    let (offset, limit) = pagination.to_offset_limit();

    let categories = category_map(&state).await?;

    // Unknown category slugs yield an empty page rather than an error
    let category_id = match query.category.as_deref().filter(|s| !s.is_empty()) {
        Some(slug) => match categories.values().find(|c| c.slug == slug) {
            Some(category) => Some(category.id),
            None => {
                return Ok(Json(PaginatedResponse::new(
                    Vec::new(),
                    pagination.page,
                    pagination.per_page,
                    0,
                )));
            }
        },
        None => None,
    };

    let article_query = ArticleQuery {
        search: query.q.clone().filter(|s| !s.trim().is_empty()),
        category_id,
        feed_id: query.feed_id,
        limit,
        offset,
        ..ArticleQuery::default()
    };

    let repo = ArticleRepository::new(state.db.pool());
    let total = repo.count(&article_query).await.map_err(|e| {
        tracing::error!("Failed to count articles: {}", e);
        ApiError::internal("Failed to count articles")
    })?;
    let articles = repo.list(&article_query).await.map_err(|e| {
        tracing::error!("Failed to list articles: {}", e);
        ApiError::internal("Failed to list articles")
    })?;

    let mut responses = Vec::with_capacity(articles.len());
    for article in articles {
        responses.push(article_response(&state, article, &categories).await?);
    }

    Ok(Json(PaginatedResponse::new(
        responses,
        pagination.page,
        pagination.per_page,
        total as u64,
    )))
}

/// GET /api/articles/highlighted - Curated highlights.
pub async fn list_highlighted(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<ArticleResponse>>>, ApiError> {
    let categories = category_map(&state).await?;

    let articles = ArticleRepository::new(state.db.pool())
        .list_highlighted(HIGHLIGHTED_LIMIT)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list highlighted articles: {}", e);
            ApiError::internal("Failed to list highlighted articles")
        })?;

    let mut responses = Vec::with_capacity(articles.len());
    for article in articles {
        responses.push(article_response(&state, article, &categories).await?);
    }

    Ok(Json(ApiResponse::new(responses)))
}

/// GET /api/articles/:id - Article detail; counts the view.
pub async fn get_article(
    State(state): State<Arc<AppState>>,
    Path(article_id): Path<i64>,
) -> Result<Json<ApiResponse<ArticleResponse>>, ApiError> {
    let repo = ArticleRepository::new(state.db.pool());

    let article = repo
        .get_by_id(article_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get article: {}", e);
            ApiError::internal("Failed to get article")
        })?
        .ok_or_else(|| ApiError::not_found("Article not found"))?;

    // Archived articles are invisible on the public surface
    if article.is_archived {
        return Err(ApiError::not_found("Article not found"));
    }

    repo.increment_view_count(article_id).await.map_err(|e| {
        tracing::error!("Failed to count view: {}", e);
        ApiError::internal("Failed to record view")
    })?;

    let categories = category_map(&state).await?;
    let mut response = article_response(&state, article, &categories).await?;
    response.view_count += 1;

    Ok(Json(ApiResponse::new(response)))
}

/// GET /api/articles/:id/similar - Embedding-based related articles.
pub async fn similar_articles(
    State(state): State<Arc<AppState>>,
    Path(article_id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<ArticleResponse>>>, ApiError> {
    let similar = find_similar(
        &state.db,
        article_id,
        state.similarity_candidates,
        SIMILAR_LIMIT,
    )
    .await
    .map_err(ApiError::from)?;

    let categories = category_map(&state).await?;
    let mut responses = Vec::with_capacity(similar.len());
    for article in similar {
        responses.push(article_response(&state, article, &categories).await?);
    }

    Ok(Json(ApiResponse::new(responses)))
}
